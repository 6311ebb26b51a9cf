//! Error handling for texttemplate.
//! Compile-time problems (template authoring bugs) and run-time problems
//! (model/data bugs) travel on separate error types so callers can tell them
//! apart; [`Error`] unifies both for callers that don't care.

use std::io;
use thiserror::Error;

use crate::extractor::ExtractError;
use crate::formatter::FormatError;

/// Errors raised while scanning, recognizing or building a template.
///
/// Structural variants carry the 1-based line and column of the command the
/// user has to fix. For block mismatches that is the *opening* command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error(
        "Unexpected command start tag at line {line}. Close previous command before starting a new one."
    )]
    UnexpectedBeginTag { line: usize },

    #[error("Unexpected command end tag at line {line}. No command was started.")]
    UnexpectedEndTag { line: usize },

    #[error(
        "Command started at line {line} is not terminated before the end of the template."
    )]
    UnterminatedCommand { line: usize },

    #[error("Empty command at line {line}, column {column}.")]
    EmptyCommand { line: usize, column: usize },

    #[error(
        "Unrecognized command '{name}' in '{command}' at line {line}, column {column}."
    )]
    UnrecognizedCommand {
        name: String,
        command: String,
        line: usize,
        column: usize,
    },

    #[error(
        "Command '{command}' expects {expected} argument(s), found {found}, at line {line}, column {column}."
    )]
    ArgumentCount {
        command: String,
        expected: usize,
        found: usize,
        line: usize,
        column: usize,
    },

    #[error(
        "Command '{command}' at line {line}, column {column} has no open block to continue or close."
    )]
    UnexpectedScopeBoundary {
        command: String,
        line: usize,
        column: usize,
    },

    #[error(
        "Scope boundary commands do not match: '{found}' cannot follow '{opening}' opened at line {line}, column {column}."
    )]
    ScopeMismatch {
        opening: String,
        found: String,
        line: usize,
        column: usize,
    },

    #[error(
        "Scope boundary commands do not match: '{found}' refers to a different path than '{opening}' opened at line {line}, column {column}."
    )]
    PathMismatch {
        opening: String,
        found: String,
        line: usize,
        column: usize,
    },

    #[error(
        "Command '{command}' started at line {line}, column {column} was not closed with an ending command."
    )]
    UnclosedCommand {
        command: String,
        line: usize,
        column: usize,
    },
}

/// Errors raised while executing a parsed template against a model.
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error(
        "Invalid type at path '{path}'. Expected boolean or null, found {found}."
    )]
    NotBoolean { path: String, found: &'static str },

    #[error(
        "Invalid type at path '{path}'. Expected a sequence or null, found {found}."
    )]
    NotIterable { path: String, found: &'static str },

    #[error("Requested subtemplate was not found: '{name}'.")]
    SubtemplateNotFound { name: String },

    #[error("Failed to extract value '{path}' from model.")]
    ValueExtraction {
        path: String,
        #[source]
        source: ExtractError,
    },

    #[error("Failed to format value '{path}'.")]
    ValueFormatting {
        path: String,
        #[source]
        source: FormatError,
    },

    #[error("Command '{command}' cannot be executed on its own.")]
    UnexpectedCommand { command: String },
}

/// Umbrella error type for texttemplate operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Template text is malformed
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Template could not be applied to the model
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// Syntax settings violate a consistency rule
    #[error("Invalid syntax settings: {0}.")]
    InvalidSettings(String),

    /// A subtemplate with the same name is already registered
    #[error("Subtemplate '{name}' is already registered.")]
    DuplicateSubtemplate { name: String },

    /// Model introspection failed
    #[error(transparent)]
    Extraction(#[from] ExtractError),

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors in model, settings or subtemplate files
    #[error("Configuration error: {0}.")]
    ConfigError(String),
}

impl Error {
    /// True for errors caused by the template text rather than the model.
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Error::Syntax(_))
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    std::process::exit(1);
}
