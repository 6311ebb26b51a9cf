//! texttemplate is a small templating language with bracket tags.
//! It compiles template text with field bindings, conditionals, loops and
//! subtemplate calls into a syntax tree and executes that tree against a
//! JSON-shaped model.

/// Syntax tree types: commands and nodes
pub mod ast;

/// Command-line interface module for the texttemplate binary
pub mod cli;

/// Model and syntax settings files
/// Supports JSON and YAML formats
pub mod config;

/// Default tags, keywords and file patterns
pub mod constants;

/// Error types and handling for texttemplate
pub mod error;

/// Tree walker producing the output document
pub mod executor;

/// Path lookup inside model values
pub mod extractor;

/// Value to text conversion
pub mod formatter;

/// Template and subtemplate files
pub mod loader;

/// Logger setup for the binary
pub mod logger;

/// Model chain and path resolution during execution
pub mod model;

/// Tree builder and the scan → recognize → build pipeline
pub mod parser;

/// Command recognition from tag text
pub mod recognizer;

/// Engine facade and the `TemplateRenderer` trait
pub mod renderer;

/// Sentence scanner
pub mod scanner;

/// Tag and keyword configuration
pub mod settings;

/// Compiled templates
pub mod template;

pub use error::{Error, ProcessingError, Result, SyntaxError};
pub use executor::ExecutionConfig;
pub use renderer::{TemplateEngine, TemplateRenderer};
pub use settings::{SyntaxSettings, SyntaxSettingsBuilder};
pub use template::TextTemplate;
