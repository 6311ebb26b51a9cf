//! Turns command sentences into typed commands.
//!
//! A command sentence is either a function call `name(arg, ...)` whose name
//! is one of the configured keywords, or a bare model path (optionally with a
//! `:format` suffix) for field binding.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::ast::{Command, CommandType, PathCommand, SubtemplateCommand};
use crate::constants::SELF_REFERENCE;
use crate::error::SyntaxError;
use crate::scanner::Sentence;
use crate::settings::SyntaxSettings;

static FUNCTION_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*([^(]+?)\s*\(\s*(.*?)\s*\)\s*$")
        .expect("function call pattern is valid")
});

/// Splits `name(arg, arg)` into its name and trimmed arguments.
///
/// Returns `None` when the text is not a function call at all.
/// `name()` yields an empty argument list.
pub fn parse_function_call(text: &str) -> Option<(&str, Vec<&str>)> {
    if !text.contains('(') {
        return None;
    }
    let captures = FUNCTION_CALL.captures(text)?;
    let name = captures.get(1)?.as_str();
    let raw_args = captures.get(2).map_or("", |m| m.as_str());
    let args = if raw_args.trim().is_empty() {
        Vec::new()
    } else {
        raw_args.split(',').map(str::trim).collect()
    };
    Some((name, args))
}

/// Lazily maps a sentence stream to a command stream.
pub fn recognize<'a, I>(
    sentences: I,
    settings: &'a SyntaxSettings,
) -> impl Iterator<Item = Result<Command, SyntaxError>> + 'a
where
    I: IntoIterator<Item = Result<Sentence, SyntaxError>>,
    I::IntoIter: 'a,
{
    sentences
        .into_iter()
        .map(move |sentence| {
            sentence.and_then(|sentence| recognize_sentence(sentence, settings))
        })
}

/// Recognizes a single sentence.
pub fn recognize_sentence(
    sentence: Sentence,
    settings: &SyntaxSettings,
) -> Result<Command, SyntaxError> {
    if !sentence.is_command {
        return Ok(Command::Copy(sentence));
    }

    let text = sentence.text.trim();
    if text.is_empty() {
        return Err(SyntaxError::EmptyCommand {
            line: sentence.line,
            column: sentence.column,
        });
    }

    let Some((name, args)) = parse_function_call(text) else {
        let model_path = normalize_self_reference(text, settings.self_keyword());
        debug!("Recognized field binding '{model_path}'");
        return Ok(Command::BindFromModel(PathCommand {
            sentence,
            model_path,
        }));
    };

    let command_type = settings
        .command_type(name)
        .ok_or_else(|| unrecognized(name, &sentence))?;
    debug!("Recognized {command_type} command '{text}'");

    match command_type {
        CommandType::IfElse if args.is_empty() => Ok(Command::Else(sentence)),
        CommandType::End => {
            require_arguments(&sentence, &args, 0)?;
            Ok(Command::End(sentence))
        }
        CommandType::Subtemplate => {
            require_arguments(&sentence, &args, 2)?;
            let subtemplate_name = args[0].to_string();
            let model_path = normalize_self_reference(args[1], settings.self_keyword());
            Ok(Command::Subtemplate(SubtemplateCommand {
                sentence,
                subtemplate_name,
                model_path,
            }))
        }
        CommandType::If
        | CommandType::IfElse
        | CommandType::IfEnd
        | CommandType::IfExists
        | CommandType::IfExistsElse
        | CommandType::IfExistsEnd
        | CommandType::Loop
        | CommandType::LoopEnd => {
            require_arguments(&sentence, &args, 1)?;
            let model_path = normalize_self_reference(args[0], settings.self_keyword());
            let command = PathCommand {
                sentence,
                model_path,
            };
            Ok(path_command(command_type, command))
        }
        CommandType::Copy | CommandType::BindFromModel | CommandType::Else => {
            Err(unrecognized(name, &sentence))
        }
    }
}

fn unrecognized(name: &str, sentence: &Sentence) -> SyntaxError {
    SyntaxError::UnrecognizedCommand {
        name: name.to_string(),
        command: sentence.text.trim().to_string(),
        line: sentence.line,
        column: sentence.column,
    }
}

fn path_command(command_type: CommandType, command: PathCommand) -> Command {
    match command_type {
        CommandType::If => Command::If(command),
        CommandType::IfElse => Command::IfElse(command),
        CommandType::IfEnd => Command::IfEnd(command),
        CommandType::IfExists => Command::IfExists(command),
        CommandType::IfExistsElse => Command::IfExistsElse(command),
        CommandType::IfExistsEnd => Command::IfExistsEnd(command),
        CommandType::Loop => Command::Loop(command),
        CommandType::LoopEnd => Command::LoopEnd(command),
        _ => Command::BindFromModel(command),
    }
}

fn require_arguments(
    sentence: &Sentence,
    args: &[&str],
    expected: usize,
) -> Result<(), SyntaxError> {
    let found = args.iter().filter(|arg| !arg.is_empty()).count();
    if found == expected && args.len() == expected {
        return Ok(());
    }
    Err(SyntaxError::ArgumentCount {
        command: sentence.text.trim().to_string(),
        expected,
        found,
        line: sentence.line,
        column: sentence.column,
    })
}

/// Rewrites a leading self keyword segment to the internal self token,
/// leaving any `:format` suffix untouched.
fn normalize_self_reference(path: &str, self_keyword: &str) -> String {
    let (value_path, format) = match path.split_once(':') {
        Some((value_path, format)) => (value_path.trim(), Some(format)),
        None => (path, None),
    };

    let normalized = if value_path == self_keyword {
        SELF_REFERENCE.to_string()
    } else if let Some(rest) = value_path
        .strip_prefix(self_keyword)
        .and_then(|rest| rest.strip_prefix('.'))
    {
        format!("{SELF_REFERENCE}.{rest}")
    } else {
        value_path.to_string()
    };

    match format {
        Some(format) => format!("{normalized}:{format}"),
        None => normalized,
    }
}
