//! Template parsing: scan → recognize → build.
//!
//! The tree builder validates block nesting with a stack of open
//! (command, scope) frames and produces a [`SyntaxTreeNode`] tree.

use log::debug;
use std::mem;

use crate::ast::{Command, SyntaxTreeNode};
use crate::error::SyntaxError;
use crate::recognizer::recognize;
use crate::scanner::scan;
use crate::settings::SyntaxSettings;

/// Parses template text into its syntax tree.
pub fn parse(text: &str, settings: &SyntaxSettings) -> Result<SyntaxTreeNode, SyntaxError> {
    let sentences = scan(text, settings.begin_tag(), settings.end_tag());
    build_syntax_tree(recognize(sentences, settings))
}

/// Collects commands into nested scopes while blocks are open.
struct ScopeCollector {
    active_command: Option<Command>,
    active_scope: Vec<SyntaxTreeNode>,
    stack: Vec<(Option<Command>, Vec<SyntaxTreeNode>)>,
}

impl ScopeCollector {
    fn new() -> Self {
        Self {
            active_command: None,
            active_scope: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn start_child_scope(&mut self, command: Command) {
        debug!("Opening scope for '{}'", command.source_text());
        let parent_command = self.active_command.replace(command);
        let parent_scope = mem::take(&mut self.active_scope);
        self.stack.push((parent_command, parent_scope));
    }

    /// Command that opened the active block. Inside an else branch this is
    /// the `if`/`ifexists` below it on the stack.
    fn opening_command(&self) -> Option<&Command> {
        match &self.active_command {
            Some(Command::IfElse(_) | Command::IfExistsElse(_) | Command::Else(_)) => {
                self.stack.last().and_then(|(command, _)| command.as_ref())
            }
            active => active.as_ref(),
        }
    }

    fn add_to_scope(&mut self, node: SyntaxTreeNode) {
        self.active_scope.push(node);
    }

    /// Closes the active scope and returns its opening command and contents.
    fn restore_parent_scope(&mut self) -> (Option<Command>, Vec<SyntaxTreeNode>) {
        let (parent_command, parent_scope) = self.stack.pop().unwrap_or_default();
        let command = mem::replace(&mut self.active_command, parent_command);
        let scope = mem::replace(&mut self.active_scope, parent_scope);
        (command, scope)
    }

    /// Closes a conditional, whose else branch (if any) is the active scope.
    fn close_conditional(&mut self) -> SyntaxTreeNode {
        let mut secondary_scope = None;
        if matches!(
            self.active_command,
            Some(Command::IfElse(_) | Command::IfExistsElse(_) | Command::Else(_))
        ) {
            secondary_scope = Some(self.restore_parent_scope().1);
        }
        let (command, primary_scope) = self.restore_parent_scope();
        build_block(command, primary_scope, secondary_scope)
    }

    fn close_loop(&mut self) -> SyntaxTreeNode {
        let (command, body) = self.restore_parent_scope();
        build_block(command, body, None)
    }
}

fn build_block(
    command: Option<Command>,
    primary_scope: Vec<SyntaxTreeNode>,
    secondary_scope: Option<Vec<SyntaxTreeNode>>,
) -> SyntaxTreeNode {
    match command {
        Some(command) => {
            debug!("Closing scope for '{}'", command.source_text());
            SyntaxTreeNode::block(command, primary_scope, secondary_scope)
        }
        None => SyntaxTreeNode::root(primary_scope),
    }
}

/// Builds the syntax tree from a command stream.
///
/// # Errors
/// * Any error already present in the stream, in stream order
/// * `SyntaxError::UnexpectedScopeBoundary` for else/end commands with no open block
/// * `SyntaxError::ScopeMismatch` / `SyntaxError::PathMismatch` when an else or
///   end command does not belong to the open block
/// * `SyntaxError::UnclosedCommand` when input ends inside a block
pub fn build_syntax_tree<I>(commands: I) -> Result<SyntaxTreeNode, SyntaxError>
where
    I: IntoIterator<Item = Result<Command, SyntaxError>>,
{
    let mut collector = ScopeCollector::new();

    for command in commands {
        let command = command?;
        match command {
            Command::Copy(_) | Command::BindFromModel(_) | Command::Subtemplate(_) => {
                collector.add_to_scope(SyntaxTreeNode::leaf(command));
            }
            Command::If(_) | Command::IfExists(_) | Command::Loop(_) => {
                collector.start_child_scope(command);
            }
            Command::IfElse(_) | Command::IfExistsElse(_) | Command::Else(_) => {
                let active = collector.active_command.as_ref();
                validate_else(active, collector.opening_command(), &command)?;
                collector.start_child_scope(command);
            }
            Command::IfEnd(_) | Command::IfExistsEnd(_) | Command::LoopEnd(_) | Command::End(_) => {
                validate_end(collector.opening_command(), &command)?;
                let node = match collector.opening_command() {
                    Some(Command::Loop(_)) => collector.close_loop(),
                    _ => collector.close_conditional(),
                };
                collector.add_to_scope(node);
            }
        }
    }

    if let Some(command) = collector.opening_command() {
        let sentence = command.sentence();
        return Err(SyntaxError::UnclosedCommand {
            command: command.source_text().to_string(),
            line: sentence.line,
            column: sentence.column,
        });
    }
    Ok(SyntaxTreeNode::root(collector.active_scope))
}

/// Checks that an else command continues the active if/ifexists block.
/// Errors point at `opening`, which differs from `active` once the block is
/// already in its else branch.
fn validate_else(
    active: Option<&Command>,
    opening: Option<&Command>,
    command: &Command,
) -> Result<(), SyntaxError> {
    let (Some(active), Some(opening)) = (active, opening) else {
        return Err(unexpected_boundary(command));
    };
    let matches_type = matches!(
        (active, command),
        (Command::If(_), Command::IfElse(_))
            | (Command::IfExists(_), Command::IfExistsElse(_))
            | (Command::If(_) | Command::IfExists(_), Command::Else(_))
    );
    if !matches_type {
        return Err(mismatch(opening, command, false));
    }
    validate_paths(active, command)
}

/// Checks that an end command closes the block opened by `opening`.
fn validate_end(opening: Option<&Command>, command: &Command) -> Result<(), SyntaxError> {
    let Some(opening) = opening else {
        return Err(unexpected_boundary(command));
    };
    let matches_type = matches!(
        (opening, command),
        (Command::If(_), Command::IfEnd(_))
            | (Command::IfExists(_), Command::IfExistsEnd(_))
            | (Command::Loop(_), Command::LoopEnd(_))
            | (Command::If(_) | Command::IfExists(_) | Command::Loop(_), Command::End(_))
    );
    if !matches_type {
        return Err(mismatch(opening, command, false));
    }
    validate_paths(opening, command)
}

/// Generic else/end commands carry no path and match any path.
fn validate_paths(active: &Command, command: &Command) -> Result<(), SyntaxError> {
    match (active.model_path(), command.model_path()) {
        (Some(opening), Some(closing)) if opening != closing => {
            Err(mismatch(active, command, true))
        }
        _ => Ok(()),
    }
}

fn unexpected_boundary(command: &Command) -> SyntaxError {
    let sentence = command.sentence();
    SyntaxError::UnexpectedScopeBoundary {
        command: command.source_text().to_string(),
        line: sentence.line,
        column: sentence.column,
    }
}

/// Error anchored on the opening command's position.
fn mismatch(active: &Command, command: &Command, path_only: bool) -> SyntaxError {
    let opening = active.source_text().to_string();
    let found = command.source_text().to_string();
    let line = active.sentence().line;
    let column = active.sentence().column;
    if path_only {
        SyntaxError::PathMismatch {
            opening,
            found,
            line,
            column,
        }
    } else {
        SyntaxError::ScopeMismatch {
            opening,
            found,
            line,
            column,
        }
    }
}
