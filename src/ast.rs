//! Recognized commands and the syntax tree built from them.

use crate::scanner::Sentence;

/// Kind of a recognized command, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    Copy,
    BindFromModel,
    If,
    IfElse,
    IfEnd,
    IfExists,
    IfExistsElse,
    IfExistsEnd,
    Loop,
    LoopEnd,
    Subtemplate,
    Else, // context-sensitive else of the innermost if/ifexists
    End,  // context-sensitive end of the innermost block
}

impl std::fmt::Display for CommandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Command carrying a dotted model path, e.g. `if(Order.IsPaid)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCommand {
    pub sentence: Sentence,
    pub model_path: String,
}

/// `template(name, path)`: renders a registered subtemplate on a submodel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtemplateCommand {
    pub sentence: Sentence,
    pub subtemplate_name: String,
    pub model_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Copy(Sentence),
    /// `model_path` may end in `:format`
    BindFromModel(PathCommand),
    If(PathCommand),
    IfElse(PathCommand),
    IfEnd(PathCommand),
    IfExists(PathCommand),
    IfExistsElse(PathCommand),
    IfExistsEnd(PathCommand),
    Loop(PathCommand),
    LoopEnd(PathCommand),
    Subtemplate(SubtemplateCommand),
    Else(Sentence),
    End(Sentence),
}

impl Command {
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Copy(_) => CommandType::Copy,
            Command::BindFromModel(_) => CommandType::BindFromModel,
            Command::If(_) => CommandType::If,
            Command::IfElse(_) => CommandType::IfElse,
            Command::IfEnd(_) => CommandType::IfEnd,
            Command::IfExists(_) => CommandType::IfExists,
            Command::IfExistsElse(_) => CommandType::IfExistsElse,
            Command::IfExistsEnd(_) => CommandType::IfExistsEnd,
            Command::Loop(_) => CommandType::Loop,
            Command::LoopEnd(_) => CommandType::LoopEnd,
            Command::Subtemplate(_) => CommandType::Subtemplate,
            Command::Else(_) => CommandType::Else,
            Command::End(_) => CommandType::End,
        }
    }

    /// Source sentence the command was recognized from.
    pub fn sentence(&self) -> &Sentence {
        match self {
            Command::Copy(sentence) | Command::Else(sentence) | Command::End(sentence) => sentence,
            Command::BindFromModel(c)
            | Command::If(c)
            | Command::IfElse(c)
            | Command::IfEnd(c)
            | Command::IfExists(c)
            | Command::IfExistsElse(c)
            | Command::IfExistsEnd(c)
            | Command::Loop(c)
            | Command::LoopEnd(c) => &c.sentence,
            Command::Subtemplate(c) => &c.sentence,
        }
    }

    pub fn model_path(&self) -> Option<&str> {
        match self {
            Command::Copy(_) | Command::Else(_) | Command::End(_) => None,
            Command::BindFromModel(c)
            | Command::If(c)
            | Command::IfElse(c)
            | Command::IfEnd(c)
            | Command::IfExists(c)
            | Command::IfExistsElse(c)
            | Command::IfExistsEnd(c)
            | Command::Loop(c)
            | Command::LoopEnd(c) => Some(&c.model_path),
            Command::Subtemplate(c) => Some(&c.model_path),
        }
    }

    /// Trimmed tag text, used to name the command in diagnostics.
    pub fn source_text(&self) -> &str {
        self.sentence().text.trim()
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.command_type(), self.sentence().text)
    }
}

/// Node of the parsed template.
///
/// The document root has no command and owns only the primary scope.
/// Conditionals keep the true/exists branch in the primary scope and the
/// else branch, when present, in the secondary scope. Loops keep their body
/// in the primary scope. Leaf commands have no scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTreeNode {
    command: Option<Command>,
    primary_scope: Option<Vec<SyntaxTreeNode>>,
    secondary_scope: Option<Vec<SyntaxTreeNode>>,
}

impl SyntaxTreeNode {
    pub fn root(scope: Vec<SyntaxTreeNode>) -> Self {
        Self {
            command: None,
            primary_scope: Some(scope),
            secondary_scope: None,
        }
    }

    pub fn leaf(command: Command) -> Self {
        Self {
            command: Some(command),
            primary_scope: None,
            secondary_scope: None,
        }
    }

    pub fn block(
        command: Command,
        primary_scope: Vec<SyntaxTreeNode>,
        secondary_scope: Option<Vec<SyntaxTreeNode>>,
    ) -> Self {
        Self {
            command: Some(command),
            primary_scope: Some(primary_scope),
            secondary_scope,
        }
    }

    pub fn command(&self) -> Option<&Command> {
        self.command.as_ref()
    }

    pub fn primary_scope(&self) -> Option<&[SyntaxTreeNode]> {
        self.primary_scope.as_deref()
    }

    pub fn secondary_scope(&self) -> Option<&[SyntaxTreeNode]> {
        self.secondary_scope.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.command.is_none()
    }
}
