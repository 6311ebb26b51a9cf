//! Compiled templates and their subtemplate registry.

use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

use crate::ast::SyntaxTreeNode;
use crate::error::{Error, ProcessingError, Result, SyntaxError};
use crate::executor::{execute, ExecutionConfig};
use crate::parser::parse;
use crate::settings::SyntaxSettings;

/// A parsed template, ready to be executed any number of times.
///
/// Apart from subtemplate registration a `TextTemplate` never changes after
/// parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTemplate {
    source: String,
    tree: SyntaxTreeNode,
    subtemplates: IndexMap<String, TextTemplate>,
}

impl TextTemplate {
    /// Parses `source` with the default syntax.
    pub fn parse(source: impl Into<String>) -> std::result::Result<Self, SyntaxError> {
        Self::parse_with(source, &SyntaxSettings::default())
    }

    /// Parses `source` with custom syntax settings.
    ///
    /// # Errors
    /// * `SyntaxError` describing the first problem found in the text
    pub fn parse_with(
        source: impl Into<String>,
        settings: &SyntaxSettings,
    ) -> std::result::Result<Self, SyntaxError> {
        let source = source.into();
        let tree = parse(&source, settings)?;
        Ok(Self {
            source,
            tree,
            subtemplates: IndexMap::new(),
        })
    }

    /// Wraps an already built tree, e.g. one assembled by hand.
    pub fn from_tree(source: impl Into<String>, tree: SyntaxTreeNode) -> Self {
        Self {
            source: source.into(),
            tree,
            subtemplates: IndexMap::new(),
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &SyntaxTreeNode {
        &self.tree
    }

    pub fn subtemplates(&self) -> &IndexMap<String, TextTemplate> {
        &self.subtemplates
    }

    pub fn subtemplate(&self, name: &str) -> Option<&TextTemplate> {
        self.subtemplates.get(name)
    }

    /// Registers `template` under `name` for `template(name, path)` commands.
    ///
    /// # Errors
    /// * `Error::DuplicateSubtemplate` if the name is already taken
    pub fn add_subtemplate(
        &mut self,
        name: impl Into<String>,
        template: TextTemplate,
    ) -> Result<()> {
        let name = name.into();
        if self.subtemplates.contains_key(&name) {
            return Err(Error::DuplicateSubtemplate { name });
        }
        debug!("Registering subtemplate '{name}'");
        self.subtemplates.insert(name, template);
        Ok(())
    }

    /// Parses `source` and registers it under `name`.
    pub fn add_subtemplate_source(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
        settings: &SyntaxSettings,
    ) -> Result<()> {
        let template = Self::parse_with(source, settings)?;
        self.add_subtemplate(name, template)
    }

    /// Renders the template with the default extractor and formatter.
    pub fn build_document(&self, model: &Value) -> std::result::Result<String, ProcessingError> {
        self.build_document_with(model, &ExecutionConfig::default())
    }

    pub fn build_document_with(
        &self,
        model: &Value,
        config: &ExecutionConfig,
    ) -> std::result::Result<String, ProcessingError> {
        execute(self, model, config)
    }
}

impl std::str::FromStr for TextTemplate {
    type Err = SyntaxError;

    fn from_str(source: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(source)
    }
}
