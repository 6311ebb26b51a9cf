//! Template engine facade.
//! Bundles syntax settings, execution collaborators and a set of shared
//! subtemplates behind one object.
use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::executor::ExecutionConfig;
use crate::settings::SyntaxSettings;
use crate::template::TextTemplate;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Model the template's paths are read from
    ///
    /// # Returns
    /// * `Result<String>` - Rendered document
    fn render(&self, template: &str, context: &Value) -> Result<String>;
}

/// Parses and executes templates with one syntax and one configuration.
///
/// Subtemplates registered on the engine are attached to every template the
/// engine parses.
#[derive(Debug, Default)]
pub struct TemplateEngine {
    syntax: SyntaxSettings,
    config: ExecutionConfig,
    subtemplates: IndexMap<String, TextTemplate>,
}

impl TemplateEngine {
    /// Creates an engine with the default syntax, extractor and formatter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_syntax(mut self, syntax: SyntaxSettings) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn with_config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn syntax(&self) -> &SyntaxSettings {
        &self.syntax
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    pub fn subtemplates(&self) -> &IndexMap<String, TextTemplate> {
        &self.subtemplates
    }

    /// Parses `source` and shares it with every template parsed afterwards.
    ///
    /// # Errors
    /// * `Error::Syntax` if `source` does not parse
    /// * `Error::DuplicateSubtemplate` if `name` is taken
    pub fn register_subtemplate(&mut self, name: impl Into<String>, source: &str) -> Result<()> {
        let template = TextTemplate::parse_with(source, &self.syntax)?;
        self.register_template(name, template)
    }

    /// Shares an already parsed template.
    pub fn register_template(
        &mut self,
        name: impl Into<String>,
        template: TextTemplate,
    ) -> Result<()> {
        let name = name.into();
        if self.subtemplates.contains_key(&name) {
            return Err(Error::DuplicateSubtemplate { name });
        }
        debug!("Sharing subtemplate '{name}'");
        self.subtemplates.insert(name, template);
        Ok(())
    }

    /// Shares every template of `templates`, stopping at the first duplicate.
    pub fn register_templates(
        &mut self,
        templates: impl IntoIterator<Item = (String, TextTemplate)>,
    ) -> Result<()> {
        for (name, template) in templates {
            self.register_template(name, template)?;
        }
        Ok(())
    }

    /// Parses `text` and attaches the shared subtemplates to it.
    pub fn parse_template(&self, text: &str) -> Result<TextTemplate> {
        let template = TextTemplate::parse_with(text, &self.syntax)?;
        self.attach_subtemplates(template)
    }

    /// Attaches the shared subtemplates to a template parsed elsewhere.
    ///
    /// # Errors
    /// * `Error::DuplicateSubtemplate` if the template already has one of the names
    pub fn attach_subtemplates(&self, mut template: TextTemplate) -> Result<TextTemplate> {
        for (name, subtemplate) in &self.subtemplates {
            template.add_subtemplate(name.clone(), subtemplate.clone())?;
        }
        Ok(template)
    }

    /// Parses and executes `text` in one go.
    pub fn process(&self, text: &str, model: &Value) -> Result<String> {
        let template = self.parse_template(text)?;
        self.process_template(&template, model)
    }

    /// Executes an already parsed template with the engine's configuration.
    pub fn process_template(&self, template: &TextTemplate, model: &Value) -> Result<String> {
        Ok(template.build_document_with(model, &self.config)?)
    }

    /// Lists the paths readable from `model`, each wrapped in the engine's
    /// command tags so it can be pasted into a template as is.
    ///
    /// # Errors
    /// * `Error::Extraction` if `max_depth` is zero
    pub fn discover_value_paths(&self, model: &Value, max_depth: usize) -> Result<Vec<String>> {
        let paths = self
            .config
            .value_extractor
            .discover_valid_paths(model, max_depth)?;
        let (begin, end) = (self.syntax.begin_tag(), self.syntax.end_tag());
        Ok(paths
            .into_iter()
            .map(|path| format!("{begin}{path}{end}"))
            .collect())
    }
}

impl TemplateRenderer for TemplateEngine {
    /// Parses `template` with the engine's syntax and renders it.
    ///
    /// # Errors
    /// * `Error::Syntax` if the template does not parse
    /// * `Error::Processing` if it cannot be applied to `context`
    fn render(&self, template: &str, context: &Value) -> Result<String> {
        self.process(template, context)
    }
}
