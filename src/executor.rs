//! Template execution: walks a syntax tree against a model and produces the
//! output document.
//!
//! Sibling nodes are processed with an explicit stack. Only loop bodies and
//! subtemplates recurse, so recursion depth follows the nesting of the
//! template and never the size of the model.

use std::borrow::Cow;

use indexmap::IndexMap;
use log::{debug, trace};
use serde_json::{json, Value};

use crate::ast::{Command, PathCommand, SyntaxTreeNode};
use crate::error::ProcessingError;
use crate::extractor::{type_name, JsonValueExtractor, ValueExtractor};
use crate::formatter::{DefaultValueFormatter, ValueFormatter};
use crate::model::{split_format, ModelChain};
use crate::template::TextTemplate;

/// Collaborators used while executing a template.
pub struct ExecutionConfig {
    pub value_extractor: Box<dyn ValueExtractor>,
    pub value_formatter: Box<dyn ValueFormatter>,
}

impl ExecutionConfig {
    pub fn new(
        value_extractor: Box<dyn ValueExtractor>,
        value_formatter: Box<dyn ValueFormatter>,
    ) -> Self {
        Self {
            value_extractor,
            value_formatter,
        }
    }

    pub fn with_extractor(mut self, value_extractor: Box<dyn ValueExtractor>) -> Self {
        self.value_extractor = value_extractor;
        self
    }

    pub fn with_formatter(mut self, value_formatter: Box<dyn ValueFormatter>) -> Self {
        self.value_formatter = value_formatter;
        self
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::new(
            Box::new(JsonValueExtractor),
            Box::new(DefaultValueFormatter),
        )
    }
}

impl std::fmt::Debug for ExecutionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionConfig").finish_non_exhaustive()
    }
}

/// Per-call execution state. Nothing here is shared between calls, so one
/// template can be executed from several threads at once.
struct Executor<'t> {
    subtemplates: &'t IndexMap<String, TextTemplate>,
    config: &'t ExecutionConfig,
    document: String,
}

/// Executes `template` against `model` and returns the document.
///
/// # Errors
/// * `ProcessingError` on the first command that cannot be executed; no
///   partial document is returned
pub fn execute(
    template: &TextTemplate,
    model: &Value,
    config: &ExecutionConfig,
) -> Result<String, ProcessingError> {
    let mut executor = Executor {
        subtemplates: template.subtemplates(),
        config,
        document: String::with_capacity(template.source_text().len()),
    };
    let chain = ModelChain::root(model);
    executor.process_nodes(starting_nodes(template.tree()), &chain)?;
    Ok(executor.document)
}

/// The root node contributes its scope; any other node is executed as is.
fn starting_nodes(node: &SyntaxTreeNode) -> &[SyntaxTreeNode] {
    match node.primary_scope() {
        Some(scope) if node.is_root() => scope,
        _ => std::slice::from_ref(node),
    }
}

fn push_all<'n>(stack: &mut Vec<&'n SyntaxTreeNode>, scope: Option<&'n [SyntaxTreeNode]>) {
    if let Some(scope) = scope {
        stack.extend(scope.iter().rev());
    }
}

impl Executor<'_> {
    fn process_nodes(
        &mut self,
        nodes: &[SyntaxTreeNode],
        chain: &ModelChain<'_>,
    ) -> Result<(), ProcessingError> {
        let mut stack: Vec<&SyntaxTreeNode> = Vec::with_capacity(nodes.len());
        push_all(&mut stack, Some(nodes));

        while let Some(node) = stack.pop() {
            let Some(command) = node.command() else {
                push_all(&mut stack, node.primary_scope());
                continue;
            };

            match command {
                Command::Copy(sentence) => self.document.push_str(&sentence.text),
                Command::BindFromModel(bind) => {
                    let (path, format) = split_format(&bind.model_path);
                    let value = self.resolve(path, chain)?;
                    let text = self
                        .config
                        .value_formatter
                        .format_value(&value, format)
                        .map_err(|source| ProcessingError::ValueFormatting {
                            path: bind.model_path.clone(),
                            source,
                        })?;
                    self.document.push_str(&text);
                }
                Command::If(condition) => {
                    let value = self.resolve(&condition.model_path, chain)?;
                    let branch = match &*value {
                        Value::Bool(true) => node.primary_scope(),
                        Value::Bool(false) | Value::Null => node.secondary_scope(),
                        other => {
                            return Err(ProcessingError::NotBoolean {
                                path: condition.model_path.clone(),
                                found: type_name(other),
                            });
                        }
                    };
                    push_all(&mut stack, branch);
                }
                Command::IfExists(condition) => {
                    let value = self.resolve(&condition.model_path, chain)?;
                    if value.is_null() {
                        push_all(&mut stack, node.secondary_scope());
                    } else {
                        push_all(&mut stack, node.primary_scope());
                    }
                }
                Command::Loop(loop_command) => self.process_loop(node, loop_command, chain)?,
                Command::Subtemplate(call) => {
                    let submodel = self.resolve(&call.model_path, chain)?;
                    let name = &call.subtemplate_name;
                    let subtemplate = self
                        .subtemplates
                        .get(name)
                        .ok_or_else(|| ProcessingError::SubtemplateNotFound {
                            name: name.clone(),
                        })?;
                    debug!("Executing subtemplate '{name}' on '{}'", call.model_path);
                    let subdocument = execute(subtemplate, &submodel, self.config)?;
                    self.document.push_str(&subdocument);
                }
                Command::IfElse(_)
                | Command::IfEnd(_)
                | Command::IfExistsElse(_)
                | Command::IfExistsEnd(_)
                | Command::LoopEnd(_)
                | Command::Else(_)
                | Command::End(_) => {
                    return Err(ProcessingError::UnexpectedCommand {
                        command: command.source_text().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn process_loop(
        &mut self,
        node: &SyntaxTreeNode,
        loop_command: &PathCommand,
        chain: &ModelChain<'_>,
    ) -> Result<(), ProcessingError> {
        let value = self.resolve(&loop_command.model_path, chain)?;
        let items: Cow<'_, [Value]> = match &*value {
            Value::Null => return Ok(()),
            Value::Array(items) => Cow::Borrowed(items.as_slice()),
            Value::String(text) => text
                .chars()
                .map(|c| Value::String(c.to_string()))
                .collect(),
            Value::Object(map) => map
                .iter()
                .map(|(key, entry)| json!({ "key": key, "value": entry }))
                .collect(),
            other => {
                return Err(ProcessingError::NotIterable {
                    path: loop_command.model_path.clone(),
                    found: type_name(other),
                });
            }
        };

        let body = node.primary_scope().unwrap_or_default();
        let path = &loop_command.model_path;
        trace!("Looping over {} item(s) of '{path}'", items.len());
        for item in items.iter() {
            let link = chain.child(path, item);
            self.process_nodes(body, &link)?;
        }
        Ok(())
    }

    fn resolve<'a>(
        &self,
        path: &str,
        chain: &ModelChain<'a>,
    ) -> Result<Cow<'a, Value>, ProcessingError> {
        chain
            .resolve(path, self.config.value_extractor.as_ref())
            .map_err(|source| ProcessingError::ValueExtraction {
                path: path.to_string(),
                source,
            })
    }
}
