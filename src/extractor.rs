//! Value extraction: walks a relative dotted path inside a model value.
//!
//! The executor never inspects model values itself; it delegates every
//! member access to a [`ValueExtractor`]. [`JsonValueExtractor`] is the
//! implementation for `serde_json::Value` models.

use std::borrow::Cow;

use indexmap::IndexSet;
use log::trace;
use serde_json::Value;
use thiserror::Error;

use crate::constants::LENGTH_MEMBERS;

/// Failure to resolve a path segment.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No member was found in model with name '{member}' (at '{path}').")]
    MemberNotFound { member: String, path: String },

    #[error(
        "Index {index} is out of range for a sequence of {length} item(s) (at '{path}')."
    )]
    IndexOutOfRange {
        index: usize,
        length: usize,
        path: String,
    },

    #[error("Cannot read member '{member}' of a {found} value (at '{path}').")]
    NotAContainer {
        member: String,
        found: &'static str,
        path: String,
    },

    #[error("Depth must be a positive integer, got {0}.")]
    InvalidDepth(usize),

    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Looks up values inside a model by relative dotted path.
///
/// Implementations must be safe to call from concurrent executions.
pub trait ValueExtractor: Send + Sync {
    /// Returns the value at `path` relative to `model`. An empty path is
    /// `model` itself.
    ///
    /// # Errors
    /// * `ExtractError` when a segment cannot be resolved
    fn extract_value<'m>(
        &self,
        model: &'m Value,
        path: &str,
    ) -> Result<Cow<'m, Value>, ExtractError>;

    /// Lists the paths that `extract_value` can resolve on `model`, down to
    /// `max_depth` segments. Used by tooling, never by execution.
    fn discover_valid_paths(
        &self,
        model: &Value,
        max_depth: usize,
    ) -> Result<Vec<String>, ExtractError>;
}

/// [`ValueExtractor`] for JSON-shaped models.
///
/// A `null` met halfway through a path makes the whole path `null`, so
/// `Order.Customer.Name` on an order without customer yields `null` instead
/// of an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonValueExtractor;

impl JsonValueExtractor {
    pub fn new() -> Self {
        Self
    }

    fn member<'m>(
        current: &'m Value,
        segment: &str,
        walked: &str,
    ) -> Result<Cow<'m, Value>, ExtractError> {
        match current {
            Value::Object(map) => map
                .get(segment)
                .map(Cow::Borrowed)
                .ok_or_else(|| ExtractError::MemberNotFound {
                    member: segment.to_string(),
                    path: walked.to_string(),
                }),
            Value::Array(items) => {
                if LENGTH_MEMBERS.contains(&segment) {
                    return Ok(Cow::Owned(Value::from(items.len())));
                }
                let index: usize = segment.parse().map_err(|_| ExtractError::NotAContainer {
                    member: segment.to_string(),
                    found: type_name(current),
                    path: walked.to_string(),
                })?;
                items
                    .get(index)
                    .map(Cow::Borrowed)
                    .ok_or_else(|| ExtractError::IndexOutOfRange {
                        index,
                        length: items.len(),
                        path: walked.to_string(),
                    })
            }
            Value::String(text) if LENGTH_MEMBERS.contains(&segment) => {
                Ok(Cow::Owned(Value::from(text.chars().count())))
            }
            _ => Err(ExtractError::NotAContainer {
                member: segment.to_string(),
                found: type_name(current),
                path: walked.to_string(),
            }),
        }
    }

    fn discover(value: &Value, prefix: &str, depth: usize, paths: &mut IndexSet<String>) {
        let Value::Object(map) = value else {
            return;
        };
        for (key, child) in map {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            paths.insert(path.clone());
            match child {
                Value::Object(_) if depth > 1 => Self::discover(child, &path, depth - 1, paths),
                Value::Array(items) => {
                    paths.insert(format!("{path}.{}", LENGTH_MEMBERS[0]));
                    if depth > 1 {
                        for item in items {
                            Self::discover(item, &path, depth - 1, paths);
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

impl ValueExtractor for JsonValueExtractor {
    fn extract_value<'m>(
        &self,
        model: &'m Value,
        path: &str,
    ) -> Result<Cow<'m, Value>, ExtractError> {
        trace!("Extracting '{path}'");
        if path.is_empty() {
            return Ok(Cow::Borrowed(model));
        }

        let mut current = Cow::Borrowed(model);
        let mut walked = String::with_capacity(path.len());
        for segment in path.split('.') {
            if current.is_null() {
                return Ok(Cow::Owned(Value::Null));
            }
            let next = match current {
                Cow::Borrowed(value) => Self::member(value, segment, &walked)?,
                // Owned values are lengths, which have no members.
                Cow::Owned(ref value) => {
                    Cow::Owned(Self::member(value, segment, &walked)?.into_owned())
                }
            };
            current = next;
            if !walked.is_empty() {
                walked.push('.');
            }
            walked.push_str(segment);
        }
        Ok(current)
    }

    fn discover_valid_paths(
        &self,
        model: &Value,
        max_depth: usize,
    ) -> Result<Vec<String>, ExtractError> {
        if max_depth < 1 {
            return Err(ExtractError::InvalidDepth(max_depth));
        }
        let mut paths = IndexSet::new();
        Self::discover(model, "", max_depth, &mut paths);
        Ok(paths.into_iter().collect())
    }
}

/// Human-readable JSON type name, used in diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
