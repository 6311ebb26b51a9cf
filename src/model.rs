//! Model chain: which model value a path refers to at a given point of
//! execution.
//!
//! Paths in a template are written from the root model. Inside
//! `for(Order.Lines)` the path `Order.Lines.Price` therefore has to be read
//! from the current line item rather than from the root. Every active loop
//! adds one [`ModelChain`] link remembering its path and current item, and
//! [`ModelChain::resolve`] picks the link the path belongs to.

use std::borrow::Cow;

use log::trace;
use serde_json::Value;

use crate::constants::SELF_REFERENCE;
use crate::extractor::{ExtractError, ValueExtractor};

/// One link of the chain. Links live on the executor's call stack and borrow
/// their parent, so a link never outlives the loop iteration that made it.
#[derive(Debug, Clone, Copy)]
pub struct ModelChain<'a> {
    path_from_root: &'a str,
    current: &'a Value,
    parent: Option<&'a ModelChain<'a>>,
}

impl<'a> ModelChain<'a> {
    /// Head of a chain for a root model.
    pub fn root(model: &'a Value) -> Self {
        Self {
            path_from_root: "",
            current: model,
            parent: None,
        }
    }

    /// Link for one item of the loop over `path`.
    pub fn child<'b>(&'b self, path: &'b str, current: &'b Value) -> ModelChain<'b> {
        ModelChain {
            path_from_root: path,
            current,
            parent: Some(self),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Longest link whose path is a segment-wise prefix of `path`.
    /// On equal length the innermost link wins; the root always matches.
    fn find_link(&self, path: &str) -> &ModelChain<'a> {
        let mut best: &ModelChain<'a> = self;
        let mut best_length = None;
        let mut link = Some(self);

        while let Some(candidate) = link {
            let length = if candidate.is_root() {
                Some(0)
            } else {
                owns_path(candidate.path_from_root, path)
                    .then_some(candidate.path_from_root.len())
            };
            if let Some(length) = length {
                if best_length.is_none_or(|best| length > best) {
                    best = candidate;
                    best_length = Some(length);
                }
            }
            link = candidate.parent;
        }
        best
    }

    /// Resolves a format-free path against the chain.
    ///
    /// # Errors
    /// * Whatever the extractor reports for the relative path
    pub fn resolve(
        &self,
        path: &str,
        extractor: &dyn ValueExtractor,
    ) -> Result<Cow<'a, Value>, ExtractError> {
        let link = self.find_link(path);
        if path == link.path_from_root {
            return Ok(Cow::Borrowed(link.current));
        }

        let relative = if link.is_root() {
            path
        } else {
            &path[link.path_from_root.len() + 1..]
        };
        trace!("Resolving '{relative}' on link '{}'", link.path_from_root);

        if relative == SELF_REFERENCE {
            return Ok(Cow::Borrowed(link.current));
        }
        let relative = relative
            .strip_prefix(SELF_REFERENCE)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(relative);
        extractor.extract_value(link.current, relative)
    }
}

/// True when `path` is `link_path` itself or lies below it.
/// `Items` owns `Items.Name` but not `ItemsCount`.
fn owns_path(link_path: &str, path: &str) -> bool {
    match path.strip_prefix(link_path) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

/// Splits a bind path at the first `:` into value path and format.
pub fn split_format(path: &str) -> (&str, Option<&str>) {
    match path.split_once(':') {
        Some((value_path, format)) => (value_path.trim(), Some(format)),
        None => (path.trim(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::JsonValueExtractor;
    use serde_json::json;

    #[test]
    fn test_owns_path_respects_segment_boundary() {
        assert!(owns_path("Items", "Items"));
        assert!(owns_path("Items", "Items.Name"));
        assert!(!owns_path("Items", "ItemsCount"));
    }

    #[test]
    fn test_longest_link_wins() {
        let model = json!({ "A": { "B": [1] } });
        let outer_item = json!({ "B": "outer" });
        let inner_item = json!("inner");
        let root = ModelChain::root(&model);
        let outer = root.child("A", &outer_item);
        let inner = outer.child("A.B", &inner_item);

        let value = inner.resolve("A.B", &JsonValueExtractor).unwrap();
        assert_eq!(*value, json!("inner"));
        let value = inner.resolve("A", &JsonValueExtractor).unwrap();
        assert_eq!(*value, outer_item);
    }

    #[test]
    fn test_split_format() {
        assert_eq!(split_format("Total:F2"), ("Total", Some("F2")));
        assert_eq!(split_format("Flag:Yes|No:x"), ("Flag", Some("Yes|No:x")));
        assert_eq!(split_format("Name"), ("Name", None));
    }
}
