//! The operation façade over an owned document.
//!
//! Every operation tokenizes its path, walks the prefix from the root to find
//! the container, and then acts on the container with the final segment.
//! Operations apply immediately; a failing operation leaves the document as
//! the previous operations left it.

use tracing::debug;

use super::error::{EvalError, Operation, PathError};
use super::executor::{mutate, parse_index};
use super::navigator::{navigate, navigate_mut, resolve};
use super::tokenizer::tokenize;
use crate::document::node::Node;
use crate::document::tree::Document;

/// Owns a document and applies path-addressed operations to it.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    document: Document,
}

impl Evaluator {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Consumes the evaluator, handing the document back for serialization.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Binds `value` at `path`, inserting or overwriting a mapping key or
    /// replacing a sequence element.
    pub fn set(&mut self, path: &str, value: Node) -> Result<(), EvalError> {
        debug!(path, kind = value.kind(), "set");
        self.set_inner(path, value)
            .map_err(|e| EvalError::new(Operation::Set, path, e))
    }

    /// Appends `value` to the sequence bound at `path`.
    ///
    /// The old sequence is not grown in place; a new one is built and written
    /// back over the final segment.
    pub fn append(&mut self, path: &str, value: Node) -> Result<(), EvalError> {
        debug!(path, kind = value.kind(), "append");
        self.append_inner(path, value)
            .map_err(|e| EvalError::new(Operation::Append, path, e))
    }

    /// Removes the mapping key or sequence element named by `path`.
    ///
    /// Removing an absent mapping key succeeds without change. Removing a
    /// sequence element builds the shortened sequence and stores it with
    /// [`Evaluator::set`] on the parent path.
    pub fn delete(&mut self, path: &str) -> Result<(), EvalError> {
        debug!(path, "delete");
        self.delete_inner(path)
            .map_err(|e| EvalError::new(Operation::Delete, path, e))
    }

    /// Returns a copy of the value at `path`.
    ///
    /// The final segment follows the same rule as the prefix: it is looked up
    /// in a mapping, and a sequence or scalar container is returned whole.
    pub fn get(&self, path: &str) -> Result<Node, EvalError> {
        let (prefix, last) = tokenize(path);
        navigate(self.document.root(), &prefix)
            .and_then(|container| resolve(container, &last))
            .cloned()
            .map_err(|e| EvalError::new(Operation::Get, path, e))
    }

    fn set_inner(&mut self, path: &str, value: Node) -> Result<(), PathError> {
        let (prefix, last) = tokenize(path);
        let container = navigate_mut(self.document.root_mut(), &prefix)?;
        mutate(container, &last, value)
    }

    fn append_inner(&mut self, path: &str, value: Node) -> Result<(), PathError> {
        let (prefix, last) = tokenize(path);
        let container = navigate_mut(self.document.root_mut(), &prefix)?;

        let mut elements = match resolve(container, &last)? {
            Node::Sequence(elements) => elements.clone(),
            _ => return Err(PathError::NotAppendable),
        };
        elements.push(value);

        mutate(container, &last, Node::Sequence(elements))
    }

    fn delete_inner(&mut self, path: &str) -> Result<(), PathError> {
        let (prefix, last) = tokenize(path);
        let container = navigate_mut(self.document.root_mut(), &prefix)?;

        let remaining = match container {
            Node::Mapping(entries) => {
                entries.shift_remove(&last);
                return Ok(());
            }
            Node::Sequence(elements) => {
                let index = parse_index(&last, elements.len())?;
                let mut remaining = Vec::with_capacity(elements.len() - 1);
                remaining.extend_from_slice(&elements[..index]);
                remaining.extend_from_slice(&elements[index + 1..]);
                remaining
            }
            Node::Scalar(_) => return Err(PathError::UnsupportedContainer),
        };

        let parent = prefix.join(".");
        self.set(&parent, Node::Sequence(remaining))
            .map_err(|e| e.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator(json: &str) -> Evaluator {
        let root: Node = serde_json::from_str(json).unwrap();
        Evaluator::new(Document::try_from(root).unwrap())
    }

    fn root(json: &str) -> Node {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_set_single_key() {
        let mut e = evaluator(r#"{"key": "value"}"#);
        e.set("key", Node::from(7)).unwrap();
        assert_eq!(e.document().root(), &root(r#"{"key": 7}"#));
    }

    #[test]
    fn test_set_nested_key() {
        let mut e = evaluator(r#"{"key": {"nested": "value"}}"#);
        e.set("key.nested", Node::from(7)).unwrap();
        assert_eq!(e.document().root(), &root(r#"{"key": {"nested": 7}}"#));
    }

    #[test]
    fn test_set_sequence_element() {
        let mut e = evaluator(r#"{"key": [1, 2, 3]}"#);
        e.set("key.2", Node::from("three")).unwrap();
        assert_eq!(e.document().root(), &root(r#"{"key": [1, 2, "three"]}"#));
    }

    #[test]
    fn test_append_single_key() {
        let mut e = evaluator(r#"{"key": [1, 2, 3]}"#);
        e.append("key", Node::from(7)).unwrap();
        assert_eq!(e.document().root(), &root(r#"{"key": [1, 2, 3, 7]}"#));
    }

    #[test]
    fn test_delete_sequence_element_goes_through_set() {
        let mut e = evaluator(r#"{"key": [1, 2, 3]}"#);
        e.delete("key.1").unwrap();
        assert_eq!(e.document().root(), &root(r#"{"key": [1, 3]}"#));
    }

    #[test]
    fn test_delete_missing_key_is_noop() {
        let mut e = evaluator(r#"{"key": 1}"#);
        e.delete("other").unwrap();
        assert_eq!(e.document().root(), &root(r#"{"key": 1}"#));
    }

    #[test]
    fn test_delete_in_scalar_unsupported() {
        let mut e = evaluator(r#"{"key": 1}"#);
        let err = e.delete("key.sub").unwrap_err();
        assert_eq!(err.operation, Operation::Delete);
        assert_eq!(err.source, PathError::UnsupportedContainer);
    }

    #[test]
    fn test_get_empty_path_is_key_not_found() {
        let e = evaluator(r#"{"key": 1}"#);
        let err = e.get("..").unwrap_err();
        assert_eq!(err.source, PathError::KeyNotFound(String::new()));
    }
}
