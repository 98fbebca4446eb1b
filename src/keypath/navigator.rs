//! Walks a document along a path prefix.
//!
//! Only mappings are navigated. When the current node is a sequence or a
//! scalar the segment is ignored and the node itself is returned, so a prefix
//! that passes through a sequence leaves the whole sequence as the current
//! node. Sequences are indexed only by the final segment of a path.

use super::error::PathError;
use crate::document::node::Node;

/// Resolves one segment against `node`.
pub fn resolve<'a>(node: &'a Node, key: &str) -> Result<&'a Node, PathError> {
    match node {
        Node::Mapping(entries) => entries
            .get(key)
            .ok_or_else(|| PathError::KeyNotFound(key.to_string())),
        Node::Sequence(_) | Node::Scalar(_) => Ok(node),
    }
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'a>(node: &'a mut Node, key: &str) -> Result<&'a mut Node, PathError> {
    match node {
        Node::Mapping(entries) => entries
            .get_mut(key)
            .ok_or_else(|| PathError::KeyNotFound(key.to_string())),
        Node::Sequence(_) | Node::Scalar(_) => Ok(node),
    }
}

/// Resolves every segment of `prefix` in order, starting at `root`.
pub fn navigate<'a>(root: &'a Node, prefix: &[String]) -> Result<&'a Node, PathError> {
    prefix.iter().try_fold(root, |node, key| resolve(node, key))
}

/// Mutable counterpart of [`navigate`].
pub fn navigate_mut<'a>(root: &'a mut Node, prefix: &[String]) -> Result<&'a mut Node, PathError> {
    prefix.iter().try_fold(root, |node, key| resolve_mut(node, key))
}
