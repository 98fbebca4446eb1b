//! The top-level configuration document.
//!
//! A `Document` wraps the root node of a decoded property list. The root is
//! always a mapping: documents can only be built from a mapping, and none of
//! the mutation operations can replace the root itself.
//!
//! # Example
//!
//! ```
//! use plistquill::document::node::Node;
//! use plistquill::document::tree::Document;
//!
//! let root: Node = [("Kernel", Node::mapping())].into_iter().collect();
//! let document = Document::try_from(root).unwrap();
//! assert!(document.root().is_mapping());
//!
//! // Anything but a mapping is rejected.
//! assert!(Document::try_from(Node::from(7)).is_err());
//! ```

use indexmap::IndexMap;

use super::node::Node;

/// Error returned when a decoded tree cannot become a document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error("document root must be a mapping, found {0}")]
    RootNotMapping(&'static str),
}

/// A complete configuration document with a mapping at its root.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Node,
}

impl Document {
    /// Creates a document from the entries of its root mapping.
    pub fn new(entries: IndexMap<String, Node>) -> Self {
        Self {
            root: Node::Mapping(entries),
        }
    }

    /// Returns the root node. It is always a `Node::Mapping`.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Returns the root node mutably.
    ///
    /// Crate-private so the root can never be swapped for a non-mapping.
    pub(crate) fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Returns the root mapping's entries.
    pub fn entries(&self) -> &IndexMap<String, Node> {
        match &self.root {
            Node::Mapping(entries) => entries,
            _ => unreachable!("document root is always a mapping"),
        }
    }

    /// Consumes the document and returns its root node.
    pub fn into_root(self) -> Node {
        self.root
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(IndexMap::new())
    }
}

impl TryFrom<Node> for Document {
    type Error = DocumentError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        match node {
            Node::Mapping(entries) => Ok(Self::new(entries)),
            other => Err(DocumentError::RootNotMapping(other.kind())),
        }
    }
}
