//! Document tree types.
//!
//! `node` holds the closed three-kind node model; `tree` holds the `Document`
//! wrapper that guarantees a mapping at the root.

pub mod node;
pub mod tree;

pub use node::{Node, Scalar};
pub use tree::{Document, DocumentError};
