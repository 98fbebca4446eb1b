//! Path-addressed mutation engine.
//!
//! Paths are dot-delimited strings such as `Misc.Security.AllowSetDefault`.
//! A path is split into a navigation prefix and a final segment; the prefix is
//! walked from the document root to reach a container, and the final segment
//! is applied to that container.
//!
//! # Path rules
//!
//! - Segments are trimmed; empty segments are dropped, so `".a..b."` is `a.b`
//! - Only mappings are navigated by the prefix. A sequence or scalar met while
//!   walking the prefix is kept as the current node and the segment is ignored
//! - Sequences are indexed only by the final segment, which must then be a
//!   non-negative integer below the sequence length
//!
//! # Examples
//!
//! ```
//! use plistquill::document::{Document, Node};
//! use plistquill::keypath::Evaluator;
//!
//! let root: Node = serde_json::from_str(r#"{"Kernel": {"Add": [1, 2, 3]}}"#).unwrap();
//! let mut evaluator = Evaluator::new(Document::try_from(root).unwrap());
//!
//! evaluator.append("Kernel.Add", Node::from(4)).unwrap();
//! evaluator.delete("Kernel.Add.0").unwrap();
//! assert_eq!(
//!     evaluator.get("Kernel.Add").unwrap(),
//!     Node::Sequence(vec![Node::from(2), Node::from(3), Node::from(4)])
//! );
//! ```

pub mod error;
pub mod evaluator;
pub mod executor;
pub mod navigator;
pub mod tokenizer;

pub use error::{EvalError, Operation, PathError};
pub use evaluator::Evaluator;
pub use tokenizer::tokenize;
