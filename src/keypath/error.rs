//! Error types for path navigation and mutation.

use std::fmt;

/// Errors raised while navigating or mutating a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A mapping had no binding for the key.
    #[error("key not found: \"{0}\"")]
    KeyNotFound(String),
    /// A sequence was addressed with a segment that is not a non-negative integer.
    #[error("cannot index sequence with non-numeric key \"{0}\"")]
    IndexNotNumeric(String),
    /// A sequence was addressed past its end.
    #[error("index {index} out of bounds for sequence of length {length}")]
    IndexOutOfBounds { index: usize, length: usize },
    /// `append` targeted something other than a sequence.
    #[error("cannot append to non-sequence entry")]
    NotAppendable,
    /// The path resolved to a node that cannot hold children.
    #[error("cannot mutate a scalar value")]
    UnsupportedContainer,
}

/// The operation during which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Set,
    Append,
    Delete,
    Get,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Set => "set",
            Operation::Append => "append",
            Operation::Delete => "delete",
            Operation::Get => "get",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A `PathError` tagged with the operation and path that produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} \"{path}\": {source}")]
pub struct EvalError {
    pub operation: Operation,
    pub path: String,
    #[source]
    pub source: PathError,
}

impl EvalError {
    pub fn new(operation: Operation, path: &str, source: PathError) -> Self {
        Self {
            operation,
            path: path.to_string(),
            source,
        }
    }

    /// Returns the underlying engine error.
    pub fn kind(&self) -> &PathError {
        &self.source
    }
}
