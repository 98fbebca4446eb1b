//! Error types for parsing and running instruction files.

use crate::helpers::HelperError;
use crate::keypath::EvalError;

/// Errors reported while parsing or running a script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("line {line}: {source}")]
    Runtime {
        line: usize,
        #[source]
        source: RuntimeError,
    },
}

impl ScriptError {
    /// Line number the error was reported on.
    pub fn line(&self) -> usize {
        match self {
            ScriptError::Syntax { line, .. } | ScriptError::Runtime { line, .. } => *line,
        }
    }
}

/// Errors raised while evaluating a single instruction.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("unknown name \"{0}\"")]
    UnknownName(String),
    #[error("no field \"{field}\" in {kind}")]
    UnknownField { field: String, kind: &'static str },
    #[error("\"{0}\" is not callable")]
    NotCallable(String),
    #[error("\"{0}\" must be called")]
    NotAValue(String),
    #[error("{name} expects {expected} argument(s), found {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Helper(#[from] HelperError),
}
