//! The instruction language.
//!
//! An instruction file holds one expression per line. Every line is parsed
//! before any of them runs, so a syntax error anywhere leaves the document
//! untouched. Lines then run in order against the same evaluator and the run
//! stops at the first error.
//!
//! # Example
//!
//! ```
//! use plistquill::document::{Document, Node};
//! use plistquill::helpers::FileHelpers;
//! use plistquill::keypath::Evaluator;
//! use plistquill::script::{Environment, Script};
//!
//! let source = r#"
//! // boot arguments
//! set("Misc.Boot.Timeout", 5)
//! append("Misc.Boot.Entries", {"Name": "Linux", "Enabled": true})
//! "#;
//!
//! let root: Node = serde_json::from_str(r#"{"Misc": {"Boot": {"Entries": []}}}"#).unwrap();
//! let mut evaluator = Evaluator::new(Document::try_from(root).unwrap());
//! let helpers = FileHelpers::new();
//! let env = Environment::new(&helpers);
//!
//! let script = Script::parse(source).unwrap();
//! assert_eq!(script.run(&mut evaluator, &env).unwrap(), 2);
//! assert_eq!(evaluator.get("Misc.Boot.Timeout").unwrap(), Node::from(5));
//! ```

pub mod ast;
pub mod env;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod runner;
pub mod vars;

use tracing::{debug, info};

pub use ast::{Expr, Instruction};
pub use env::{Capabilities, Capability, Environment};
pub use error::{RuntimeError, ScriptError};
pub use runner::{Runner, Value};
pub use vars::Variables;

use crate::keypath::Evaluator;

/// A parsed instruction file.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    instructions: Vec<Instruction>,
}

impl Script {
    /// Parses every instruction in `source`.
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let instructions = parser::parse_script(source)?;
        debug!(count = instructions.len(), "parsed instructions");
        Ok(Self { instructions })
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Runs every instruction in order and returns how many ran.
    ///
    /// Stops at the first failing instruction. Mutations made by earlier
    /// instructions stay in place.
    pub fn run(&self, evaluator: &mut Evaluator, env: &Environment<'_>) -> Result<usize, ScriptError> {
        let mut runner = Runner::new(evaluator, env);

        for instruction in &self.instructions {
            if env.echo() {
                info!("> {}", instruction.source);
            } else {
                debug!("> {}", instruction.source);
            }

            runner
                .eval(&instruction.expr)
                .map_err(|source| ScriptError::Runtime {
                    line: instruction.line,
                    source,
                })?;
        }

        Ok(self.instructions.len())
    }
}
