//! The environment instructions run against.
//!
//! Operations on the document are not reached through global state: the
//! runner looks them up by name in a [`Capabilities`] table and calls them with
//! the evaluator it was handed. Read-only values (such as `vars`) are globals,
//! and `helpers.Name(...)` calls go to the environment's [`ValueProducer`].

use std::fmt;

use indexmap::IndexMap;

use super::error::RuntimeError;
use crate::document::node::{Node, Scalar};
use crate::helpers::ValueProducer;
use crate::keypath::Evaluator;

/// A document operation callable from a script.
///
/// Returns `Some` when the operation produces a value (`get`) and `None` for
/// pure mutations.
pub type Capability = fn(&mut Evaluator, Vec<Node>) -> Result<Option<Node>, RuntimeError>;

/// Name → operation table.
#[derive(Clone)]
pub struct Capabilities {
    table: IndexMap<&'static str, Capability>,
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.table.keys()).finish()
    }
}

impl Capabilities {
    /// Creates an empty table.
    pub fn empty() -> Self {
        Self {
            table: IndexMap::new(),
        }
    }

    /// The `set`, `append`, `delete` and `get` operations.
    pub fn standard() -> Self {
        let mut capabilities = Self::empty();
        capabilities.register("set", set);
        capabilities.register("append", append);
        capabilities.register("delete", delete);
        capabilities.register("get", get);
        capabilities
    }

    /// Binds `name` to `capability`, replacing any earlier binding.
    pub fn register(&mut self, name: &'static str, capability: Capability) {
        self.table.insert(name, capability);
    }

    pub fn get(&self, name: &str) -> Option<Capability> {
        self.table.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.keys().copied()
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::standard()
    }
}

/// Globals, capabilities and value producers visible to a script.
pub struct Environment<'a> {
    capabilities: Capabilities,
    globals: IndexMap<String, Node>,
    helpers: &'a dyn ValueProducer,
    echo: bool,
}

impl<'a> Environment<'a> {
    /// Standard capabilities, no globals, echo enabled.
    pub fn new(helpers: &'a dyn ValueProducer) -> Self {
        Self {
            capabilities: Capabilities::standard(),
            globals: IndexMap::new(),
            helpers,
            echo: true,
        }
    }

    /// Adds a read-only global such as `vars`.
    pub fn with_global(mut self, name: impl Into<String>, value: Node) -> Self {
        self.globals.insert(name.into(), value);
        self
    }

    /// Whether each instruction is logged at INFO before it runs.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn capabilities_mut(&mut self) -> &mut Capabilities {
        &mut self.capabilities
    }

    pub fn global(&self, name: &str) -> Option<&Node> {
        self.globals.get(name)
    }

    pub fn helpers(&self) -> &dyn ValueProducer {
        self.helpers
    }

    pub fn echo(&self) -> bool {
        self.echo
    }
}

fn take_args<const N: usize>(name: &str, args: Vec<Node>) -> Result<[Node; N], RuntimeError> {
    <[Node; N]>::try_from(args).map_err(|args| RuntimeError::Arity {
        name: name.to_string(),
        expected: N,
        found: args.len(),
    })
}

fn path_arg(path: Node) -> Result<String, RuntimeError> {
    match path {
        Node::Scalar(Scalar::String(path)) => Ok(path),
        other => Err(RuntimeError::TypeMismatch {
            expected: "path string",
            found: other.kind(),
        }),
    }
}

fn set(evaluator: &mut Evaluator, args: Vec<Node>) -> Result<Option<Node>, RuntimeError> {
    let [path, value] = take_args::<2>("set", args)?;
    evaluator.set(&path_arg(path)?, value)?;
    Ok(None)
}

fn append(evaluator: &mut Evaluator, args: Vec<Node>) -> Result<Option<Node>, RuntimeError> {
    let [path, value] = take_args::<2>("append", args)?;
    evaluator.append(&path_arg(path)?, value)?;
    Ok(None)
}

fn delete(evaluator: &mut Evaluator, args: Vec<Node>) -> Result<Option<Node>, RuntimeError> {
    let [path] = take_args::<1>("delete", args)?;
    evaluator.delete(&path_arg(path)?)?;
    Ok(None)
}

fn get(evaluator: &mut Evaluator, args: Vec<Node>) -> Result<Option<Node>, RuntimeError> {
    let [path] = take_args::<1>("get", args)?;
    Ok(Some(evaluator.get(&path_arg(path)?)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::tree::Document;

    fn evaluator(json: &str) -> Evaluator {
        let root: Node = serde_json::from_str(json).unwrap();
        Evaluator::new(Document::try_from(root).unwrap())
    }

    #[test]
    fn test_standard_names() {
        let names: Vec<_> = Capabilities::standard().names().collect();
        assert_eq!(names, ["set", "append", "delete", "get"]);
    }

    #[test]
    fn test_invoke_set_through_table() {
        let capabilities = Capabilities::standard();
        let mut e = evaluator(r#"{"a": 1}"#);
        let set = capabilities.get("set").unwrap();
        let result = set(&mut e, vec![Node::from("a"), Node::from(2)]).unwrap();
        assert!(result.is_none());
        assert_eq!(e.get("a").unwrap(), Node::from(2));
    }

    #[test]
    fn test_arity_checked() {
        let capabilities = Capabilities::standard();
        let mut e = evaluator("{}");
        let delete = capabilities.get("delete").unwrap();
        let err = delete(&mut e, vec![]).unwrap_err();
        assert_eq!(err.to_string(), "delete expects 1 argument(s), found 0");
    }

    #[test]
    fn test_path_must_be_string() {
        let capabilities = Capabilities::standard();
        let mut e = evaluator("{}");
        let get = capabilities.get("get").unwrap();
        let err = get(&mut e, vec![Node::from(1)]).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::TypeMismatch {
                expected: "path string",
                found: "integer"
            }
        ));
    }

    #[test]
    fn test_register_replaces() {
        fn noop(_: &mut Evaluator, _: Vec<Node>) -> Result<Option<Node>, RuntimeError> {
            Ok(None)
        }

        let mut capabilities = Capabilities::standard();
        capabilities.register("delete", noop);
        let mut e = evaluator(r#"{"a": 1}"#);
        capabilities.get("delete").unwrap()(&mut e, vec![Node::from("a")]).unwrap();
        assert_eq!(e.get("a").unwrap(), Node::from(1));
        assert!(!Capabilities::empty().contains("set"));
    }
}
