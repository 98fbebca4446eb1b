//! Evaluates parsed instructions against an evaluator and environment.

use indexmap::IndexMap;

use super::ast::Expr;
use super::env::Environment;
use super::error::RuntimeError;
use crate::document::node::Node;
use crate::keypath::Evaluator;

/// The result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value: `nil`, or the result of a pure mutation.
    Nil,
    Node(Node),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Node(node) => node.kind(),
        }
    }

    fn into_node(self) -> Result<Node, RuntimeError> {
        match self {
            Value::Node(node) => Ok(node),
            Value::Nil => Err(RuntimeError::TypeMismatch {
                expected: "value",
                found: "nil",
            }),
        }
    }

    fn as_bool(&self) -> Result<bool, RuntimeError> {
        match self {
            Value::Node(node) => node.as_bool().ok_or(RuntimeError::TypeMismatch {
                expected: "boolean",
                found: node.kind(),
            }),
            Value::Nil => Err(RuntimeError::TypeMismatch {
                expected: "boolean",
                found: "nil",
            }),
        }
    }
}

/// Walks expressions for one script run.
pub struct Runner<'r, 'e> {
    evaluator: &'r mut Evaluator,
    env: &'r Environment<'e>,
}

impl<'r, 'e> Runner<'r, 'e> {
    pub fn new(evaluator: &'r mut Evaluator, env: &'r Environment<'e>) -> Self {
        Self { evaluator, env }
    }

    pub fn eval(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(node) => Ok(Value::Node(node.clone())),
            Expr::Nil => Ok(Value::Nil),
            Expr::Array(items) => {
                let elements = items
                    .iter()
                    .map(|item| self.eval(item)?.into_node())
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Node(Node::Sequence(elements)))
            }
            Expr::Map(entries) => {
                let mut mapping = IndexMap::with_capacity(entries.len());
                for (key, value) in entries {
                    mapping.insert(key.clone(), self.eval(value)?.into_node()?);
                }
                Ok(Value::Node(Node::Mapping(mapping)))
            }
            Expr::Ident(name) => self.lookup(name),
            Expr::Member(target, field) => {
                let target = self.eval(target)?;
                member(target, field)
            }
            Expr::Call(target, args) => self.call(target, args),
            Expr::Not(operand) => {
                let value = self.eval(operand)?.as_bool()?;
                Ok(Value::Node(Node::from(!value)))
            }
            // `&&` and `||` short-circuit on a boolean left side and yield the
            // right side as-is, so `vars.Debug && set(...)` runs conditionally.
            Expr::And(left, right) => {
                if self.eval(left)?.as_bool()? {
                    self.eval(right)
                } else {
                    Ok(Value::Node(Node::from(false)))
                }
            }
            Expr::Or(left, right) => {
                if self.eval(left)?.as_bool()? {
                    Ok(Value::Node(Node::from(true)))
                } else {
                    self.eval(right)
                }
            }
            Expr::Equal {
                left,
                right,
                negated,
            } => {
                let equal = self.eval(left)? == self.eval(right)?;
                Ok(Value::Node(Node::from(equal != *negated)))
            }
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                if self.eval(condition)?.as_bool()? {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            }
        }
    }

    fn lookup(&self, name: &str) -> Result<Value, RuntimeError> {
        if let Some(value) = self.env.global(name) {
            return Ok(Value::Node(value.clone()));
        }
        if name == "helpers" || self.env.capabilities().contains(name) {
            return Err(RuntimeError::NotAValue(name.to_string()));
        }
        Err(RuntimeError::UnknownName(name.to_string()))
    }

    fn call(&mut self, target: &Expr, args: &[Expr]) -> Result<Value, RuntimeError> {
        let args = args
            .iter()
            .map(|arg| self.eval(arg)?.into_node())
            .collect::<Result<Vec<_>, _>>()?;

        match target {
            Expr::Ident(name) => {
                let capability = self
                    .env
                    .capabilities()
                    .get(name)
                    .ok_or_else(|| match self.env.global(name) {
                        Some(_) => RuntimeError::NotCallable(name.clone()),
                        None => RuntimeError::UnknownName(name.clone()),
                    })?;
                let result = capability(self.evaluator, args)?;
                Ok(result.map_or(Value::Nil, Value::Node))
            }
            Expr::Member(namespace, name) if matches!(namespace.as_ref(), Expr::Ident(n) if n == "helpers") => {
                let node = self.env.helpers().produce(name, &args)?;
                Ok(Value::Node(node))
            }
            Expr::Member(_, name) => Err(RuntimeError::NotCallable(name.clone())),
            _ => Err(RuntimeError::NotCallable("expression".to_string())),
        }
    }
}

fn member(target: Value, field: &str) -> Result<Value, RuntimeError> {
    match target {
        Value::Node(Node::Mapping(mut entries)) => entries
            .swap_remove(field)
            .map(Value::Node)
            .ok_or_else(|| RuntimeError::UnknownField {
                field: field.to_string(),
                kind: "mapping",
            }),
        other => Err(RuntimeError::UnknownField {
            field: field.to_string(),
            kind: other.kind(),
        }),
    }
}
