//! Abstract syntax tree for instruction lines.

use crate::document::node::Node;

/// An expression in an instruction line.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A string, number or boolean literal.
    Literal(Node),
    /// The `nil` keyword.
    Nil,
    /// `[a, b, ...]`
    Array(Vec<Expr>),
    /// `{"key": value, Key: value}`
    Map(Vec<(String, Expr)>),
    /// A bare name such as `vars` or `set`.
    Ident(String),
    /// `target.field`
    Member(Box<Expr>, String),
    /// `target(args...)`
    Call(Box<Expr>, Vec<Expr>),
    /// `!operand`
    Not(Box<Expr>),
    /// `left && right`
    And(Box<Expr>, Box<Expr>),
    /// `left || right`
    Or(Box<Expr>, Box<Expr>),
    /// `left == right`, or `!=` when `negated`.
    Equal {
        left: Box<Expr>,
        right: Box<Expr>,
        negated: bool,
    },
    /// `condition ? then : otherwise`
    Conditional {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

/// One parsed line of an instruction file.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// 1-based line number in the instruction file.
    pub line: usize,
    /// The trimmed source text.
    pub source: String,
    pub expr: Expr,
}
