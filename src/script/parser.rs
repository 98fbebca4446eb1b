//! Recursive-descent parser for instruction lines.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr        := or ( '?' expr ':' expr )?
//! or          := and ( '||' and )*
//! and         := equality ( '&&' equality )*
//! equality    := unary ( ( '==' | '!=' ) unary )*
//! unary       := '!' unary | postfix
//! postfix     := primary ( '.' IDENT | '(' args ')' )*
//! primary     := STRING | NUMBER | 'true' | 'false' | 'nil' | IDENT
//!              | '[' items ']' | '{' entries '}' | '(' expr ')'
//! ```

use super::ast::{Expr, Instruction};
use super::error::ScriptError;
use super::lexer::{lex, Spanned, Token};
use crate::document::node::Node;

/// Deepest nesting of brackets, braces, parentheses and conditionals allowed
/// on one line.
const MAX_DEPTH: usize = 128;

/// Parses a whole instruction file.
///
/// Blank lines and lines whose first non-blank characters are `//` are
/// skipped. Every remaining line must hold exactly one expression.
pub fn parse_script(source: &str) -> Result<Vec<Instruction>, ScriptError> {
    let mut instructions = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();

        if text.is_empty() || text.starts_with("//") {
            continue;
        }

        let expr = parse_line(text, line)?;
        instructions.push(Instruction {
            line,
            source: text.to_string(),
            expr,
        });
    }

    Ok(instructions)
}

/// Parses a single instruction line.
pub fn parse_line(text: &str, line: usize) -> Result<Expr, ScriptError> {
    let tokens = lex(text).map_err(|e| ScriptError::Syntax {
        line,
        column: e.column,
        message: e.message,
    })?;

    let mut parser = Parser {
        tokens,
        position: 0,
        line,
        depth: 0,
    };
    let expr = parser.parse_expr()?;
    parser.expect(Token::Eof)?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Spanned>,
    position: usize,
    line: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // The lexer always ends the stream with Eof, and Eof is never consumed.
        &self.tokens[self.position.min(self.tokens.len() - 1)].token
    }

    fn column(&self) -> usize {
        self.tokens[self.position.min(self.tokens.len() - 1)].column
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token != Token::Eof {
            self.position += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> ScriptError {
        ScriptError::Syntax {
            line: self.line,
            column: self.column(),
            message: message.into(),
        }
    }

    fn unexpected(&self, expected: &str) -> ScriptError {
        self.error(format!(
            "expected {}, found {}",
            expected,
            self.peek().describe()
        ))
    }

    fn expect(&mut self, expected: Token) -> Result<(), ScriptError> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(self.unexpected(&expected.describe()))
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, ScriptError> {
        if self.depth == MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let expr = self.parse_conditional();
        self.depth -= 1;
        expr
    }

    fn parse_conditional(&mut self) -> Result<Expr, ScriptError> {
        let condition = self.parse_or()?;

        if !self.eat(&Token::Question) {
            return Ok(condition);
        }

        let then = self.parse_expr()?;
        self.expect(Token::Colon)?;
        let otherwise = self.parse_expr()?;

        Ok(Expr::Conditional {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn parse_or(&mut self) -> Result<Expr, ScriptError> {
        let mut left = self.parse_and()?;
        while self.eat(&Token::OrOr) {
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ScriptError> {
        let mut left = self.parse_equality()?;
        while self.eat(&Token::AndAnd) {
            let right = self.parse_equality()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ScriptError> {
        let mut left = self.parse_unary()?;
        loop {
            let negated = match self.peek() {
                Token::EqEq => false,
                Token::NotEq => true,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Equal {
                left: Box::new(left),
                right: Box::new(right),
                negated,
            };
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ScriptError> {
        let mut negations = 0;
        while self.eat(&Token::Bang) {
            negations += 1;
        }

        let mut expr = self.parse_postfix()?;
        for _ in 0..negations {
            expr = Expr::Not(Box::new(expr));
        }
        Ok(expr)
    }

    fn parse_postfix(&mut self) -> Result<Expr, ScriptError> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.eat(&Token::Dot) {
                let Token::Ident(field) = self.peek().clone() else {
                    return Err(self.unexpected("field name"));
                };
                self.advance();
                expr = Expr::Member(Box::new(expr), field);
            } else if self.eat(&Token::LParen) {
                let args = self.parse_list(Token::RParen)?;
                expr = Expr::Call(Box::new(expr), args);
            } else {
                return Ok(expr);
            }
        }
    }

    /// Parses comma-separated expressions up to `close`, allowing a trailing comma.
    fn parse_list(&mut self, close: Token) -> Result<Vec<Expr>, ScriptError> {
        let mut items = Vec::new();

        while !self.eat(&close) {
            items.push(self.parse_expr()?);
            if !self.eat(&Token::Comma) {
                self.expect(close)?;
                break;
            }
        }

        Ok(items)
    }

    fn parse_map(&mut self) -> Result<Vec<(String, Expr)>, ScriptError> {
        let mut entries = Vec::new();

        while !self.eat(&Token::RBrace) {
            let key = match self.peek() {
                Token::Str(key) | Token::Ident(key) => key.clone(),
                _ => return Err(self.unexpected("map key")),
            };
            self.advance();
            self.expect(Token::Colon)?;
            entries.push((key, self.parse_expr()?));

            if !self.eat(&Token::Comma) {
                self.expect(Token::RBrace)?;
                break;
            }
        }

        Ok(entries)
    }

    fn parse_primary(&mut self) -> Result<Expr, ScriptError> {
        let expr = match self.peek().clone() {
            Token::Str(s) => Expr::Literal(Node::from(s)),
            Token::Int(i) => Expr::Literal(Node::from(i)),
            Token::Float(f) => Expr::Literal(Node::from(f)),
            Token::Ident(name) => match name.as_str() {
                "true" => Expr::Literal(Node::from(true)),
                "false" => Expr::Literal(Node::from(false)),
                "nil" => Expr::Nil,
                _ => Expr::Ident(name),
            },
            Token::LBracket => {
                self.advance();
                return self.parse_list(Token::RBracket).map(Expr::Array);
            }
            Token::LBrace => {
                self.advance();
                return self.parse_map().map(Expr::Map);
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                return Ok(inner);
            }
            _ => return Err(self.unexpected("expression")),
        };

        self.advance();
        Ok(expr)
    }
}
