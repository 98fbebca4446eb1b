//! Tokenizer for a single instruction line.

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Dot,
    Bang,
    AndAnd,
    OrOr,
    EqEq,
    NotEq,
    Question,
    Eof,
}

impl Token {
    /// Human-readable form used in syntax errors.
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("identifier '{}'", name),
            Token::Str(_) => "string".to_string(),
            Token::Int(_) | Token::Float(_) => "number".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Bang => "'!'".to_string(),
            Token::AndAnd => "'&&'".to_string(),
            Token::OrOr => "'||'".to_string(),
            Token::EqEq => "'=='".to_string(),
            Token::NotEq => "'!='".to_string(),
            Token::Question => "'?'".to_string(),
            Token::Eof => "end of line".to_string(),
        }
    }
}

/// A token with its 1-based column.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub column: usize,
}

/// A lexing failure at a 1-based column.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub column: usize,
    pub message: String,
}

/// Splits one line into tokens, ending with `Token::Eof`.
///
/// `//` outside of a string starts a comment that runs to the end of the line.
pub fn lex(line: &str) -> Result<Vec<Spanned>, LexError> {
    Lexer::new(line).run()
}

struct Lexer {
    chars: Vec<char>,
    position: usize,
}

impl Lexer {
    fn new(line: &str) -> Self {
        Self {
            chars: line.chars().collect(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    fn error(&self, column: usize, message: impl Into<String>) -> LexError {
        LexError {
            column,
            message: message.into(),
        }
    }

    fn run(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();

        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.position += 1;
            }

            let column = self.position + 1;
            let Some(ch) = self.peek() else {
                tokens.push(Spanned {
                    token: Token::Eof,
                    column,
                });
                return Ok(tokens);
            };

            if ch == '/' && self.peek_at(1) == Some('/') {
                self.position = self.chars.len();
                continue;
            }

            let token = match ch {
                '(' => self.single(Token::LParen),
                ')' => self.single(Token::RParen),
                '[' => self.single(Token::LBracket),
                ']' => self.single(Token::RBracket),
                '{' => self.single(Token::LBrace),
                '}' => self.single(Token::RBrace),
                ',' => self.single(Token::Comma),
                ':' => self.single(Token::Colon),
                '.' => self.single(Token::Dot),
                '?' => self.single(Token::Question),
                '!' if self.peek_at(1) == Some('=') => self.double(Token::NotEq),
                '!' => self.single(Token::Bang),
                '&' if self.peek_at(1) == Some('&') => self.double(Token::AndAnd),
                '|' if self.peek_at(1) == Some('|') => self.double(Token::OrOr),
                '=' if self.peek_at(1) == Some('=') => self.double(Token::EqEq),
                '"' | '\'' => self.string(ch)?,
                '-' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.number()?,
                c if c.is_ascii_digit() => self.number()?,
                c if c.is_alphabetic() || c == '_' => self.ident(),
                other => return Err(self.error(column, format!("unexpected character '{}'", other))),
            };

            tokens.push(Spanned { token, column });
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.position += 1;
        token
    }

    fn double(&mut self, token: Token) -> Token {
        self.position += 2;
        token
    }

    fn ident(&mut self) -> Token {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                name.push(ch);
                self.position += 1;
            } else {
                break;
            }
        }
        Token::Ident(name)
    }

    fn number(&mut self) -> Result<Token, LexError> {
        let column = self.position + 1;
        let mut text = String::new();

        if self.peek() == Some('-') {
            text.push('-');
            self.position += 1;
        }

        while let Some(ch) = self.peek().filter(char::is_ascii_digit) {
            text.push(ch);
            self.position += 1;
        }

        let is_float = self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit());
        if is_float {
            text.push('.');
            self.position += 1;
            while let Some(ch) = self.peek().filter(char::is_ascii_digit) {
                text.push(ch);
                self.position += 1;
            }
            return text
                .parse()
                .map(Token::Float)
                .map_err(|_| self.error(column, format!("invalid number '{}'", text)));
        }

        text.parse()
            .map(Token::Int)
            .map_err(|_| self.error(column, format!("integer '{}' is out of range", text)))
    }

    fn string(&mut self, quote: char) -> Result<Token, LexError> {
        let column = self.position + 1;
        self.position += 1;
        let mut value = String::new();

        loop {
            match self.next() {
                None => return Err(self.error(column, "unterminated string")),
                Some(ch) if ch == quote => return Ok(Token::Str(value)),
                Some('\\') => {
                    let escaped = match self.next() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some(c @ ('\\' | '"' | '\'')) => c,
                        Some(other) => {
                            return Err(self.error(
                                self.position,
                                format!("unknown escape '\\{}'", other),
                            ))
                        }
                        None => return Err(self.error(column, "unterminated string")),
                    };
                    value.push(escaped);
                }
                Some(ch) => value.push(ch),
            }
        }
    }
}
