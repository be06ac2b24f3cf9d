use std::fmt;

use rust_decimal::Decimal;

use crate::ast::Operator;
use crate::lexer::Position;

/// A lexical token together with the source text it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact source slice, quotes and escapes included.
    pub lexeme: String,
    /// Where the token starts.
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer or decimal number
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -3.75
    /// ```
    Number(Decimal),

    /// String literal in single or double quotes, escapes already resolved
    ///
    /// # Examples
    /// ```text
    /// 'Bob'
    /// "it's"
    /// 'O\'Brien'
    /// ```
    String(String),

    /// Boolean values
    ///
    /// # Examples
    /// ```text
    /// true
    /// false
    /// ```
    Boolean(bool),

    /// Null value
    Null,

    // Names
    /// Field name, or an unknown name in operator position
    ///
    /// Must start with an ASCII letter or underscore, followed by letters,
    /// digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// age
    /// created_at
    /// ```
    Identifier(String),

    /// Reserved operator keyword
    ///
    /// # Examples
    /// ```text
    /// eq
    /// isNotNull
    /// and
    /// ```
    Operator(Operator),

    // Delimiters
    /// Left parenthesis opening an argument list
    LParen,

    /// Right parenthesis closing an argument list
    RParen,

    /// Comma separating arguments
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "number {n}"),
            TokenKind::String(s) => write!(f, "string {s:?}"),
            TokenKind::Boolean(b) => write!(f, "boolean {b}"),
            TokenKind::Null => write!(f, "null"),
            TokenKind::Identifier(name) => write!(f, "identifier '{name}'"),
            TokenKind::Operator(op) => write!(f, "operator '{op}'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Comma => write!(f, "','"),
        }
    }
}
