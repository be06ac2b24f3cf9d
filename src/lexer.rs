use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::trace;

use crate::ast::{Operator, Token, TokenKind};
use crate::options::ParseOptions;

/// A location in the query text.
///
/// `offset` is a byte offset; `line` and `column` are 1-based, with columns
/// counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The start of the input.
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors found while splitting the query into tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("illegal character '{ch}' at {position}")]
    IllegalCharacter { ch: char, position: Position },

    /// Reported at the opening quote; the rest of the input is consumed.
    #[error("unterminated string literal starting at {position}")]
    UnterminatedString { position: Position },

    #[error("invalid escape sequence '\\{ch}' at {position}")]
    InvalidEscape { ch: char, position: Position },

    #[error("number '{lexeme}' at {position} is out of range")]
    NumberOutOfRange { lexeme: String, position: Position },

    #[error("query is {len} bytes long, exceeding the limit of {limit} bytes")]
    InputTooLong { len: usize, limit: usize },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::IllegalCharacter { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::InvalidEscape { position, .. }
            | LexError::NumberOutOfRange { position, .. } => *position,
            LexError::InputTooLong { .. } => Position::START,
        }
    }
}

/// Everything the lexer produced for one input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
    /// Position just past the last character.
    pub end: Position,
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    cursor: Position,
    errors: Vec<LexError>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            cursor: Position::START,
            errors: Vec::new(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += 1;
            self.cursor.offset += ch.len_utf8();
            if ch == '\n' {
                self.cursor.line += 1;
                self.cursor.column = 1;
            } else {
                self.cursor.column += 1;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn lexeme_from(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Returns `None` when the closing quote is missing.
    fn read_string(&mut self, quote: char, start: Position) -> Option<String> {
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Some(result);
                }
                '\\' => {
                    let escape_at = self.cursor;
                    self.advance();
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some(c @ ('\'' | '"' | '\\')) => result.push(c),
                        Some(other) => {
                            self.errors.push(LexError::InvalidEscape {
                                ch: other,
                                position: escape_at,
                            });
                            result.push(other);
                        }
                        None => break,
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        self.errors
            .push(LexError::UnterminatedString { position: start });
        None
    }

    fn read_number(&mut self, start: Position) -> Option<TokenKind> {
        let mut number = String::new();

        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }
        self.read_digits(&mut number);

        if self.current_char() == Some('.') && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            number.push('.');
            self.advance();
            self.read_digits(&mut number);
        }

        match Decimal::from_str(&number) {
            Ok(n) => Some(TokenKind::Number(n)),
            Err(_) => {
                self.errors.push(LexError::NumberOutOfRange {
                    lexeme: number,
                    position: start,
                });
                None
            }
        }
    }

    fn read_digits(&mut self, into: &mut String) {
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                into.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Next token, or `None` at end of input.
    ///
    /// Illegal characters and malformed literals are recorded and skipped, so
    /// this keeps going until the input is exhausted.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            self.skip_whitespace();

            let start = self.position;
            let position = self.cursor;

            let kind = match self.current_char()? {
                '(' => {
                    self.advance();
                    TokenKind::LParen
                }
                ')' => {
                    self.advance();
                    TokenKind::RParen
                }
                ',' => {
                    self.advance();
                    TokenKind::Comma
                }
                quote @ ('"' | '\'') => match self.read_string(quote, position) {
                    Some(s) => TokenKind::String(s),
                    None => continue,
                },
                '-' if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                    match self.read_number(position) {
                        Some(kind) => kind,
                        None => continue,
                    }
                }
                ch if ch.is_ascii_digit() => match self.read_number(position) {
                    Some(kind) => kind,
                    None => continue,
                },
                ch if ch.is_ascii_alphabetic() || ch == '_' => {
                    let word = self.read_word();

                    match word.as_str() {
                        "true" => TokenKind::Boolean(true),
                        "false" => TokenKind::Boolean(false),
                        "null" => TokenKind::Null,
                        _ => match Operator::from_name(&word) {
                            Some(op) => TokenKind::Operator(op),
                            None => TokenKind::Identifier(word),
                        },
                    }
                }
                ch => {
                    self.errors
                        .push(LexError::IllegalCharacter { ch, position });
                    self.advance();
                    continue;
                }
            };

            let token = Token {
                kind,
                lexeme: self.lexeme_from(start),
                position,
            };
            trace!(lexeme = %token.lexeme, at = %token.position, "token");
            return Some(token);
        }
    }

    /// Consume the whole input.
    pub fn tokenize(mut self) -> LexOutput {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }

        LexOutput {
            tokens,
            errors: self.errors,
            end: self.cursor,
        }
    }
}

/// Tokenize `input` with the default limits.
pub fn tokenize(input: &str) -> LexOutput {
    tokenize_with(input, &ParseOptions::default())
}

/// Tokenize `input`, rejecting it outright when longer than
/// `options.max_input_len`.
pub fn tokenize_with(input: &str, options: &ParseOptions) -> LexOutput {
    if input.len() > options.max_input_len {
        return LexOutput {
            tokens: Vec::new(),
            errors: vec![LexError::InputTooLong {
                len: input.len(),
                limit: options.max_input_len,
            }],
            end: Position::START,
        };
    }
    Lexer::new(input).tokenize()
}

#[test]
fn test_keywords() {
    let kinds: Vec<TokenKind> = tokenize("and or true false null")
        .tokens
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Operator(Operator::And),
            TokenKind::Operator(Operator::Or),
            TokenKind::Boolean(true),
            TokenKind::Boolean(false),
            TokenKind::Null,
        ]
    );
}

#[test]
fn test_positions_track_lines() {
    let out = tokenize("and(\n  eq(a, 1))");
    let eq = &out.tokens[2];
    assert_eq!(eq.kind, TokenKind::Operator(Operator::Eq));
    assert_eq!(
        eq.position,
        Position {
            offset: 7,
            line: 2,
            column: 3
        }
    );
    assert_eq!(out.end.offset, 16);
}
