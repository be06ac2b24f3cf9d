use std::mem;

use crate::ast::{Token, TokenKind};
use crate::lexer::Position;

/// Cursor over a lexed token sequence, with one token of lookahead beyond
/// the current one.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    cursor: usize,
    end: Position,
}

impl<'a> TokenStream<'a> {
    /// `end` is reported as the position of the (virtual) end-of-input token.
    pub fn new(tokens: &'a [Token], end: Position) -> Self {
        TokenStream {
            tokens,
            cursor: 0,
            end,
        }
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.cursor)
    }

    /// The token `n` places after the current one.
    pub fn peek_nth(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.cursor + n)
    }

    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }

    /// Whether the current token has the same kind as `kind`, payload ignored.
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.peek()
            .is_some_and(|token| mem::discriminant(&token.kind) == mem::discriminant(kind))
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Position of the current token, or of the end of input.
    pub fn position(&self) -> Position {
        self.peek().map_or(self.end, |token| token.position)
    }

    pub fn end_position(&self) -> Position {
        self.end
    }
}
