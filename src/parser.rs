use tracing::{debug, trace};

use crate::{
    ast::{Literal, Node, Token, TokenKind},
    lexer::Position,
    options::{DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING},
    stream::TokenStream,
};

/// Syntax errors. The parser records these and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found} at {position}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        position: Position,
    },

    #[error("expected {expected}, found end of input at {position}")]
    UnexpectedEnd {
        expected: &'static str,
        position: Position,
    },

    /// `f(a,)` or `f(,a)`
    #[error("missing argument at {position}")]
    MissingArgument { position: Position },

    #[error("unknown operator '{name}' at {position}")]
    UnknownOperator { name: String, position: Position },

    #[error("unexpected trailing input {found} at {position}")]
    TrailingInput { found: String, position: Position },

    #[error("calls nested deeper than {limit} levels at {position}")]
    NestingTooDeep { limit: usize, position: Position },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::UnexpectedEnd { position, .. }
            | ParseError::MissingArgument { position }
            | ParseError::UnknownOperator { position, .. }
            | ParseError::TrailingInput { position, .. }
            | ParseError::NestingTooDeep { position, .. } => *position,
        }
    }
}

/// Result of parsing one token sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    /// `None` only when no top-level call could be formed at all.
    pub ast: Option<Node>,
    pub errors: Vec<ParseError>,
}

/// Recursive-descent parser over a [`TokenStream`].
///
/// ```text
/// expression := (OPERATOR | IDENTIFIER) '(' argList? ')'
/// argList    := argument (',' argument)*
/// argument   := expression | IDENTIFIER | literal
/// ```
///
/// After a malformed argument the parser skips to the next `,` or `)` at the
/// same nesting depth and carries on, so sibling arguments are still checked.
pub struct Parser<'a> {
    stream: TokenStream<'a>,
    max_depth: usize,
    errors: Vec<ParseError>,
    depth_exceeded: bool,
}

impl<'a> Parser<'a> {
    pub fn new(stream: TokenStream<'a>) -> Self {
        Parser {
            stream,
            max_depth: DEFAULT_MAX_DEPTH,
            errors: Vec::new(),
            depth_exceeded: false,
        }
    }

    /// Set the nesting limit, clamped to [`MAX_DEPTH_CEILING`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_CEILING);
        self
    }

    fn error(&mut self, error: ParseError) {
        trace!(%error, "syntax error");
        self.errors.push(error);
    }

    fn unexpected(&mut self, expected: &'static str) {
        let error = match self.stream.peek() {
            Some(token) => ParseError::UnexpectedToken {
                expected,
                found: token.kind.to_string(),
                position: token.position,
            },
            None => ParseError::UnexpectedEnd {
                expected,
                position: self.stream.end_position(),
            },
        };
        self.error(error);
    }

    /// Parse exactly one top-level call.
    pub fn parse(mut self) -> ParseOutput {
        let ast = match self.stream.peek() {
            Some(head) if self.starts_call(head) => {
                self.stream.advance();
                Some(self.parse_call(head, 0))
            }
            _ => {
                self.unexpected("an operator call");
                None
            }
        };

        if ast.is_some() {
            if let Some(token) = self.stream.peek() {
                self.error(ParseError::TrailingInput {
                    found: token.kind.to_string(),
                    position: token.position,
                });
            }
        }

        ParseOutput {
            ast: ast.filter(|node| !node.is_invalid()),
            errors: self.errors,
        }
    }

    /// Operators always start a call; other identifiers only when followed
    /// by `(`.
    fn starts_call(&self, head: &Token) -> bool {
        match head.kind {
            TokenKind::Operator(_) => true,
            TokenKind::Identifier(_) => self
                .stream
                .peek_nth(1)
                .is_some_and(|t| t.kind == TokenKind::LParen),
            _ => false,
        }
    }

    /// Parse the argument list following an already consumed `head`.
    fn parse_call(&mut self, head: &'a Token, depth: usize) -> Node {
        let position = head.position;
        let op = match &head.kind {
            TokenKind::Operator(op) => Some(*op),
            TokenKind::Identifier(name) => {
                self.error(ParseError::UnknownOperator {
                    name: name.clone(),
                    position,
                });
                None
            }
            _ => None,
        };

        if !self.stream.check(&TokenKind::LParen) {
            self.unexpected("'('");
            return Node::Invalid { position };
        }

        if depth >= self.max_depth {
            if !self.depth_exceeded {
                debug!(limit = self.max_depth, at = %position, "nesting limit reached");
                self.error(ParseError::NestingTooDeep {
                    limit: self.max_depth,
                    position,
                });
                self.depth_exceeded = true;
            }
            self.skip_balanced();
            return Node::Invalid { position };
        }

        self.stream.advance(); // '('

        let mut args = Vec::new();
        if self.stream.check(&TokenKind::RParen) {
            self.stream.advance();
        } else {
            loop {
                args.push(self.parse_argument(depth));
                if !self.continue_arguments() {
                    break;
                }
            }
        }

        match op {
            Some(op) => Node::Call { op, args, position },
            None => Node::Invalid { position },
        }
    }

    fn parse_argument(&mut self, depth: usize) -> Node {
        let Some(token) = self.stream.peek() else {
            self.unexpected("an argument");
            return Node::Invalid {
                position: self.stream.end_position(),
            };
        };

        let literal = match &token.kind {
            TokenKind::Operator(_) => {
                self.stream.advance();
                return self.parse_call(token, depth + 1);
            }
            TokenKind::Identifier(name) => {
                if self.starts_call(token) {
                    self.stream.advance();
                    return self.parse_call(token, depth + 1);
                }
                self.stream.advance();
                return Node::Field {
                    name: name.clone(),
                    position: token.position,
                };
            }
            TokenKind::Comma | TokenKind::RParen => {
                self.error(ParseError::MissingArgument {
                    position: token.position,
                });
                return Node::Invalid {
                    position: token.position,
                };
            }
            TokenKind::LParen => {
                self.unexpected("an argument");
                self.synchronize();
                return Node::Invalid {
                    position: token.position,
                };
            }
            TokenKind::Number(n) => Literal::Number(*n),
            TokenKind::String(s) => Literal::String(s.clone()),
            TokenKind::Boolean(b) => Literal::Boolean(*b),
            TokenKind::Null => Literal::Null,
        };

        self.stream.advance();
        Node::Literal {
            value: literal,
            position: token.position,
        }
    }

    /// Consume the separator after an argument. Returns `true` when another
    /// argument follows, `false` once the list is closed (or input ran out).
    fn continue_arguments(&mut self) -> bool {
        loop {
            match self.stream.peek().map(|t| &t.kind) {
                Some(TokenKind::Comma) => {
                    self.stream.advance();
                    return true;
                }
                Some(TokenKind::RParen) => {
                    self.stream.advance();
                    return false;
                }
                None => {
                    self.unexpected("')'");
                    return false;
                }
                Some(_) => {
                    self.unexpected("',' or ')'");
                    self.synchronize();
                }
            }
        }
    }

    /// Skip to the next `,` or `)` at the current nesting depth, or to the
    /// end of input.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.stream.peek() {
            match token.kind {
                TokenKind::Comma | TokenKind::RParen if depth == 0 => return,
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth -= 1,
                _ => {}
            }
            trace!(lexeme = %token.lexeme, "skipping");
            self.stream.advance();
        }
    }

    /// Skip a parenthesized group starting at the current `(`, including
    /// everything nested inside it. Iterative, so depth is not a concern.
    fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.stream.advance() {
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }
}

/// Parse a token sequence with the default nesting limit.
pub fn parse_tokens(tokens: &[Token], end: Position) -> ParseOutput {
    Parser::new(TokenStream::new(tokens, end)).parse()
}
