//! callq parses call-style filter queries such as
//! `and(eq(status, 'active'), gte(age, 18))` and binds them against a typed
//! schema, producing a [`Predicate`] tree for a downstream query builder.
//!
//! Parsing never fails with an `Err` or a panic on bad input: every problem
//! is collected into the lexical, syntactic, or semantic error list of the
//! returned [`QueryResult`].

pub mod ast;
pub mod binder;
pub mod cli;
pub mod coerce;
pub mod lexer;
pub mod options;
pub mod output;
pub mod parser;
pub mod query;
pub mod schema;
pub mod stream;
pub mod value;

pub use ast::{CompareOp, Literal, LogicalOp, Node, Operator, Predicate, Token, TokenKind};
pub use binder::{BindError, BindOutput, Binder};
pub use lexer::{LexError, LexOutput, Lexer, Position, tokenize};
pub use options::ParseOptions;
pub use output::{to_json, to_json_pretty};
pub use parser::{ParseError, ParseOutput, Parser};
pub use query::{Diagnostic, QueryError, QueryResult, SyntaxResult, parse_query, parse_query_with};
pub use schema::{FieldDescriptor, FieldType, Schema, SchemaError};
pub use stream::TokenStream;
pub use value::Value;
