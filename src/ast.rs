//! # callq - Syntax Tree and Predicate Model
//!
//! This module defines the data that flows between the stages of the callq
//! pipeline: the tokens the lexer produces, the syntax tree the parser builds,
//! and the typed predicate tree the binder hands back to the caller.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - The closed operator vocabulary and its arities
//! - **[expressions]** - Syntax tree nodes (calls, field references, literals)
//! - **[predicate]** - The bound, schema-typed filter condition
//!
//! ## Quick Start
//!
//! ```text
//! and(eq(status, 'active'), gte(age, 18))
//! ```
//!
//! Every query is a single operator call. Arguments are nested calls, bare
//! identifiers naming schema fields, or literals.
//!
//! ## Field References vs. Strings
//!
//! A bare identifier is always a field reference and a quoted string is always
//! a value:
//!
//! ```text
//! eq(name, 'Bob')     // field `name` equals the string "Bob"
//! eq('name', 'Bob')   // rejected: the first argument must name a field
//! ```
//!
//! ## Operators
//!
//! | operator | arguments |
//! |---|---|
//! | `eq` `ne` `gt` `gte` `lt` `lte` `like` | field, value |
//! | `in` | field, value, value... |
//! | `isNull` `isNotNull` | field |
//! | `and` `or` | predicate, predicate... |
//! | `not` | predicate |
pub mod expressions;
pub mod operators;
pub mod predicate;
pub mod tokens;

pub use expressions::{Literal, Node};
pub use operators::{Arity, CompareOp, LogicalOp, Operator, OperatorKind};
pub use predicate::Predicate;
pub use tokens::{Token, TokenKind};
