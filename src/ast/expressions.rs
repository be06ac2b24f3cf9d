use std::fmt;

use rust_decimal::Decimal;

use crate::ast::Operator;
use crate::lexer::Position;

/// Syntax tree node produced by the parser.
///
/// The tree is unvalidated: operators are known, but arities, field names
/// and literal types are only checked once the tree is bound to a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Operator call
    ///
    /// # Examples
    /// ```text
    /// eq(age, 30)
    /// and(isNull(deleted_at), not(eq(role, 'guest')))
    /// ```
    Call {
        op: Operator,
        args: Vec<Node>,
        position: Position,
    },

    /// Bare identifier naming a schema field
    ///
    /// # Example
    /// ```text
    /// eq(age, 30)   // `age`
    /// ```
    Field { name: String, position: Position },

    /// Literal argument
    Literal { value: Literal, position: Position },

    /// Placeholder for an argument that failed to parse.
    ///
    /// The parser has already reported the problem; binding skips it.
    Invalid { position: Position },
}

impl Node {
    pub fn position(&self) -> Position {
        match self {
            Node::Call { position, .. }
            | Node::Field { position, .. }
            | Node::Literal { position, .. }
            | Node::Invalid { position } => *position,
        }
    }

    /// Short description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Node::Call { op, .. } => format!("call to '{op}'"),
            Node::Field { name, .. } => format!("field reference '{name}'"),
            Node::Literal { value, .. } => format!("literal {value}"),
            Node::Invalid { .. } => "invalid argument".to_string(),
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Node::Invalid { .. })
    }
}

/// Raw literal value, before coercion to a field's type.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(Decimal),
    String(String),
    Boolean(bool),
    Null,
}

/// Renders the literal in query syntax.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{n}"),
            Literal::String(s) => write_quoted(f, s),
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Null => f.write_str("null"),
        }
    }
}

/// Writes `s` as a single-quoted query string.
pub(crate) fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("'")?;
    for ch in s.chars() {
        match ch {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("'")
}
