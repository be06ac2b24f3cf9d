use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::ast::expressions::write_quoted;

/// A literal after it has been coerced to its field's declared type.
///
/// # Type Preservation
///
/// Numbers keep the integer/decimal distinction: a numeric literal with no
/// fractional part that fits in an `i64` becomes [`Value::Integer`],
/// everything else stays an exact [`Value::Decimal`]. Nothing is ever
/// converted through `f64`.
///
/// # Examples
///
/// ```
/// use callq::Value;
///
/// let age = Value::Integer(30);
/// assert_eq!(age.type_name(), "integer");
/// assert_eq!(Value::String("Bob".into()).to_string(), "'Bob'");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,

    Boolean(bool),

    /// Whole number
    Integer(i64),

    /// Exact decimal number
    Decimal(Decimal),

    /// UTF-8 string (also used for enum variants)
    String(String),

    /// Calendar date
    Date(NaiveDate),

    /// Date and time, normalized to UTC when the source carried an offset
    DateTime(NaiveDateTime),
}

impl Value {
    /// Returns a human-readable type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get any number as an exact decimal
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Integer(n) => Some(Decimal::from(*n)),
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Renders the value in query syntax, so a displayed predicate can be parsed
/// again.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::String(s) => write_quoted(f, s),
            Value::Date(d) => write!(f, "'{}'", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => write!(f, "'{}'", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}
