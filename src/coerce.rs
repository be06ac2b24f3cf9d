//! Coercion of raw literals to a field's declared type.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{
    ast::{CompareOp, Literal},
    schema::{FieldDescriptor, FieldType},
    value::Value,
};

/// Same shape as a number token, so `'30'` and `30` coerce alike.
static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("numeric pattern is valid"));

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Coerce `literal` for use as an operand of `op` against `field`.
///
/// On failure returns a description of what was expected instead.
pub fn coerce_literal(
    field: &FieldDescriptor,
    op: CompareOp,
    literal: &Literal,
) -> Result<Value, String> {
    if let Literal::Null = literal {
        if !op.accepts_null() {
            return Err(format!("a non-null operand for '{}'", op.operator()));
        }
        if !field.nullable {
            return Err(format!(
                "{} (field is not nullable)",
                field.ty.expectation()
            ));
        }
        return Ok(Value::Null);
    }

    if op == CompareOp::Like && field.ty != FieldType::String {
        return Err("a string field for 'like'".to_string());
    }

    match (&field.ty, literal) {
        (FieldType::Number, Literal::Number(n)) => Ok(number_value(*n)),
        (FieldType::Number, Literal::String(s)) if NUMERIC.is_match(s) => Decimal::from_str(s)
            .map(number_value)
            .map_err(|_| field.ty.expectation()),
        (FieldType::String, Literal::String(s)) => Ok(Value::String(s.clone())),
        (FieldType::Boolean, Literal::Boolean(b)) => Ok(Value::Boolean(*b)),
        (FieldType::Boolean, Literal::String(s)) if s == "true" || s == "false" => {
            Ok(Value::Boolean(s == "true"))
        }
        (FieldType::Date { format }, Literal::String(s)) => {
            parse_date(s, format.as_deref()).ok_or_else(|| field.ty.expectation())
        }
        (FieldType::Enum { variants }, Literal::String(s)) if variants.contains(s) => {
            Ok(Value::String(s.clone()))
        }
        (ty, _) => Err(ty.expectation()),
    }
}

/// Whole numbers that fit an `i64` become integers; the rest stay decimal.
fn number_value(n: Decimal) -> Value {
    if n.fract().is_zero() {
        if let Some(i) = n.to_i64() {
            return Value::Integer(i);
        }
    }
    Value::Decimal(n.normalize())
}

/// A field's own format is tried first; ISO forms are always accepted since
/// that is how bound dates are displayed.
fn parse_date(text: &str, format: Option<&str>) -> Option<Value> {
    match format {
        Some(format) => NaiveDateTime::parse_from_str(text, format)
            .map(Value::DateTime)
            .or_else(|_| NaiveDate::parse_from_str(text, format).map(Value::Date))
            .ok()
            .or_else(|| parse_date(text, None)),
        None => {
            if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                return Some(Value::Date(date));
            }
            for format in DATE_TIME_FORMATS {
                if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
                    return Some(Value::DateTime(dt));
                }
            }
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| Value::DateTime(dt.naive_utc()))
        }
    }
}
