//! JSON rendering of predicates and diagnostics.
//!
//! This is the hand-off format for consumers outside Rust. The shape is
//! fixed and keyed by `op`:
//!
//! ```text
//! eq(age, 30)            {"op": "eq", "field": "age", "value": 30}
//! in(s, 'a', 'b')        {"op": "in", "field": "s", "values": ["a", "b"]}
//! isNull(deleted_at)     {"op": "isNull", "field": "deleted_at"}
//! and(p, q)              {"op": "and", "children": [p, q]}
//! not(p)                 {"op": "not", "child": p}
//! ```
//!
//! # Examples
//!
//! ```
//! use callq::{CompareOp, Predicate, Value};
//! use callq::output::to_json_string;
//!
//! let predicate = Predicate::Comparison {
//!     field: "age".into(),
//!     op: CompareOp::Gte,
//!     values: vec![Value::Integer(18)],
//! };
//! assert_eq!(to_json_string(&predicate), r#"{"field":"age","op":"gte","value":18}"#);
//! ```

use std::str::FromStr;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde_json::{Map, Number, json};

use crate::{
    ast::{CompareOp, LogicalOp, Predicate},
    query::{Diagnostic, QueryResult},
    value::Value,
};

/// Convert a predicate tree to JSON.
pub fn to_json(predicate: &Predicate) -> serde_json::Value {
    let mut object = Map::new();

    match predicate {
        Predicate::Comparison { field, op, values } => {
            object.insert("op".into(), op.operator().name().into());
            object.insert("field".into(), field.clone().into());
            match op {
                CompareOp::IsNull | CompareOp::IsNotNull => {}
                CompareOp::In => {
                    let values = values.iter().map(value_to_json).collect();
                    object.insert("values".into(), serde_json::Value::Array(values));
                }
                _ => {
                    let value = values.first().map_or(serde_json::Value::Null, value_to_json);
                    object.insert("value".into(), value);
                }
            }
        }
        Predicate::Combinator { op, children } => {
            object.insert("op".into(), op.operator().name().into());
            match (op, children.as_slice()) {
                (LogicalOp::Not, [child]) => {
                    object.insert("child".into(), to_json(child));
                }
                _ => {
                    let children = children.iter().map(to_json).collect();
                    object.insert("children".into(), serde_json::Value::Array(children));
                }
            }
        }
    }

    serde_json::Value::Object(object)
}

/// Convert a bound value to JSON.
///
/// Decimals that do not survive a trip through `f64` are written as strings;
/// dates use ISO 8601.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(n) => serde_json::Value::Number((*n).into()),
        Value::Decimal(d) => decimal_to_json(*d),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
        Value::DateTime(dt) => {
            serde_json::Value::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
        }
    }
}

fn decimal_to_json(d: Decimal) -> serde_json::Value {
    let exact = d.to_f64().filter(|f| {
        Decimal::from_str(&f.to_string()).is_ok_and(|back| back.normalize() == d.normalize())
    });
    match exact.and_then(Number::from_f64) {
        Some(n) => serde_json::Value::Number(n),
        None => serde_json::Value::String(d.to_string()),
    }
}

/// Compact JSON text.
pub fn to_json_string(predicate: &Predicate) -> String {
    to_json(predicate).to_string()
}

/// Human-readable JSON text with 2-space indentation.
pub fn to_json_pretty(predicate: &Predicate) -> String {
    format!("{:#}", to_json(predicate))
}

/// Every diagnostic of `result` as a JSON array, in stage order.
pub fn diagnostics_to_json(result: &QueryResult) -> serde_json::Value {
    result
        .diagnostics()
        .map(|diagnostic| {
            let position = diagnostic.position();
            let message = match diagnostic {
                Diagnostic::Lex(e) => e.to_string(),
                Diagnostic::Parse(e) => e.to_string(),
                Diagnostic::Bind(e) => e.to_string(),
            };
            json!({
                "stage": diagnostic.stage(),
                "message": message,
                "offset": position.offset,
                "line": position.line,
                "column": position.column,
            })
        })
        .collect()
}
