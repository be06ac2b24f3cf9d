// tests/binder_tests.rs

use callq::ast::{Arity, CompareOp, LogicalOp, Node, Operator, Predicate};
use callq::binder::{BindError, BindOutput, Binder};
use callq::lexer::{Position, tokenize};
use callq::parser::parse_tokens;
use callq::schema::{FieldDescriptor, FieldType, Schema};
use callq::value::Value;
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn schema() -> Schema {
    Schema::new()
        .with_field("age", FieldDescriptor::new(FieldType::Number))
        .with_field("name", FieldDescriptor::new(FieldType::String))
        .with_field("nickname", FieldDescriptor::new(FieldType::String).nullable())
        .with_field("active", FieldDescriptor::new(FieldType::Boolean))
        .with_field("born", FieldDescriptor::new(FieldType::Date { format: None }))
        .with_field(
            "status",
            FieldDescriptor::new(FieldType::Enum {
                variants: vec!["active".into(), "banned".into()],
            }),
        )
}

fn bind(input: &str) -> BindOutput {
    let lexed = tokenize(input);
    let parsed = parse_tokens(&lexed.tokens, lexed.end);
    assert!(parsed.errors.is_empty(), "parse errors: {:?}", parsed.errors);
    let schema = schema();
    Binder::new(&schema).bind(&parsed.ast.expect("ast"))
}

fn bind_ok(input: &str) -> Predicate {
    let out = bind(input);
    assert!(out.errors.is_empty(), "bind errors for {input}: {:?}", out.errors);
    out.predicate.expect("predicate")
}

fn comparison(field: &str, op: CompareOp, values: Vec<Value>) -> Predicate {
    Predicate::Comparison {
        field: field.into(),
        op,
        values,
    }
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn test_numeric_comparison_yields_number() {
    assert_eq!(
        bind_ok("eq(age, 30)"),
        comparison("age", CompareOp::Eq, vec![Value::Integer(30)])
    );
}

#[test]
fn test_numeric_string_coerced_for_number_field() {
    assert_eq!(
        bind_ok("gte(age, '18')"),
        comparison("age", CompareOp::Gte, vec![Value::Integer(18)])
    );
    assert_eq!(
        bind_ok("lt(age, 2.75)"),
        comparison("age", CompareOp::Lt, vec![Value::Decimal(Decimal::new(275, 2))])
    );
}

#[test]
fn test_every_binary_comparison() {
    let cases = [
        ("eq", CompareOp::Eq),
        ("ne", CompareOp::Ne),
        ("gt", CompareOp::Gt),
        ("gte", CompareOp::Gte),
        ("lt", CompareOp::Lt),
        ("lte", CompareOp::Lte),
    ];
    for (name, op) in cases {
        assert_eq!(
            bind_ok(&format!("{name}(name, 'Bob')")),
            comparison("name", op, vec![Value::String("Bob".into())])
        );
    }
}

#[test]
fn test_like() {
    assert_eq!(
        bind_ok("like(name, 'B%')"),
        comparison("name", CompareOp::Like, vec![Value::String("B%".into())])
    );
    let out = bind("like(age, '1%')");
    assert!(matches!(out.errors.as_slice(), [BindError::TypeMismatch { .. }]));
}

#[test]
fn test_in_takes_many_values() {
    assert_eq!(
        bind_ok("in(status, 'active', 'banned')"),
        comparison(
            "status",
            CompareOp::In,
            vec![Value::String("active".into()), Value::String("banned".into())]
        )
    );
}

#[test]
fn test_null_checks() {
    assert_eq!(
        bind_ok("isNull(nickname)"),
        comparison("nickname", CompareOp::IsNull, vec![])
    );
    assert_eq!(
        bind_ok("isNotNull(name)"),
        comparison("name", CompareOp::IsNotNull, vec![])
    );
}

#[test]
fn test_boolean_and_date_fields() {
    assert_eq!(
        bind_ok("eq(active, false)"),
        comparison("active", CompareOp::Eq, vec![Value::Boolean(false)])
    );
    assert_eq!(
        bind_ok("eq(active, 'true')"),
        comparison("active", CompareOp::Eq, vec![Value::Boolean(true)])
    );
    assert_eq!(
        bind_ok("gt(born, '2000-01-31')"),
        comparison(
            "born",
            CompareOp::Gt,
            vec![Value::Date(NaiveDate::from_ymd_opt(2000, 1, 31).unwrap())]
        )
    );
}

#[test]
fn test_null_literal() {
    assert_eq!(
        bind_ok("eq(nickname, null)"),
        comparison("nickname", CompareOp::Eq, vec![Value::Null])
    );

    let out = bind("eq(name, null)");
    assert!(out.predicate.is_none());
    assert!(matches!(
        out.errors.as_slice(),
        [BindError::TypeMismatch { field, found, .. }] if field == "name" && found == "null"
    ));
}

// ============================================================================
// Combinators
// ============================================================================

#[test]
fn test_and_preserves_order() {
    assert_eq!(
        bind_ok("and(eq(age, 30), eq(name, 'Bob'))"),
        Predicate::Combinator {
            op: LogicalOp::And,
            children: vec![
                comparison("age", CompareOp::Eq, vec![Value::Integer(30)]),
                comparison("name", CompareOp::Eq, vec![Value::String("Bob".into())]),
            ],
        }
    );
}

#[test]
fn test_single_child_or_and_not() {
    let predicate = bind_ok("or(not(isNull(nickname)))");
    assert_eq!(
        predicate,
        Predicate::Combinator {
            op: LogicalOp::Or,
            children: vec![Predicate::Combinator {
                op: LogicalOp::Not,
                children: vec![comparison("nickname", CompareOp::IsNull, vec![])],
            }],
        }
    );
    assert_eq!(predicate.depth(), 3);
}

#[test]
fn test_and_without_arguments() {
    let out = bind("and()");
    assert!(out.predicate.is_none());
    assert_eq!(
        out.errors,
        vec![BindError::WrongArity {
            operator: Operator::And,
            expected: Arity::AtLeast(1),
            found: 0,
            position: Position::START,
        }]
    );
}

#[test]
fn test_not_arity() {
    let out = bind("not(eq(age, 1), eq(age, 2))");
    assert!(matches!(
        out.errors.as_slice(),
        [BindError::WrongArity { operator: Operator::Not, found: 2, .. }]
    ));
    let out = bind("not()");
    assert!(matches!(
        out.errors.as_slice(),
        [BindError::WrongArity { operator: Operator::Not, found: 0, .. }]
    ));
}

#[test]
fn test_not_requires_predicate() {
    let out = bind("not(true)");
    assert!(matches!(
        out.errors.as_slice(),
        [BindError::ExpectedPredicate { found, .. }] if found == "literal true"
    ));
    let out = bind("and(age)");
    assert!(matches!(
        out.errors.as_slice(),
        [BindError::ExpectedPredicate { found, .. }] if found == "field reference 'age'"
    ));
}

#[test]
fn test_sibling_errors_are_all_collected() {
    let out = bind("and(eq(height, 1), eq(age, 'old'), or(eq(name, 3), eq(age, 1)))");
    assert!(out.predicate.is_none());

    let kinds: Vec<&str> = out
        .errors
        .iter()
        .map(|e| match e {
            BindError::UnknownField { .. } => "unknown",
            BindError::TypeMismatch { .. } => "mismatch",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["unknown", "mismatch", "mismatch"]);
}

#[test]
fn test_multiple_bad_values_in_one_call() {
    let out = bind("in(age, 'x', 2, 'y')");
    assert_eq!(out.errors.len(), 2);
    assert!(out.predicate.is_none());
}

// ============================================================================
// Field references
// ============================================================================

#[test]
fn test_unknown_field() {
    let out = bind("eq(unknownField, 1)");
    assert!(out.predicate.is_none());
    assert_eq!(
        out.errors,
        vec![BindError::UnknownField {
            name: "unknownField".into(),
            position: Position {
                offset: 3,
                line: 1,
                column: 4
            },
        }]
    );
    assert!(out.errors[0].to_string().contains("unknownField"));
}

#[test]
fn test_quoted_field_name_is_rejected() {
    let out = bind("eq('name', 'Bob')");
    assert!(matches!(
        out.errors.as_slice(),
        [BindError::ExpectedField { found, .. }] if found == "literal 'name'"
    ));
}

#[test]
fn test_field_in_value_position() {
    let out = bind("eq(name, nickname)");
    assert!(matches!(out.errors.as_slice(), [BindError::ExpectedValue { .. }]));
}

#[test]
fn test_comparison_arity() {
    for (input, found) in [("eq(age)", 1), ("eq(age, 1, 2)", 3), ("isNull(nickname, null)", 2), ("in(age)", 1)] {
        let out = bind(input);
        assert!(
            matches!(out.errors.as_slice(), [BindError::WrongArity { found: f, .. }] if *f == found),
            "Failed for input: {}: {:?}",
            input,
            out.errors
        );
    }
    let out = bind("eq()");
    assert!(matches!(out.errors.as_slice(), [BindError::WrongArity { found: 0, .. }]));
}

#[test]
fn test_type_mismatch_message() {
    let out = bind("eq(status, 'gone')");
    assert_eq!(
        out.errors[0].to_string(),
        "cannot compare field 'status' with 'gone': expected one of 'active', 'banned' at 1:12"
    );
}

#[test]
fn test_invalid_nodes_bind_silently() {
    // hand-built tree with a placeholder left by the parser
    let node = Node::Call {
        op: Operator::And,
        args: vec![Node::Invalid {
            position: Position::START,
        }],
        position: Position::START,
    };
    let schema = schema();
    let out = Binder::new(&schema).bind(&node);
    assert!(out.predicate.is_none());
    assert!(out.errors.is_empty());
}
