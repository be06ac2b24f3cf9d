// Properties that must hold for any input, valid or not.

use callq::{FieldDescriptor, FieldType, Schema, parse_query};
use proptest::prelude::*;

fn schema() -> Schema {
    Schema::new()
        .with_field("age", FieldDescriptor::new(FieldType::Number))
        .with_field("name", FieldDescriptor::new(FieldType::String).nullable())
        .with_field("ok", FieldDescriptor::new(FieldType::Boolean))
        .with_field(
            "born",
            FieldDescriptor::new(FieldType::Date {
                format: Some("%d/%m/%Y".into()),
            }),
        )
        .with_field(
            "seen",
            FieldDescriptor::new(FieldType::Date {
                format: Some("%d/%m/%Y %H:%M".into()),
            }),
        )
        .with_field("price", FieldDescriptor::new(FieldType::Number))
}

/// Fragments that recombine into mostly-plausible, often broken, queries.
fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "eq", "ne", "gt", "in", "isNull", "and", "or", "not", "foo", "age", "name", "ok",
        "(", ")", ",", " ", "1", "-2.5", "'x'", "\"y\"", "'", "true", "null", "#", "\\",
    ])
}

fn comparison() -> impl Strategy<Value = String> {
    prop_oneof![
        (-1000i64..1000).prop_map(|n| format!("eq(age, {n})")),
        "[a-z ]{0,8}".prop_map(|s| format!("ne(name, '{s}')")),
        any::<bool>().prop_map(|b| format!("eq(ok, {b})")),
        Just("isNull(name)".to_string()),
        (1u32..=28, 1u32..=12, 1900i32..2100)
            .prop_map(|(d, m, y)| format!("gt(born, '{d:02}/{m:02}/{y}')")),
        (1u32..=28, 1u32..=12, 1900i32..2100, 0u32..24, 0u32..60)
            .prop_map(|(d, m, y, h, min)| format!("lte(seen, '{d:02}/{m:02}/{y} {h:02}:{min:02}')")),
        (any::<i64>(), 0u32..1_000_000).prop_map(|(whole, frac)| format!("lt(price, {whole}.{frac:06})")),
    ]
}

fn predicate() -> impl Strategy<Value = String> {
    comparison().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(|c| format!("and({})", c.join(", "))),
            prop::collection::vec(inner.clone(), 1..4).prop_map(|c| format!("or({})", c.join(", "))),
            inner.prop_map(|c| format!("not({c})")),
        ]
    })
}

proptest! {
    #[test]
    fn arbitrary_text_never_panics_and_explains_itself(text in ".{0,64}") {
        let result = parse_query(&text, &schema());
        if result.value.is_none() {
            prop_assert!(result.error_count() > 0);
        }
    }

    #[test]
    fn fragment_soup_never_panics_and_explains_itself(
        parts in prop::collection::vec(fragment(), 0..40)
    ) {
        let text = parts.concat();
        let result = parse_query(&text, &schema());
        prop_assert_eq!(result.value.is_none(), result.error_count() > 0);
    }

    #[test]
    fn well_formed_queries_bind_cleanly(query in predicate()) {
        let result = parse_query(&query, &schema());
        prop_assert!(result.is_ok(), "{}: {:?}", query, result);
        prop_assert_eq!(result.error_count(), 0);
    }

    #[test]
    fn rendering_round_trips(query in predicate()) {
        let schema = schema();
        let predicate = parse_query(&query, &schema).value.unwrap();
        let again = parse_query(&predicate.to_string(), &schema).value;
        prop_assert_eq!(Some(predicate), again);
    }
}
