//! Documentation content for the callq CLI

use crate::ast::{Operator, OperatorKind};

/// Get the language reference
pub fn get_docs_overview() -> &'static str {
    r#"CALLQ LANGUAGE REFERENCE

A query is a single operator call. Arguments are nested calls, field names,
or literals:

  and(eq(status, 'active'), gte(age, 18))

FIELDS AND VALUES
  age            bare identifier: a field from the schema
  'Bob' "Bob"    quoted string: always a value, never a field
  30  -2.5       numbers
  true false     booleans
  null           null (nullable fields, eq/ne/in only)

  Strings support the escapes \' \" \\ \n \t \r.

COERCION
  number fields   accept numbers and numeric strings ('30')
  boolean fields  accept true/false and 'true'/'false'
  date fields     accept strings in the field's format, or ISO 8601
  enum fields     accept one of the declared variants
  like            requires a string field

Run 'callq operators' for the operator list.
"#
}

/// Render the operator vocabulary with arities.
pub fn operator_table() -> String {
    let mut out = String::from("OPERATORS\n\n");
    for op in Operator::ALL {
        let kind = match op.kind() {
            OperatorKind::Comparison(_) => "comparison",
            OperatorKind::Logical(_) => "logical",
        };
        out.push_str(&format!("  {:<10} {:<11} {}\n", op.name(), kind, op.arity()));
    }
    out
}

#[test]
fn table_lists_every_operator() {
    let table = operator_table();
    for op in Operator::ALL {
        assert!(table.contains(op.name()), "missing {op}");
    }
    assert!(table.contains("isNotNull  comparison  exactly 1 argument"));
}
