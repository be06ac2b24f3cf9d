use std::fmt;

use crate::ast::{CompareOp, LogicalOp};
use crate::value::Value;

/// A filter condition bound to a schema.
///
/// This is the output of a successful parse: every field name exists in the
/// schema and every value has been coerced to its field's type. Consumers
/// translate it into their own query representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field comparison
    ///
    /// `values` holds the operands after the field: one for `eq`..`like`,
    /// one or more for `in`, none for `isNull`/`isNotNull`.
    ///
    /// # Example
    /// ```text
    /// eq(age, 30)   // Comparison { field: "age", op: Eq, values: [Integer(30)] }
    /// ```
    Comparison {
        field: String,
        op: CompareOp,
        values: Vec<Value>,
    },

    /// Logical combination of child predicates, in source order
    ///
    /// `not` always has exactly one child.
    Combinator {
        op: LogicalOp,
        children: Vec<Predicate>,
    },
}

impl Predicate {
    /// The single operand of a binary comparison.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Predicate::Comparison { values, .. } if values.len() == 1 => values.first(),
            _ => None,
        }
    }

    /// Depth of the tree, a lone comparison being 1.
    pub fn depth(&self) -> usize {
        match self {
            Predicate::Comparison { .. } => 1,
            Predicate::Combinator { children, .. } => {
                1 + children.iter().map(Predicate::depth).max().unwrap_or(0)
            }
        }
    }
}

/// Renders the predicate back into query text.
impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Comparison { field, op, values } => {
                write!(f, "{}({field}", op.operator())?;
                for value in values {
                    write!(f, ", {value}")?;
                }
                f.write_str(")")
            }
            Predicate::Combinator { op, children } => {
                write!(f, "{}(", op.operator())?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}
