use tracing::trace;

use crate::{
    ast::{Arity, CompareOp, LogicalOp, Node, Operator, OperatorKind, Predicate},
    coerce::coerce_literal,
    lexer::Position,
    schema::Schema,
};

/// Semantic errors found while binding a syntax tree to a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("unknown field '{name}' at {position}")]
    UnknownField { name: String, position: Position },

    #[error("'{operator}' takes {expected}, found {found} at {position}")]
    WrongArity {
        operator: Operator,
        expected: Arity,
        found: usize,
        position: Position,
    },

    /// A comparison whose first argument is not a bare field name.
    #[error("expected a field reference, found {found} at {position}")]
    ExpectedField { found: String, position: Position },

    /// A literal or field where a predicate is required.
    #[error("expected a predicate, found {found} at {position}")]
    ExpectedPredicate { found: String, position: Position },

    /// A call or field reference in value position.
    #[error("expected a literal value, found {found} at {position}")]
    ExpectedValue { found: String, position: Position },

    #[error("cannot compare field '{field}' with {found}: expected {expected} at {position}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
        position: Position,
    },
}

impl BindError {
    pub fn position(&self) -> Position {
        match self {
            BindError::UnknownField { position, .. }
            | BindError::WrongArity { position, .. }
            | BindError::ExpectedField { position, .. }
            | BindError::ExpectedPredicate { position, .. }
            | BindError::ExpectedValue { position, .. }
            | BindError::TypeMismatch { position, .. } => *position,
        }
    }
}

/// Result of binding one syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct BindOutput {
    /// `None` whenever any part of the tree failed to bind.
    pub predicate: Option<Predicate>,
    pub errors: Vec<BindError>,
}

/// Resolves field names against a schema and coerces literals to the
/// fields' types.
///
/// Binding does not stop at the first problem: every branch of an `and`/`or`
/// is bound and all of their errors are reported.
#[derive(Debug, Clone, Copy)]
pub struct Binder<'s> {
    schema: &'s Schema,
}

impl<'s> Binder<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Binder { schema }
    }

    pub fn bind(&self, node: &Node) -> BindOutput {
        let mut errors = Vec::new();
        let predicate = self.bind_node(node, &mut errors);

        BindOutput {
            predicate: predicate.filter(|_| errors.is_empty()),
            errors,
        }
    }

    fn bind_node(&self, node: &Node, errors: &mut Vec<BindError>) -> Option<Predicate> {
        match node {
            Node::Call { op, args, position } => match op.kind() {
                OperatorKind::Logical(logical) => {
                    self.bind_logical(*op, logical, args, *position, errors)
                }
                OperatorKind::Comparison(compare) => {
                    self.bind_comparison(*op, compare, args, *position, errors)
                }
            },
            Node::Field { .. } | Node::Literal { .. } => {
                errors.push(BindError::ExpectedPredicate {
                    found: node.describe(),
                    position: node.position(),
                });
                None
            }
            // already reported by the parser
            Node::Invalid { .. } => None,
        }
    }

    fn bind_logical(
        &self,
        op: Operator,
        logical: LogicalOp,
        args: &[Node],
        position: Position,
        errors: &mut Vec<BindError>,
    ) -> Option<Predicate> {
        let arity_ok = check_arity(op, args.len(), position, errors);

        // Bind every child, even after a failure, to collect all errors.
        let children: Vec<Option<Predicate>> = args
            .iter()
            .map(|arg| self.bind_node(arg, errors))
            .collect();

        if !arity_ok {
            return None;
        }
        let children = children.into_iter().collect::<Option<Vec<_>>>()?;

        Some(Predicate::Combinator {
            op: logical,
            children,
        })
    }

    fn bind_comparison(
        &self,
        op: Operator,
        compare: CompareOp,
        args: &[Node],
        position: Position,
        errors: &mut Vec<BindError>,
    ) -> Option<Predicate> {
        let Some((first, operands)) = args.split_first() else {
            check_arity(op, 0, position, errors);
            return None;
        };

        let name = match first {
            Node::Field { name, .. } => name,
            Node::Invalid { .. } => return None,
            other => {
                errors.push(BindError::ExpectedField {
                    found: other.describe(),
                    position: other.position(),
                });
                return None;
            }
        };

        let Some(descriptor) = self.schema.get(name) else {
            errors.push(BindError::UnknownField {
                name: name.clone(),
                position: first.position(),
            });
            return None;
        };
        trace!(field = %name, ty = descriptor.ty.name(), "resolved field");

        if !check_arity(op, args.len(), position, errors) {
            return None;
        }

        let mut values = Vec::with_capacity(operands.len());
        let mut failed = false;
        for operand in operands {
            match operand {
                Node::Literal { value, position } => {
                    match coerce_literal(descriptor, compare, value) {
                        Ok(coerced) => values.push(coerced),
                        Err(expected) => {
                            errors.push(BindError::TypeMismatch {
                                field: name.clone(),
                                expected,
                                found: value.to_string(),
                                position: *position,
                            });
                            failed = true;
                        }
                    }
                }
                Node::Invalid { .. } => failed = true,
                other => {
                    errors.push(BindError::ExpectedValue {
                        found: other.describe(),
                        position: other.position(),
                    });
                    failed = true;
                }
            }
        }

        if failed {
            return None;
        }
        Some(Predicate::Comparison {
            field: name.clone(),
            op: compare,
            values,
        })
    }
}

fn check_arity(op: Operator, found: usize, position: Position, errors: &mut Vec<BindError>) -> bool {
    let expected = op.arity();
    if expected.accepts(found) {
        return true;
    }
    errors.push(BindError::WrongArity {
        operator: op,
        expected,
        found,
        position,
    });
    false
}
