use std::fmt;

/// The closed set of operators a query may call.
///
/// Names are matched case-sensitively against [`Operator::from_name`]'s
/// table; anything else in operator position is an unknown operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `eq(field, value)`
    Eq,
    /// `ne(field, value)`
    Ne,
    /// `gt(field, value)`
    Gt,
    /// `gte(field, value)`
    Gte,
    /// `lt(field, value)`
    Lt,
    /// `lte(field, value)`
    Lte,
    /// `like(field, pattern)`
    Like,
    /// `in(field, value, ...)`
    In,
    /// `isNull(field)`
    IsNull,
    /// `isNotNull(field)`
    IsNotNull,
    /// `and(predicate, ...)`
    And,
    /// `or(predicate, ...)`
    Or,
    /// `not(predicate)`
    Not,
}

const OPERATOR_NAMES: &[(&str, Operator)] = &[
    ("eq", Operator::Eq),
    ("ne", Operator::Ne),
    ("gt", Operator::Gt),
    ("gte", Operator::Gte),
    ("lt", Operator::Lt),
    ("lte", Operator::Lte),
    ("like", Operator::Like),
    ("in", Operator::In),
    ("isNull", Operator::IsNull),
    ("isNotNull", Operator::IsNotNull),
    ("and", Operator::And),
    ("or", Operator::Or),
    ("not", Operator::Not),
];

impl Operator {
    /// Every operator, in vocabulary order.
    pub const ALL: [Operator; 13] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Like,
        Operator::In,
        Operator::IsNull,
        Operator::IsNotNull,
        Operator::And,
        Operator::Or,
        Operator::Not,
    ];

    /// Look up an operator by its exact (case-sensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        OPERATOR_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, op)| *op)
    }

    /// Whether `name` is reserved, i.e. lexes as something other than an
    /// identifier and so can never name a field.
    pub fn is_reserved_word(name: &str) -> bool {
        matches!(name, "true" | "false" | "null") || Operator::from_name(name).is_some()
    }

    /// The name as written in queries.
    pub fn name(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Like => "like",
            Operator::In => "in",
            Operator::IsNull => "isNull",
            Operator::IsNotNull => "isNotNull",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
        }
    }

    /// Number of arguments the operator takes, field reference included.
    pub fn arity(self) -> Arity {
        match self {
            Operator::Eq
            | Operator::Ne
            | Operator::Gt
            | Operator::Gte
            | Operator::Lt
            | Operator::Lte
            | Operator::Like => Arity::Exactly(2),
            Operator::In => Arity::AtLeast(2),
            Operator::IsNull | Operator::IsNotNull | Operator::Not => Arity::Exactly(1),
            Operator::And | Operator::Or => Arity::AtLeast(1),
        }
    }

    pub fn kind(self) -> OperatorKind {
        match self {
            Operator::Eq => OperatorKind::Comparison(CompareOp::Eq),
            Operator::Ne => OperatorKind::Comparison(CompareOp::Ne),
            Operator::Gt => OperatorKind::Comparison(CompareOp::Gt),
            Operator::Gte => OperatorKind::Comparison(CompareOp::Gte),
            Operator::Lt => OperatorKind::Comparison(CompareOp::Lt),
            Operator::Lte => OperatorKind::Comparison(CompareOp::Lte),
            Operator::Like => OperatorKind::Comparison(CompareOp::Like),
            Operator::In => OperatorKind::Comparison(CompareOp::In),
            Operator::IsNull => OperatorKind::Comparison(CompareOp::IsNull),
            Operator::IsNotNull => OperatorKind::Comparison(CompareOp::IsNotNull),
            Operator::And => OperatorKind::Logical(LogicalOp::And),
            Operator::Or => OperatorKind::Logical(LogicalOp::Or),
            Operator::Not => OperatorKind::Logical(LogicalOp::Not),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether an operator compares a field or combines predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Comparison(CompareOp),
    Logical(LogicalOp),
}

/// Argument count accepted by an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (qualifier, n) = match self {
            Arity::Exactly(n) => ("exactly", *n),
            Arity::AtLeast(n) => ("at least", *n),
        };
        let noun = if n == 1 { "argument" } else { "arguments" };
        write!(f, "{qualifier} {n} {noun}")
    }
}

/// Field comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Equal (`eq`)
    Eq,
    /// Not equal (`ne`)
    Ne,
    /// Greater than (`gt`)
    Gt,
    /// Greater than or equal (`gte`)
    Gte,
    /// Less than (`lt`)
    Lt,
    /// Less than or equal (`lte`)
    Lte,
    /// SQL-style pattern match (`like`)
    Like,
    /// Membership in a list of values (`in`)
    In,
    /// Field is null (`isNull`)
    IsNull,
    /// Field is not null (`isNotNull`)
    IsNotNull,
}

impl CompareOp {
    pub fn operator(self) -> Operator {
        match self {
            CompareOp::Eq => Operator::Eq,
            CompareOp::Ne => Operator::Ne,
            CompareOp::Gt => Operator::Gt,
            CompareOp::Gte => Operator::Gte,
            CompareOp::Lt => Operator::Lt,
            CompareOp::Lte => Operator::Lte,
            CompareOp::Like => Operator::Like,
            CompareOp::In => Operator::In,
            CompareOp::IsNull => Operator::IsNull,
            CompareOp::IsNotNull => Operator::IsNotNull,
        }
    }

    /// `null` is only meaningful as an equality or membership operand.
    pub fn accepts_null(self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Ne | CompareOp::In)
    }
}

/// Predicate combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    /// All children hold (`and`)
    And,
    /// Any child holds (`or`)
    Or,
    /// The single child does not hold (`not`)
    Not,
}

impl LogicalOp {
    pub fn operator(self) -> Operator {
        match self {
            LogicalOp::And => Operator::And,
            LogicalOp::Or => Operator::Or,
            LogicalOp::Not => Operator::Not,
        }
    }
}
