use std::fmt;

use serde::Serialize;

/// Comparison operators understood by the filter grammar.
///
/// The first eight form the standard RSQL set. [`IsNull`](Self::IsNull) and
/// [`IsEmpty`](Self::IsEmpty) are custom and must be registered explicitly
/// in the [`OperatorSet`] used for parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Greater than (`=gt=` or `>`)
    GreaterThan,
    /// Greater than or equal (`=ge=` or `>=`)
    GreaterThanOrEqual,
    /// Less than (`=lt=` or `<`)
    LessThan,
    /// Less than or equal (`=le=` or `<=`)
    LessThanOrEqual,
    /// Membership (`=in=`)
    In,
    /// Non-membership (`=out=`)
    NotIn,
    /// Null check (`=isnull=true`, `=isnull=false`)
    IsNull,
    /// Empty-collection check (`=isempty=true`, `=isempty=false`)
    IsEmpty,
}

impl ComparisonOperator {
    /// The standard RSQL operators.
    pub const DEFAULTS: [Self; 8] = [
        Self::Equal,
        Self::NotEqual,
        Self::GreaterThan,
        Self::GreaterThanOrEqual,
        Self::LessThan,
        Self::LessThanOrEqual,
        Self::In,
        Self::NotIn,
    ];

    /// All spellings accepted for this operator. The first one is canonical.
    pub const fn symbols(self) -> &'static [&'static str] {
        match self {
            Self::Equal => &["=="],
            Self::NotEqual => &["!="],
            Self::GreaterThan => &["=gt=", ">"],
            Self::GreaterThanOrEqual => &["=ge=", ">="],
            Self::LessThan => &["=lt=", "<"],
            Self::LessThanOrEqual => &["=le=", "<="],
            Self::In => &["=in="],
            Self::NotIn => &["=out="],
            Self::IsNull => &["=isnull="],
            Self::IsEmpty => &["=isempty="],
        }
    }

    pub const fn symbol(self) -> &'static str {
        self.symbols()[0]
    }

    /// Whether the operator accepts a parenthesized list of arguments.
    pub const fn is_multi_value(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The operators a parser will accept.
///
/// Symbols outside the set are rejected at parse time, so the compiler never
/// sees an operator it was not configured for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorSet {
    operators: Vec<ComparisonOperator>,
}

impl OperatorSet {
    /// The standard RSQL operators.
    pub fn defaults() -> Self {
        OperatorSet {
            operators: ComparisonOperator::DEFAULTS.to_vec(),
        }
    }

    /// Standard operators plus `=isnull=` and `=isempty=`.
    pub fn extended() -> Self {
        Self::defaults()
            .with(ComparisonOperator::IsNull)
            .with(ComparisonOperator::IsEmpty)
    }

    pub fn with(mut self, operator: ComparisonOperator) -> Self {
        if !self.contains(operator) {
            self.operators.push(operator);
        }
        self
    }

    pub fn contains(&self, operator: ComparisonOperator) -> bool {
        self.operators.contains(&operator)
    }

    /// Find the registered operator spelled `symbol`.
    pub fn lookup(&self, symbol: &str) -> Option<ComparisonOperator> {
        self.operators
            .iter()
            .copied()
            .find(|op| op.symbols().contains(&symbol))
    }

    pub fn iter(&self) -> impl Iterator<Item = ComparisonOperator> + '_ {
        self.operators.iter().copied()
    }
}

impl Default for OperatorSet {
    fn default() -> Self {
        Self::defaults()
    }
}
