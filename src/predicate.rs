//! Backend-neutral predicates produced by the compiler.
//!
//! A [`Predicate`] says *what* must hold for an entity; it is up to the
//! caller's execution layer to turn it into SQL, an index lookup or an
//! in-memory check such as [`Evaluator`](crate::Evaluator). `Display` renders
//! an SQL-like text form for logs and the CLI.

use std::{cmp, collections::BTreeMap, fmt};

use serde::Serialize;

use crate::{
    path::{Join, ResolvedPath},
    value::Value,
};

/// Ordered comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeOp {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl RangeOp {
    pub fn symbol(self) -> &'static str {
        match self {
            RangeOp::Greater => ">",
            RangeOp::GreaterOrEqual => ">=",
            RangeOp::Less => "<",
            RangeOp::LessOrEqual => "<=",
        }
    }

    /// Whether `ordering` (property compared to argument) satisfies the operator
    pub fn test(self, ordering: cmp::Ordering) -> bool {
        match self {
            RangeOp::Greater => ordering == cmp::Ordering::Greater,
            RangeOp::GreaterOrEqual => ordering != cmp::Ordering::Less,
            RangeOp::Less => ordering == cmp::Ordering::Less,
            RangeOp::LessOrEqual => ordering != cmp::Ordering::Greater,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    And {
        operands: Vec<Predicate>,
    },
    Or {
        operands: Vec<Predicate>,
    },
    Not {
        operand: Box<Predicate>,
    },
    IsNull {
        path: ResolvedPath,
    },
    IsNotNull {
        path: ResolvedPath,
    },
    IsEmpty {
        path: ResolvedPath,
    },
    IsNotEmpty {
        path: ResolvedPath,
    },
    Equal {
        path: ResolvedPath,
        value: Value,
    },
    NotEqual {
        path: ResolvedPath,
        value: Value,
    },
    /// `lower(path) like pattern`; the pattern is already lower-cased and
    /// uses `%` for any run of characters
    Like {
        path: ResolvedPath,
        pattern: String,
        negated: bool,
    },
    /// Collection elements concatenated without delimiter, lower-cased,
    /// matched like [`Predicate::Like`]
    JoinedLike {
        path: ResolvedPath,
        pattern: String,
    },
    /// Typed ordered comparison
    Compare {
        path: ResolvedPath,
        #[serde(rename = "comparison")]
        op: RangeOp,
        value: Value,
    },
    /// Ordered comparison of both sides as text
    CompareText {
        path: ResolvedPath,
        #[serde(rename = "comparison")]
        op: RangeOp,
        value: String,
    },
    In {
        path: ResolvedPath,
        values: Vec<Value>,
    },
}

impl Predicate {
    pub fn and(operands: Vec<Predicate>) -> Self {
        Predicate::And { operands }
    }

    pub fn or(operands: Vec<Predicate>) -> Self {
        Predicate::Or { operands }
    }

    pub fn not(operand: Predicate) -> Self {
        Predicate::Not {
            operand: Box::new(operand),
        }
    }

    /// Every property path the predicate reads, in tree order
    pub fn paths(&self) -> Vec<&ResolvedPath> {
        let mut paths = Vec::new();
        self.collect_paths(&mut paths);
        paths
    }

    fn collect_paths<'a>(&'a self, out: &mut Vec<&'a ResolvedPath>) {
        match self {
            Predicate::And { operands } | Predicate::Or { operands } => {
                for operand in operands {
                    operand.collect_paths(out);
                }
            }
            Predicate::Not { operand } => operand.collect_paths(out),
            Predicate::IsNull { path }
            | Predicate::IsNotNull { path }
            | Predicate::IsEmpty { path }
            | Predicate::IsNotEmpty { path }
            | Predicate::Equal { path, .. }
            | Predicate::NotEqual { path, .. }
            | Predicate::Like { path, .. }
            | Predicate::JoinedLike { path, .. }
            | Predicate::Compare { path, .. }
            | Predicate::CompareText { path, .. }
            | Predicate::In { path, .. } => out.push(path),
        }
    }

    /// Distinct joins the predicate needs, parents before children
    pub fn joins(&self) -> Vec<&Join> {
        let mut by_alias = BTreeMap::new();
        for path in self.paths() {
            for join in path.joins() {
                by_alias.entry(join.alias.as_str()).or_insert(join);
            }
        }
        let mut joins: Vec<&Join> = by_alias.into_values().collect();
        joins.sort_by(|a, b| a.depth().cmp(&b.depth()).then_with(|| a.alias.cmp(&b.alias)));
        joins
    }
}

fn write_literal(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Integer(_) | Value::Long(_) | Value::Byte(_) | Value::Boolean(_) => {
            write!(f, "{}", value)
        }
        Value::Date(_) | Value::DateTime(_) | Value::Text(_) => write_text(f, &value.to_string()),
    }
}

fn write_text(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write!(f, "'{}'", text.replace('\'', "''"))
}

fn write_joined(f: &mut fmt::Formatter<'_>, operands: &[Predicate], separator: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", separator)?;
        }
        write!(f, "{}", operand)?;
    }
    f.write_str(")")
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::And { operands } => write_joined(f, operands, "and"),
            Predicate::Or { operands } => write_joined(f, operands, "or"),
            Predicate::Not { operand } => write!(f, "not {}", operand),
            Predicate::IsNull { path } => write!(f, "{} is null", path),
            Predicate::IsNotNull { path } => write!(f, "{} is not null", path),
            Predicate::IsEmpty { path } => write!(f, "{} is empty", path),
            Predicate::IsNotEmpty { path } => write!(f, "{} is not empty", path),
            Predicate::Equal { path, value } => {
                write!(f, "{} = ", path)?;
                write_literal(f, value)
            }
            Predicate::NotEqual { path, value } => {
                write!(f, "{} <> ", path)?;
                write_literal(f, value)
            }
            Predicate::Like {
                path,
                pattern,
                negated,
            } => {
                let op = if *negated { "not like" } else { "like" };
                write!(f, "lower({}) {} ", path, op)?;
                write_text(f, pattern)
            }
            Predicate::JoinedLike { path, pattern } => {
                write!(f, "lower(array_to_string({}, '')) like ", path)?;
                write_text(f, pattern)
            }
            Predicate::Compare { path, op, value } => {
                write!(f, "{} {} ", path, op.symbol())?;
                write_literal(f, value)
            }
            Predicate::CompareText { path, op, value } => {
                write!(f, "{} {} ", path, op.symbol())?;
                write_text(f, value)
            }
            Predicate::In { path, values } => {
                write!(f, "{} in (", path)?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_literal(f, value)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// A compiled filter: the predicate plus query-level flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    predicate: Predicate,
    distinct: bool,
}

impl Filter {
    pub fn new(predicate: Predicate) -> Self {
        Filter {
            predicate,
            distinct: false,
        }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Whether the enclosing query must suppress duplicate rows
    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Same predicate, flagged for duplicate-row suppression.
    pub fn distinct(self) -> Self {
        Filter {
            distinct: true,
            ..self
        }
    }

    pub fn joins(&self) -> Vec<&Join> {
        self.predicate.joins()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("select ")?;
        if self.distinct {
            f.write_str("distinct ")?;
        }
        f.write_str("root from root")?;
        for join in self.joins() {
            write!(f, " {}", join)?;
        }
        write!(f, " where {}", self.predicate)
    }
}
