use std::fmt;

use crate::ast::ComparisonOperator;

/// Parsed filter tree.
///
/// Produced once by the [`Parser`](crate::Parser) and read-only afterwards.
/// `And` and `Or` always hold at least two children; a group with a single
/// constraint collapses to that constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// All children must hold
    ///
    /// # Example
    /// ```text
    /// name==john;age>=30
    /// ```
    And(Vec<Node>),

    /// At least one child must hold
    ///
    /// # Example
    /// ```text
    /// status==active,status==pending
    /// ```
    Or(Vec<Node>),

    /// A single `selector operator arguments` clause
    Comparison(Comparison),
}

/// One atomic `selector operator arguments` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Dotted property path, e.g. `dept.manager.name`
    pub selector: String,

    pub operator: ComparisonOperator,

    /// Raw argument text, never empty
    pub arguments: Vec<String>,
}

impl Comparison {
    pub fn new(
        selector: impl Into<String>,
        operator: ComparisonOperator,
        arguments: Vec<String>,
    ) -> Self {
        Comparison {
            selector: selector.into(),
            operator,
            arguments,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::And(children) => write_group(f, children, ";"),
            Node::Or(children) => write_group(f, children, ","),
            Node::Comparison(cmp) => write!(f, "{}", cmp),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.selector, self.operator)?;
        if self.arguments.len() == 1 && !self.operator.is_multi_value() {
            return write_argument(f, &self.arguments[0]);
        }
        f.write_str("(")?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write_argument(f, arg)?;
        }
        f.write_str(")")
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, children: &[Node], separator: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", child)?;
    }
    f.write_str(")")
}

fn write_argument(f: &mut fmt::Formatter<'_>, arg: &str) -> fmt::Result {
    let bare = !arg.is_empty() && arg.chars().all(crate::lexer::is_unreserved);
    if bare {
        f.write_str(arg)
    } else {
        write!(f, "\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
