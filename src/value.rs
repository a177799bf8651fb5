use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A filter argument after coercion to its property's semantic type.
///
/// Operators pick their predicate shape by matching on the variant, so every
/// type/operator combination is spelled out in the compiler.
///
/// # Examples
///
/// ```
/// use rsql_filter::Value;
/// use chrono::NaiveDate;
///
/// let age = Value::Integer(42);
/// let name = Value::Text("jo*n".to_string());
/// let day = Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
///
/// assert_eq!(age.to_string(), "42");
/// assert_eq!(day.to_string(), "2024-03-01");
/// assert_eq!(name.to_string(), "jo*n");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,

    /// 32-bit integer
    Integer(i32),

    /// 64-bit integer
    Long(i64),

    /// 8-bit integer
    Byte(i8),

    Boolean(bool),

    Date(NaiveDate),

    DateTime(NaiveDateTime),

    /// Uncoerced text, wildcards still in place
    Text(String),
}

impl Value {
    /// Integer variants widened to `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            Value::Byte(n) => Some(i64::from(*n)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Byte(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3f")),
            Value::Text(s) => f.write_str(s),
        }
    }
}
