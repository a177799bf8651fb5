use std::{cmp::Ordering, collections::HashMap, iter, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value as Json;
use thiserror::Error;
use tracing::trace;

use crate::{
    path::{Join, ResolvedPath},
    predicate::{Filter, Predicate},
    schema::Cardinality,
    value::Value,
};

/// Errors that can occur while preparing a filter for evaluation.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    #[error("invalid like pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Join aliases bound for one candidate row; `None` is a left-join miss
type Row<'f, 'r> = HashMap<&'f str, Option<&'r Json>>;

/// Runs a compiled [`Filter`] over JSON records.
///
/// Relations are expanded as left outer joins: a to-many relation yields one
/// row per element, so a record can match several times unless the filter is
/// distinct. Comparisons against missing values are *unknown* and never match,
/// as in SQL.
///
/// Stored dates are ISO-8601 strings (`2024-03-01`, `2024-03-01T10:00:00.000`).
///
/// # Examples
///
/// ```
/// use rsql_filter::{Compiler, EntitySchema, Evaluator, ValueType};
/// use serde_json::json;
///
/// let schema = EntitySchema::new("Person").basic("name", ValueType::String);
/// let filter = Compiler::new().compile("name==jo*", &schema).unwrap().unwrap();
///
/// let records = vec![json!({"name": "John"}), json!({"name": "Bob"})];
/// let evaluator = Evaluator::new(&filter).unwrap();
/// assert_eq!(evaluator.apply(&records), vec![&records[0]]);
/// ```
pub struct Evaluator<'f> {
    filter: &'f Filter,
    joins: Vec<&'f Join>,
    patterns: HashMap<&'f str, Regex>,
}

/// Translate a `LIKE` pattern: `%` is any run, `_` any single character.
fn like_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut re = String::from("(?s)^");
    for ch in pattern.chars() {
        match ch {
            '%' => re.push_str(".*"),
            '_' => re.push('.'),
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');
    Regex::new(&re)
}

fn collect_patterns<'f>(
    predicate: &'f Predicate,
    patterns: &mut HashMap<&'f str, Regex>,
) -> Result<(), EvalError> {
    match predicate {
        Predicate::And { operands } | Predicate::Or { operands } => {
            for operand in operands {
                collect_patterns(operand, patterns)?;
            }
        }
        Predicate::Not { operand } => collect_patterns(operand, patterns)?,
        Predicate::Like { pattern, .. } | Predicate::JoinedLike { pattern, .. } => {
            if !patterns.contains_key(pattern.as_str()) {
                let regex = like_regex(pattern).map_err(|source| EvalError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })?;
                patterns.insert(pattern, regex);
            }
        }
        _ => {}
    }
    Ok(())
}

fn walk<'r>(mut value: &'r Json, attributes: &[String]) -> Option<&'r Json> {
    for name in attributes {
        value = value.get(name.as_str())?;
    }
    Some(value)
}

/// Text form used by `LIKE` and lexicographic comparison
fn text_of(json: &Json) -> Option<String> {
    match json {
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        Json::Bool(b) => Some(b.to_string()),
        Json::Null | Json::Array(_) | Json::Object(_) => None,
    }
}

fn json_decimal(json: &Json) -> Option<Decimal> {
    let text = match json {
        Json::Number(n) => n.to_string(),
        Json::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn json_date_time(json: &Json) -> Option<NaiveDateTime> {
    let text = json.as_str()?;
    text.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

fn json_date(json: &Json) -> Option<NaiveDate> {
    let text = json.as_str()?;
    text.parse::<NaiveDate>()
        .ok()
        .or_else(|| json_date_time(json).map(|dt| dt.date()))
}

/// Order a stored value against a coerced argument of the same semantic type.
fn compare(json: &Json, value: &Value) -> Option<Ordering> {
    match value {
        Value::Null => None,
        Value::Integer(_) | Value::Long(_) | Value::Byte(_) => {
            let stored = json_decimal(json)?;
            Some(stored.cmp(&Decimal::from(value.as_i64()?)))
        }
        Value::Boolean(expected) => json.as_bool().map(|stored| stored.cmp(expected)),
        Value::Date(expected) => json_date(json).map(|stored| stored.cmp(expected)),
        Value::DateTime(expected) => json_date_time(json).map(|stored| stored.cmp(expected)),
        Value::Text(expected) => text_of(json).map(|stored| stored.as_str().cmp(expected)),
    }
}

fn is_empty(json: Option<&Json>) -> bool {
    match json {
        None => true,
        Some(Json::Array(items)) => items.is_empty(),
        Some(Json::Object(fields)) => fields.is_empty(),
        Some(_) => false,
    }
}

impl<'f> Evaluator<'f> {
    pub fn new(filter: &'f Filter) -> Result<Self, EvalError> {
        let mut patterns = HashMap::new();
        collect_patterns(filter.predicate(), &mut patterns)?;
        Ok(Evaluator {
            filter,
            joins: filter.joins(),
            patterns,
        })
    }

    /// Candidate rows for `record` after applying every join.
    fn rows<'r>(&self, record: &'r Json) -> Vec<Row<'f, 'r>> {
        let mut rows: Vec<Row<'f, 'r>> = vec![HashMap::new()];

        for &join in &self.joins {
            let mut expanded = Vec::with_capacity(rows.len());
            for row in rows {
                let parent = match &join.parent {
                    None => Some(record),
                    Some(alias) => row.get(alias.as_str()).copied().flatten(),
                };
                let related = parent
                    .and_then(|p| walk(p, &join.attributes))
                    .filter(|v| !v.is_null());

                match related {
                    Some(Json::Array(items)) if join.cardinality == Cardinality::ToMany => {
                        if items.is_empty() {
                            let mut row = row;
                            row.insert(join.alias.as_str(), None);
                            expanded.push(row);
                        } else {
                            for item in items {
                                let mut bound = row.clone();
                                bound.insert(join.alias.as_str(), Some(item));
                                expanded.push(bound);
                            }
                        }
                    }
                    other => {
                        let mut row = row;
                        row.insert(join.alias.as_str(), other);
                        expanded.push(row);
                    }
                }
            }
            rows = expanded;
        }

        rows
    }

    /// The property value on this row, `None` when null or missing
    fn lookup<'r>(
        &self,
        path: &ResolvedPath,
        record: &'r Json,
        row: &Row<'f, 'r>,
    ) -> Option<&'r Json> {
        let source = match path.source() {
            None => record,
            Some(alias) => row.get(alias).copied().flatten()?,
        };
        walk(source, path.accessor()).filter(|v| !v.is_null())
    }

    fn like(&self, pattern: &str, text: &str) -> Option<bool> {
        self.patterns
            .get(pattern)
            .map(|regex| regex.is_match(&text.to_lowercase()))
    }

    /// Three-valued evaluation; `None` is SQL's unknown
    fn eval<'r>(
        &self,
        predicate: &Predicate,
        record: &'r Json,
        row: &Row<'f, 'r>,
    ) -> Option<bool> {
        match predicate {
            Predicate::And { operands } => {
                let mut result = Some(true);
                for operand in operands {
                    match self.eval(operand, record, row) {
                        Some(false) => return Some(false),
                        None => result = None,
                        Some(true) => {}
                    }
                }
                result
            }
            Predicate::Or { operands } => {
                let mut result = Some(false);
                for operand in operands {
                    match self.eval(operand, record, row) {
                        Some(true) => return Some(true),
                        None => result = None,
                        Some(false) => {}
                    }
                }
                result
            }
            Predicate::Not { operand } => self.eval(operand, record, row).map(|b| !b),
            Predicate::IsNull { path } => Some(self.lookup(path, record, row).is_none()),
            Predicate::IsNotNull { path } => Some(self.lookup(path, record, row).is_some()),
            Predicate::IsEmpty { path } => Some(is_empty(self.lookup(path, record, row))),
            Predicate::IsNotEmpty { path } => Some(!is_empty(self.lookup(path, record, row))),
            Predicate::Equal { path, value } => {
                let stored = self.lookup(path, record, row)?;
                compare(stored, value).map(|o| o == Ordering::Equal)
            }
            Predicate::NotEqual { path, value } => {
                let stored = self.lookup(path, record, row)?;
                compare(stored, value).map(|o| o != Ordering::Equal)
            }
            Predicate::Like {
                path,
                pattern,
                negated,
            } => {
                let text = text_of(self.lookup(path, record, row)?)?;
                self.like(pattern, &text).map(|m| m != *negated)
            }
            Predicate::JoinedLike { path, pattern } => {
                let joined = match self.lookup(path, record, row)? {
                    Json::Array(items) => items.iter().filter_map(text_of).collect::<String>(),
                    other => text_of(other)?,
                };
                self.like(pattern, &joined)
            }
            Predicate::Compare { path, op, value } => {
                let stored = self.lookup(path, record, row)?;
                compare(stored, value).map(|o| op.test(o))
            }
            Predicate::CompareText { path, op, value } => {
                let stored = text_of(self.lookup(path, record, row)?)?;
                Some(op.test(stored.as_str().cmp(value.as_str())))
            }
            Predicate::In { path, values } => {
                let stored = self.lookup(path, record, row)?;
                let mut unknown = false;
                for value in values {
                    match compare(stored, value) {
                        Some(Ordering::Equal) => return Some(true),
                        None => unknown = true,
                        Some(_) => {}
                    }
                }
                if unknown { None } else { Some(false) }
            }
        }
    }

    /// Number of joined rows of `record` the predicate holds for.
    pub fn matching_rows(&self, record: &Json) -> usize {
        self.rows(record)
            .iter()
            .filter(|row| self.eval(self.filter.predicate(), record, row) == Some(true))
            .count()
    }

    pub fn matches(&self, record: &Json) -> bool {
        self.matching_rows(record) > 0
    }

    /// Matching records, once per matching row, or once each when distinct.
    pub fn apply<'r>(&self, records: &'r [Json]) -> Vec<&'r Json> {
        let mut result = Vec::new();
        for record in records {
            let rows = self.matching_rows(record);
            let copies = if self.filter.is_distinct() {
                rows.min(1)
            } else {
                rows
            };
            result.extend(iter::repeat_n(record, copies));
        }

        trace!(
            records = records.len(),
            matched = result.len(),
            distinct = self.filter.is_distinct(),
            "applied filter"
        );
        result
    }
}

/// Apply an optional filter; no filter keeps every record.
pub fn filter_records<'r>(
    filter: Option<&Filter>,
    records: &'r [Json],
) -> Result<Vec<&'r Json>, EvalError> {
    match filter {
        None => Ok(records.iter().collect()),
        Some(filter) => Ok(Evaluator::new(filter)?.apply(records)),
    }
}
