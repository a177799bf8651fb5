use tracing::{debug, trace};

use crate::{
    ast::{Comparison, ComparisonOperator, Node, OperatorSet},
    coerce::{DateFormat, coerce_arguments},
    config::CompilerConfig,
    error::Error,
    parser,
    path::{self, ResolvedPath},
    predicate::{Filter, Predicate, RangeOp},
    schema::{Schema, ValueType},
    value::Value,
};

/// Compiles filter expressions into [`Filter`]s.
///
/// A compiler is immutable once configured and can be shared between threads;
/// each call resolves paths and coerces arguments from scratch.
///
/// # Examples
///
/// ```
/// use rsql_filter::{Compiler, EntitySchema, ValueType};
///
/// let schema = EntitySchema::new("Person")
///     .basic("name", ValueType::String)
///     .basic("age", ValueType::Integer);
///
/// let compiler = Compiler::new();
/// let filter = compiler.compile("name==jo*;age=in=(30,40)", &schema).unwrap().unwrap();
/// assert_eq!(
///     filter.predicate().to_string(),
///     "(lower(name) like 'jo%' and age in (30, 40))"
/// );
///
/// assert!(compiler.compile("", &schema).unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Compiler {
    date_format: DateFormat,
    operators: OperatorSet,
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler {
            date_format: DateFormat::default(),
            operators: OperatorSet::extended(),
        }
    }
}

/// `*` becomes the `LIKE` wildcard, case is folded
fn like_pattern(text: &str) -> String {
    text.replace('*', "%").to_lowercase()
}

fn equal(path: ResolvedPath, argument: Value) -> Predicate {
    if path.value_type() == ValueType::List {
        return Predicate::JoinedLike {
            pattern: like_pattern(&argument.to_string()),
            path,
        };
    }

    match argument {
        Value::Null => Predicate::IsNull { path },
        Value::Text(text) => Predicate::Like {
            pattern: like_pattern(&text),
            path,
            negated: false,
        },
        Value::Date(_)
        | Value::DateTime(_)
        | Value::Integer(_)
        | Value::Long(_)
        | Value::Byte(_)
        | Value::Boolean(_) => Predicate::Equal {
            path,
            value: argument,
        },
    }
}

fn not_equal(path: ResolvedPath, argument: Value) -> Predicate {
    match argument {
        Value::Null => Predicate::IsNotNull { path },
        Value::Text(text) => Predicate::Like {
            pattern: like_pattern(&text),
            path,
            negated: true,
        },
        Value::Date(_)
        | Value::DateTime(_)
        | Value::Integer(_)
        | Value::Long(_)
        | Value::Byte(_)
        | Value::Boolean(_) => Predicate::NotEqual {
            path,
            value: argument,
        },
    }
}

/// Only dates and date-times compare by value; everything else compares as text.
fn ordered(path: ResolvedPath, op: RangeOp, argument: Value) -> Predicate {
    match argument {
        Value::Date(_) | Value::DateTime(_) => Predicate::Compare {
            path,
            op,
            value: argument,
        },
        Value::Null
        | Value::Text(_)
        | Value::Integer(_)
        | Value::Long(_)
        | Value::Byte(_)
        | Value::Boolean(_) => Predicate::CompareText {
            path,
            op,
            value: argument.to_string(),
        },
    }
}

/// The `true`/`false` argument of `=isnull=` and `=isempty=`
fn control_flag(path: &ResolvedPath, argument: &Value) -> Result<bool, Error> {
    match argument {
        Value::Text(text) if text.eq_ignore_ascii_case("true") => Ok(true),
        Value::Text(text) if text.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(Error::Compilation {
            property: path.property().to_string(),
            reason: format!("expected 'true' or 'false', got '{}'", other),
        }),
    }
}

impl Compiler {
    /// Compiler with the default date format and the extended operator set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &CompilerConfig) -> Result<Self, Error> {
        Ok(Compiler {
            date_format: DateFormat::new(&config.date_format)?,
            ..Self::default()
        })
    }

    /// Change the pattern used by every later date and date-time coercion.
    pub fn set_date_format(&mut self, pattern: &str) -> Result<(), Error> {
        self.date_format = DateFormat::new(pattern)?;
        Ok(())
    }

    pub fn date_format(&self) -> &DateFormat {
        &self.date_format
    }

    /// Operators accepted when parsing: the RSQL defaults plus `=isnull=`
    /// and `=isempty=`.
    pub fn operators(&self) -> &OperatorSet {
        &self.operators
    }

    /// Parse `query` without compiling it.
    pub fn parse(&self, query: &str) -> Result<Node, Error> {
        parser::parse(query, &self.operators).map_err(|e| {
            debug!(query, error = %e, "rejected filter expression");
            Error::Syntax(e)
        })
    }

    /// Compile a filter expression. `None` and `""` mean "no filter".
    pub fn compile<'q>(
        &self,
        query: impl Into<Option<&'q str>>,
        schema: &dyn Schema,
    ) -> Result<Option<Filter>, Error> {
        let query = match query.into() {
            None | Some("") => {
                trace!("no filter expression");
                return Ok(None);
            }
            Some(query) => query,
        };

        debug!(query, entity = schema.entity_name(), "compiling filter expression");
        let node = self.parse(query)?;
        let predicate = self.compile_node(&node, schema).map_err(|e| {
            debug!(query, error = %e, "filter compilation failed");
            e
        })?;
        debug!(%predicate, "compiled filter expression");

        Ok(Some(Filter::new(predicate)))
    }

    /// Like [`compile`](Self::compile), with the result flagged distinct.
    pub fn compile_distinct<'q>(
        &self,
        query: impl Into<Option<&'q str>>,
        schema: &dyn Schema,
    ) -> Result<Option<Filter>, Error> {
        Ok(self.compile(query, schema)?.map(Filter::distinct))
    }

    /// Compile a parsed tree. The first failing leaf aborts the whole tree.
    pub fn compile_node(&self, node: &Node, schema: &dyn Schema) -> Result<Predicate, Error> {
        match node {
            Node::And(children) => children
                .iter()
                .map(|child| self.compile_node(child, schema))
                .collect::<Result<Vec<_>, _>>()
                .map(Predicate::and),
            Node::Or(children) => children
                .iter()
                .map(|child| self.compile_node(child, schema))
                .collect::<Result<Vec<_>, _>>()
                .map(Predicate::or),
            Node::Comparison(comparison) => self.compile_comparison(comparison, schema),
        }
    }

    /// Compile a single comparison leaf.
    pub fn compile_comparison(
        &self,
        comparison: &Comparison,
        schema: &dyn Schema,
    ) -> Result<Predicate, Error> {
        let path = path::resolve(schema, &comparison.selector)?;
        let values = coerce_arguments(
            path.value_type(),
            comparison.operator,
            &comparison.arguments,
            &self.date_format,
        )?;
        let first = values.first().cloned().ok_or_else(|| Error::Compilation {
            property: comparison.selector.clone(),
            reason: format!("operator '{}' needs an argument", comparison.operator),
        })?;

        let predicate = match comparison.operator {
            ComparisonOperator::Equal => equal(path, first),
            ComparisonOperator::NotEqual => not_equal(path, first),
            ComparisonOperator::GreaterThan => ordered(path, RangeOp::Greater, first),
            ComparisonOperator::GreaterThanOrEqual => {
                ordered(path, RangeOp::GreaterOrEqual, first)
            }
            ComparisonOperator::LessThan => ordered(path, RangeOp::Less, first),
            ComparisonOperator::LessThanOrEqual => ordered(path, RangeOp::LessOrEqual, first),
            ComparisonOperator::In => Predicate::In { path, values },
            ComparisonOperator::NotIn => Predicate::not(Predicate::In { path, values }),
            ComparisonOperator::IsNull => {
                if control_flag(&path, &first)? {
                    Predicate::IsNull { path }
                } else {
                    Predicate::IsNotNull { path }
                }
            }
            ComparisonOperator::IsEmpty => {
                if !path.is_collection() {
                    return Err(Error::Compilation {
                        property: comparison.selector.clone(),
                        reason: format!(
                            "'{}' needs a collection, found {}",
                            comparison.operator,
                            path.value_type()
                        ),
                    });
                }
                if control_flag(&path, &first)? {
                    Predicate::IsEmpty { path }
                } else {
                    Predicate::IsNotEmpty { path }
                }
            }
        };

        trace!(comparison = %comparison, %predicate, "compiled comparison");
        Ok(predicate)
    }
}
