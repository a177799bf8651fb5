//! Compile RSQL/FIQL filter expressions into backend-neutral predicates.
//!
//! ```
//! use rsql_filter::{Compiler, EntitySchema, ValueType};
//!
//! let schema = EntitySchema::new("Person").basic("name", ValueType::String);
//! let filter = Compiler::new().compile("name==jo*", &schema).unwrap().unwrap();
//! assert_eq!(filter.predicate().to_string(), "lower(name) like 'jo%'");
//! ```

pub mod ast;
pub mod coerce;
pub mod compiler;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod path;
pub mod predicate;
pub mod schema;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Comparison, ComparisonOperator, Node, OperatorSet, Token};
pub use coerce::{DEFAULT_DATE_FORMAT, DateFormat};
pub use compiler::Compiler;
pub use config::CompilerConfig;
pub use error::Error;
pub use evaluator::{EvalError, Evaluator, filter_records};
pub use lexer::{LexError, Lexer, Position};
pub use parser::{ParseError, Parser};
pub use path::{Join, ResolvedPath};
pub use predicate::{Filter, Predicate, RangeOp};
pub use schema::{Attribute, AttributeDef, Cardinality, EntitySchema, Schema, ValueType};
pub use value::Value;
