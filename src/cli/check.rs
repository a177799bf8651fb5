//! Check, compile and apply filter expressions

use serde::Serialize;
use serde_json::Value as Json;
use tracing::debug;

use super::CliError;
use crate::{Compiler, CompilerConfig, EntitySchema, Filter, Join, evaluator};

/// Options shared by `compile` and `filter`
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// The filter expression
    pub query: String,
    /// Entity schema as JSON
    pub schema: String,
    /// Compiler configuration as JSON
    pub config: Option<String>,
    /// Flag the result for duplicate suppression
    pub distinct: bool,
}

/// Options for the filter command
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub compile: CompileOptions,
    /// JSON array of records
    pub input: Option<String>,
}

/// What `rsql compile` prints for a non-empty filter
#[derive(Debug, Serialize)]
pub struct CompileOutput {
    pub sql: String,
    pub distinct: bool,
    pub joins: Vec<Join>,
    pub predicate: crate::Predicate,
}

impl From<&Filter> for CompileOutput {
    fn from(filter: &Filter) -> Self {
        CompileOutput {
            sql: filter.to_string(),
            distinct: filter.is_distinct(),
            joins: filter.joins().into_iter().cloned().collect(),
            predicate: filter.predicate().clone(),
        }
    }
}

/// Parse only
pub fn execute_check(query: &str) -> Result<(), CliError> {
    Compiler::new().parse(query)?;
    Ok(())
}

fn compile(options: &CompileOptions) -> Result<Option<Filter>, CliError> {
    let schema = EntitySchema::from_json(&options.schema)?;
    let compiler = match &options.config {
        Some(config) => Compiler::with_config(&CompilerConfig::from_json(config)?)?,
        None => Compiler::new(),
    };

    let filter = if options.distinct {
        compiler.compile_distinct(options.query.as_str(), &schema)?
    } else {
        compiler.compile(options.query.as_str(), &schema)?
    };
    Ok(filter)
}

/// Compile against a schema; `None` for an empty expression
pub fn execute_compile(options: &CompileOptions) -> Result<Option<CompileOutput>, CliError> {
    Ok(compile(options)?.as_ref().map(CompileOutput::from))
}

/// Compile, then return the matching records
pub fn execute_filter(options: &FilterOptions) -> Result<Json, CliError> {
    let filter = compile(&options.compile)?;

    let input = options.input.as_ref().ok_or(CliError::NoInput)?;
    let records = match serde_json::from_str(input)? {
        Json::Array(records) => records,
        _ => return Err(CliError::NotAnArray),
    };

    let matched = evaluator::filter_records(filter.as_ref(), &records)?;
    debug!(records = records.len(), matched = matched.len(), "filtered input");

    Ok(Json::Array(matched.into_iter().cloned().collect()))
}
