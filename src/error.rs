use thiserror::Error;

use crate::{parser::ParseError, schema::ValueType};

/// Everything that can go wrong turning filter text into a [`Filter`](crate::Filter).
///
/// All variants except [`Error::DateFormat`] are faults in the submitted
/// filter and should be reported to the client as bad input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("malformed filter expression: {0}")]
    Syntax(#[from] ParseError),

    #[error("unknown property '{segment}' in '{property}' on {entity}")]
    UnknownProperty {
        property: String,
        segment: String,
        entity: String,
    },

    #[error("cannot convert '{argument}' to {target}: {reason}")]
    Coercion {
        argument: String,
        target: ValueType,
        reason: String,
    },

    #[error("cannot compile condition on '{property}': {reason}")]
    Compilation { property: String, reason: String },

    #[error("invalid date format pattern '{pattern}': {reason}")]
    DateFormat { pattern: String, reason: String },
}

impl Error {
    /// Whether the error was caused by the filter text rather than configuration
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Error::DateFormat { .. })
    }
}
