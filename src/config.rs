use serde::{Deserialize, Serialize};

use crate::coerce::DEFAULT_DATE_FORMAT;

/// Compiler settings.
///
/// Deserializes from JSON; missing fields take their defaults.
///
/// ```
/// use rsql_filter::CompilerConfig;
///
/// let config = CompilerConfig::from_json(r#"{ "date_format": "dd.MM.yyyy" }"#).unwrap();
/// assert_eq!(config.date_format, "dd.MM.yyyy");
///
/// let config = CompilerConfig::from_json("{}").unwrap();
/// assert_eq!(config, CompilerConfig::default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Pattern for date and date-time arguments, `java.time` letters
    pub date_format: String,
}

impl CompilerConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}
