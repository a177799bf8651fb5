//! Conversion of raw argument text into the property's semantic type.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::{ast::ComparisonOperator, error::Error, schema::ValueType, value::Value};

pub const DEFAULT_DATE_FORMAT: &str = "yyyy-MM-dd HH:mm:ss.SSS";

/// Date/time pattern used to read date and date-time arguments.
///
/// Patterns use the familiar `java.time` letters (`yyyy-MM-dd HH:mm:ss.SSS`)
/// and are translated once into a chrono format string. Two-digit years
/// (`yy`) fall in 2000-2099, and a fraction of any width after a `.` reads
/// any number of digits.
///
/// # Examples
///
/// ```
/// use rsql_filter::coerce::DateFormat;
///
/// let format = DateFormat::new("dd/MM/yyyy").unwrap();
/// assert_eq!(format.chrono_format(), "%d/%m/%Y");
///
/// let day = format.parse_date("01/03/2024").unwrap();
/// assert_eq!(day.to_string(), "2024-03-01");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
    chrono: String,
    two_digit_year: bool,
}

impl DateFormat {
    pub fn new(pattern: &str) -> Result<Self, Error> {
        let (chrono, two_digit_year) =
            translate_pattern(pattern).map_err(|reason| Error::DateFormat {
                pattern: pattern.to_string(),
                reason,
            })?;
        Ok(DateFormat {
            pattern: pattern.to_string(),
            chrono,
            two_digit_year,
        })
    }

    /// The pattern as configured
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The equivalent chrono format string
    pub fn chrono_format(&self) -> &str {
        &self.chrono
    }

    pub fn parse_date_time(&self, text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        let parsed = NaiveDateTime::parse_from_str(text, &self.chrono)?;
        Ok(self.century(parsed.date()).and_time(parsed.time()))
    }

    /// Parse with the full pattern and keep only the calendar date.
    pub fn parse_date(&self, text: &str) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(text, &self.chrono).map(|date| self.century(date))
    }

    /// chrono reads `%y` 69-99 as 19xx; `yy` always means 20xx
    fn century(&self, date: NaiveDate) -> NaiveDate {
        if self.two_digit_year && date.year() < 2000 {
            date.with_year(date.year() + 100).unwrap_or(date)
        } else {
            date
        }
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        DateFormat {
            pattern: DEFAULT_DATE_FORMAT.to_string(),
            chrono: "%Y-%m-%d %H:%M:%S.%3f".to_string(),
            two_digit_year: false,
        }
    }
}

fn push_literal(out: &mut String, ch: char) {
    if ch == '%' {
        out.push_str("%%");
    } else {
        out.push(ch);
    }
}

/// Returns the chrono format and whether the year has two digits.
fn translate_pattern(pattern: &str) -> Result<(String, bool), String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    let mut two_digit_year = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if ch == '\'' {
            // '' is an escaped quote, otherwise quoted text is literal
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            let mut j = i + 1;
            loop {
                match chars.get(j) {
                    None => return Err("unterminated quoted literal".to_string()),
                    Some('\'') if chars.get(j + 1) == Some(&'\'') => {
                        out.push('\'');
                        j += 2;
                    }
                    Some('\'') => break,
                    Some(&c) => {
                        push_literal(&mut out, c);
                        j += 1;
                    }
                }
            }
            i = j + 1;
            continue;
        }

        if ch.is_ascii_alphabetic() {
            let run = chars[i..].iter().take_while(|&&c| c == ch).count();
            let field = match (ch, run) {
                ('y' | 'u', 4) => "%Y",
                ('y' | 'u', 2) => {
                    two_digit_year = true;
                    "%y"
                }
                ('M', 1 | 2) => "%m",
                ('M', 3) => "%b",
                ('M', 4) => "%B",
                ('d', 1 | 2) => "%d",
                ('H', 1 | 2) => "%H",
                ('h', 1 | 2) => "%I",
                ('m', 1 | 2) => "%M",
                ('s', 1 | 2) => "%S",
                ('S', 3) => "%3f",
                ('S', 6) => "%6f",
                ('S', 9) => "%9f",
                ('S', _) if out.ends_with('.') => {
                    out.pop();
                    "%.f"
                }
                ('a', 1) => "%p",
                ('E', 3) => "%a",
                ('E', 4) => "%A",
                _ => {
                    return Err(format!(
                        "unsupported field '{}'",
                        ch.to_string().repeat(run)
                    ));
                }
            };
            out.push_str(field);
            i += run;
            continue;
        }

        push_literal(&mut out, ch);
        i += 1;
    }

    Ok((out, two_digit_year))
}

fn coercion_error(argument: &str, target: ValueType, reason: impl ToString) -> Error {
    Error::Coercion {
        argument: argument.to_string(),
        target,
        reason: reason.to_string(),
    }
}

/// Convert one argument to `value_type`.
pub fn coerce(value_type: ValueType, argument: &str, format: &DateFormat) -> Result<Value, Error> {
    match value_type {
        ValueType::Integer => argument
            .parse::<i32>()
            .map(Value::Integer)
            .map_err(|e| coercion_error(argument, value_type, e)),
        ValueType::Long => argument
            .parse::<i64>()
            .map(Value::Long)
            .map_err(|e| coercion_error(argument, value_type, e)),
        ValueType::Byte => argument
            .parse::<i8>()
            .map(Value::Byte)
            .map_err(|e| coercion_error(argument, value_type, e)),
        ValueType::DateTime => format.parse_date_time(argument).map(Value::DateTime).map_err(|e| {
            coercion_error(
                argument,
                value_type,
                format!("{} (expected pattern '{}')", e, format.pattern()),
            )
        }),
        ValueType::Date => format.parse_date(argument).map(Value::Date).map_err(|e| {
            coercion_error(
                argument,
                value_type,
                format!("{} (expected pattern '{}')", e, format.pattern()),
            )
        }),
        // Anything but a case variant of "true" is false, never an error
        ValueType::Boolean => Ok(Value::Boolean(argument.eq_ignore_ascii_case("true"))),
        ValueType::String | ValueType::List | ValueType::Entity | ValueType::Other => {
            Ok(Value::Text(argument.to_string()))
        }
    }
}

/// Convert every argument of a comparison, preserving order.
///
/// The control arguments of `=isnull=` and `=isempty=` (`true`/`false`) are
/// not data and pass through as text.
pub fn coerce_arguments(
    value_type: ValueType,
    operator: ComparisonOperator,
    arguments: &[String],
    format: &DateFormat,
) -> Result<Vec<Value>, Error> {
    if matches!(
        operator,
        ComparisonOperator::IsNull | ComparisonOperator::IsEmpty
    ) {
        return Ok(arguments.iter().cloned().map(Value::Text).collect());
    }

    arguments
        .iter()
        .map(|arg| coerce(value_type, arg, format))
        .collect()
}
