//! Form values
//!
//! `InputValue` is what an input widget holds while the user edits it.
//! `FieldValue` is the typed, normalized value produced when a field kind
//! parses that input; it is what ends up in a submission payload.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use condo_core::RecordId;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::LazyLock;
use thiserror::Error;

/// Wire format for dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format for times of day
pub const TIME_FORMAT: &str = "%H:%M";

/// Wire format for local date-times, as produced by datetime inputs
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

// ============================================================================
// InputValue
// ============================================================================

/// Raw value held by a form input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    /// Free text, as typed or selected
    Text(String),
    /// Checkbox state
    Flag(bool),
    /// Checked ids of a multi-reference list
    Ids(Vec<RecordId>),
}

impl InputValue {
    /// Create a text input value
    pub fn text(value: impl Into<String>) -> Self {
        InputValue::Text(value.into())
    }

    /// Text content, empty for non-text inputs
    pub fn as_text(&self) -> &str {
        match self {
            InputValue::Text(s) => s,
            _ => "",
        }
    }

    /// Checkbox state, false for non-flag inputs
    pub fn as_flag(&self) -> bool {
        matches!(self, InputValue::Flag(true))
    }

    /// Selected ids, empty for non-list inputs
    pub fn ids(&self) -> &[RecordId] {
        match self {
            InputValue::Ids(ids) => ids,
            _ => &[],
        }
    }

    /// Whether the input counts as empty for a required check.
    ///
    /// Whitespace-only text is blank. A checkbox is never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            InputValue::Text(s) => s.trim().is_empty(),
            InputValue::Flag(_) => false,
            InputValue::Ids(ids) => ids.is_empty(),
        }
    }
}

impl Default for InputValue {
    fn default() -> Self {
        InputValue::Text(String::new())
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::Text(value.to_string())
    }
}

impl From<bool> for InputValue {
    fn from(value: bool) -> Self {
        InputValue::Flag(value)
    }
}

// ============================================================================
// FieldValue
// ============================================================================

/// Typed, normalized value of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Ids(Vec<RecordId>),
}

impl FieldValue {
    /// Check if null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Convert to the JSON representation sent to the API
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(v) => Value::Bool(*v),
            FieldValue::Int(v) => Value::from(*v),
            FieldValue::Float(v) => serde_json::Number::from_f64(*v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Text(v) => Value::String(v.clone()),
            FieldValue::Date(v) => Value::String(v.format(DATE_FORMAT).to_string()),
            FieldValue::Time(v) => Value::String(v.format(TIME_FORMAT).to_string()),
            FieldValue::DateTime(v) => Value::String(v.format(DATETIME_FORMAT).to_string()),
            FieldValue::Ids(ids) => Value::Array(ids.iter().map(|id| Value::from(*id)).collect()),
        }
    }

    /// Order two values of the same temporal or numeric kind.
    ///
    /// Returns `None` when either side is null or the kinds differ.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => Some(a.cmp(b)),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.partial_cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => Some(a.cmp(b)),
            (FieldValue::Time(a), FieldValue::Time(b)) => Some(a.cmp(b)),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

// ============================================================================
// FieldError
// ============================================================================

/// Why a single field's input was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Este campo es obligatorio")]
    Required,

    #[error("Debe ser un número entero")]
    NotAnInteger,

    #[error("Debe ser un número")]
    NotANumber,

    #[error("Fecha inválida")]
    InvalidDate,

    #[error("Hora inválida")]
    InvalidTime,

    #[error("Fecha y hora inválidas")]
    InvalidDateTime,

    #[error("Correo electrónico inválido")]
    InvalidEmail,

    #[error("Opción no válida")]
    InvalidOption,

    /// The widget produced the wrong kind of input for this field
    #[error("Valor no admitido para este campo")]
    Mismatch,

    /// A cross-field rule failed
    #[error("{0}")]
    Rule(String),
}

// ============================================================================
// Parsing helpers
// ============================================================================

/// Parse a date, accepting a trailing time part as sent by some endpoints
pub fn parse_date(input: &str) -> Result<NaiveDate, FieldError> {
    let input = input.trim();
    let head = input.get(..10).unwrap_or(input);
    NaiveDate::parse_from_str(head, DATE_FORMAT).map_err(|_| FieldError::InvalidDate)
}

/// Parse a time of day in `HH:MM` or `HH:MM:SS`
pub fn parse_time(input: &str) -> Result<NaiveTime, FieldError> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
        .map_err(|_| FieldError::InvalidTime)
}

/// Parse a local date-time, with or without seconds, offset or fraction
pub fn parse_datetime(input: &str) -> Result<NaiveDateTime, FieldError> {
    let input = input.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(input) {
        return Ok(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(input, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_err(|_| FieldError::InvalidDateTime)
}

/// Check an email address against a simple `local@domain.tld` shape
pub fn is_valid_email(input: &str) -> bool {
    EMAIL_PATTERN.is_match(input.trim())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_blank_inputs() {
        assert!(InputValue::text("   ").is_blank());
        assert!(InputValue::Ids(vec![]).is_blank());
        assert!(!InputValue::Flag(false).is_blank());
        assert!(!InputValue::text(" a ").is_blank());
    }

    #[test]
    fn test_field_value_json() {
        assert_eq!(FieldValue::Null.to_json(), json!(null));
        assert_eq!(FieldValue::Int(4).to_json(), json!(4));
        assert_eq!(FieldValue::Float(12.5).to_json(), json!(12.5));
        assert_eq!(FieldValue::Ids(vec![1, 3]).to_json(), json!([1, 3]));

        let date = parse_date("2024-03-09").unwrap();
        assert_eq!(FieldValue::Date(date).to_json(), json!("2024-03-09"));

        let time = parse_time("08:30:00").unwrap();
        assert_eq!(FieldValue::Time(time).to_json(), json!("08:30"));
    }

    #[test]
    fn test_parse_temporal() {
        assert!(parse_date("2024-02-30").is_err());
        assert_eq!(
            parse_date("2024-01-05T10:00:00Z").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
        assert_eq!(parse_time("25:00"), Err(FieldError::InvalidTime));

        let dt = parse_datetime("2024-01-05T10:15").unwrap();
        assert_eq!(dt.format(DATETIME_FORMAT).to_string(), "2024-01-05T10:15");
        assert!(parse_datetime("2024-01-05T10:15:00.123456").is_ok());
        assert!(parse_datetime("ayer").is_err());
    }

    #[test]
    fn test_compare_times() {
        let open = FieldValue::Time(parse_time("08:00").unwrap());
        let close = FieldValue::Time(parse_time("18:00").unwrap());
        assert_eq!(open.compare(&close), Some(Ordering::Less));
        assert_eq!(open.compare(&FieldValue::Null), None);
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("ana@condo.bo"));
        assert!(!is_valid_email("ana@condo"));
        assert!(!is_valid_email("ana condo@x.com"));
    }
}
