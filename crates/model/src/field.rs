//! Field definitions for entity forms
//!
//! A `FieldSchema` declares one writable property of an entity: how it is
//! labelled, which widget edits it, whether it is required, how its initial
//! value is read from an existing record and how its input is parsed into the
//! submitted payload.

use crate::path::lookup;
use crate::value::{
    DATETIME_FORMAT, FieldError, FieldValue, InputValue, is_valid_email, parse_date,
    parse_datetime, parse_time,
};
use condo_core::{Record, RecordId};
use serde_json::Value;

// ============================================================================
// SelectOption
// ============================================================================

/// One choice of a select field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    /// Create an option with a distinct label
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Build options whose label equals their value
    pub fn list(values: &[&str]) -> Vec<SelectOption> {
        values.iter().map(|v| SelectOption::new(*v, *v)).collect()
    }
}

// ============================================================================
// FieldKind
// ============================================================================

/// Widget and value type of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    TextArea,
    Email,
    Password,
    Integer,
    Decimal,
    Date,
    Time,
    DateTime,
    Flag,
    /// Fixed set of choices
    Select(Vec<SelectOption>),
    /// Single id picked from a named reference collection
    Reference { source: String },
    /// Set of ids checked from a named reference collection
    MultiReference { source: String },
}

impl FieldKind {
    /// Parse raw input into a normalized value.
    ///
    /// Text is trimmed. Blank numeric, temporal and reference inputs become
    /// `Null`. Required-ness is checked by the caller, not here.
    pub fn parse(&self, input: &InputValue) -> Result<FieldValue, FieldError> {
        match self {
            FieldKind::Flag => match input {
                InputValue::Flag(b) => Ok(FieldValue::Bool(*b)),
                _ => Err(FieldError::Mismatch),
            },
            FieldKind::MultiReference { .. } => match input {
                InputValue::Ids(ids) => Ok(FieldValue::Ids(ids.clone())),
                InputValue::Text(s) if s.trim().is_empty() => Ok(FieldValue::Ids(Vec::new())),
                _ => Err(FieldError::Mismatch),
            },
            _ => {
                let InputValue::Text(raw) = input else {
                    return Err(FieldError::Mismatch);
                };
                self.parse_text(raw.trim())
            }
        }
    }

    fn parse_text(&self, text: &str) -> Result<FieldValue, FieldError> {
        let blank = text.is_empty();
        match self {
            FieldKind::Text | FieldKind::TextArea | FieldKind::Password => {
                Ok(FieldValue::Text(text.to_string()))
            }
            FieldKind::Email if blank => Ok(FieldValue::Text(String::new())),
            FieldKind::Email if is_valid_email(text) => Ok(FieldValue::Text(text.to_string())),
            FieldKind::Email => Err(FieldError::InvalidEmail),
            FieldKind::Select(options) => {
                if blank || options.iter().any(|o| o.value == text) {
                    Ok(FieldValue::Text(text.to_string()))
                } else {
                    Err(FieldError::InvalidOption)
                }
            }
            _ if blank => Ok(FieldValue::Null),
            FieldKind::Integer => text
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| FieldError::NotAnInteger),
            FieldKind::Reference { .. } => text
                .parse::<RecordId>()
                .map(FieldValue::Int)
                .map_err(|_| FieldError::InvalidOption),
            FieldKind::Decimal => text
                .replace(',', ".")
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(FieldValue::Float)
                .ok_or(FieldError::NotANumber),
            FieldKind::Date => parse_date(text).map(FieldValue::Date),
            FieldKind::Time => parse_time(text).map(FieldValue::Time),
            FieldKind::DateTime => parse_datetime(text).map(FieldValue::DateTime),
            FieldKind::Flag | FieldKind::MultiReference { .. } => Err(FieldError::Mismatch),
        }
    }

    /// Input held by a fresh, empty widget of this kind
    pub fn empty_input(&self) -> InputValue {
        match self {
            FieldKind::Flag => InputValue::Flag(false),
            FieldKind::MultiReference { .. } => InputValue::Ids(Vec::new()),
            _ => InputValue::default(),
        }
    }

    /// Convert a stored JSON value into widget input
    pub fn input_from_json(&self, value: &Value) -> InputValue {
        match self {
            FieldKind::Flag => InputValue::Flag(match value {
                Value::Bool(b) => *b,
                Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
                Value::String(s) => matches!(s.as_str(), "true" | "1"),
                _ => false,
            }),
            FieldKind::MultiReference { .. } => {
                let ids = value
                    .as_array()
                    .map(|items| items.iter().filter_map(json_id).collect())
                    .unwrap_or_default();
                InputValue::Ids(ids)
            }
            _ => {
                let text = match value {
                    Value::Null => String::new(),
                    Value::String(s) => s.clone(),
                    Value::Object(_) => json_id(value).map(|id| id.to_string()).unwrap_or_default(),
                    other => other.to_string(),
                };
                InputValue::Text(self.trim_for_widget(text))
            }
        }
    }

    /// Shorten stored temporal text to what the matching widget accepts
    fn trim_for_widget(&self, text: String) -> String {
        match self {
            FieldKind::Date => text.get(..10).map(str::to_string).unwrap_or(text),
            FieldKind::Time => text.get(..5).map(str::to_string).unwrap_or(text),
            FieldKind::DateTime => match parse_datetime(&text) {
                Ok(dt) => dt.format(DATETIME_FORMAT).to_string(),
                Err(_) => text,
            },
            _ => text,
        }
    }

    /// HTML input type used to edit this kind
    pub fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::TextArea => "text",
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Integer | FieldKind::Decimal => "number",
            FieldKind::Date => "date",
            FieldKind::Time => "time",
            FieldKind::DateTime => "datetime-local",
            FieldKind::Flag | FieldKind::MultiReference { .. } => "checkbox",
            FieldKind::Select(_) | FieldKind::Reference { .. } => "select",
        }
    }

    /// Name of the reference collection this kind draws options from
    pub fn reference_source(&self) -> Option<&str> {
        match self {
            FieldKind::Reference { source } | FieldKind::MultiReference { source } => {
                Some(source)
            }
            _ => None,
        }
    }
}

/// Id of a JSON number, numeric string or object carrying an `id`
fn json_id(value: &Value) -> Option<RecordId> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(obj) => obj.get("id").and_then(json_id),
        _ => None,
    }
}

// ============================================================================
// Requirement
// ============================================================================

/// When a field must be filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Requirement {
    #[default]
    Optional,
    Always,
    /// Required when creating, optional when editing (passwords)
    OnCreate,
}

impl Requirement {
    /// Whether the field is required in the given mode
    pub fn applies(&self, editing: bool) -> bool {
        match self {
            Requirement::Optional => false,
            Requirement::Always => true,
            Requirement::OnCreate => !editing,
        }
    }
}

// ============================================================================
// FieldSchema
// ============================================================================

/// A writable field of an entity form
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Form key, also the default record path and payload key
    pub name: String,

    /// Label shown beside the input
    pub label: String,

    /// Widget and value type
    pub kind: FieldKind,

    /// When the field must be filled in
    pub requirement: Requirement,

    /// Input used in create mode and when a record lacks the value
    pub default: Option<InputValue>,

    /// Payload key when it differs from `name`
    pub payload_key: Option<String>,

    /// Record paths read for the initial value, first non-null wins
    pub initial_paths: Vec<String>,

    /// Leave the field out of edit payloads while blank
    pub omit_blank_on_edit: bool,

    /// Emit the value beside the payload instead of inside it
    pub detached: bool,

    /// Placeholder text
    pub placeholder: Option<String>,

    /// Fields reset when this one receives a non-blank value
    pub clears: Vec<String>,
}

impl FieldSchema {
    /// Create a new optional field
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            requirement: Requirement::Optional,
            default: None,
            payload_key: None,
            initial_paths: Vec::new(),
            omit_blank_on_edit: false,
            detached: false,
            placeholder: None,
            clears: Vec::new(),
        }
    }

    /// Single-line text field
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    /// Multi-line text field
    pub fn textarea(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::TextArea)
    }

    /// Email field
    pub fn email(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    /// Password field
    pub fn password(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Password)
    }

    /// Integer field
    pub fn integer(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Integer)
    }

    /// Decimal field
    pub fn decimal(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Decimal)
    }

    /// Date field
    pub fn date(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    /// Time-of-day field
    pub fn time(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Time)
    }

    /// Local date-time field
    pub fn datetime(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::DateTime)
    }

    /// Checkbox field
    pub fn flag(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Flag)
    }

    /// Select with fixed options whose labels equal their values
    pub fn select(name: impl Into<String>, label: impl Into<String>, values: &[&str]) -> Self {
        Self::new(name, label, FieldKind::Select(SelectOption::list(values)))
    }

    /// Select with labelled options
    pub fn select_labelled(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(name, label, FieldKind::Select(options))
    }

    /// Single reference picked from a reference collection
    pub fn reference(
        name: impl Into<String>,
        label: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Reference {
                source: source.into(),
            },
        )
    }

    /// Checkbox list over a reference collection
    pub fn multi_reference(
        name: impl Into<String>,
        label: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            label,
            FieldKind::MultiReference {
                source: source.into(),
            },
        )
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Mark the field as always required
    pub fn required(mut self) -> Self {
        self.requirement = Requirement::Always;
        self
    }

    /// Require the field only when creating
    pub fn required_on_create(mut self) -> Self {
        self.requirement = Requirement::OnCreate;
        self
    }

    /// Set the default input
    pub fn with_default(mut self, default: impl Into<InputValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Send the value under a different payload key
    pub fn with_payload_key(mut self, key: impl Into<String>) -> Self {
        self.payload_key = Some(key.into());
        self
    }

    /// Add a record path to read the initial value from
    pub fn initial_from(mut self, path: impl Into<String>) -> Self {
        self.initial_paths.push(path.into());
        self
    }

    /// Drop the field from edit payloads while it is blank
    pub fn omit_blank_on_edit(mut self) -> Self {
        self.omit_blank_on_edit = true;
        self
    }

    /// Emit the value beside the payload
    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }

    /// Set the placeholder text
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Reset another field whenever this one is filled in
    pub fn clears(mut self, other: impl Into<String>) -> Self {
        self.clears.push(other.into());
        self
    }

    // ========================================================================
    // Utility methods
    // ========================================================================

    /// Key used in the submitted payload
    pub fn payload_key(&self) -> &str {
        self.payload_key.as_deref().unwrap_or(&self.name)
    }

    /// Whether the field is required in the given mode
    pub fn is_required(&self, editing: bool) -> bool {
        self.requirement.applies(editing)
    }

    /// Input for a fresh create form
    pub fn create_input(&self) -> InputValue {
        self.default
            .clone()
            .unwrap_or_else(|| self.kind.empty_input())
    }

    /// Input initialized from an existing record
    pub fn input_for_record(&self, record: &Record) -> InputValue {
        let found = if self.initial_paths.is_empty() {
            lookup(record, &self.name)
        } else {
            self.initial_paths.iter().find_map(|path| lookup(record, path))
        };
        match found {
            Some(value) => self.kind.input_from_json(&value),
            None => self.create_input(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_numbers() {
        let int = FieldKind::Integer;
        assert_eq!(int.parse(&" 12 ".into()), Ok(FieldValue::Int(12)));
        assert_eq!(int.parse(&"".into()), Ok(FieldValue::Null));
        assert_eq!(int.parse(&"doce".into()), Err(FieldError::NotAnInteger));

        let dec = FieldKind::Decimal;
        assert_eq!(dec.parse(&"12,50".into()), Ok(FieldValue::Float(12.5)));
        assert_eq!(dec.parse(&"NaN".into()), Err(FieldError::NotANumber));
    }

    #[test]
    fn test_parse_text_trims() {
        assert_eq!(
            FieldKind::Text.parse(&"  Bloque A ".into()),
            Ok(FieldValue::Text("Bloque A".to_string()))
        );
        assert_eq!(
            FieldKind::Email.parse(&"x@".into()),
            Err(FieldError::InvalidEmail)
        );
    }

    #[test]
    fn test_parse_select_and_reference() {
        let sexo = FieldKind::Select(SelectOption::list(&["M", "F"]));
        assert_eq!(sexo.parse(&"F".into()), Ok(FieldValue::Text("F".into())));
        assert_eq!(sexo.parse(&"X".into()), Err(FieldError::InvalidOption));

        let residente = FieldKind::Reference {
            source: "residentes".into(),
        };
        assert_eq!(residente.parse(&"7".into()), Ok(FieldValue::Int(7)));
        assert_eq!(residente.parse(&"".into()), Ok(FieldValue::Null));
    }

    #[test]
    fn test_parse_rejects_mismatched_input() {
        assert_eq!(
            FieldKind::Flag.parse(&"true".into()),
            Err(FieldError::Mismatch)
        );
        assert_eq!(
            FieldKind::Text.parse(&InputValue::Flag(true)),
            Err(FieldError::Mismatch)
        );
    }

    #[test]
    fn test_input_from_json() {
        assert_eq!(
            FieldKind::Time.input_from_json(&json!("08:00:00")),
            InputValue::text("08:00")
        );
        assert_eq!(
            FieldKind::Date.input_from_json(&json!("1990-05-01")),
            InputValue::text("1990-05-01")
        );
        assert_eq!(
            FieldKind::DateTime.input_from_json(&json!("2024-01-05T10:15:00Z")),
            InputValue::text("2024-01-05T10:15")
        );
        assert_eq!(
            FieldKind::Integer.input_from_json(&json!(3)),
            InputValue::text("3")
        );
        let multi = FieldKind::MultiReference {
            source: "areas".into(),
        };
        assert_eq!(
            multi.input_from_json(&json!([{"id": 2}, 5, "9"])),
            InputValue::Ids(vec![2, 5, 9])
        );
    }

    #[test]
    fn test_input_for_record_with_paths_and_defaults() {
        let rol = FieldSchema::reference("rol_id", "Rol", "roles")
            .initial_from("rol.id")
            .with_payload_key("rol_id");
        let r = record(json!({"rol": {"id": 3, "nombre": "ADMIN"}}));
        assert_eq!(rol.input_for_record(&r), InputValue::text("3"));

        let activo = FieldSchema::flag("activo", "Activo").with_default(true);
        assert_eq!(activo.input_for_record(&r), InputValue::Flag(true));
        assert_eq!(
            activo.input_for_record(&record(json!({"activo": false}))),
            InputValue::Flag(false)
        );
    }

    #[test]
    fn test_requirement_modes() {
        let password = FieldSchema::password("password", "Contraseña").required_on_create();
        assert!(password.is_required(false));
        assert!(!password.is_required(true));
        assert!(FieldSchema::text("n", "N").required().is_required(true));
    }
}
