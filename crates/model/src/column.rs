//! Column definitions for entity tables
//!
//! A `ColumnDef` says where a table cell's value comes from in a backend
//! record (`Projection`) and how it is displayed (`CellFormat`).

use crate::path::{lookup, render_template};
use crate::value::{parse_date, parse_datetime};
use condo_core::{Breakpoint, CellValue, Record};
use serde_json::Value;

/// Text shown for a null cell
pub const NULL_PLACEHOLDER: &str = "—";

// ============================================================================
// Projection
// ============================================================================

/// How a column value is derived from a record
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Value at a dotted record path
    Path(String),
    /// Text built from a `{path}` template; empty text becomes null
    Template(String),
    /// Length of the array at a path
    Count(String),
}

impl Projection {
    /// Extract the cell value from a record
    pub fn extract(&self, record: &Record) -> CellValue {
        match self {
            Projection::Path(path) => lookup(record, path)
                .map(|v| CellValue::from_json(&v))
                .unwrap_or_default(),
            Projection::Template(template) => {
                let text = render_template(template, record);
                if text.is_empty() {
                    CellValue::Null
                } else {
                    CellValue::Text(text)
                }
            }
            Projection::Count(path) => match lookup(record, path) {
                Some(Value::Array(items)) => CellValue::Int(items.len() as i64),
                _ => CellValue::Int(0),
            },
        }
    }
}

// ============================================================================
// CellFormat
// ============================================================================

/// Emphasis applied to a rendered cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
}

/// Display-ready cell content
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell {
    pub text: String,
    pub tone: Option<Tone>,
    /// Tooltip, set for text cells
    pub title: Option<String>,
}

impl RenderedCell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: None,
            title: None,
        }
    }
}

/// Cell renderer selected per column
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellFormat {
    #[default]
    Plain,
    /// Coloured badge driven by truthiness
    Badge { on: String, off: String },
    /// "Sí" / "No"
    YesNo,
    /// `dd/mm/yyyy`
    Date,
    /// `dd/mm/yyyy HH:MM`
    DateTime,
    /// Two decimals with a currency sign
    Money,
    /// Value followed by a unit, e.g. `3 Hr`
    Suffix(String),
}

impl CellFormat {
    /// Badge with the given on/off captions
    pub fn badge(on: impl Into<String>, off: impl Into<String>) -> Self {
        CellFormat::Badge {
            on: on.into(),
            off: off.into(),
        }
    }

    /// Render a value for display
    pub fn render(&self, value: &CellValue) -> RenderedCell {
        match self {
            CellFormat::Badge { on, off } => {
                let truthy = is_truthy(value);
                RenderedCell {
                    text: if truthy { on.clone() } else { off.clone() },
                    tone: Some(if truthy { Tone::Positive } else { Tone::Negative }),
                    title: None,
                }
            }
            CellFormat::YesNo => RenderedCell::plain(if is_truthy(value) { "Sí" } else { "No" }),
            _ if value.is_null() => RenderedCell::plain(NULL_PLACEHOLDER),
            CellFormat::Plain => RenderedCell {
                text: value.to_text(),
                tone: None,
                title: value.as_str().map(str::to_string),
            },
            CellFormat::Date => {
                let text = value.to_text();
                match parse_date(&text) {
                    Ok(date) => RenderedCell::plain(date.format("%d/%m/%Y").to_string()),
                    Err(_) => RenderedCell::plain(text),
                }
            }
            CellFormat::DateTime => {
                let text = value.to_text();
                match parse_datetime(&text) {
                    Ok(dt) => RenderedCell::plain(dt.format("%d/%m/%Y %H:%M").to_string()),
                    Err(_) => RenderedCell::plain(text),
                }
            }
            CellFormat::Money => {
                let amount = value
                    .as_float()
                    .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()));
                match amount {
                    Some(amount) => RenderedCell::plain(format!("${amount:.2}")),
                    None => RenderedCell::plain("-"),
                }
            }
            CellFormat::Suffix(unit) => RenderedCell::plain(format!("{} {unit}", value.to_text())),
        }
    }
}

fn is_truthy(value: &CellValue) -> bool {
    match value {
        CellValue::Null => false,
        CellValue::Bool(b) => *b,
        CellValue::Int(i) => *i != 0,
        CellValue::Float(f) => *f != 0.0,
        CellValue::Text(s) => !s.is_empty(),
    }
}

// ============================================================================
// ColumnDef
// ============================================================================

/// A table column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Row key of the cell value
    pub key: String,

    /// Header text
    pub label: String,

    /// Fixed CSS width
    pub width: Option<String>,

    /// Hide the column below this breakpoint
    pub hide_below: Option<Breakpoint>,

    /// Whether clicking the header sorts by this column
    pub sortable: bool,

    /// Cell renderer
    pub format: CellFormat,

    /// Where the value comes from
    pub source: Projection,
}

impl ColumnDef {
    /// Create a column reading the record key of the same name
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            source: Projection::Path(key.clone()),
            key,
            label: label.into(),
            width: None,
            hide_below: None,
            sortable: false,
            format: CellFormat::Plain,
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Allow sorting by this column
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Set a fixed width
    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    /// Hide below a breakpoint
    pub fn hide_below(mut self, breakpoint: Breakpoint) -> Self {
        self.hide_below = Some(breakpoint);
        self
    }

    /// Set the cell renderer
    pub fn format(mut self, format: CellFormat) -> Self {
        self.format = format;
        self
    }

    /// Read the value from another record path
    pub fn from_path(mut self, path: impl Into<String>) -> Self {
        self.source = Projection::Path(path.into());
        self
    }

    /// Build the value from a template
    pub fn from_template(mut self, template: impl Into<String>) -> Self {
        self.source = Projection::Template(template.into());
        self
    }

    /// Count the items of an array
    pub fn count_of(mut self, path: impl Into<String>) -> Self {
        self.source = Projection::Count(path.into());
        self
    }

    // ========================================================================
    // Utility methods
    // ========================================================================

    /// Extract this column's value from a record
    pub fn project(&self, record: &Record) -> CellValue {
        self.source.extract(record)
    }

    /// Render a cell of this column
    pub fn render(&self, value: &CellValue) -> RenderedCell {
        self.format.render(value)
    }

    /// CSS classes hiding the column below its breakpoint
    pub fn hide_class(&self) -> &'static str {
        self.hide_below.map(|bp| bp.hide_class()).unwrap_or("")
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
    fn test_projections() {
        let r = record(json!({
            "personal_nombre": "Luis",
            "personal_apellido": "Paz",
            "areas": [{"id": 1}, {"id": 2}],
            "rol": {"nombre": "ADMIN"}
        }));
        let personal = ColumnDef::new("personal", "Personal")
            .from_template("{personal_nombre} {personal_apellido}");
        assert_eq!(personal.project(&r), CellValue::Text("Luis Paz".into()));

        let asignadas = ColumnDef::new("asignadas", "Áreas").count_of("areas");
        assert_eq!(asignadas.project(&r), CellValue::Int(2));

        let rol = ColumnDef::new("rol", "Rol").from_path("rol.nombre");
        assert_eq!(rol.project(&r), CellValue::Text("ADMIN".into()));

        let empty = ColumnDef::new("x", "X").from_template("{nada}");
        assert_eq!(empty.project(&r), CellValue::Null);
    }

    #[test]
    fn test_null_renders_placeholder() {
        let cell = CellFormat::Plain.render(&CellValue::Null);
        assert_eq!(cell.text, NULL_PLACEHOLDER);
        assert_eq!(CellFormat::Date.render(&CellValue::Null).text, NULL_PLACEHOLDER);
    }

    #[test]
    fn test_text_cells_get_tooltip() {
        let cell = CellFormat::Plain.render(&CellValue::Text("Bloque A".into()));
        assert_eq!(cell.title.as_deref(), Some("Bloque A"));
        assert_eq!(CellFormat::Plain.render(&CellValue::Int(3)).title, None);
    }

    #[test]
    fn test_formats() {
        let badge = CellFormat::badge("Activo", "Inactivo");
        let on = badge.render(&CellValue::Bool(true));
        assert_eq!((on.text.as_str(), on.tone), ("Activo", Some(Tone::Positive)));
        let off = badge.render(&CellValue::Null);
        assert_eq!((off.text.as_str(), off.tone), ("Inactivo", Some(Tone::Negative)));

        assert_eq!(CellFormat::YesNo.render(&CellValue::Bool(true)).text, "Sí");
        assert_eq!(
            CellFormat::Date.render(&CellValue::Text("2024-03-09".into())).text,
            "09/03/2024"
        );
        assert_eq!(
            CellFormat::DateTime
                .render(&CellValue::Text("2024-03-09T18:05:00Z".into()))
                .text,
            "09/03/2024 18:05"
        );
        assert_eq!(CellFormat::Money.render(&CellValue::Text("15".into())).text, "$15.00");
        assert_eq!(CellFormat::Money.render(&CellValue::Text("n/a".into())).text, "-");
        assert_eq!(
            CellFormat::Suffix("Hr".into()).render(&CellValue::Int(2)).text,
            "2 Hr"
        );
    }
}
