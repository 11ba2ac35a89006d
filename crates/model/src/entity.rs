//! Entity schemas
//!
//! An `EntitySchema` ties together everything one dashboard page needs:
//! the REST collection it talks to, the writable form fields, the table
//! columns, cross-field rules and the reference collections that feed its
//! select inputs.

use crate::column::ColumnDef;
use crate::field::{FieldKind, FieldSchema, SelectOption};
use crate::path::render_template;
use crate::table::Row;
use crate::value::{FieldError, FieldValue};
use condo_core::{AdminError, AdminResult, Record, RecordId, Validatable, record_id};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Loaded reference collections keyed by source name
pub type References = BTreeMap<String, Vec<Record>>;

// ============================================================================
// ReferenceSource
// ============================================================================

/// A collection fetched alongside an entity to populate select inputs
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSource {
    /// Name fields refer to, e.g. `residentes`
    pub name: String,

    /// Collection endpoint
    pub endpoint: String,

    /// `{path}` template for option labels
    pub label: String,
}

impl ReferenceSource {
    /// Create a reference source
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            label: label.into(),
        }
    }

    /// Build select options from loaded records; records without an id are skipped
    pub fn options(&self, records: &[Record]) -> Vec<SelectOption> {
        records
            .iter()
            .filter_map(|r| {
                let id = record_id(r, "id")?;
                Some(SelectOption::new(id.to_string(), render_template(&self.label, r)))
            })
            .collect()
    }
}

// ============================================================================
// FormRule
// ============================================================================

/// A constraint spanning more than one field
#[derive(Debug, Clone, PartialEq)]
pub enum FormRule {
    /// `earlier` must be strictly before `later` when both are set
    Before {
        earlier: String,
        later: String,
        message: String,
    },
}

impl FormRule {
    /// Check the rule against parsed values, returning the failing field
    pub fn check(&self, values: &BTreeMap<String, FieldValue>) -> Option<(String, FieldError)> {
        match self {
            FormRule::Before {
                earlier,
                later,
                message,
            } => {
                let a = values.get(earlier)?;
                let b = values.get(later)?;
                match a.compare(b) {
                    Some(Ordering::Less) | None => None,
                    Some(_) => Some((later.clone(), FieldError::Rule(message.clone()))),
                }
            }
        }
    }

    /// Fields the rule reads
    pub fn fields(&self) -> Vec<&str> {
        match self {
            FormRule::Before { earlier, later, .. } => vec![earlier.as_str(), later.as_str()],
        }
    }
}

// ============================================================================
// RelatedAssignment
// ============================================================================

/// Secondary write for a detached multi-reference field
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedAssignment {
    /// Path segment appended to the item path, e.g. `asignar-reglas`
    pub action: String,

    /// Body key holding the id list, e.g. `reglas`
    pub body_key: String,
}

// ============================================================================
// EntitySchema
// ============================================================================

/// Declarative description of one managed entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySchema {
    /// Catalog key, e.g. `residentes`
    pub name: String,

    /// Page and table title
    pub title: String,

    /// Lower-case singular noun used in prompts
    pub singular: String,

    /// Collection endpoint ending in `/`
    pub endpoint: String,

    /// Record key holding the id
    pub id_key: String,

    /// Template describing a record in the delete prompt
    pub display: String,

    /// Writable form fields in form order
    pub fields: Vec<FieldSchema>,

    /// Table columns in display order
    pub columns: Vec<ColumnDef>,

    /// Cross-field rules
    pub rules: Vec<FormRule>,

    /// Collections fetched beside the entity
    pub references: Vec<ReferenceSource>,

    /// Secondary write for the detached field
    pub assignment: Option<RelatedAssignment>,

    /// Listing only, no create/edit/delete
    pub read_only: bool,
}

impl EntitySchema {
    /// Create a new schema with `id` as the id key
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            singular: name.trim_end_matches('s').to_string(),
            name,
            title: title.into(),
            endpoint: endpoint.into(),
            id_key: "id".to_string(),
            display: "{nombre}".to_string(),
            fields: Vec::new(),
            columns: Vec::new(),
            rules: Vec::new(),
            references: Vec::new(),
            assignment: None,
            read_only: false,
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the singular noun
    pub fn singular(mut self, singular: impl Into<String>) -> Self {
        self.singular = singular.into();
        self
    }

    /// Set the id key
    pub fn id_key(mut self, key: impl Into<String>) -> Self {
        self.id_key = key.into();
        self
    }

    /// Set the record description template
    pub fn display(mut self, template: impl Into<String>) -> Self {
        self.display = template.into();
        self
    }

    /// Add a form field
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a table column
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a cross-field rule
    pub fn rule(mut self, rule: FormRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add a reference collection
    pub fn reference(mut self, source: ReferenceSource) -> Self {
        self.references.push(source);
        self
    }

    /// Send the detached field to `{item}{action}/` under `body_key`
    pub fn assign_related(mut self, action: impl Into<String>, body_key: impl Into<String>) -> Self {
        self.assignment = Some(RelatedAssignment {
            action: action.into(),
            body_key: body_key.into(),
        });
        self
    }

    /// Mark the entity as read-only
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Get a field by name
    pub fn get_field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get a field by name or fail with `FieldNotFound`
    pub fn require_field(&self, name: &str) -> AdminResult<&FieldSchema> {
        self.get_field(name).ok_or_else(|| AdminError::FieldNotFound {
            entity: self.name.clone(),
            field: name.to_string(),
        })
    }

    /// Get a column by key
    pub fn get_column(&self, key: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Get a reference source by name
    pub fn get_reference(&self, name: &str) -> Option<&ReferenceSource> {
        self.references.iter().find(|r| r.name == name)
    }

    /// The field emitted beside the payload, if any
    pub fn detached_field(&self) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.detached)
    }

    /// Options for a select, static or drawn from loaded references
    pub fn options_for(&self, field: &FieldSchema, references: &References) -> Vec<SelectOption> {
        match &field.kind {
            FieldKind::Select(options) => options.clone(),
            kind => kind
                .reference_source()
                .and_then(|name| Some((self.get_reference(name)?, references.get(name)?)))
                .map(|(source, records)| source.options(records))
                .unwrap_or_default(),
        }
    }

    // ========================================================================
    // Records and rows
    // ========================================================================

    /// Id of a record
    pub fn record_id(&self, record: &Record) -> Option<RecordId> {
        record_id(record, &self.id_key)
    }

    /// Find a loaded record by id
    pub fn find_record<'a>(&self, records: &'a [Record], id: RecordId) -> Option<&'a Record> {
        records.iter().find(|r| self.record_id(r) == Some(id))
    }

    /// Find a loaded record by id or fail with `RecordNotFound`
    pub fn require_record<'a>(&self, records: &'a [Record], id: RecordId) -> AdminResult<&'a Record> {
        self.find_record(records, id)
            .ok_or_else(|| AdminError::RecordNotFound {
                entity: self.name.clone(),
                id: id.to_string(),
            })
    }

    /// Project a record into a table row
    pub fn row(&self, record: &Record) -> Row {
        Row::project(record, &self.columns, &self.id_key)
    }

    /// Project a collection into table rows, preserving order
    pub fn rows(&self, records: &[Record]) -> Vec<Row> {
        records.iter().map(|r| self.row(r)).collect()
    }

    /// Item path of a record, e.g. `/api/residentes/4/`
    pub fn item_path(&self, id: RecordId) -> String {
        format!("{}{}/", self.endpoint, id)
    }

    /// Path of the secondary assignment write
    pub fn assignment_path(&self, id: RecordId) -> Option<String> {
        self.assignment
            .as_ref()
            .map(|a| format!("{}{}/", self.item_path(id), a.action))
    }

    /// Short description of a record
    pub fn describe(&self, record: &Record) -> String {
        let text = render_template(&self.display, record);
        if text.is_empty() {
            self.record_id(record)
                .map(|id| format!("#{id}"))
                .unwrap_or_default()
        } else {
            text
        }
    }

    /// Delete confirmation prompt for a record
    pub fn confirm_delete_message(&self, record: &Record) -> String {
        format!("¿Eliminar {} \"{}\"?", self.singular, self.describe(record))
    }
}

impl Validatable for EntitySchema {
    fn validate(&self) -> AdminResult<()> {
        if self.name.is_empty() {
            return Err(AdminError::validation("Entity name cannot be empty"));
        }
        if !self.endpoint.starts_with('/') || !self.endpoint.ends_with('/') {
            return Err(AdminError::validation(format!(
                "Endpoint '{}' of '{}' must start and end with '/'",
                self.endpoint, self.name
            )));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(AdminError::field_validation(
                    &self.name,
                    &field.name,
                    "duplicate field",
                ));
            }
            if let Some(source) = field.kind.reference_source() {
                if self.get_reference(source).is_none() {
                    return Err(AdminError::field_validation(
                        &self.name,
                        &field.name,
                        format!("unknown reference source '{source}'"),
                    ));
                }
            }
        }

        let mut keys = HashSet::new();
        for column in &self.columns {
            if !keys.insert(column.key.as_str()) {
                return Err(AdminError::validation(format!(
                    "Duplicate column '{}' in '{}'",
                    column.key, self.name
                )));
            }
        }

        for rule in &self.rules {
            for name in rule.fields() {
                self.require_field(name)?;
            }
        }

        let detached: Vec<_> = self.fields.iter().filter(|f| f.detached).collect();
        match (detached.as_slice(), &self.assignment) {
            ([], None) => {}
            ([field], Some(_)) if matches!(field.kind, FieldKind::MultiReference { .. }) => {}
            _ => {
                return Err(AdminError::validation(format!(
                    "'{}' needs exactly one detached multi-reference field per assignment",
                    self.name
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::parse_time;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn mascotas() -> EntitySchema {
        EntitySchema::new("mascotas", "Mascotas", "/api/mascotas/")
            .singular("mascota")
            .field(FieldSchema::text("nombre", "Nombre").required())
            .field(FieldSchema::reference("residente", "Residente", "residentes").required())
            .reference(ReferenceSource::new(
                "residentes",
                "/api/residentes/",
                "{nombre} {apellidos}",
            ))
            .column(ColumnDef::new("id", "ID").sortable())
            .column(ColumnDef::new("nombre", "Nombre").sortable())
    }

    #[test]
    fn test_paths() {
        let schema = mascotas();
        assert_eq!(schema.item_path(4), "/api/mascotas/4/");
        assert_eq!(schema.assignment_path(4), None);

        let areas = EntitySchema::new("areas", "Áreas", "/api/areas-comunes/")
            .assign_related("asignar-reglas", "reglas");
        assert_eq!(
            areas.assignment_path(2).as_deref(),
            Some("/api/areas-comunes/2/asignar-reglas/")
        );
    }

    #[test]
    fn test_reference_options() {
        let schema = mascotas();
        let mut refs = References::new();
        refs.insert(
            "residentes".into(),
            vec![
                record(json!({"id": 1, "nombre": "Ana", "apellidos": "Rojas"})),
                record(json!({"nombre": "Sin id"})),
            ],
        );
        let field = schema.get_field("residente").unwrap();
        assert_eq!(
            schema.options_for(field, &refs),
            vec![SelectOption::new("1", "Ana Rojas")]
        );
        assert!(schema.options_for(field, &References::new()).is_empty());
    }

    #[test]
    fn test_find_and_describe_records() {
        let schema = mascotas();
        let records = vec![
            record(json!({"id": 1, "nombre": "Firulais"})),
            record(json!({"id": 2, "nombre": "Michi"})),
        ];
        let found = schema.require_record(&records, 2).unwrap();
        assert_eq!(
            schema.confirm_delete_message(found),
            "¿Eliminar mascota \"Michi\"?"
        );
        assert!(schema.require_record(&records, 9).unwrap_err().is_not_found());
        assert_eq!(schema.describe(&record(json!({"id": 5}))), "#5");
    }

    #[test]
    fn test_before_rule() {
        let rule = FormRule::Before {
            earlier: "hora_apertura".into(),
            later: "hora_cierre".into(),
            message: "Cierre antes de apertura".into(),
        };
        let mut values = BTreeMap::new();
        values.insert("hora_apertura".to_string(), FieldValue::Time(parse_time("18:00").unwrap()));
        values.insert("hora_cierre".to_string(), FieldValue::Time(parse_time("08:00").unwrap()));
        assert_eq!(
            rule.check(&values),
            Some((
                "hora_cierre".to_string(),
                FieldError::Rule("Cierre antes de apertura".into())
            ))
        );

        values.insert("hora_cierre".to_string(), FieldValue::Null);
        assert_eq!(rule.check(&values), None);
    }

    #[test]
    fn test_schema_validation() {
        assert!(mascotas().is_valid());

        let dangling = EntitySchema::new("x", "X", "/api/x/")
            .field(FieldSchema::reference("r", "R", "nowhere"));
        assert!(dangling.validate().unwrap_err().is_validation());

        let bad_endpoint = EntitySchema::new("x", "X", "api/x");
        assert!(!bad_endpoint.is_valid());

        let no_field = EntitySchema::new("x", "X", "/api/x/").assign_related("a", "b");
        assert!(!no_field.is_valid());
    }
}
