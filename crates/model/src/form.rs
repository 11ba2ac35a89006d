//! Entity form controller
//!
//! One controller drives every entity editor. It holds raw input per field,
//! tracks which fields were touched, reports errors once they should be
//! visible and turns a valid form into a normalized `Submission`. It never
//! talks to the network; the page that owns it performs the write.

use crate::entity::EntitySchema;
use crate::validation::ValidationErrors;
use crate::value::{FieldError, FieldValue, InputValue};
use condo_core::{AdminError, AdminResult, Record, RecordId};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Whether the form creates a new record or edits a loaded one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Normalized output of a successful submit
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Id of the edited record; `None` when creating
    pub id: Option<RecordId>,

    /// Body for the create or update call
    pub payload: Record,

    /// Ids for the secondary assignment call, when the entity has one
    pub related: Option<Vec<RecordId>>,
}

/// Form state for one entity editor
#[derive(Debug, Clone)]
pub struct FormController<'s> {
    schema: &'s EntitySchema,
    mode: FormMode,
    record_id: Option<RecordId>,
    values: BTreeMap<String, InputValue>,
    touched: BTreeSet<String>,
}

impl<'s> FormController<'s> {
    /// Create a controller, in edit mode when a record is given
    pub fn new(schema: &'s EntitySchema, record: Option<&Record>) -> Self {
        let mut controller = Self {
            schema,
            mode: FormMode::Create,
            record_id: None,
            values: BTreeMap::new(),
            touched: BTreeSet::new(),
        };
        controller.rebind(record);
        controller
    }

    /// Bind to another record (or none), discarding all edits and touch state
    pub fn rebind(&mut self, record: Option<&Record>) {
        self.mode = if record.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        };
        self.record_id = record.and_then(|r| self.schema.record_id(r));
        self.values = self
            .schema
            .fields
            .iter()
            .map(|field| {
                let input = match record {
                    Some(r) => field.input_for_record(r),
                    None => field.create_input(),
                };
                (field.name.clone(), input)
            })
            .collect();
        self.touched.clear();
        debug!(
            entity = %self.schema.name,
            mode = ?self.mode,
            id = ?self.record_id,
            "Form bound"
        );
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Schema driving this form
    pub fn schema(&self) -> &'s EntitySchema {
        self.schema
    }

    /// Current mode
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Check if editing an existing record
    pub fn is_editing(&self) -> bool {
        self.mode == FormMode::Edit
    }

    /// Id of the bound record
    pub fn record_id(&self) -> Option<RecordId> {
        self.record_id
    }

    /// Raw input of a field
    pub fn value(&self, name: &str) -> Option<&InputValue> {
        self.values.get(name)
    }

    /// Text input of a field, empty for unknown or non-text fields
    pub fn text(&self, name: &str) -> &str {
        self.values.get(name).map(InputValue::as_text).unwrap_or("")
    }

    /// Whether a field is required in the current mode
    pub fn is_required(&self, name: &str) -> bool {
        self.schema
            .get_field(name)
            .is_some_and(|f| f.is_required(self.is_editing()))
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Replace a field's input
    ///
    /// Filling in a field resets the fields it is exclusive with.
    pub fn set(&mut self, name: &str, value: InputValue) -> AdminResult<()> {
        let schema = self.schema;
        let field = schema.require_field(name)?;
        if !value.is_blank() {
            for other in &field.clears {
                if let Some(target) = schema.get_field(other) {
                    self.values.insert(other.clone(), target.kind.empty_input());
                }
            }
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Replace a field's text input
    pub fn set_text(&mut self, name: &str, text: impl Into<String>) -> AdminResult<()> {
        self.set(name, InputValue::Text(text.into()))
    }

    /// Replace a checkbox state
    pub fn set_flag(&mut self, name: &str, on: bool) -> AdminResult<()> {
        self.set(name, InputValue::Flag(on))
    }

    /// Check or uncheck an id in a multi-reference list
    pub fn toggle_id(&mut self, name: &str, id: RecordId) -> AdminResult<()> {
        self.schema.require_field(name)?;
        match self.values.get_mut(name) {
            Some(InputValue::Ids(ids)) => {
                if let Some(pos) = ids.iter().position(|x| *x == id) {
                    ids.remove(pos);
                } else {
                    ids.push(id);
                }
                Ok(())
            }
            _ => Err(AdminError::field_validation(
                &self.schema.name,
                name,
                "not a multi-reference field",
            )),
        }
    }

    /// Mark a field as interacted with
    pub fn blur(&mut self, name: &str) {
        if self.schema.get_field(name).is_some() {
            self.touched.insert(name.to_string());
        }
    }

    /// Check if a field was touched
    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    // ========================================================================
    // Validation and submission
    // ========================================================================

    /// Parse every field and apply rules, collecting all failures
    fn evaluate(&self) -> (BTreeMap<String, FieldValue>, ValidationErrors) {
        let editing = self.is_editing();
        let mut parsed = BTreeMap::new();
        let mut errors = ValidationErrors::new();

        for field in &self.schema.fields {
            let empty = field.kind.empty_input();
            let input = self.values.get(&field.name).unwrap_or(&empty);
            if field.is_required(editing) && input.is_blank() {
                errors.add(&field.name, FieldError::Required);
                continue;
            }
            match field.kind.parse(input) {
                Ok(value) => {
                    parsed.insert(field.name.clone(), value);
                }
                Err(err) => errors.add(&field.name, err),
            }
        }

        for rule in &self.schema.rules {
            if let Some((field, err)) = rule.check(&parsed) {
                errors.add(field, err);
            }
        }

        (parsed, errors)
    }

    /// All current errors, visible or not
    pub fn errors(&self) -> ValidationErrors {
        self.evaluate().1
    }

    /// Error of a field once it should be shown: after blur or a submit attempt
    pub fn visible_error(&self, name: &str) -> Option<FieldError> {
        if !self.is_touched(name) {
            return None;
        }
        self.errors().get(name).cloned()
    }

    /// Validate and build the normalized submission.
    ///
    /// Every required field, and every field with an error, is marked
    /// touched first, so a blocked submit shows all its errors at once.
    pub fn submit(&mut self) -> Result<Submission, ValidationErrors> {
        let schema = self.schema;
        let editing = self.is_editing();
        let (parsed, errors) = self.evaluate();

        for field in &schema.fields {
            if field.is_required(editing) || errors.get(&field.name).is_some() {
                self.touched.insert(field.name.clone());
            }
        }

        if !errors.is_empty() {
            warn!(
                entity = %self.schema.name,
                fields = ?errors.fields(),
                "Form submission blocked"
            );
            return Err(errors);
        }

        let mut payload = Record::new();
        let mut related = None;
        for field in &schema.fields {
            let Some(value) = parsed.get(&field.name) else {
                continue;
            };
            if field.detached {
                if let FieldValue::Ids(ids) = value {
                    related = Some(ids.clone());
                }
                continue;
            }
            let blank = self.values.get(&field.name).is_none_or(InputValue::is_blank);
            if editing && field.omit_blank_on_edit && blank {
                continue;
            }
            payload.insert(field.payload_key().to_string(), value.to_json());
        }

        if editing {
            if let Some(id) = self.record_id {
                payload
                    .entry(self.schema.id_key.clone())
                    .or_insert(Value::from(id));
            }
        }

        debug!(entity = %self.schema.name, id = ?self.record_id, "Form submitted");
        Ok(Submission {
            id: self.record_id,
            payload,
            related,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;
    use crate::entity::{FormRule, ReferenceSource};
    use crate::field::FieldSchema;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn people() -> EntitySchema {
        EntitySchema::new("personas", "Personas", "/api/personas/")
            .field(FieldSchema::text("nombre", "Nombre").required())
            .field(FieldSchema::text("dni", "DNI").required())
            .field(FieldSchema::integer("edad", "Edad"))
            .field(FieldSchema::date("fecha_nacimiento", "Nacimiento"))
    }

    #[test]
    fn test_blocked_submit_marks_required_touched() {
        let schema = people();
        let mut form = FormController::new(&schema, None);
        form.set_text("nombre", "").unwrap();
        form.set_text("dni", "123").unwrap();

        assert_eq!(form.visible_error("nombre"), None);
        let errors = form.submit().unwrap_err();

        assert_eq!(errors.fields(), vec!["nombre"]);
        assert!(form.is_touched("nombre"));
        assert!(form.is_touched("dni"));
        assert_eq!(form.visible_error("nombre"), Some(FieldError::Required));
        assert_eq!(form.visible_error("dni"), None);
    }

    #[test]
    fn test_error_visible_after_blur_only() {
        let schema = people();
        let mut form = FormController::new(&schema, None);
        assert_eq!(form.visible_error("dni"), None);
        form.blur("dni");
        assert_eq!(form.visible_error("dni"), Some(FieldError::Required));
        assert_eq!(form.visible_error("nombre"), None);
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        let schema = people();
        let mut form = FormController::new(&schema, None);
        form.set_text("nombre", "   ").unwrap();
        form.set_text("dni", "1").unwrap();
        assert!(form.submit().is_err());
    }

    #[test]
    fn test_rebinding_discards_edits() {
        let schema = people();
        let ana = record(json!({"id": 5, "nombre": "Ana", "dni": "1"}));
        let luis = record(json!({"id": 6, "nombre": "Luis", "dni": "2"}));

        let mut form = FormController::new(&schema, Some(&ana));
        form.set_text("nombre", "Ana María").unwrap();
        form.blur("nombre");

        form.rebind(Some(&luis));
        assert_eq!(form.text("nombre"), "Luis");
        assert_eq!(form.record_id(), Some(6));
        assert!(!form.is_touched("nombre"));

        form.rebind(None);
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.text("nombre"), "");
    }

    #[test]
    fn test_normalization() {
        let schema = people();
        let record = record(json!({"id": 5, "nombre": "Ana", "dni": "1"}));
        let mut form = FormController::new(&schema, Some(&record));
        form.set_text("nombre", "  Ana  ").unwrap();
        form.set_text("edad", " 41 ").unwrap();

        let submission = form.submit().unwrap();
        assert_eq!(submission.id, Some(5));
        assert_eq!(
            Value::Object(submission.payload),
            json!({
                "id": 5,
                "nombre": "Ana",
                "dni": "1",
                "edad": 41,
                "fecha_nacimiento": null
            })
        );
        assert_eq!(submission.related, None);
    }

    #[test]
    fn test_parse_errors_block_submission() {
        let schema = people();
        let mut form = FormController::new(&schema, None);
        form.set_text("nombre", "Ana").unwrap();
        form.set_text("dni", "1").unwrap();
        form.set_text("edad", "cuarenta").unwrap();

        let errors = form.submit().unwrap_err();
        assert_eq!(errors.get("edad"), Some(&FieldError::NotAnInteger));
        assert_eq!(form.visible_error("edad"), Some(FieldError::NotAnInteger));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let schema = people();
        let mut form = FormController::new(&schema, None);
        assert!(form.set_text("password", "x").unwrap_err().is_not_found());
    }

    #[test]
    fn test_password_required_only_on_create() {
        let schema = catalog().get("cuentas").unwrap();
        let mut form = FormController::new(schema, None);
        form.set_text("correo", "ana@condo.bo").unwrap();
        form.set_text("nombre", "Ana").unwrap();
        form.set_text("apellido", "Rojas").unwrap();
        assert_eq!(form.submit().unwrap_err().fields(), vec!["password"]);

        let existing = record(json!({
            "id": 3, "correo": "ana@condo.bo", "nombre": "Ana", "apellido": "Rojas",
            "rol": {"id": 2, "nombre": "ADMIN"}, "is_active": true
        }));
        form.rebind(Some(&existing));
        let submission = form.submit().unwrap();
        assert!(!submission.payload.contains_key("password"));
        assert_eq!(submission.payload.get("rol_id"), Some(&json!(2)));
        assert_eq!(submission.payload.get("residente"), Some(&Value::Null));
        assert_eq!(submission.payload.get("is_active"), Some(&json!(true)));
    }

    #[test]
    fn test_detached_related_ids() {
        let schema = catalog().get("areas").unwrap();
        let existing = record(json!({
            "id": 2, "nombre": "Piscina", "reglas": [{"id": 1}, {"id": 4}]
        }));
        let mut form = FormController::new(schema, Some(&existing));
        form.toggle_id("reglas", 4).unwrap();
        form.toggle_id("reglas", 7).unwrap();

        let submission = form.submit().unwrap();
        assert_eq!(submission.related, Some(vec![1, 7]));
        assert!(!submission.payload.contains_key("reglas"));
        assert_eq!(submission.payload.get("estado"), Some(&json!("disponible")));
    }

    #[test]
    fn test_embedded_multi_reference() {
        let schema = catalog().get("reglas").unwrap();
        let existing = record(json!({"id": 8, "nombre": "Silencio", "areas": [{"id": 3}]}));
        let form_submission = FormController::new(schema, Some(&existing)).submit().unwrap();
        assert_eq!(form_submission.payload.get("areas_ids"), Some(&json!([3])));
        assert_eq!(form_submission.related, None);
    }

    #[test]
    fn test_exclusive_references_clear_each_other() {
        let schema = catalog().get("cuentas").unwrap();
        let mut form = FormController::new(schema, None);
        form.set_text("personal", "4").unwrap();
        form.set_text("residente", "9").unwrap();
        assert_eq!(form.text("personal"), "");
        form.set_text("residente", "").unwrap();
        assert_eq!(form.text("residente"), "");
    }

    #[test]
    fn test_toggle_id_on_text_field_fails() {
        let schema = people();
        let mut form = FormController::new(&schema, None);
        assert!(form.toggle_id("nombre", 1).unwrap_err().is_validation());
    }

    #[test]
    fn test_before_rule_blocks_submission() {
        let schema = EntitySchema::new("horarios", "Horarios", "/api/horarios/")
            .field(FieldSchema::time("hora_apertura", "Apertura").required())
            .field(FieldSchema::time("hora_cierre", "Cierre").required())
            .rule(FormRule::Before {
                earlier: "hora_apertura".into(),
                later: "hora_cierre".into(),
                message: "La hora de cierre debe ser posterior".into(),
            });
        let mut form = FormController::new(&schema, None);
        form.set_text("hora_apertura", "18:00").unwrap();
        form.set_text("hora_cierre", "08:00").unwrap();

        let errors = form.submit().unwrap_err();
        assert_eq!(errors.fields(), vec!["hora_cierre"]);

        form.set_text("hora_cierre", "22:00").unwrap();
        let submission = form.submit().unwrap();
        assert_eq!(submission.payload.get("hora_cierre"), Some(&json!("22:00")));
    }

    #[test]
    fn test_reference_option_labels() {
        let schema = EntitySchema::new("visitas", "Visitas", "/api/visitas/")
            .field(FieldSchema::reference("residente", "Residente", "residentes").required())
            .reference(ReferenceSource::new(
                "residentes",
                "/api/residentes/",
                "{nombre} {apellidos} - Res. {residencia}",
            ));
        let mut refs = crate::entity::References::new();
        refs.insert(
            "residentes".into(),
            vec![record(json!({"id": 1, "nombre": "Ana", "apellidos": "Rojas", "residencia": "A-1"}))],
        );
        let field = schema.get_field("residente").unwrap();
        let options = schema.options_for(field, &refs);
        assert_eq!(options[0].label, "Ana Rojas - Res. A-1");
    }
}
