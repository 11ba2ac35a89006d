//! # Record Editor Dialog
//!
//! Create/edit dialog for any catalog entity. The fields, their widgets and
//! their validation all come from the entity schema; the dialog keeps a
//! `FormController` in a signal and hands a valid `Submission` to the page,
//! which performs the write.
//!
//! The page remounts the dialog (through its `key`) whenever the bound
//! record changes, so the controller is created once per mount.

use condo_core::{AdminResult, Record};
use condo_model::{EntitySchema, FieldKind, FieldSchema, FormController, References, Submission};
use dioxus::prelude::*;

use super::modal::Modal;
use crate::components::inputs::{Checkbox, CheckboxList, Select, TextArea, TextInput};

// ============================================================================
// Component Props
// ============================================================================

#[derive(Props, Clone, PartialEq)]
pub struct RecordEditorProps {
    /// Catalog entry the form is built from
    pub schema: &'static EntitySchema,

    /// Record being edited; `None` opens a create form
    #[props(default)]
    pub record: Option<Record>,

    /// Loaded reference collections for select options
    #[props(default)]
    pub references: References,

    /// A save request is in flight
    #[props(default = false)]
    pub saving: bool,

    /// Server error of the last save attempt
    #[props(default)]
    pub error: Option<String>,

    #[props(default)]
    pub on_submit: EventHandler<Submission>,

    #[props(default)]
    pub on_cancel: EventHandler<()>,
}

// ============================================================================
// Main Component
// ============================================================================

/// Schema-driven create/edit dialog
#[component]
pub fn RecordEditor(props: RecordEditorProps) -> Element {
    let schema = props.schema;
    let initial = props.record.clone();
    let mut form = use_signal(move || FormController::new(schema, initial.as_ref()));

    let editing = form.read().is_editing();
    let saving = props.saving;
    let title = form_title(schema, editing);

    let handle_submit = move |_| {
        if saving {
            return;
        }
        let result = form.write().submit();
        match result {
            Ok(submission) => props.on_submit.call(submission),
            Err(errors) => {
                tracing::debug!("{} field(s) need attention", errors.len());
            }
        }
    };

    rsx! {
        Modal {
            size: "modal-lg",
            busy: saving,
            on_dismiss: move |_| props.on_cancel.call(()),

            div {
                class: "record-editor",

                // Header
                div {
                    class: "dialog-header",
                    h2 { class: "dialog-title", "{title}" }
                    button {
                        class: "dialog-close",
                        disabled: saving,
                        onclick: move |_| props.on_cancel.call(()),
                        "✕"
                    }
                }

                if let Some(error) = &props.error {
                    div { class: "alert alert-error", "{error}" }
                }

                // Fields
                div {
                    class: "form-grid",
                    for field in schema.fields.iter() {
                        FieldWidget {
                            key: "{field.name}",
                            field: field,
                            form: form,
                            references: props.references.clone(),
                            disabled: saving,
                        }
                    }
                }

                // Actions
                div {
                    class: "dialog-actions",
                    button {
                        class: "btn btn-secondary",
                        disabled: saving,
                        onclick: move |_| props.on_cancel.call(()),
                        "Cancelar"
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: saving,
                        onclick: handle_submit,
                        "{submit_label(editing, saving)}"
                    }
                }
            }
        }
    }
}

// ============================================================================
// Field Widget
// ============================================================================

#[derive(Props, Clone, PartialEq)]
struct FieldWidgetProps {
    field: &'static FieldSchema,
    form: Signal<FormController<'static>>,
    references: References,
    disabled: bool,
}

/// Input matching a field's kind, wired to the form controller
#[component]
fn FieldWidget(props: FieldWidgetProps) -> Element {
    let field = props.field;
    let name: &'static str = &field.name;
    let mut form = props.form;
    let disabled = props.disabled;

    let controller = form.read();
    let required = controller.is_required(name);
    let error = controller.visible_error(name).map(|e| e.to_string());
    let text = controller.text(name).to_string();
    let flag = controller.value(name).is_some_and(|v| v.as_flag());
    let ids = controller
        .value(name)
        .map(|v| v.ids().to_vec())
        .unwrap_or_default();
    let options = controller.schema().options_for(field, &props.references);
    drop(controller);

    let label = Some(field.label.clone());

    match &field.kind {
        FieldKind::TextArea => rsx! {
            TextArea {
                value: text,
                label: label,
                placeholder: field.placeholder.clone(),
                error: error,
                required: required,
                disabled: disabled,
                on_change: move |v: String| report(form.write().set_text(name, v)),
                on_blur: move |_| form.write().blur(name),
            }
        },
        FieldKind::Flag => rsx! {
            Checkbox {
                checked: flag,
                label: label,
                disabled: disabled,
                on_change: move |on: bool| {
                    let mut controller = form.write();
                    report(controller.set_flag(name, on));
                    controller.blur(name);
                },
            }
        },
        FieldKind::Select(_) | FieldKind::Reference { .. } => rsx! {
            Select {
                value: text,
                options: options,
                label: label,
                placeholder: field.placeholder.clone(),
                error: error,
                required: required,
                disabled: disabled,
                on_change: move |v: String| {
                    let mut controller = form.write();
                    report(controller.set_text(name, v));
                    controller.blur(name);
                },
                on_blur: move |_| form.write().blur(name),
            }
        },
        FieldKind::MultiReference { .. } => rsx! {
            CheckboxList {
                selected: ids,
                options: options,
                label: label,
                error: error,
                disabled: disabled,
                on_toggle: move |id| {
                    let mut controller = form.write();
                    report(controller.toggle_id(name, id));
                    controller.blur(name);
                },
            }
        },
        kind => rsx! {
            TextInput {
                value: text,
                label: label,
                placeholder: field.placeholder.clone(),
                error: error,
                required: required,
                disabled: disabled,
                input_type: kind.input_type().to_string(),
                autocomplete: autocomplete_for(kind).map(str::to_string),
                on_change: move |v: String| report(form.write().set_text(name, v)),
                on_blur: move |_| form.write().blur(name),
            }
        },
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn report(result: AdminResult<()>) {
    if let Err(e) = result {
        tracing::warn!("Form update rejected: {}", e);
    }
}

fn form_title(schema: &EntitySchema, editing: bool) -> String {
    if editing {
        format!("Editar {}", schema.singular)
    } else {
        format!("Crear {}", schema.singular)
    }
}

fn submit_label(editing: bool, saving: bool) -> &'static str {
    match (editing, saving) {
        (_, true) => "Guardando...",
        (true, false) => "Guardar cambios",
        (false, false) => "Crear",
    }
}

/// Passwords typed into an editor are never offered for autofill
fn autocomplete_for(kind: &FieldKind) -> Option<&'static str> {
    match kind {
        FieldKind::Password => Some("new-password"),
        FieldKind::Email => Some("email"),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
