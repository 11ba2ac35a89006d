//! # Input Components
//!
//! Form inputs used by the record editor and the login page:
//! - **TextInput**: single-line input (text, email, password, number, date, time)
//! - **TextArea**: multi-line text
//! - **Select**: dropdown over `SelectOption`s with an optional empty choice
//! - **Checkbox**: boolean checkbox
//! - **CheckboxList**: multi-selection over reference options
//!
//! Every input renders its label, a required marker and, when given, the
//! error line below it.

use condo_core::RecordId;
use condo_model::SelectOption;
use dioxus::prelude::*;

// ============================================================================
// Text Input Component
// ============================================================================

/// Properties for TextInput component
#[derive(Props, Clone, PartialEq)]
pub struct TextInputProps {
    /// Input value
    pub value: String,

    /// Label text (optional)
    #[props(default)]
    pub label: Option<String>,

    #[props(default)]
    pub placeholder: Option<String>,

    /// Error message (shows error state)
    #[props(default)]
    pub error: Option<String>,

    #[props(default = false)]
    pub required: bool,

    #[props(default = false)]
    pub disabled: bool,

    /// HTML input type
    #[props(default = "text".to_string())]
    pub input_type: String,

    /// Browser autocomplete hint
    #[props(default)]
    pub autocomplete: Option<String>,

    /// Change handler
    #[props(default)]
    pub on_change: EventHandler<String>,

    /// Blur handler
    #[props(default)]
    pub on_blur: EventHandler<()>,

    /// Enter key handler
    #[props(default)]
    pub on_enter: EventHandler<()>,
}

/// Single-line input component
#[component]
pub fn TextInput(props: TextInputProps) -> Element {
    let input_class = build_input_class(props.error.is_some(), props.disabled);

    rsx! {
        div {
            class: "input-group",

            if let Some(label) = &props.label {
                FieldLabel { text: label.clone(), required: props.required }
            }

            input {
                class: "{input_class}",
                r#type: "{props.input_type}",
                value: "{props.value}",
                placeholder: props.placeholder.as_deref().unwrap_or(""),
                autocomplete: props.autocomplete.as_deref().unwrap_or("off"),
                disabled: props.disabled,
                oninput: move |e| props.on_change.call(e.value()),
                onblur: move |_| props.on_blur.call(()),
                onkeydown: move |e| {
                    if e.key() == Key::Enter {
                        props.on_enter.call(());
                    }
                },
            }

            ErrorLine { error: props.error.clone() }
        }
    }
}

// ============================================================================
// Text Area Component
// ============================================================================

/// Properties for TextArea component
#[derive(Props, Clone, PartialEq)]
pub struct TextAreaProps {
    pub value: String,

    #[props(default)]
    pub label: Option<String>,

    #[props(default)]
    pub placeholder: Option<String>,

    #[props(default)]
    pub error: Option<String>,

    /// Number of visible rows
    #[props(default = 3)]
    pub rows: usize,

    #[props(default = false)]
    pub required: bool,

    #[props(default = false)]
    pub disabled: bool,

    #[props(default)]
    pub on_change: EventHandler<String>,

    #[props(default)]
    pub on_blur: EventHandler<()>,
}

/// Multi-line text input component
#[component]
pub fn TextArea(props: TextAreaProps) -> Element {
    let textarea_class = build_textarea_class(props.error.is_some(), props.disabled);

    rsx! {
        div {
            class: "input-group",

            if let Some(label) = &props.label {
                FieldLabel { text: label.clone(), required: props.required }
            }

            textarea {
                class: "{textarea_class}",
                rows: "{props.rows}",
                placeholder: props.placeholder.as_deref().unwrap_or(""),
                disabled: props.disabled,
                value: "{props.value}",
                oninput: move |e| props.on_change.call(e.value()),
                onblur: move |_| props.on_blur.call(()),
            }

            ErrorLine { error: props.error.clone() }
        }
    }
}

// ============================================================================
// Select Component
// ============================================================================

/// Properties for Select component
#[derive(Props, Clone, PartialEq)]
pub struct SelectProps {
    /// Selected value; empty means nothing selected
    pub value: String,

    pub options: Vec<SelectOption>,

    #[props(default)]
    pub label: Option<String>,

    /// Text of the empty choice; without it the empty choice is "Seleccionar"
    #[props(default)]
    pub placeholder: Option<String>,

    #[props(default)]
    pub error: Option<String>,

    #[props(default = false)]
    pub required: bool,

    #[props(default = false)]
    pub disabled: bool,

    #[props(default)]
    pub on_change: EventHandler<String>,

    #[props(default)]
    pub on_blur: EventHandler<()>,
}

/// Dropdown selection component
#[component]
pub fn Select(props: SelectProps) -> Element {
    let select_class = build_select_class(props.error.is_some(), props.disabled);
    let placeholder = props
        .placeholder
        .clone()
        .unwrap_or_else(|| "Seleccionar".to_string());
    let missing = is_missing_option(&props.value, &props.options);

    rsx! {
        div {
            class: "input-group",

            if let Some(label) = &props.label {
                FieldLabel { text: label.clone(), required: props.required }
            }

            select {
                class: "{select_class}",
                disabled: props.disabled,
                onchange: move |e| props.on_change.call(e.value()),
                onblur: move |_| props.on_blur.call(()),

                option {
                    value: "",
                    selected: props.value.is_empty(),
                    "{placeholder}"
                }

                // Keep an unknown current value selectable instead of silently
                // showing the empty choice
                if missing {
                    option {
                        value: "{props.value}",
                        selected: true,
                        "{props.value}"
                    }
                }

                for option in props.options.iter() {
                    option {
                        key: "{option.value}",
                        value: "{option.value}",
                        selected: props.value == option.value,
                        "{option.label}"
                    }
                }
            }

            ErrorLine { error: props.error.clone() }
        }
    }
}

// ============================================================================
// Checkbox Component
// ============================================================================

/// Properties for Checkbox component
#[derive(Props, Clone, PartialEq)]
pub struct CheckboxProps {
    pub checked: bool,

    #[props(default)]
    pub label: Option<String>,

    #[props(default = false)]
    pub disabled: bool,

    #[props(default)]
    pub on_change: EventHandler<bool>,
}

/// Boolean checkbox component
#[component]
pub fn Checkbox(props: CheckboxProps) -> Element {
    let checkbox_class = build_checkbox_class(props.disabled);

    rsx! {
        label {
            class: "{checkbox_class}",
            input {
                r#type: "checkbox",
                checked: props.checked,
                disabled: props.disabled,
                onchange: move |_| {
                    if !props.disabled {
                        props.on_change.call(!props.checked);
                    }
                },
            }
            if let Some(label) = &props.label {
                span { "{label}" }
            }
        }
    }
}

// ============================================================================
// Checkbox List Component
// ============================================================================

/// Properties for CheckboxList component
#[derive(Props, Clone, PartialEq)]
pub struct CheckboxListProps {
    /// Currently selected ids
    pub selected: Vec<RecordId>,

    pub options: Vec<SelectOption>,

    #[props(default)]
    pub label: Option<String>,

    #[props(default)]
    pub error: Option<String>,

    #[props(default = false)]
    pub disabled: bool,

    /// Called with the id whose box was clicked
    #[props(default)]
    pub on_toggle: EventHandler<RecordId>,
}

/// Multi-selection over reference options
#[component]
pub fn CheckboxList(props: CheckboxListProps) -> Element {
    rsx! {
        div {
            class: "input-group",

            if let Some(label) = &props.label {
                FieldLabel { text: label.clone(), required: false }
            }

            div {
                class: "checkbox-list",
                if props.options.is_empty() {
                    span { class: "muted", "Sin opciones" }
                }
                for option in props.options.iter() {
                    if let Ok(id) = option.value.parse::<RecordId>() {
                        Checkbox {
                            key: "{option.value}",
                            checked: props.selected.contains(&id),
                            label: Some(option.label.clone()),
                            disabled: props.disabled,
                            on_change: move |_| props.on_toggle.call(id),
                        }
                    }
                }
            }

            ErrorLine { error: props.error.clone() }
        }
    }
}

// ============================================================================
// Shared pieces
// ============================================================================

#[component]
fn FieldLabel(text: String, required: bool) -> Element {
    rsx! {
        label {
            class: "input-label",
            "{text}"
            if required {
                span { class: "required-mark", "*" }
            }
        }
    }
}

#[component]
fn ErrorLine(error: Option<String>) -> Element {
    rsx! {
        if let Some(error) = error {
            p { class: "input-error-text", "{error}" }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn build_input_class(has_error: bool, disabled: bool) -> String {
    let mut classes = vec!["input"];
    if has_error {
        classes.push("input-invalid");
    }
    if disabled {
        classes.push("input-disabled");
    }
    classes.join(" ")
}

fn build_textarea_class(has_error: bool, disabled: bool) -> String {
    format!("{} input-textarea", build_input_class(has_error, disabled))
}

fn build_select_class(has_error: bool, disabled: bool) -> String {
    format!("{} input-select", build_input_class(has_error, disabled))
}

fn build_checkbox_class(disabled: bool) -> String {
    if disabled {
        "checkbox checkbox-disabled".to_string()
    } else {
        "checkbox".to_string()
    }
}

/// A non-empty value that none of the options carries
fn is_missing_option(value: &str, options: &[SelectOption]) -> bool {
    !value.is_empty() && !options.iter().any(|o| o.value == value)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_input_class() {
        let class = build_input_class(false, false);
        assert_eq!(class, "input");
    }

    #[test]
    fn test_build_input_class_error() {
        assert!(build_input_class(true, false).contains("input-invalid"));
        assert!(build_select_class(true, false).contains("input-invalid"));
    }

    #[test]
    fn test_build_input_class_disabled() {
        assert!(build_input_class(false, true).contains("input-disabled"));
        assert!(build_textarea_class(false, true).ends_with("input-textarea"));
        assert!(build_checkbox_class(true).contains("checkbox-disabled"));
    }

    #[test]
    fn test_missing_option() {
        let options = SelectOption::list(&["COCHE", "MOTO"]);
        assert!(!is_missing_option("", &options));
        assert!(!is_missing_option("MOTO", &options));
        assert!(is_missing_option("CAMION", &options));
    }
}
