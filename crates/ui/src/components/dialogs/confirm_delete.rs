//! # Confirm Delete Dialog Component
//!
//! Asks before a record is deleted. The page owns the actual request; the
//! dialog only reports the decision and stays locked while it runs.

use dioxus::prelude::*;

use super::modal::Modal;

// ============================================================================
// Component Props
// ============================================================================

#[derive(Props, Clone, PartialEq)]
pub struct ConfirmDeleteDialogProps {
    /// Question shown to the user, e.g. `¿Eliminar área "Piscina"?`
    pub message: String,

    /// A delete request is in flight
    #[props(default = false)]
    pub busy: bool,

    #[props(default)]
    pub on_confirm: EventHandler<()>,

    #[props(default)]
    pub on_cancel: EventHandler<()>,
}

// ============================================================================
// Main Component
// ============================================================================

/// Confirmation dialog for record deletion
#[component]
pub fn ConfirmDeleteDialog(props: ConfirmDeleteDialogProps) -> Element {
    let busy = props.busy;

    rsx! {
        Modal {
            size: "modal-sm",
            busy: busy,
            on_dismiss: move |_| props.on_cancel.call(()),

            div {
                class: "confirm-delete-dialog",

                div {
                    class: "confirm-header",
                    span { class: "confirm-icon", "⚠️" }
                    div {
                        h2 { class: "confirm-title", "Confirmar eliminación" }
                        p { class: "confirm-message", "{props.message}" }
                    }
                }

                p {
                    class: "confirm-warning",
                    "Esta acción no se puede deshacer."
                }

                div {
                    class: "dialog-actions",
                    button {
                        class: "btn btn-secondary",
                        disabled: busy,
                        onclick: move |_| props.on_cancel.call(()),
                        "Cancelar"
                    }
                    button {
                        class: "btn btn-danger",
                        disabled: busy,
                        onclick: move |_| {
                            if !busy {
                                props.on_confirm.call(());
                            }
                        },
                        "{confirm_label(busy)}"
                    }
                }
            }
        }
    }
}

fn confirm_label(busy: bool) -> &'static str {
    if busy { "Eliminando..." } else { "Eliminar" }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_label() {
        assert_eq!(confirm_label(false), "Eliminar");
        assert_eq!(confirm_label(true), "Eliminando...");
    }
}
