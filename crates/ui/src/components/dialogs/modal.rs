//! Modal frame shared by every dialog

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ModalProps {
    /// Extra width class for the panel
    #[props(default = "modal-md".to_string())]
    pub size: String,

    /// Clicking the backdrop; ignored while `busy`
    #[props(default)]
    pub on_dismiss: EventHandler<()>,

    #[props(default = false)]
    pub busy: bool,

    pub children: Element,
}

/// Backdrop plus centered panel
#[component]
pub fn Modal(props: ModalProps) -> Element {
    let busy = props.busy;

    rsx! {
        div {
            class: "modal-root",

            // Backdrop
            div {
                class: "modal-backdrop",
                onclick: move |_| {
                    if !busy {
                        props.on_dismiss.call(());
                    }
                }
            }

            div {
                class: "modal-panel {props.size}",
                onclick: move |e| e.stop_propagation(),
                {props.children}
            }
        }
    }
}
