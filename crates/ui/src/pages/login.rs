//! Login Page Component
//!
//! Credentials form. A successful login stores the session and sends the
//! user to the dashboard; the route guard then decides what they may see.

use condo_client::ApiClient;
use dioxus::prelude::*;

use crate::components::TextInput;
use crate::state::{APP_STATE, Page};

/// Credentials form
#[component]
pub fn LoginPage() -> Element {
    let api = use_context::<ApiClient>();
    let mut correo = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let submit = move || {
        if *busy.peek() {
            return;
        }
        let email = correo.peek().trim().to_string();
        let secret = password.peek().clone();
        if let Some(message) = missing_credentials(&email, &secret) {
            error.set(Some(message.to_string()));
            return;
        }

        busy.set(true);
        error.set(None);
        let api = api.clone();
        spawn(async move {
            match api.login(&email, &secret).await {
                Ok(user) => {
                    tracing::info!("Logged in as {}", user.full_name());
                    let mut state = APP_STATE.write();
                    state.sync_session(api.session());
                    state.navigate(Page::Home);
                }
                Err(e) => {
                    tracing::warn!("Login failed: {}", e);
                    error.set(Some(e.user_message()));
                    password.set(String::new());
                }
            }
            busy.set(false);
        });
    };

    let mut submit_click = submit.clone();
    let mut submit_enter = submit.clone();
    let mut submit_form = submit;
    let is_busy = *busy.read();

    rsx! {
        div {
            class: "login-screen",

            form {
                class: "login-card",
                onsubmit: move |e| {
                    e.prevent_default();
                    submit_form();
                },

                h1 { class: "login-title", "Iniciar sesión" }

                if let Some(message) = error.read().clone() {
                    div { class: "alert alert-error", "{message}" }
                }

                TextInput {
                    value: correo.read().clone(),
                    placeholder: Some("Correo electrónico".to_string()),
                    input_type: "email".to_string(),
                    autocomplete: Some("username".to_string()),
                    disabled: is_busy,
                    on_change: move |v| correo.set(v),
                }

                TextInput {
                    value: password.read().clone(),
                    placeholder: Some("Contraseña".to_string()),
                    input_type: "password".to_string(),
                    autocomplete: Some("current-password".to_string()),
                    disabled: is_busy,
                    on_change: move |v| password.set(v),
                    on_enter: move |_| submit_enter(),
                }

                button {
                    class: "btn btn-primary btn-block",
                    r#type: "button",
                    disabled: is_busy,
                    onclick: move |_| submit_click(),
                    if is_busy { "Entrando..." } else { "Entrar" }
                }
            }
        }
    }
}

fn missing_credentials(correo: &str, password: &str) -> Option<&'static str> {
    if correo.is_empty() || password.is_empty() {
        Some("Ingrese su correo y contraseña")
    } else {
        None
    }
}
