//! Dashboard landing and the restricted-access notice

use dioxus::prelude::*;

use crate::state::{APP_STATE, Page};

/// Shortcut card on the landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HomeCard {
    icon: &'static str,
    title: &'static str,
    description: &'static str,
    entity: &'static str,
}

const CARDS: [HomeCard; 3] = [
    HomeCard {
        icon: "👤",
        title: "Usuarios",
        description: "Gestiona los usuarios registrados en el sistema.",
        entity: "cuentas",
    },
    HomeCard {
        icon: "🏢",
        title: "Residentes",
        description: "Administra la información de los residentes del condominio.",
        entity: "residentes",
    },
    HomeCard {
        icon: "🛠️",
        title: "Áreas Comunes",
        description: "Supervisa y organiza las áreas comunes y sus reservas.",
        entity: "areas",
    },
];

/// Dashboard landing page
#[component]
pub fn HomePage() -> Element {
    rsx! {
        div {
            class: "home-page",
            h1 { class: "home-title", "Bienvenido al Panel de Administración" }

            div {
                class: "home-cards",
                for card in CARDS {
                    button {
                        key: "{card.entity}",
                        class: "home-card",
                        onclick: move |_| APP_STATE.write().navigate(Page::Entity(card.entity)),
                        span { class: "home-card-icon", "{card.icon}" }
                        h2 { class: "home-card-title", "{card.title}" }
                        p { class: "home-card-text", "{card.description}" }
                    }
                }
            }
        }
    }
}

/// Shown to a logged-in user whose role has no admin access
#[component]
pub fn RestrictedPage(on_logout: EventHandler<()>) -> Element {
    let state = APP_STATE.read();
    let role = state
        .session
        .user
        .as_ref()
        .map(|u| u.role().to_string())
        .unwrap_or_default();
    drop(state);

    rsx! {
        div {
            class: "page-message",
            span { class: "page-message-icon", "🔒" }
            h2 { "Acceso restringido" }
            p {
                class: "muted",
                "Su rol ({role}) no tiene acceso al panel de administración."
            }
            button {
                class: "btn btn-secondary",
                onclick: move |_| on_logout.call(()),
                "Cerrar sesión"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use condo_model::catalog;

    #[test]
    fn test_cards_point_at_catalog_entities() {
        for card in CARDS {
            assert!(catalog().get(card.entity).is_ok(), "{}", card.entity);
        }
    }
}
