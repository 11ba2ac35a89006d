//! Main Application Component for the admin dashboard
//!
//! Root Dioxus component. It applies the route guard to the current page
//! and renders either the login screen, the restricted-access notice or the
//! admin layout: sidebar menu, top bar with the user chips, and content.

use condo_client::ApiClient;
use condo_model::{MENU, MenuGroup};
use dioxus::prelude::*;

use crate::pages::{EntityPage, HomePage, LoginPage, RestrictedPage};
use crate::state::{APP_STATE, Page, View};

// ============================================================================
// Main App Component
// ============================================================================

/// Root application component
#[component]
pub fn App() -> Element {
    let api = use_context::<ApiClient>();

    use_effect(|| {
        tracing::info!("Condo Admin UI initialized");
    });

    let view = APP_STATE.read().view();

    let logout = move |_: ()| {
        api.logout();
        let mut state = APP_STATE.write();
        state.sync_session(api.session());
        state.open_group = None;
        state.navigate(Page::Login);
    };

    match view {
        View::Login => rsx! { LoginPage {} },
        View::Restricted => rsx! {
            div {
                class: "app-container",
                RestrictedPage { on_logout: logout }
            }
        },
        View::Page(page) => rsx! {
            div {
                class: "app-container admin-layout",

                Sidebar { current: page, on_logout: logout }

                div {
                    class: "main-column",
                    TopBar { current: page }
                    MainContent { page: page }
                }
            }
        },
    }
}

// ============================================================================
// Top Bar Component
// ============================================================================

/// Page title and logged-in user chips
#[component]
fn TopBar(current: Page) -> Element {
    let state = APP_STATE.read();
    let (name, role) = state
        .session
        .user
        .as_ref()
        .map(|u| (u.full_name(), u.role().to_string()))
        .unwrap_or_default();
    drop(state);

    rsx! {
        header {
            class: "topbar",
            h1 { class: "topbar-title", "{current.display_name()}" }
            div {
                class: "user-chips",
                if !name.is_empty() {
                    span { class: "chip", "{name}" }
                }
                if !role.is_empty() {
                    span { class: "chip chip-role", "{role}" }
                }
            }
        }
    }
}

// ============================================================================
// Sidebar Component
// ============================================================================

/// Left navigation built from the menu groups
#[component]
fn Sidebar(current: Page, on_logout: EventHandler<()>) -> Element {
    let open_group = APP_STATE.read().open_group;

    rsx! {
        aside {
            class: "sidebar",

            div {
                class: "sidebar-header",
                span { class: "sidebar-title", "Administración" }
            }

            nav {
                class: "sidebar-nav",

                SidebarLink {
                    label: "🏠 Dashboard",
                    page: Page::Home,
                    active: current == Page::Home,
                }

                for group in MENU.iter() {
                    SidebarGroup {
                        key: "{group.title}",
                        group: *group,
                        open: open_group == Some(group.title),
                        current: current,
                    }
                }
            }

            // Footer actions
            div {
                class: "sidebar-footer",
                button {
                    class: "btn btn-ghost",
                    onclick: move |_| APP_STATE.write().navigate(Page::Home),
                    "🏡 Home"
                }
                button {
                    class: "btn btn-danger",
                    onclick: move |_| on_logout.call(()),
                    "Cerrar sesión"
                }
            }
        }
    }
}

/// Collapsible menu group; opening one closes the others
#[component]
fn SidebarGroup(group: MenuGroup, open: bool, current: Page) -> Element {
    let title = group.title;

    rsx! {
        div {
            class: "sidebar-group",
            button {
                class: "sidebar-group-header",
                onclick: move |_| APP_STATE.write().toggle_group(title),
                span { "{group.icon} {group.title}" }
                span { class: "group-indicator", "{group_indicator(open)}" }
            }
            if open {
                div {
                    class: "sidebar-group-items",
                    for item in group.items.iter() {
                        SidebarLink {
                            key: "{item.entity}",
                            label: item.label,
                            page: Page::Entity(item.entity),
                            active: current == Page::Entity(item.entity),
                        }
                    }
                }
            }
        }
    }
}

/// Single navigation entry
#[component]
fn SidebarLink(label: &'static str, page: Page, active: bool) -> Element {
    let class = if active {
        "sidebar-link active"
    } else {
        "sidebar-link"
    };

    rsx! {
        button {
            class: "{class}",
            onclick: move |_| APP_STATE.write().navigate(page),
            "{label}"
        }
    }
}

// ============================================================================
// Main Content Component
// ============================================================================

/// Page body for the current navigation target
#[component]
fn MainContent(page: Page) -> Element {
    rsx! {
        main {
            class: "main-content",
            match page {
                Page::Home | Page::Login => rsx! { HomePage {} },
                Page::Entity(entity) => rsx! { EntityPage { key: "{entity}", entity: entity } },
            }
        }
    }
}

fn group_indicator(open: bool) -> &'static str {
    if open { "▲" } else { "▼" }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_indicator() {
        assert_eq!(group_indicator(true), "▲");
        assert_eq!(group_indicator(false), "▼");
    }

    #[test]
    fn test_menu_groups_have_titles() {
        assert!(MENU.iter().all(|g: &MenuGroup| !g.title.is_empty()));
    }
}
