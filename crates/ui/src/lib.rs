//! # Condo UI
//!
//! Dioxus Desktop UI for the condominium admin dashboard.
//!
//! ## Features
//!
//! - Login with role-based access to the admin panel
//! - Sidebar menu grouped by area of administration
//! - Sortable tables for every catalog entity
//! - Schema-driven create/edit forms and delete confirmation
//! - Weekly availability grid for common-area schedules
//!

// ============================================================================
// Modules
// ============================================================================

pub mod app;
pub mod components;
pub mod pages;
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

// Re-export internal crates for convenience
pub use condo_client;
pub use condo_core;
pub use condo_model;

// Re-export main components
pub use app::App;
pub use pages::{EntityPage, HomePage, LoginPage, RestrictedPage};
pub use state::{
    APP_STATE, AppState, Editor, Page, PageState, View, handle_client_error, init_app_state,
    resolve_view,
};

// Re-export components
pub use components::{
    Checkbox, CheckboxList, ConfirmDeleteDialog, DataTable, RecordEditor, ScheduleGrid, Select,
    TextArea, TextInput,
};

use condo_client::ApiClient;

// ============================================================================
// Constants
// ============================================================================

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = "Condo Admin";

/// Application display title
pub const TITLE: &str = "Condo Admin - Panel de Administración";

/// CSS styles for the application, included at build time
const STYLES: &str = include_str!("../../../assets/styles/main.css");

// ============================================================================
// Launch Function
// ============================================================================

/// Launch the desktop application
///
/// Reads the API configuration and the stored session from the
/// environment, then starts the UI with the client in context.
///
/// # Example
///
/// ```rust,ignore
/// fn main() -> anyhow::Result<()> {
///     condo_ui::launch()
/// }
/// ```
pub fn launch() -> anyhow::Result<()> {
    launch_with_config(TITLE, 1400.0, 900.0)
}

/// Launch with custom window title and size
pub fn launch_with_config(title: &str, width: f64, height: f64) -> anyhow::Result<()> {
    tracing::info!("Starting {} v{}", NAME, VERSION);

    let api: ApiClient = condo_client::connect_from_env()?;
    tracing::info!("API base: {}", api.config().api_base);

    // Initialize application state from the stored session
    init_app_state(api.session());

    // Build custom head with embedded CSS
    let custom_head = format!(r#"<style type="text/css">{}</style>"#, STYLES);

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(
                    dioxus::desktop::WindowBuilder::new()
                        .with_title(title)
                        .with_resizable(true)
                        .with_inner_size(dioxus::desktop::LogicalSize::new(width, height))
                        .with_min_inner_size(dioxus::desktop::LogicalSize::new(800.0, 600.0)),
                )
                .with_menu(None)
                .with_custom_head(custom_head),
        )
        // Read back with `use_context::<ApiClient>()`
        .with_context(api)
        .launch(App);

    Ok(())
}

/// Get the embedded CSS styles
pub fn get_styles() -> &'static str {
    STYLES
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "Condo Admin");
    }

    #[test]
    fn test_title() {
        assert!(TITLE.contains("Condo Admin"));
    }

    #[test]
    fn test_styles_loaded() {
        assert!(!STYLES.is_empty());
        assert!(STYLES.contains(".data-table"));
        assert!(STYLES.contains(".sm\\:table-cell"));
    }
}
