//! Application State Management for the admin dashboard
//!
//! `APP_STATE` holds what the shell needs across pages: the active page,
//! sidebar state and a mirror of the login session. Each entity page owns a
//! `PageState` for its collection, editor and delete confirmation; it is
//! dropped when the page unmounts.

use condo_client::{Access, ClientError, Session, SessionContext, authorize_admin};
use condo_core::{AdminError, AdminResult, Record, RecordId};
use condo_model::{EntitySchema, References};
use dioxus::prelude::*;

// ============================================================================
// Page Navigation
// ============================================================================

/// Application pages/views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    /// Credentials form
    Login,
    /// Dashboard landing
    #[default]
    Home,
    /// Table and editor for a catalog entity
    Entity(&'static str),
}

impl Page {
    /// Get the display name for this page
    pub fn display_name(&self) -> &'static str {
        match self {
            Page::Login => "Iniciar sesión",
            Page::Home => "Dashboard",
            Page::Entity(name) => condo_model::catalog()
                .get(name)
                .map(|e| e.title.as_str())
                .unwrap_or(*name),
        }
    }

    /// Whether the page sits behind the admin guard
    pub fn is_protected(&self) -> bool {
        !matches!(self, Page::Login)
    }
}

/// What the shell renders for `page` given the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    /// Logged in without an admin role
    Restricted,
    Page(Page),
}

/// Apply the route guard to a navigation target
pub fn resolve_view(page: Page, session: &Session) -> View {
    if !page.is_protected() {
        return if session.is_complete() {
            resolve_view(Page::Home, session)
        } else {
            View::Login
        };
    }
    match authorize_admin(session) {
        Access::Granted => View::Page(page),
        Access::RedirectLogin => View::Login,
        Access::RedirectHome => View::Restricted,
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Global shell state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub page: Page,

    /// Sidebar group currently expanded; one at most
    pub open_group: Option<&'static str>,

    /// Copy of the session, refreshed after login, logout and 401s
    pub session: Session,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigate to a page
    pub fn navigate(&mut self, page: Page) {
        tracing::debug!("Navigating to {:?}", page);
        self.page = page;
    }

    /// Expand a sidebar group, or collapse it if it was open
    pub fn toggle_group(&mut self, title: &'static str) {
        self.open_group = if self.open_group == Some(title) {
            None
        } else {
            Some(title)
        };
    }

    /// Re-read the shared session
    pub fn sync_session(&mut self, session: &SessionContext) {
        self.session = session.snapshot();
    }

    pub fn view(&self) -> View {
        resolve_view(self.page, &self.session)
    }
}

// ============================================================================
// Global State Context
// ============================================================================

pub static APP_STATE: GlobalSignal<AppState> = Signal::global(AppState::new);

/// Seed the global state from the loaded session
pub fn init_app_state(session: &SessionContext) {
    let mut state = APP_STATE.write();
    state.sync_session(session);
    if !state.session.is_complete() {
        state.navigate(Page::Login);
    }
}

/// Surface a failed call: 401s refresh the session so the shell shows the
/// login view, everything else yields the banner text
pub fn handle_client_error(err: &ClientError, session: &SessionContext) -> String {
    if err.is_unauthorized() {
        APP_STATE.write().sync_session(session);
    }
    err.user_message()
}

// ============================================================================
// Per-page State
// ============================================================================

/// Which editor, if any, is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Editor {
    #[default]
    Closed,
    Create,
    Edit(RecordId),
}

impl Editor {
    /// Component key of the open editor
    ///
    /// The form state lives inside the editor component, so a different
    /// key is what discards unsaved edits when another record is bound.
    pub fn key(&self) -> String {
        match self {
            Editor::Closed => "closed".to_string(),
            Editor::Create => "create".to_string(),
            Editor::Edit(id) => format!("edit-{id}"),
        }
    }
}

/// Collection, editor and delete confirmation of one entity page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    pub records: Vec<Record>,
    pub references: References,
    pub loading: bool,
    pub saving: bool,
    /// Banner text of the last failed call
    pub error: Option<String>,
    pub editor: Editor,
    pub pending_delete: Option<RecordId>,
}

impl PageState {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// A fetch is about to start
    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// A fetch finished; a failure keeps the previously loaded data
    pub fn finish_fetch(&mut self, result: Result<(Vec<Record>, References), String>) {
        self.loading = false;
        match result {
            Ok((records, references)) => {
                self.records = records;
                self.references = references;
            }
            Err(message) => {
                tracing::error!("Fetch failed, keeping {} stale records", self.records.len());
                self.error = Some(message);
            }
        }
    }

    pub fn open_create(&mut self) {
        self.editor = Editor::Create;
    }

    /// Open the editor on a loaded record
    pub fn open_edit(&mut self, schema: &EntitySchema, id: RecordId) -> AdminResult<()> {
        schema.require_record(&self.records, id)?;
        self.editor = Editor::Edit(id);
        Ok(())
    }

    pub fn close_editor(&mut self) {
        self.editor = Editor::Closed;
    }

    /// Record bound to the open editor
    pub fn editing_record(&self, schema: &EntitySchema) -> Option<&Record> {
        match self.editor {
            Editor::Edit(id) => schema.find_record(&self.records, id),
            _ => None,
        }
    }

    /// Ask for confirmation before deleting a loaded record
    pub fn request_delete(&mut self, schema: &EntitySchema, id: RecordId) -> AdminResult<()> {
        if schema.read_only {
            return Err(AdminError::validation(format!(
                "{} is read-only",
                schema.title
            )));
        }
        schema.require_record(&self.records, id)?;
        self.pending_delete = Some(id);
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Confirmation prompt for the pending delete
    pub fn delete_prompt(&self, schema: &EntitySchema) -> Option<String> {
        let id = self.pending_delete?;
        schema
            .find_record(&self.records, id)
            .map(|r| schema.confirm_delete_message(r))
    }

    /// A write is about to start
    pub fn begin_write(&mut self) {
        self.saving = true;
        self.error = None;
    }

    /// A write finished; returns whether the page should refetch
    pub fn finish_write(&mut self, result: Result<(), String>) -> bool {
        self.saving = false;
        match result {
            Ok(()) => {
                self.editor = Editor::Closed;
                self.pending_delete = None;
                true
            }
            Err(message) => {
                self.error = Some(message);
                false
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use condo_client::UserProfile;
    use condo_model::catalog;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn records() -> Vec<Record> {
        vec![
            json!({"id": 1, "nombre": "Piscina"}).as_object().cloned().unwrap(),
            json!({"id": 2, "nombre": "Gimnasio"}).as_object().cloned().unwrap(),
        ]
    }

    fn session(role: &str) -> Session {
        Session::new(
            "tok",
            UserProfile {
                rol: Some(role.into()),
                ..UserProfile::default()
            },
        )
    }

    #[test]
    fn test_failed_refetch_keeps_stale_data() {
        let mut page = PageState::new();
        page.finish_fetch(Ok((records(), References::new())));

        page.begin_fetch();
        assert!(page.loading);
        page.finish_fetch(Err("Error".into()));

        assert!(!page.loading);
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.error.as_deref(), Some("Error"));
    }

    #[test]
    fn test_editor_binding() {
        let schema = catalog().get("areas").unwrap();
        let mut page = PageState::new();
        page.finish_fetch(Ok((records(), References::new())));

        page.open_edit(schema, 2).unwrap();
        assert_eq!(page.editing_record(schema).unwrap()["nombre"], "Gimnasio");
        assert!(page.open_edit(schema, 9).unwrap_err().is_not_found());
        assert_eq!(page.editor, Editor::Edit(2));

        page.open_create();
        assert!(page.editing_record(schema).is_none());
    }

    #[test]
    fn test_editor_key_changes_with_bound_record() {
        assert_ne!(Editor::Edit(5).key(), Editor::Edit(6).key());
        assert_ne!(Editor::Create.key(), Editor::Edit(5).key());
        assert_eq!(Editor::Edit(5).key(), Editor::Edit(5).key());

        let schema = catalog().get("areas").unwrap();
        let mut page = PageState::new();
        page.finish_fetch(Ok((records(), References::new())));
        page.open_edit(schema, 1).unwrap();
        let first = page.editor.key();
        page.open_edit(schema, 2).unwrap();
        assert_ne!(page.editor.key(), first);
    }

    #[test]
    fn test_delete_confirmation() {
        let schema = catalog().get("areas").unwrap();
        let mut page = PageState::new();
        page.finish_fetch(Ok((records(), References::new())));

        page.request_delete(schema, 1).unwrap();
        assert_eq!(
            page.delete_prompt(schema).as_deref(),
            Some("¿Eliminar área \"Piscina\"?")
        );

        page.begin_write();
        assert!(!page.finish_write(Err("No se puede".into())));
        assert_eq!(page.pending_delete, Some(1));

        page.begin_write();
        assert!(page.finish_write(Ok(())));
        assert_eq!(page.pending_delete, None);
        assert_eq!(page.error, None);
    }

    #[test]
    fn test_read_only_entity_refuses_delete() {
        let schema = catalog().get("bitacora").unwrap();
        let mut page = PageState::new();
        page.finish_fetch(Ok((records(), References::new())));
        assert!(page.request_delete(schema, 1).unwrap_err().is_validation());
    }

    #[test]
    fn test_view_resolution() {
        let areas = Page::Entity("areas");
        assert_eq!(resolve_view(areas, &Session::default()), View::Login);
        assert_eq!(resolve_view(areas, &session("admin")), View::Page(areas));
        assert_eq!(resolve_view(areas, &session("RESIDENTE")), View::Restricted);
        assert_eq!(resolve_view(Page::Login, &session("ADMIN")), View::Page(Page::Home));
        assert_eq!(resolve_view(Page::Login, &session("RESIDENTE")), View::Restricted);
        assert_eq!(resolve_view(Page::Login, &Session::default()), View::Login);
    }

    #[test]
    fn test_sidebar_groups() {
        let mut state = AppState::new();
        state.toggle_group("Comunidad");
        state.toggle_group("Personal");
        assert_eq!(state.open_group, Some("Personal"));
        state.toggle_group("Personal");
        assert_eq!(state.open_group, None);
        assert_eq!(Page::Entity("horarios").display_name(), "Horarios");
    }
}
