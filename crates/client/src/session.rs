//! Login session
//!
//! The session (token plus user profile) is the only state shared between
//! the API client, the route guard and the UI. It lives in a
//! `SessionContext` handle that is passed explicitly to each of them, and
//! is mirrored to a `SessionStore` so it survives restarts.

use condo_core::{AdminError, AdminResult, Persistable, RecordId};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

// ============================================================================
// Session data
// ============================================================================

/// The logged-in user as returned by the login endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<RecordId>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub nombre: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub apellido: String,

    #[serde(default)]
    pub correo: Option<String>,

    /// Role name, compared case-insensitively by the guard
    #[serde(default)]
    pub rol: Option<String>,
}

impl UserProfile {
    /// `nombre apellido`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombre, self.apellido).trim().to_string()
    }

    /// Role or an empty string
    pub fn role(&self) -> &str {
        self.rol.as_deref().unwrap_or("")
    }
}

/// The backend sends `null` for names it never collected
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Token and user; either may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl Session {
    /// A complete session
    pub fn new(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    /// Both a token and a user are present
    pub fn is_complete(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty()) && self.user.is_some()
    }
}

impl Persistable for Session {}

// ============================================================================
// Stores
// ============================================================================

/// Durable backing for the session
pub trait SessionStore: Send + Sync {
    /// Read the stored session; a missing session is empty, not an error
    fn load(&self) -> AdminResult<Session>;

    /// Replace the stored session
    fn save(&self, session: &Session) -> AdminResult<()>;

    /// Remove the stored session
    fn clear(&self) -> AdminResult<()>;
}

/// JSON file in the user config directory
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> AdminResult<Session> {
        if !self.path.exists() {
            return Ok(Session::default());
        }
        Session::load_from_file(&self.path)
    }

    fn save(&self, session: &Session) -> AdminResult<()> {
        session.save_to_file(&self.path)
    }

    fn clear(&self) -> AdminResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AdminError::FileWrite {
                path: self.path.clone(),
                message: e.to_string(),
            }),
        }
    }
}

/// In-process store for tests and one-shot commands
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Session>,
}

impl MemorySessionStore {
    pub fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> AdminResult<Session> {
        Ok(self.session.lock().map_err(poisoned)?.clone())
    }

    fn save(&self, session: &Session) -> AdminResult<()> {
        *self.session.lock().map_err(poisoned)? = session.clone();
        Ok(())
    }

    fn clear(&self) -> AdminResult<()> {
        *self.session.lock().map_err(poisoned)? = Session::default();
        Ok(())
    }
}

fn poisoned<T>(_: T) -> AdminError {
    AdminError::internal("session lock poisoned")
}

// ============================================================================
// SessionContext
// ============================================================================

/// Shared handle to the current session
///
/// Cloning is cheap; all clones see the same session.
#[derive(Clone)]
pub struct SessionContext {
    current: Arc<RwLock<Session>>,
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    /// Load the stored session; an unreadable store starts logged out
    pub fn load(store: impl SessionStore + 'static) -> Self {
        let session = store.load().unwrap_or_else(|e| {
            tracing::warn!("Discarding unreadable session: {}", e);
            Session::default()
        });
        Self {
            current: Arc::new(RwLock::new(session)),
            store: Arc::new(store),
        }
    }

    /// A context backed only by memory
    pub fn in_memory(session: Session) -> Self {
        Self::load(MemorySessionStore::new(session))
    }

    /// Snapshot of the current session
    pub fn snapshot(&self) -> Session {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.snapshot().token
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.snapshot().user
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_complete()
    }

    /// Store a fresh login
    pub fn sign_in(&self, token: impl Into<String>, user: UserProfile) -> AdminResult<()> {
        let session = Session::new(token, user);
        if let Some(user) = &session.user {
            tracing::info!("Signed in as {}", user.full_name());
        }
        self.store.save(&session)?;
        self.replace(session);
        Ok(())
    }

    /// Forget the token and user
    pub fn clear(&self) -> AdminResult<()> {
        self.replace(Session::default());
        self.store.clear()
    }

    fn replace(&self, session: Session) {
        match self.current.write() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }
}

impl PartialEq for SessionContext {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.current, &other.current)
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn admin() -> UserProfile {
        UserProfile {
            id: Some(1),
            nombre: "Ana".into(),
            apellido: "Rojas".into(),
            correo: Some("ana@condo.bo".into()),
            rol: Some("Admin".into()),
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileSessionStore::new(&path);

        assert_eq!(store.load().unwrap(), Session::default());

        let ctx = SessionContext::load(store.clone());
        ctx.sign_in("tok", admin()).unwrap();
        assert!(path.exists());

        let reloaded = SessionContext::load(FileSessionStore::new(&path));
        assert_eq!(reloaded.token().as_deref(), Some("tok"));
        assert_eq!(reloaded.user().unwrap().full_name(), "Ana Rojas");

        reloaded.clear().unwrap();
        assert!(!path.exists());
        // separately loaded contexts do not share memory
        assert!(ctx.is_authenticated());
    }

    #[test]
    fn test_corrupt_file_starts_logged_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let ctx = SessionContext::load(FileSessionStore::new(&path));
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn test_clones_share_state() {
        let ctx = SessionContext::in_memory(Session::default());
        let other = ctx.clone();
        ctx.sign_in("abc", admin()).unwrap();
        assert!(other.is_authenticated());
        assert_eq!(ctx, other);

        other.clear().unwrap();
        assert_eq!(ctx.token(), None);
    }

    #[test]
    fn test_user_without_token_is_incomplete() {
        let session = Session {
            token: None,
            user: Some(admin()),
        };
        assert!(!session.is_complete());
        assert!(!Session { token: Some(String::new()), user: Some(admin()) }.is_complete());
    }

    #[test]
    fn test_profile_tolerates_missing_fields() {
        let user: UserProfile = serde_json::from_str(r#"{"nombre": "Luis"}"#).unwrap();
        assert_eq!(user.full_name(), "Luis");
        assert_eq!(user.role(), "");
    }

    #[test]
    fn test_profile_tolerates_null_names() {
        let user: UserProfile =
            serde_json::from_str(r#"{"nombre": "Luis", "apellido": null, "rol": null}"#).unwrap();
        assert_eq!(user.apellido, "");
        assert_eq!(user.full_name(), "Luis");

        let user: UserProfile = serde_json::from_str(r#"{"nombre": null}"#).unwrap();
        assert_eq!(user.full_name(), "");
    }
}
