//! # Condo Client
//!
//! Talks to the condominium REST backend on behalf of the dashboard and the
//! command-line client.
//!
//! - **ClientConfig**: API base URL and session file from the environment
//! - **SessionContext**: shared token and user profile, persisted to disk
//! - **authorize**: role-based route guard
//! - **ApiClient**: bearer-authenticated JSON requests plus schema-driven CRUD
//!

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod resource;
pub mod session;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use guard::{ADMIN_ROLES, Access, authorize, authorize_admin};
pub use resource::{LOGIN_PATH, LoginResponse};
pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionContext, SessionStore, UserProfile,
};

/// Build a client from the environment with the session stored on disk
pub fn connect_from_env() -> condo_core::AdminResult<ApiClient> {
    let config = ClientConfig::from_env()?;
    let session = SessionContext::load(FileSessionStore::new(&config.session_file));
    Ok(ApiClient::new(config, session)?)
}
