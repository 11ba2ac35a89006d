//! Route guard

use crate::session::Session;

/// Roles allowed into the dashboard
pub const ADMIN_ROLES: &[&str] = &["ADMIN", "ADMINISTRADOR"];

/// Outcome of guarding a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// No token or no user
    RedirectLogin,
    /// Logged in with a role outside the allowed set
    RedirectHome,
}

/// Decide whether `session` may open a view restricted to `roles`
///
/// An empty `roles` slice admits any logged-in user. Roles compare
/// case-insensitively.
pub fn authorize(session: &Session, roles: &[&str]) -> Access {
    let Some(user) = session.user.as_ref().filter(|_| session.is_complete()) else {
        return Access::RedirectLogin;
    };
    if roles.is_empty() {
        return Access::Granted;
    }
    let role = user.role().to_uppercase();
    if roles.iter().any(|r| r.to_uppercase() == role) {
        Access::Granted
    } else {
        tracing::warn!(role = %role, "Role not allowed, redirecting home");
        Access::RedirectHome
    }
}

/// Guard for the admin dashboard
pub fn authorize_admin(session: &Session) -> Access {
    authorize(session, ADMIN_ROLES)
}

// ============================================================================
// Tests
// ============================================================================
