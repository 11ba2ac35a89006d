//! Client configuration
//!
//! Values come from the environment (optionally seeded from a `.env` file)
//! and can be overridden by command-line flags.

use condo_core::{AdminError, AdminResult, Validatable};
use std::path::PathBuf;

/// Environment variable holding the API base URL
pub const API_BASE_VAR: &str = "CONDO_API_BASE";

/// Environment variable overriding the session file location
pub const SESSION_FILE_VAR: &str = "CONDO_SESSION_FILE";

/// Base URL used when none is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Directory name under the user config directory
pub const APP_DIR: &str = "condo-admin";

/// Connection settings for the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Scheme and host prefixed to `/api` paths
    pub api_base: String,

    /// Where the session is persisted
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            session_file: default_session_file(),
        }
    }
}

impl ClientConfig {
    /// Load from the process environment after reading `.env` if present
    pub fn from_env() -> AdminResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AdminResult<Self> {
        let mut config = Self::default();
        if let Some(base) = lookup(API_BASE_VAR).filter(|v| !v.trim().is_empty()) {
            config = config.with_api_base(base);
        }
        if let Some(file) = lookup(SESSION_FILE_VAR).filter(|v| !v.trim().is_empty()) {
            config.session_file = PathBuf::from(file);
        }
        config.validate()?;
        Ok(config)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the API base URL; a trailing slash is dropped
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim().trim_end_matches('/').to_string();
        self
    }

    /// Set the session file location
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    // ========================================================================
    // Utility methods
    // ========================================================================

    /// Resolve a request target: `/api` paths get the base prefix, anything
    /// else is used as given
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("/api") {
            format!("{}{}", self.api_base, path)
        } else {
            path.to_string()
        }
    }
}

impl Validatable for ClientConfig {
    fn validate(&self) -> AdminResult<()> {
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(AdminError::InvalidConfig(format!(
                "{API_BASE_VAR} must be an http(s) URL, got '{}'",
                self.api_base
            )));
        }
        Ok(())
    }
}

/// `<config dir>/condo-admin/session.json`, falling back to the working directory
pub fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("session.json")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert!(config.session_file.ends_with("condo-admin/session.json"));
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(env(&[
            (API_BASE_VAR, "https://condo.example.com/"),
            (SESSION_FILE_VAR, "/tmp/s.json"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "https://condo.example.com");
        assert_eq!(config.session_file, PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn test_invalid_base() {
        let err = ClientConfig::from_lookup(env(&[(API_BASE_VAR, "localhost:8000")])).unwrap_err();
        assert!(matches!(err, AdminError::InvalidConfig(_)));
    }

    #[test]
    fn test_build_url() {
        let config = ClientConfig::default().with_api_base("http://10.0.0.2:8000");
        assert_eq!(
            config.build_url("/api/residentes/"),
            "http://10.0.0.2:8000/api/residentes/"
        );
        assert_eq!(config.build_url("https://cdn.example.com/x"), "https://cdn.example.com/x");
    }
}
