//! Error types for the admin dashboard
//!
//! One error type shared by the workspace. Client and form failures are
//! folded into it before they reach a page banner.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the admin dashboard
#[derive(Debug, Error)]
pub enum AdminError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Field validation failed
    #[error("Field validation failed for '{entity}.{field}': {message}")]
    FieldValidation {
        entity: String,
        field: String,
        message: String,
    },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// Entity schema not found in the catalog
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// Field not found in an entity schema
    #[error("Field '{field}' not found in entity '{entity}'")]
    FieldNotFound { entity: String, field: String },

    /// Record not present in the loaded collection
    #[error("Record {id} not found in '{entity}'")]
    RecordNotFound { entity: String, id: String },

    // ========================================================================
    // Remote API Errors
    // ========================================================================
    /// The server rejected or failed a request; the message is user-facing
    #[error("{0}")]
    Api(String),

    /// The session is missing or was rejected by the server
    #[error("Session expired or missing, please log in again")]
    Unauthorized,

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A shared lock was poisoned by a panicking holder
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        AdminError::Validation(msg.into())
    }

    /// Create a field validation error
    pub fn field_validation(
        entity: impl Into<String>,
        field: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        AdminError::FieldValidation {
            entity: entity.into(),
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create a user-facing API error
    pub fn api(msg: impl Into<String>) -> Self {
        AdminError::Api(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        AdminError::Internal(msg.into())
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AdminError::Validation(_) | AdminError::FieldValidation { .. }
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AdminError::EntityNotFound(_)
                | AdminError::FieldNotFound { .. }
                | AdminError::RecordNotFound { .. }
        )
    }

    /// Check if this error should end the session
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AdminError::Unauthorized)
    }

    /// Check if this error came from reading or writing a local file
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            AdminError::FileRead { .. } | AdminError::FileWrite { .. }
        )
    }
}

/// Result type alias using AdminError
pub type AdminResult<T> = Result<T, AdminError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation_error() {
        let err = AdminError::validation("Nombre es requerido");
        assert!(err.is_validation());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Validation error: Nombre es requerido");
    }

    #[test]
    fn test_field_validation_error() {
        let err = AdminError::field_validation("residentes", "dni", "Requerido");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Field validation failed for 'residentes.dni': Requerido"
        );
    }

    #[test]
    fn test_not_found_errors() {
        let err = AdminError::EntityNotFound("pagos".to_string());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Entity not found: pagos");

        let err = AdminError::RecordNotFound {
            entity: "vehiculos".to_string(),
            id: "7".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Record 7 not found in 'vehiculos'");
    }

    #[test]
    fn test_api_error_is_passthrough() {
        let err = AdminError::api("DNI ya registrado");
        assert_eq!(err.to_string(), "DNI ya registrado");
        assert!(!err.is_unauthorized());
        assert!(AdminError::Unauthorized.is_unauthorized());
    }

    #[test]
    fn test_json_error_converts() {
        let parsed: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: AdminError = parsed.unwrap_err().into();
        assert!(err.to_string().starts_with("JSON serialization error"));
        assert!(!err.is_io());
    }

    #[test]
    fn test_file_error_classification() {
        let err = AdminError::FileRead {
            path: PathBuf::from("/tmp/session.json"),
            message: "permission denied".to_string(),
        };
        assert!(err.is_io());
        assert_eq!(
            err.to_string(),
            "Failed to read file '/tmp/session.json': permission denied"
        );
    }
}
