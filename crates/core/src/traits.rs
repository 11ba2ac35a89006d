//! Core traits for the admin dashboard
//!
//! This module defines the traits that schema definitions and persisted
//! state implement to provide consistent validation and file persistence.

use crate::error::{AdminError, AdminResult};
use serde::{Serialize, de::DeserializeOwned};

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can be validated
///
/// Types implementing this trait can check their internal consistency
/// and return validation errors if the state is invalid.
///
/// # Example
///
/// ```rust,ignore
/// use condo_core::{Validatable, AdminResult, AdminError};
///
/// struct Column {
///     key: String,
/// }
///
/// impl Validatable for Column {
///     fn validate(&self) -> AdminResult<()> {
///         if self.key.is_empty() {
///             return Err(AdminError::validation("Column key cannot be empty"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or an `AdminError` describing the problem.
    fn validate(&self) -> AdminResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get all validation errors (for types that can have multiple errors)
    fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(e) => vec![e.to_string()],
        }
    }
}

// ============================================================================
// Persistable Trait
// ============================================================================

/// Trait for types that can be serialized to and deserialized from files
///
/// Used for small pieces of local state such as the stored login session.
pub trait Persistable: Serialize + DeserializeOwned + Sized {
    /// Save to a JSON string
    fn to_json(&self) -> AdminResult<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Load from a JSON string
    fn from_json(json: &str) -> AdminResult<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Save to a file, creating parent directories as needed
    fn save_to_file(&self, path: &std::path::Path) -> AdminResult<()> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AdminError::FileWrite {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        std::fs::write(path, json).map_err(|e| AdminError::FileWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from a file
    fn load_from_file(path: &std::path::Path) -> AdminResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| AdminError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }
}

// ============================================================================
// Tests
// ============================================================================
