//! Validation results for entity forms and schemas

use crate::value::FieldError;
use condo_core::AdminError;

// ============================================================================
// ValidationErrors
// ============================================================================

/// A field that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Form key of the field
    pub field: String,

    /// Why it failed
    pub error: FieldError,
}

/// Per-field errors returned when a submission is rejected
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    issues: Vec<FieldIssue>,
}

impl ValidationErrors {
    /// Create an empty error set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field; a field keeps only its first error
    pub fn add(&mut self, field: impl Into<String>, error: FieldError) {
        let field = field.into();
        if self.get(&field).is_none() {
            self.issues.push(FieldIssue { field, error });
        }
    }

    /// Error for a field
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.issues
            .iter()
            .find(|issue| issue.field == field)
            .map(|issue| &issue.error)
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of failing fields
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Iterate over the failing fields in form order
    pub fn iter(&self) -> impl Iterator<Item = &FieldIssue> {
        self.issues.iter()
    }

    /// Names of the failing fields
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }

    /// Convert to `Ok(())` when empty
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .issues
            .iter()
            .map(|i| format!("{}: {}", i.field, i.error))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for AdminError {
    fn from(errors: ValidationErrors) -> Self {
        AdminError::validation(errors.to_string())
    }
}
