//! # Dialog Components
//!
//! Modal dialogs of the admin dashboard.
//!
//! - **RecordEditor**: schema-driven create/edit form for any catalog entity
//! - **ConfirmDeleteDialog**: confirmation before a record is deleted
//! - **Modal**: backdrop and panel shared by both

// ============================================================================
// Module Declarations
// ============================================================================

pub mod confirm_delete;
pub mod modal;
pub mod record_editor;

// ============================================================================
// Re-exports
// ============================================================================

pub use confirm_delete::ConfirmDeleteDialog;
pub use modal::Modal;
pub use record_editor::RecordEditor;
