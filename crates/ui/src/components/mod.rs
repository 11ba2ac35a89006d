//! # UI Components
//!
//! Reusable Dioxus components for the admin dashboard.
//!
//! - **DataTable**: generic sortable table with row actions
//! - **Inputs**: form input components (text, select, checkbox, etc.)
//! - **Dialogs**: record editor and delete confirmation
//! - **ScheduleGrid**: weekly availability of a common area
//!
//! ## Component Hierarchy
//!
//! ```text
//! EntityPage
//! ├── DataTable
//! │   ├── HeaderCell (multiple)
//! │   └── BodyRow (multiple)
//! ├── ScheduleGrid (horarios only)
//! ├── RecordEditor
//! │   └── FieldWidget → Input components
//! └── ConfirmDeleteDialog
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod data_table;
pub mod dialogs;
pub mod inputs;
pub mod schedule_grid;

// ============================================================================
// Re-exports
// ============================================================================

pub use data_table::{DataTable, DataTableProps};
pub use dialogs::{ConfirmDeleteDialog, Modal, RecordEditor};
pub use inputs::{
    Checkbox, CheckboxList, CheckboxListProps, CheckboxProps, Select, SelectProps, TextArea,
    TextAreaProps, TextInput, TextInputProps,
};
pub use schedule_grid::ScheduleGrid;
