//! # Condo Model
//!
//! Headless model of the condominium admin dashboard. Everything a page
//! needs that does not touch the network or the renderer lives here.
//!
//! ## Core Concepts
//!
//! - **EntitySchema**: endpoint, form fields, table columns and rules of one entity
//! - **ColumnDef / Row**: what a table shows and how a record projects into it
//! - **SortState**: the three-state column sort cycle
//! - **FormController**: form values, touched fields, validation and submission
//! - **Catalog**: every managed entity plus the sidebar menu
//! - **WeeklyGrid**: hourly availability of a common area
//!

// Module declarations
pub mod catalog;
pub mod column;
pub mod entity;
pub mod field;
pub mod form;
pub mod path;
pub mod schedule;
pub mod table;
pub mod validation;
pub mod value;

// Re-export commonly used types at crate root
pub use catalog::{Catalog, MENU, MenuGroup, MenuItem, WEEKDAYS, catalog};
pub use column::{CellFormat, ColumnDef, NULL_PLACEHOLDER, Projection, RenderedCell, Tone};
pub use entity::{EntitySchema, FormRule, ReferenceSource, References, RelatedAssignment};
pub use field::{FieldKind, FieldSchema, Requirement, SelectOption};
pub use form::{FormController, FormMode, Submission};
pub use path::{lookup, render_template};
pub use schedule::{
    EMPTY_MESSAGE, ScheduleEntry, TimeSlot, WeeklyGrid, area_badge, area_color, day_slots, short_day,
};
pub use table::{
    Placeholder, Row, SortDirection, SortIndicator, SortMemo, SortState, compare_cells,
    footer_count, row_key, sorted_indices,
};
pub use validation::{FieldIssue, ValidationErrors};
pub use value::{FieldError, FieldValue, InputValue};

// Re-export core types that are commonly used with the model
pub use condo_core::{
    AdminError, AdminResult, Breakpoint, CellValue, Record, RecordId, Validatable, record_id,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        AdminError,
        AdminResult,
        CellFormat,
        ColumnDef,
        // Core types
        EntitySchema,
        FieldSchema,
        // Forms
        FormController,
        FormMode,
        Record,
        RecordId,
        Row,
        SortState,
        Submission,
        catalog,
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_reexport() {
        assert!(catalog().get("horarios").is_ok());
    }
}
