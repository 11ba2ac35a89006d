//! # Condo Core
//!
//! Core types, traits, and error handling for the condominium admin dashboard.
//!
//! This crate provides the foundational building blocks shared by the
//! model, client, UI and CLI crates:
//!
//! - **Types**: record identifiers, primitive cell values, layout breakpoints
//! - **Traits**: `Validatable` and `Persistable`
//! - **Errors**: unified error handling with `AdminError` and `AdminResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{AdminError, AdminResult};
pub use traits::{Persistable, Validatable};
pub use types::{Breakpoint, CellValue, Record, RecordId, record_id};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
