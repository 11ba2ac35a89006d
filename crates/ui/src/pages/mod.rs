//! Page Components for the admin dashboard
//!
//! ## Available Pages
//!
//! - **LoginPage**: credentials form
//! - **HomePage**: landing page with shortcut cards
//! - **RestrictedPage**: notice for roles without admin access
//! - **EntityPage**: table, editor and delete flow for any catalog entity
//!

pub mod entity_page;
pub mod home;
pub mod login;

// Re-export page components for convenience
pub use entity_page::EntityPage;
pub use home::{HomePage, RestrictedPage};
pub use login::LoginPage;
