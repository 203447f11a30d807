//! Maud HTML template components for the web UI.
//!
//! - `layout`: Base page layout and navigation
//! - `alert`: Alert messages
//! - `table`: Tables and rows

pub mod alert;
pub mod layout;
pub mod table;

pub use alert::{Alert, AlertVariant};
pub use layout::BaseLayout;
pub use table::{Table, TableRow};
