//! Reusable TUI components

pub mod field_list;
pub mod status_display;

pub use field_list::{FieldList, FieldRow};
pub use status_display::StatusDisplay;
