//! Terminal user interface
//!
//! Participant list, participant detail (VR sessions and forms) and a
//! schema-driven form editor, all on top of the library's gateway and form
//! controller.

pub mod app;
pub mod components;
pub mod screens;
pub mod ui;

pub use app::App;
