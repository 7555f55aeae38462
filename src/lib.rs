//! Clinical-trial data capture client.
//!
//! Participant and VR-session lists plus the study's questionnaire forms,
//! all persisted through a remote request/response backend.

pub mod cli;
pub mod config;
pub mod forms;
pub mod gateway;
pub mod lists;
pub mod models;
pub mod navigation;
pub mod notify;
pub mod scoring;
pub mod tui;
pub mod ui_state;
