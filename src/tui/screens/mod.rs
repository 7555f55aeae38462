//! TUI screens

pub mod form_editor;
pub mod participant;
pub mod participants;

pub use form_editor::FormEditorScreen;
pub use participant::{ParticipantScreen, ParticipantTab};
pub use participants::ParticipantListScreen;

use crate::navigation::NavAction;
use crate::notify::Toast;

/// Actions returned from screen key handling
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    Navigate(NavAction),
    Toast(Toast),
    /// Re-fetch the current screen's data
    Refresh,
    Quit,
    None,
}
