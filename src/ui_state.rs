//! Remembered UI selection (selected participant and tab)
//!
//! Stored as a small JSON file. A missing or unreadable file is treated as
//! empty state; nothing in here is allowed to stop the application.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiState {
    pub selected_participant_id: Option<String>,
    pub selected_tab: Option<String>,
}

/// File-backed `UiState`
#[derive(Debug, Clone)]
pub struct UiStateStore {
    path: PathBuf,
}

impl UiStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored state, falling back to empty state
    pub fn load(&self) -> UiState {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("No UI state at {}: {}", self.path.display(), e);
                return UiState::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring unreadable UI state {}: {}", self.path.display(), e);
            UiState::default()
        })
    }

    pub fn save(&self, state: &UiState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write UI state: {}", self.path.display()))
    }

    /// Apply `change` to the stored state and write it back. Write errors are
    /// logged, not returned.
    pub fn update<F: FnOnce(&mut UiState)>(&self, change: F) -> UiState {
        let mut state = self.load();
        change(&mut state);
        if let Err(e) = self.save(&state) {
            warn!("{:#}", e);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_state() {
        let dir = TempDir::new().unwrap();
        let store = UiStateStore::new(dir.path().join("state.json"));
        assert_eq!(store.load(), UiState::default());
    }

    #[test]
    fn test_round_trip_uses_camel_case_keys() {
        let dir = TempDir::new().unwrap();
        let store = UiStateStore::new(dir.path().join("state.json"));
        store.update(|state| {
            state.selected_participant_id = Some("42".to_string());
            state.selected_tab = Some("forms".to_string());
        });

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"selectedParticipantId\": \"42\""));
        assert_eq!(store.load().selected_tab.as_deref(), Some("forms"));

        store.update(|state| state.selected_tab = Some("sessions".to_string()));
        let state = store.load();
        assert_eq!(state.selected_participant_id.as_deref(), Some("42"));
        assert_eq!(state.selected_tab.as_deref(), Some("sessions"));
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(UiStateStore::new(&path).load(), UiState::default());

        std::fs::write(&path, r#"{"selectedTab":"sessions"}"#).unwrap();
        let state = UiStateStore::new(&path).load();
        assert_eq!(state.selected_tab.as_deref(), Some("sessions"));
        assert!(state.selected_participant_id.is_none());
    }

    #[test]
    fn test_unwritable_path_does_not_panic() {
        let dir = TempDir::new().unwrap();
        let store = UiStateStore::new(dir.path().join("missing").join("state.json"));
        let state = store.update(|state| state.selected_tab = Some("forms".to_string()));
        assert_eq!(state.selected_tab.as_deref(), Some("forms"));
        assert!(store.save(&state).is_err());
    }
}
