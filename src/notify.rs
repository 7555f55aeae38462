//! Toast notifications
//!
//! Controllers never draw anything; they queue `Toast`s and front ends decide
//! how to show them. `on_hide` carries the action to run once the toast is
//! dismissed, which is how "navigate back after a successful save" travels.

use std::collections::VecDeque;

use serde::Serialize;

use crate::navigation::NavAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastPosition {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    #[serde(rename = "type")]
    pub kind: ToastKind,
    pub text1: String,
    pub text2: Option<String>,
    pub position: ToastPosition,
    pub top_offset: u16,
    #[serde(skip)]
    pub on_hide: Option<NavAction>,
}

impl Toast {
    const DEFAULT_TOP_OFFSET: u16 = 60;

    pub fn new(kind: ToastKind, text1: impl Into<String>) -> Self {
        Self {
            kind,
            text1: text1.into(),
            text2: None,
            position: ToastPosition::Top,
            top_offset: Self::DEFAULT_TOP_OFFSET,
            on_hide: None,
        }
    }

    pub fn success(text1: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, text1)
    }

    pub fn error(text1: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, text1)
    }

    pub fn info(text1: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, text1)
    }

    pub fn with_detail(mut self, text2: impl Into<String>) -> Self {
        self.text2 = Some(text2.into());
        self
    }

    pub fn at_bottom(mut self) -> Self {
        self.position = ToastPosition::Bottom;
        self
    }

    pub fn on_hide(mut self, action: NavAction) -> Self {
        self.on_hide = Some(action);
        self
    }

    /// Single-line rendering for status bars and terminal output
    pub fn summary(&self) -> String {
        match &self.text2 {
            Some(detail) if !detail.is_empty() => format!("{}: {}", self.text1, detail),
            _ => self.text1.clone(),
        }
    }
}

/// Pending toasts, oldest first
#[derive(Debug, Default, Clone)]
pub struct Notifications {
    queue: VecDeque<Toast>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: Toast) {
        self.queue.push_back(toast);
    }

    /// Take every pending toast
    pub fn drain(&mut self) -> Vec<Toast> {
        self.queue.drain(..).collect()
    }

    pub fn last(&self) -> Option<&Toast> {
        self.queue.back()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
