//! Status bar showing the most recent toast

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::navigation::NavAction;
use crate::notify::{Toast, ToastKind};
use crate::tui::ui::Styles;

/// Status bar state. Holds at most one toast; a new one replaces it.
#[derive(Debug)]
pub struct StatusDisplay {
    current: Option<Toast>,
    history: Vec<Toast>,
    max_history: usize,
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self {
            current: None,
            history: Vec::new(),
            max_history: 100,
        }
    }

    pub fn show(&mut self, toast: Toast) {
        if let Some(previous) = self.current.replace(toast) {
            self.history.push(previous);
            if self.history.len() > self.max_history {
                self.history.remove(0);
            }
        }
    }

    pub fn show_all(&mut self, toasts: Vec<Toast>) {
        for toast in toasts {
            self.show(toast);
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Whether dismissing the current toast triggers navigation
    pub fn has_pending_action(&self) -> bool {
        self.current.as_ref().map_or(false, |t| t.on_hide.is_some())
    }

    /// Hide the current toast and hand back its `on_hide` action
    pub fn dismiss(&mut self) -> Option<NavAction> {
        let mut toast = self.current.take()?;
        let action = toast.on_hide.take();
        self.history.push(toast);
        action
    }

    pub fn history(&self) -> &[Toast] {
        &self.history
    }

    fn style(kind: ToastKind) -> Style {
        match kind {
            ToastKind::Success => Styles::success(),
            ToastKind::Error => Styles::error(),
            ToastKind::Info => Styles::info(),
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, fallback: &str) {
        let (text, style) = match &self.current {
            Some(toast) => {
                let suffix = if toast.on_hide.is_some() { "  (press any key)" } else { "" };
                (format!("{}{}", toast.summary(), suffix), Self::style(toast.kind))
            }
            None => (fallback.to_string(), Styles::inactive()),
        };

        let bar = Paragraph::new(text)
            .style(style)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(bar, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismiss_returns_on_hide_once() {
        let mut status = StatusDisplay::new();
        status.show(Toast::info("Loading"));
        status.show(Toast::success("Saved").on_hide(NavAction::Back));
        assert!(status.has_pending_action());
        assert_eq!(status.history().len(), 1);

        assert_eq!(status.dismiss(), Some(NavAction::Back));
        assert!(status.current().is_none());
        assert_eq!(status.dismiss(), None);
        assert_eq!(status.history().len(), 2);
    }
}
