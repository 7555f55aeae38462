//! Scrollable list of form fields

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::tui::ui::{truncate, Styles};

/// One rendered form field
#[derive(Debug, Clone)]
pub struct FieldRow {
    pub label: String,
    pub value: String,
    pub required: bool,
    pub error: Option<String>,
    /// Extra line under the focused field (options, key hints)
    pub hint: Option<String>,
}

/// Field list with its selection state
#[derive(Debug, Default)]
pub struct FieldList {
    pub state: ListState,
}

impl FieldList {
    pub fn new() -> Self {
        let mut state = ListState::default();
        state.select(Some(0));
        Self { state }
    }

    pub fn select(&mut self, index: usize) {
        self.state.select(Some(index));
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, title: &str, rows: &[FieldRow], focused: bool) {
        let selected = self.state.selected();
        let label_width = 34usize;
        let value_width = (area.width as usize).saturating_sub(label_width + 6);

        let items: Vec<ListItem> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let marker = if row.required { "*" } else { " " };
                let label = format!("{}{:<width$}", marker, truncate(&row.label, label_width - 1), width = label_width - 1);
                let value_style = if row.error.is_some() {
                    Styles::error()
                } else if row.value.is_empty() {
                    Styles::inactive()
                } else {
                    Styles::default()
                };
                let value = if row.value.is_empty() { "-".to_string() } else { truncate(&row.value, value_width) };

                let mut lines = vec![Line::from(vec![
                    Span::styled(label, if Some(i) == selected { Styles::title() } else { Styles::default() }),
                    Span::styled(value, value_style),
                ])];
                if let Some(error) = &row.error {
                    lines.push(Line::from(Span::styled(format!("  {}", error), Styles::error())));
                }
                if Some(i) == selected {
                    if let Some(hint) = &row.hint {
                        lines.push(Line::from(Span::styled(format!("  {}", hint), Styles::info())));
                    }
                }
                ListItem::new(lines)
            })
            .collect();

        let border = if focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL).border_style(border))
            .highlight_style(Styles::selected().remove_modifier(ratatui::style::Modifier::BOLD))
            .highlight_symbol("> ");

        f.render_stateful_widget(list, area, &mut self.state);
    }
}
