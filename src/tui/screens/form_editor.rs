//! Schema-driven form editor

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::forms::{FieldKind, FieldSpec, FieldValue, FormContext, FormController, FormKind};
use crate::gateway::Gateway;
use crate::models::display_date;
use crate::navigation::NavAction;
use crate::notify::Toast;
use crate::tui::components::{FieldList, FieldRow};
use crate::tui::screens::ScreenAction;
use crate::tui::ui::{InputField, Styles};

/// Days moved by PageUp/PageDown on weekly forms
const DATE_STEP_DAYS: i64 = 7;

pub struct FormEditorScreen {
    controller: FormController<dyn Gateway>,
    /// Index into the schema's fields
    focus: usize,
    input: InputField,
    input_dirty: bool,
    option_cursor: usize,
    /// First digit typed on a rating whose maximum has two digits
    rating_digit: Option<u8>,
    fields: FieldList,
    toasts: Vec<Toast>,
}

fn is_typed(spec: &FieldSpec) -> bool {
    matches!(
        spec.kind,
        FieldKind::Text | FieldKind::LongText | FieldKind::Number | FieldKind::Date { .. }
    )
}

impl FormEditorScreen {
    pub fn new(gateway: Arc<dyn Gateway>, kind: FormKind, context: FormContext) -> Self {
        Self::from_controller(FormController::new(gateway, kind, context))
    }

    pub fn from_controller(controller: FormController<dyn Gateway>) -> Self {
        let mut screen = Self {
            controller,
            focus: 0,
            input: InputField::new(""),
            input_dirty: false,
            option_cursor: 0,
            rating_digit: None,
            fields: FieldList::new(),
            toasts: Vec::new(),
        };
        screen.sync_input();
        screen
    }

    pub fn controller(&self) -> &FormController<dyn Gateway> {
        &self.controller
    }

    /// Load failures are reported through the controller's toasts
    pub async fn load(&mut self) {
        let _ = self.controller.load().await;
        self.sync_input();
    }

    pub fn take_toasts(&mut self) -> Vec<Toast> {
        let mut toasts = self.controller.take_toasts();
        toasts.append(&mut self.toasts);
        toasts
    }

    fn focused_spec(&self) -> Option<&'static FieldSpec> {
        self.controller.schema().fields.get(self.focus)
    }

    fn visible(&self) -> Vec<usize> {
        let values = self.controller.values();
        self.controller
            .schema()
            .fields
            .iter()
            .enumerate()
            .filter(|(_, spec)| values.is_revealed(spec))
            .map(|(i, _)| i)
            .collect()
    }

    fn ensure_focus_visible(&mut self) {
        let visible = self.visible();
        if visible.contains(&self.focus) {
            return;
        }
        self.focus = visible
            .iter()
            .rev()
            .find(|i| **i < self.focus)
            .or_else(|| visible.first())
            .copied()
            .unwrap_or(0);
    }

    /// Reload the edit buffer from the focused field's stored value
    fn sync_input(&mut self) {
        self.ensure_focus_visible();
        self.input_dirty = false;
        self.option_cursor = 0;
        self.rating_digit = None;

        let Some(spec) = self.focused_spec() else {
            return;
        };
        let value = self.controller.values().get(spec.key).cloned().unwrap_or(FieldValue::Empty);

        self.input = InputField::new(spec.label).with_value(&value.display(spec));
        self.input.set_focus(is_typed(spec));
        if let FieldKind::Date { .. } = spec.kind {
            self.input = self.input.clone().with_placeholder("DD-MM-YYYY");
        }

        if let FieldKind::Choice(options) = spec.kind {
            let current = self.controller.values().text(spec.key);
            self.option_cursor = options.iter().position(|o| o.id == current).unwrap_or(0);
        }
    }

    /// Apply the edit buffer to the focused field. Returns false when the
    /// input was rejected.
    fn commit_input(&mut self) -> bool {
        let Some(spec) = self.focused_spec() else {
            return true;
        };
        if !self.input_dirty || !is_typed(spec) {
            return true;
        }

        match self.controller.set_field(spec.key, &self.input.value) {
            Ok(()) => {
                self.input_dirty = false;
                true
            }
            Err(e) => {
                self.toasts.push(Toast::error(e.to_string()));
                false
            }
        }
    }

    fn move_focus(&mut self, down: bool) {
        if !self.commit_input() {
            return;
        }
        let visible = self.visible();
        if visible.is_empty() {
            return;
        }
        let pos = visible.iter().position(|i| *i == self.focus).unwrap_or(0);
        let next = if down {
            (pos + 1) % visible.len()
        } else if pos == 0 {
            visible.len() - 1
        } else {
            pos - 1
        };
        self.focus = visible[next];
        self.sync_input();
    }

    fn report<T, E: std::fmt::Display>(&mut self, result: Result<T, E>) {
        if let Err(e) = result {
            self.toasts.push(Toast::error(e.to_string()));
        }
    }

    fn cycle_choice(&mut self, spec: &'static FieldSpec, forward: bool) {
        let options = spec.options();
        if options.is_empty() {
            return;
        }
        let current = self.controller.values().text(spec.key).to_string();
        let next = match options.iter().position(|o| o.id == current) {
            None => {
                if forward {
                    0
                } else {
                    options.len() - 1
                }
            }
            Some(i) if forward => (i + 1) % options.len(),
            Some(0) => options.len() - 1,
            Some(i) => i - 1,
        };
        self.option_cursor = next;
        let result = self.controller.toggle_option(spec.key, options[next].id);
        self.report(result);
    }

    fn adjust_rating(&mut self, spec: &'static FieldSpec, min: u8, max: u8, up: bool) {
        let value = match (self.controller.values().rating(spec.key), up) {
            (None, _) => min,
            (Some(v), true) => v.saturating_add(1).min(max),
            (Some(v), false) => v.saturating_sub(1).max(min),
        };
        let result = self.controller.set_value(spec.key, FieldValue::Rating(value));
        self.report(result);
    }

    /// Digit entry on a rating. A second digit extends the first one when
    /// the result still fits (`1`, `0` -> 10), otherwise it starts over.
    fn type_rating_digit(&mut self, spec: &'static FieldSpec, max: u8, digit: u8) {
        let value = match self.rating_digit.take() {
            Some(first) if first * 10 + digit <= max => first * 10 + digit,
            _ => {
                if digit * 10 <= max {
                    self.rating_digit = Some(digit);
                }
                digit
            }
        };
        let result = self.controller.set_value(spec.key, FieldValue::Rating(value));
        self.report(result);
    }

    fn edit_focused(&mut self, key: KeyEvent) {
        let Some(spec) = self.focused_spec() else {
            return;
        };

        match spec.kind {
            FieldKind::Text | FieldKind::LongText | FieldKind::Number | FieldKind::Date { .. } => {
                match key.code {
                    KeyCode::Char(c) => {
                        self.input.insert_char(c);
                        self.input_dirty = true;
                    }
                    KeyCode::Backspace => {
                        self.input.delete_char();
                        self.input_dirty = true;
                    }
                    KeyCode::Delete => {
                        self.input.delete_char_forward();
                        self.input_dirty = true;
                    }
                    KeyCode::Left => self.input.move_cursor_left(),
                    KeyCode::Right => self.input.move_cursor_right(),
                    KeyCode::Home => self.input.move_cursor_to_start(),
                    KeyCode::End => self.input.move_cursor_to_end(),
                    KeyCode::Enter => {
                        if self.commit_input() {
                            self.sync_input();
                        }
                    }
                    _ => {}
                }
            }
            FieldKind::Choice(_) => match key.code {
                KeyCode::Right | KeyCode::Char(' ') => self.cycle_choice(spec, true),
                KeyCode::Left => self.cycle_choice(spec, false),
                KeyCode::Backspace | KeyCode::Delete => {
                    let result = self.controller.set_field(spec.key, "");
                    self.report(result);
                }
                _ => {}
            },
            FieldKind::Multi { options, .. } => match key.code {
                KeyCode::Right if !options.is_empty() => {
                    self.option_cursor = (self.option_cursor + 1) % options.len();
                }
                KeyCode::Left if !options.is_empty() => {
                    self.option_cursor = self.option_cursor.checked_sub(1).unwrap_or(options.len() - 1);
                }
                KeyCode::Char(' ') | KeyCode::Enter => {
                    if let Some(option) = options.get(self.option_cursor) {
                        let result = self.controller.toggle_option(spec.key, option.id);
                        self.report(result);
                    }
                }
                _ => {}
            },
            FieldKind::Rating { min, max } => match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    if let Some(digit) = c.to_digit(10) {
                        self.type_rating_digit(spec, max, digit as u8);
                    }
                }
                code => {
                    self.rating_digit = None;
                    match code {
                        KeyCode::Right => self.adjust_rating(spec, min, max, true),
                        KeyCode::Left => self.adjust_rating(spec, min, max, false),
                        KeyCode::Backspace | KeyCode::Delete => {
                            let result = self.controller.set_field(spec.key, "");
                            self.report(result);
                        }
                        _ => {}
                    }
                }
            },
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> ScreenAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('s') if ctrl => {
                if self.commit_input() {
                    let _ = self.controller.save().await;
                    self.sync_input();
                }
            }
            KeyCode::Char('l') if ctrl => {
                self.controller.clear();
                self.sync_input();
                self.toasts.push(Toast::info("Form cleared"));
            }
            KeyCode::Esc => return ScreenAction::Navigate(NavAction::Back),
            KeyCode::Up | KeyCode::BackTab => self.move_focus(false),
            KeyCode::Down | KeyCode::Tab => self.move_focus(true),
            KeyCode::PageUp | KeyCode::PageDown if self.controller.schema().is_dated() => {
                if self.commit_input() {
                    let days = if key.code == KeyCode::PageUp {
                        -DATE_STEP_DAYS
                    } else {
                        DATE_STEP_DAYS
                    };
                    let _ = self.controller.shift_date(days).await;
                    self.sync_input();
                }
            }
            _ => self.edit_focused(key),
        }
        ScreenAction::None
    }

    fn hint(&self, spec: &FieldSpec) -> Option<String> {
        let values = self.controller.values();
        match spec.kind {
            FieldKind::Choice(options) => {
                let current = values.text(spec.key);
                let labels: Vec<String> = options
                    .iter()
                    .map(|o| if o.id == current { format!("[{}]", o.label) } else { o.label.to_string() })
                    .collect();
                Some(format!("←/→ {}", labels.join(" | ")))
            }
            FieldKind::Multi { options, .. } => {
                let selected = values.multi(spec.key);
                let labels: Vec<String> = options
                    .iter()
                    .enumerate()
                    .map(|(i, o)| {
                        let mark = if selected.iter().any(|s| s == o.id) { "x" } else { " " };
                        let cursor = if i == self.option_cursor { ">" } else { "" };
                        format!("{}[{}] {}", cursor, mark, o.label)
                    })
                    .collect();
                Some(format!("←/→ move, Space toggle: {}", labels.join("  ")))
            }
            FieldKind::Rating { min, max } => Some(format!("←/→ or digit ({}-{})", min, max)),
            FieldKind::Date { .. } => Some("DD-MM-YYYY, Enter to apply".to_string()),
            _ => Some("type, Enter to apply".to_string()),
        }
    }

    fn rows(&self) -> (Vec<FieldRow>, usize) {
        let values = self.controller.values();
        let visible = self.visible();
        let selected = visible.iter().position(|i| *i == self.focus).unwrap_or(0);
        let fields = self.controller.schema().fields;

        let rows = visible
            .iter()
            .map(|i| {
                let spec = &fields[*i];
                let value = if *i == self.focus && is_typed(spec) && self.input_dirty {
                    format!("{} (editing)", self.input.value)
                } else {
                    values.get(spec.key).map(|v| v.display(spec)).unwrap_or_default()
                };
                FieldRow {
                    label: spec.label.to_string(),
                    value,
                    required: spec.required,
                    error: self.controller.error_for(spec.key).map(str::to_string),
                    hint: if *i == self.focus { self.hint(spec) } else { None },
                }
            })
            .collect();
        (rows, selected)
    }

    fn header_lines(&self) -> Vec<Line<'static>> {
        let context = self.controller.context();
        let mode = match self.controller.record_id() {
            Some(id) => format!("Update #{}", id),
            None => "New record".to_string(),
        };
        let mut lines = vec![
            Line::styled(self.controller.schema().title.to_string(), Styles::title()),
            Line::from(format!(
                "Participant {}  Study {}  |  {}  |  {}",
                context.participant_id,
                context.study_id,
                mode,
                self.controller.phase().as_str()
            )),
        ];
        if let Some(date) = self.controller.selected_date() {
            lines.push(Line::styled(
                format!("Date {}  (PgUp/PgDn: previous/next week)", display_date(date)),
                Styles::info(),
            ));
        }
        lines
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        let typed = self.focused_spec().map_or(false, is_typed);
        let mut constraints = vec![Constraint::Length(5), Constraint::Min(0)];
        if typed {
            constraints.push(Constraint::Length(3));
        }
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let header = Paragraph::new(self.header_lines()).block(Block::default().borders(Borders::ALL));
        f.render_widget(header, chunks[0]);

        let derived = self.controller.derived();
        let body = if derived.is_empty() {
            vec![chunks[1]]
        } else {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
                .split(chunks[1])
                .to_vec()
        };

        let (rows, selected) = self.rows();
        self.fields.select(selected);
        self.fields
            .render(f, body[0], "Fields (* required)  Ctrl+S save  Ctrl+L clear", &rows, true);

        if let Some(area) = body.get(1) {
            let lines: Vec<Line> = derived
                .iter()
                .map(|(column, value)| Line::from(format!("{}: {}", column, value)))
                .collect();
            let panel = Paragraph::new(lines)
                .block(Block::default().title("Scores").borders(Borders::ALL).border_style(Styles::inactive_border()));
            f.render_widget(panel, *area);
        }

        if typed {
            self.input.render(f, chunks[2]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use crate::models::{ParticipantId, StudyId};
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn editor(gateway: &Arc<MemoryGateway>, kind: FormKind) -> FormEditorScreen {
        let shared: Arc<dyn Gateway> = gateway.clone();
        let context = FormContext::new(ParticipantId::new("42"), StudyId::new("CS-0042")).with_user("nurse.kim");
        let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        FormEditorScreen::from_controller(FormController::with_today(shared, kind, context, today))
    }

    async fn type_text(screen: &mut FormEditorScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key(key(KeyCode::Char(c))).await;
        }
    }

    #[tokio::test]
    async fn test_keyboard_fill_and_save() {
        let gateway = Arc::new(MemoryGateway::lenient());
        let mut screen = editor(&gateway, FormKind::StudyObservation);
        screen.load().await;

        // observation_date keeps today's default
        screen.handle_key(key(KeyCode::Down)).await;
        type_text(&mut screen, "Dr Lee").await;
        screen.handle_key(key(KeyCode::Down)).await;
        screen.handle_key(key(KeyCode::Down)).await;
        // engagement: Right picks the first option
        screen.handle_key(key(KeyCode::Right)).await;
        screen.handle_key(key(KeyCode::Down)).await;
        screen.handle_key(key(KeyCode::Right)).await;
        screen.handle_key(key(KeyCode::Right)).await;
        assert_eq!(screen.controller().values().text("technical_issues"), "No");
        screen.handle_key(key(KeyCode::Down)).await;
        assert_eq!(screen.focused_spec().map(|f| f.key), Some("distress_observed"));
        screen.handle_key(key(KeyCode::Right)).await;

        screen.handle_key(ctrl('s')).await;
        let calls = gateway.calls_to("/AddUpdateStudyObservation");
        assert_eq!(calls.len(), 1);
        let body = calls[0].body.clone().unwrap();
        assert_eq!(body["ObserverName"], json!("Dr Lee"));
        assert_eq!(body["EngagementLevel"], json!("Low"));
        assert_eq!(body["TechnicalIssueDetails"], Value::Null);
        assert_eq!(body["ObservationDate"], json!("2024-06-03"));
    }

    #[tokio::test]
    async fn test_rejected_input_keeps_focus() {
        let gateway = Arc::new(MemoryGateway::lenient());
        let mut screen = editor(&gateway, FormKind::Screening);
        screen.handle_key(key(KeyCode::Down)).await;
        type_text(&mut screen, "sixty").await;
        screen.handle_key(key(KeyCode::Down)).await;

        assert_eq!(screen.focused_spec().map(|f| f.key), Some("age"));
        let toasts = screen.take_toasts();
        assert!(toasts.iter().any(|t| t.text1.contains("not a number")));
    }

    #[tokio::test]
    async fn test_multi_select_chips_and_clear() {
        let gateway = Arc::new(MemoryGateway::lenient());
        let mut screen = editor(&gateway, FormKind::DistressThermometer);
        screen.load().await;

        screen.handle_key(key(KeyCode::Char('6'))).await;
        assert_eq!(screen.controller().values().rating("rating"), Some(6));

        screen.handle_key(key(KeyCode::Down)).await;
        screen.handle_key(key(KeyCode::Right)).await;
        screen.handle_key(key(KeyCode::Char(' '))).await;
        screen.handle_key(key(KeyCode::Left)).await;
        screen.handle_key(key(KeyCode::Char(' '))).await;
        assert_eq!(screen.controller().values().multi("practical"), &["2".to_string(), "1".to_string()]);

        let calls = gateway.call_count();
        screen.handle_key(ctrl('l')).await;
        assert!(screen.controller().values().multi("practical").is_empty());
        assert_eq!(gateway.call_count(), calls);
    }

    #[tokio::test]
    async fn test_rating_takes_two_digits() {
        let gateway = Arc::new(MemoryGateway::lenient());
        let mut screen = editor(&gateway, FormKind::DistressThermometer);
        screen.load().await;

        type_text(&mut screen, "10").await;
        assert_eq!(screen.controller().values().rating("rating"), Some(10));

        // 10 is complete, so the next digit starts over; 47 does not fit
        type_text(&mut screen, "47").await;
        assert_eq!(screen.controller().values().rating("rating"), Some(7));

        screen.handle_key(key(KeyCode::Char('1'))).await;
        screen.handle_key(key(KeyCode::Left)).await;
        screen.handle_key(key(KeyCode::Char('2'))).await;
        assert_eq!(screen.controller().values().rating("rating"), Some(2));
        assert!(screen.take_toasts().is_empty());
    }

    #[tokio::test]
    async fn test_single_digit_ratings_replace_value() {
        let gateway = Arc::new(MemoryGateway::lenient());
        let mut screen = editor(&gateway, FormKind::FactG);
        screen.load().await;

        type_text(&mut screen, "34").await;
        assert_eq!(screen.controller().values().rating("gp1"), Some(4));
        assert!(screen.take_toasts().is_empty());
    }

    #[tokio::test]
    async fn test_page_keys_move_weekly_date() {
        let gateway = Arc::new(MemoryGateway::lenient());
        let mut screen = editor(&gateway, FormKind::FactG);
        screen.load().await;
        screen.handle_key(key(KeyCode::PageUp)).await;
        assert_eq!(screen.controller().selected_date(), NaiveDate::from_ymd_opt(2024, 5, 27));
        assert_eq!(gateway.calls_to("/GetParticipantFactG").len(), 2);
    }
}
