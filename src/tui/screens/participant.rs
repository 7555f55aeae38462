//! One participant: VR sessions and data-capture forms

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

use crate::forms::FormKind;
use crate::gateway::{Gateway, GatewayError};
use crate::lists::fetch_sessions;
use crate::models::{display_date, VrSession};
use crate::navigation::{NavAction, Route, RouteParams};
use crate::tui::screens::ScreenAction;
use crate::tui::ui::Styles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantTab {
    Sessions,
    Forms,
}

impl ParticipantTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantTab::Sessions => "sessions",
            ParticipantTab::Forms => "forms",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sessions" => Some(ParticipantTab::Sessions),
            "forms" => Some(ParticipantTab::Forms),
            _ => None,
        }
    }

    fn toggled(self) -> Self {
        match self {
            ParticipantTab::Sessions => ParticipantTab::Forms,
            ParticipantTab::Forms => ParticipantTab::Sessions,
        }
    }
}

pub struct ParticipantScreen {
    params: RouteParams,
    tab: ParticipantTab,
    sessions: Vec<VrSession>,
    session_state: ListState,
    form_state: ListState,
}

impl ParticipantScreen {
    pub fn new(params: RouteParams, tab: ParticipantTab) -> Self {
        let mut form_state = ListState::default();
        form_state.select(Some(0));
        Self {
            params,
            tab,
            sessions: Vec::new(),
            session_state: ListState::default(),
            form_state,
        }
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    pub fn tab(&self) -> ParticipantTab {
        self.tab
    }

    pub async fn refresh(&mut self, gateway: &dyn Gateway) -> Result<usize, GatewayError> {
        let sessions = fetch_sessions(gateway, &self.params.patient_id, &self.params.study_id).await?;
        self.set_sessions(sessions);
        Ok(self.sessions.len())
    }

    pub fn set_sessions(&mut self, sessions: Vec<VrSession>) {
        self.sessions = sessions;
        self.session_state.select(if self.sessions.is_empty() { None } else { Some(0) });
    }

    fn move_selection(state: &mut ListState, count: usize, down: bool) {
        if count == 0 {
            return;
        }
        let current = state.selected().unwrap_or(0);
        let next = if down {
            (current + 1) % count
        } else if current == 0 {
            count - 1
        } else {
            current - 1
        };
        state.select(Some(next));
    }

    fn open_form(&self, kind: FormKind, session: Option<&VrSession>) -> ScreenAction {
        let mut params = self.params.clone();
        if let Some(date) = session.and_then(|s| s.session_date) {
            params = params.with_created_date(date);
        }
        ScreenAction::Navigate(NavAction::To(Route::Form { kind, params }))
    }

    fn selected_session(&self) -> Option<&VrSession> {
        self.session_state.selected().and_then(|i| self.sessions.get(i))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.tab = self.tab.toggled();
            }
            KeyCode::Esc => return ScreenAction::Navigate(NavAction::Back),
            KeyCode::Char('r') => return ScreenAction::Refresh,
            KeyCode::Up | KeyCode::Char('k') => match self.tab {
                ParticipantTab::Sessions => Self::move_selection(&mut self.session_state, self.sessions.len(), false),
                ParticipantTab::Forms => Self::move_selection(&mut self.form_state, FormKind::ALL.len(), false),
            },
            KeyCode::Down | KeyCode::Char('j') => match self.tab {
                ParticipantTab::Sessions => Self::move_selection(&mut self.session_state, self.sessions.len(), true),
                ParticipantTab::Forms => Self::move_selection(&mut self.form_state, FormKind::ALL.len(), true),
            },
            KeyCode::Enter | KeyCode::Char('p') if self.tab == ParticipantTab::Sessions => {
                if let Some(session) = self.selected_session() {
                    return self.open_form(FormKind::PreVrQuestionnaire, Some(session));
                }
            }
            KeyCode::Char('o') if self.tab == ParticipantTab::Sessions => {
                if let Some(session) = self.selected_session() {
                    return self.open_form(FormKind::PostVrQuestionnaire, Some(session));
                }
            }
            KeyCode::Enter => {
                if let Some(kind) = self.form_state.selected().and_then(|i| FormKind::ALL.get(i).copied()) {
                    return self.open_form(kind, None);
                }
            }
            _ => {}
        }
        ScreenAction::None
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let age = self.params.age.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string());
        let header = Paragraph::new(format!(
            "Participant {}   Study {}   Age {}",
            self.params.patient_id, self.params.study_id, age
        ))
        .style(Styles::title())
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(header, chunks[0]);

        let selected_tab = match self.tab {
            ParticipantTab::Sessions => 0,
            ParticipantTab::Forms => 1,
        };
        let tabs = Tabs::new(vec![Line::from("VR Sessions"), Line::from("Forms")])
            .select(selected_tab)
            .highlight_style(Styles::selected())
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(tabs, chunks[1]);

        match self.tab {
            ParticipantTab::Sessions => {
                let items: Vec<ListItem> = self
                    .sessions
                    .iter()
                    .map(|s| {
                        ListItem::new(format!(
                            "#{:<4} {:<12} {:<24} {}",
                            s.session_no.map(|n| n.to_string()).unwrap_or_default(),
                            s.session_date.map(display_date).unwrap_or_default(),
                            s.module.as_deref().unwrap_or(""),
                            s.status.as_deref().unwrap_or("")
                        ))
                    })
                    .collect();
                let title = if self.sessions.is_empty() {
                    "No VR sessions"
                } else {
                    "VR sessions - Enter/p pre-VR, o post-VR"
                };
                let list = List::new(items)
                    .block(Block::default().title(title).borders(Borders::ALL).border_style(Styles::active_border()))
                    .highlight_style(Styles::selected());
                f.render_stateful_widget(list, chunks[2], &mut self.session_state);
            }
            ParticipantTab::Forms => {
                let items: Vec<ListItem> = FormKind::ALL.iter().map(|k| ListItem::new(k.title())).collect();
                let list = List::new(items)
                    .block(Block::default().title("Forms").borders(Borders::ALL).border_style(Styles::active_border()))
                    .highlight_style(Styles::selected());
                f.render_stateful_widget(list, chunks[2], &mut self.form_state);
            }
        }
    }
}
