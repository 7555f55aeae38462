//! Main TUI application state and event loop

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::{error, info};

use crate::config::Config;
use crate::forms::FormContext;
use crate::gateway::Gateway;
use crate::navigation::{NavAction, Navigator, Route};
use crate::notify::Toast;
use crate::tui::components::StatusDisplay;
use crate::tui::screens::{FormEditorScreen, ParticipantListScreen, ParticipantScreen, ParticipantTab, ScreenAction};
use crate::tui::ui::{centered_rect, Styles};
use crate::ui_state::UiStateStore;

pub struct App {
    pub config: Config,
    gateway: Arc<dyn Gateway>,
    navigator: Navigator,
    ui_state: UiStateStore,

    participants: ParticipantListScreen,
    participant: Option<ParticipantScreen>,
    form: Option<FormEditorScreen>,

    status: StatusDisplay,
    pub should_quit: bool,
    pub show_help_popup: bool,
}

impl App {
    pub fn new(config: Config, gateway: Arc<dyn Gateway>) -> Self {
        Self {
            participants: ParticipantListScreen::new(config.page_size),
            ui_state: UiStateStore::new(config.ui_state_path.clone()),
            config,
            gateway,
            navigator: Navigator::default(),
            participant: None,
            form: None,
            status: StatusDisplay::new(),
            should_quit: false,
            show_help_popup: false,
        }
    }

    pub fn current_route(&self) -> &Route {
        self.navigator.current()
    }

    /// Fetch participants and restore the remembered selection
    pub async fn start(&mut self) {
        self.refresh_participants().await;

        let remembered = self.ui_state.load();
        if let Some(id) = remembered.selected_participant_id {
            if self.participants.select_participant(&id) {
                info!("Restored selected participant {}", id);
            }
        }
    }

    async fn refresh_participants(&mut self) {
        match self
            .participants
            .refresh(self.gateway.as_ref(), self.config.user_id.as_deref())
            .await
        {
            Ok(count) => self.status.show(Toast::info(format!("{} participants loaded", count))),
            Err(e) => {
                error!("Failed to load participants: {}", e);
                self.status
                    .show(Toast::error("Could not load participants").with_detail(e.to_string()));
            }
        }
    }

    async fn refresh_sessions(&mut self) {
        let Some(screen) = self.participant.as_mut() else {
            return;
        };
        if let Err(e) = screen.refresh(self.gateway.as_ref()).await {
            error!("Failed to load VR sessions: {}", e);
            self.status
                .show(Toast::error("Could not load VR sessions").with_detail(e.to_string()));
        }
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.start().await;

        loop {
            terminal.draw(|f| self.draw(f))?;

            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key).await;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    pub async fn handle_key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // A toast with an on_hide action swallows the key that dismisses it
        if self.status.has_pending_action() {
            if let Some(action) = self.status.dismiss() {
                self.navigate(action).await;
            }
            return;
        }

        match key.code {
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return;
            }
            KeyCode::Esc if self.show_help_popup => {
                self.show_help_popup = false;
                return;
            }
            _ => {}
        }
        if self.show_help_popup {
            return;
        }

        let action = match self.navigator.current() {
            Route::ParticipantList => self.participants.handle_key(key),
            Route::Participant(_) => match self.participant.as_mut() {
                Some(screen) => {
                    let before = screen.tab();
                    let action = screen.handle_key(key);
                    if screen.tab() != before {
                        let tab = screen.tab().as_str().to_string();
                        self.ui_state.update(|state| state.selected_tab = Some(tab));
                    }
                    action
                }
                None => ScreenAction::Navigate(NavAction::Back),
            },
            Route::Form { .. } => match self.form.as_mut() {
                Some(screen) => {
                    let action = screen.handle_key(key).await;
                    let toasts = screen.take_toasts();
                    self.status.show_all(toasts);
                    action
                }
                None => ScreenAction::Navigate(NavAction::Back),
            },
        };

        self.perform(action).await;
    }

    async fn perform(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::Navigate(nav) => self.navigate(nav).await,
            ScreenAction::Toast(toast) => self.status.show(toast),
            ScreenAction::Refresh => {
                if matches!(self.navigator.current(), Route::ParticipantList) {
                    self.refresh_participants().await;
                } else {
                    self.refresh_sessions().await;
                }
            }
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::None => {}
        }
    }

    async fn navigate(&mut self, action: NavAction) {
        match action {
            NavAction::Back => {
                self.navigator.back();
                match self.navigator.current() {
                    Route::ParticipantList => {
                        self.participant = None;
                        self.form = None;
                    }
                    Route::Participant(_) => self.form = None,
                    Route::Form { .. } => {}
                }
            }
            NavAction::To(route) => {
                self.navigator.push(route.clone());
                match route {
                    Route::ParticipantList => {}
                    Route::Participant(params) => {
                        let id = params.patient_id.to_string();
                        let remembered = self.ui_state.update(|state| state.selected_participant_id = Some(id));
                        let tab = remembered
                            .selected_tab
                            .as_deref()
                            .and_then(ParticipantTab::parse)
                            .unwrap_or(ParticipantTab::Sessions);
                        self.participant = Some(ParticipantScreen::new(params, tab));
                        self.refresh_sessions().await;
                    }
                    Route::Form { kind, params } => {
                        let context = FormContext::from_params(&params, self.config.user_id.clone());
                        let mut screen = FormEditorScreen::new(Arc::clone(&self.gateway), kind, context);
                        screen.load().await;
                        self.status.show_all(screen.take_toasts());
                        self.form = Some(screen);
                    }
                }
            }
        }
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        match self.navigator.current() {
            Route::ParticipantList => self.participants.draw(f, chunks[0]),
            Route::Participant(_) => {
                if let Some(screen) = self.participant.as_mut() {
                    screen.draw(f, chunks[0]);
                }
            }
            Route::Form { .. } => {
                if let Some(screen) = self.form.as_mut() {
                    screen.draw(f, chunks[0]);
                }
            }
        }

        let fallback = format!("{} | Esc: Back | Ctrl+C: Quit | F1: Help", self.navigator.current().title());
        self.status.render(f, chunks[1], &fallback);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 70, area);
        f.render_widget(Clear, popup_area);

        let help = Paragraph::new(self.context_help())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .border_style(Styles::warning()),
            );
        f.render_widget(help, popup_area);
    }

    fn context_help(&self) -> String {
        let global_help = "Global Shortcuts:\n\
            Esc - Go back\n\
            Ctrl+C - Quit application\n\
            F1 - Toggle this help\n\n";

        let screen_help = match self.navigator.current() {
            Route::ParticipantList => {
                "Participants:\n\
                ↑/↓ - Select participant\n\
                ←/→ or PgUp/PgDn - Change page\n\
                / - Search by participant or study id\n\
                g - Cycle group filter (All, Study, Control)\n\
                r - Refresh\n\
                Enter - Open participant\n\
                q - Quit"
            }
            Route::Participant(_) => {
                "Participant:\n\
                Tab or ←/→ - Switch between sessions and forms\n\
                ↑/↓ - Select\n\
                Enter - Open form (pre-VR questionnaire on a session)\n\
                o - Post-VR questionnaire for the selected session\n\
                r - Refresh sessions"
            }
            Route::Form { .. } => {
                "Form:\n\
                ↑/↓ or Tab - Move between fields\n\
                Type - Edit text, number and date fields (Enter applies)\n\
                ←/→ - Pick choice, adjust rating, move over checklist\n\
                Digits - Type a rating (1 then 0 gives 10)\n\
                Space - Toggle checklist entry\n\
                PgUp/PgDn - Previous/next week on weekly forms\n\
                Ctrl+S - Save\n\
                Ctrl+L - Clear all fields"
            }
        };

        format!("{}{}", global_help, screen_help)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{MemoryGateway, TrialApi};
    use serde_json::json;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(dir: &TempDir, gateway: &Arc<MemoryGateway>) -> App {
        let mut config = Config::default();
        config.user_id = Some("nurse.kim".to_string());
        config.ui_state_path = dir.path().join("state.json");
        let shared: Arc<dyn Gateway> = gateway.clone();
        App::new(config, shared)
    }

    fn scripted() -> Arc<MemoryGateway> {
        let gateway = Arc::new(MemoryGateway::lenient());
        gateway.respond_rows(
            TrialApi::PARTICIPANTS_ENDPOINT,
            vec![
                json!({"ParticipantId": 1, "StudyId": "CS-0001", "Age": 58}),
                json!({"ParticipantId": 2, "StudyId": "CS-0002", "Age": 63}),
            ],
        );
        gateway
    }

    #[tokio::test]
    async fn test_open_participant_remembers_selection() {
        let dir = TempDir::new().unwrap();
        let gateway = scripted();
        let mut app = app(&dir, &gateway);
        app.start().await;

        app.handle_key_event(key(KeyCode::Down)).await;
        app.handle_key_event(key(KeyCode::Enter)).await;
        assert!(matches!(app.current_route(), Route::Participant(p) if p.patient_id.as_str() == "2"));
        assert_eq!(gateway.calls_to(TrialApi::VR_SESSIONS_ENDPOINT).len(), 1);

        app.handle_key_event(key(KeyCode::Tab)).await;
        let state = UiStateStore::new(dir.path().join("state.json")).load();
        assert_eq!(state.selected_participant_id.as_deref(), Some("2"));
        assert_eq!(state.selected_tab.as_deref(), Some("forms"));

        let mut restarted = App::new(app.config.clone(), gateway.clone());
        restarted.start().await;
        restarted.handle_key_event(key(KeyCode::Enter)).await;
        assert!(matches!(restarted.current_route(), Route::Participant(p) if p.patient_id.as_str() == "2"));
    }

    #[tokio::test]
    async fn test_saved_toast_navigates_back_when_dismissed() {
        let dir = TempDir::new().unwrap();
        let gateway = scripted();
        gateway.respond_rows(
            "/GetStudyObservation",
            vec![json!({
                "ObservationId": 5,
                "ObservationDate": "2024-06-01",
                "ObserverName": "Dr Lee",
                "EngagementLevel": "High",
                "TechnicalIssues": "No",
                "DistressObserved": "No"
            })],
        );
        let mut app = app(&dir, &gateway);
        app.start().await;
        app.handle_key_event(key(KeyCode::Enter)).await;
        app.handle_key_event(key(KeyCode::Tab)).await;
        for _ in 0..6 {
            app.handle_key_event(key(KeyCode::Down)).await;
        }
        app.handle_key_event(key(KeyCode::Enter)).await;
        assert!(matches!(app.current_route(), Route::Form { .. }));

        app.handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)).await;
        assert_eq!(gateway.calls_to("/AddUpdateStudyObservation").len(), 1);
        assert!(app.status.has_pending_action());

        app.handle_key_event(key(KeyCode::Char('x'))).await;
        assert!(matches!(app.current_route(), Route::Participant(_)));
        assert!(app.form.is_none());
    }
}
