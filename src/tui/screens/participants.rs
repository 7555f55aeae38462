//! Participant list screen

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::gateway::{Gateway, GatewayError};
use crate::lists::{fetch_participants, PagedList, Paginated, ParticipantFilter};
use crate::models::{display_date, GroupType, Participant};
use crate::navigation::{NavAction, Route, RouteParams};
use crate::tui::screens::ScreenAction;
use crate::tui::ui::{truncate, InputField, Styles};

pub struct ParticipantListScreen {
    all: Vec<Participant>,
    list: PagedList<Participant>,
    state: ListState,
    filter: ParticipantFilter,
    search: InputField,
    searching: bool,
}

impl ParticipantListScreen {
    pub fn new(page_size: usize) -> Self {
        Self {
            all: Vec::new(),
            list: PagedList::new(Vec::new(), page_size),
            state: ListState::default(),
            filter: ParticipantFilter::new(),
            search: InputField::new("Search (participant or study id)").with_placeholder("press / to search"),
            searching: false,
        }
    }

    pub async fn refresh(&mut self, gateway: &dyn Gateway, user_id: Option<&str>) -> Result<usize, GatewayError> {
        let participants = fetch_participants(gateway, user_id).await?;
        let count = participants.len();
        self.set_participants(participants);
        Ok(count)
    }

    pub fn set_participants(&mut self, participants: Vec<Participant>) {
        self.all = participants;
        self.apply_filter();
    }

    fn apply_filter(&mut self) {
        self.list.set_items(self.filter.apply(&self.all));
        self.list.go_to_first_page();
        self.reset_row();
    }

    fn reset_row(&mut self) {
        let row = if self.list.page_items().is_empty() { None } else { Some(0) };
        self.state.select(row);
    }

    /// Move the cursor to a participant, e.g. the one remembered from last run
    pub fn select_participant(&mut self, participant_id: &str) -> bool {
        let Some(index) = self
            .list
            .items()
            .iter()
            .position(|p| p.participant_id.as_str() == participant_id)
        else {
            return false;
        };
        self.list.show_index(index);
        self.state.select(Some(index - self.list.current_page() * self.list.items_per_page()));
        true
    }

    pub fn selected(&self) -> Option<&Participant> {
        self.state.selected().and_then(|row| self.list.page_items().get(row))
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    fn cycle_group(&mut self) {
        self.filter.group = match self.filter.group {
            None => Some(GroupType::Study),
            Some(GroupType::Study) => Some(GroupType::Control),
            Some(GroupType::Control) => None,
        };
        self.apply_filter();
    }

    fn move_row(&mut self, down: bool) {
        let count = self.list.page_items().len();
        if count == 0 {
            return;
        }
        let current = self.state.selected().unwrap_or(0);
        let next = if down {
            (current + 1) % count
        } else if current == 0 {
            count - 1
        } else {
            current - 1
        };
        self.state.select(Some(next));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ScreenAction {
        if self.searching {
            match key.code {
                KeyCode::Char(c) => self.search.insert_char(c),
                KeyCode::Backspace => self.search.delete_char(),
                KeyCode::Left => self.search.move_cursor_left(),
                KeyCode::Right => self.search.move_cursor_right(),
                KeyCode::Enter | KeyCode::Esc | KeyCode::Down => {
                    self.searching = false;
                    self.search.set_focus(false);
                }
                _ => {}
            }
            self.filter = self.filter.clone().with_text(self.search.value.clone());
            self.apply_filter();
            return ScreenAction::None;
        }

        match key.code {
            KeyCode::Char('/') => {
                self.searching = true;
                self.search.set_focus(true);
            }
            KeyCode::Char('g') => self.cycle_group(),
            KeyCode::Char('r') => return ScreenAction::Refresh,
            KeyCode::Char('q') => return ScreenAction::Quit,
            KeyCode::Up | KeyCode::Char('k') => self.move_row(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_row(true),
            KeyCode::Right | KeyCode::PageDown => {
                self.list.next_page();
                self.reset_row();
            }
            KeyCode::Left | KeyCode::PageUp => {
                self.list.previous_page();
                self.reset_row();
            }
            KeyCode::Enter => {
                if let Some(p) = self.selected() {
                    let params = RouteParams::new(p.participant_id.clone(), p.study_id.clone(), p.age);
                    return ScreenAction::Navigate(NavAction::To(Route::Participant(params)));
                }
            }
            _ => {}
        }
        ScreenAction::None
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        self.search.render(f, chunks[0]);

        let header = Line::from(Span::styled(
            format!("{:<12}{:<12}{:<6}{:<10}{:<10}{:<12}", "Participant", "Study", "Age", "Gender", "Group", "Enrolled"),
            Styles::title(),
        ));
        let mut items = vec![ListItem::new(header)];
        items.extend(self.list.page_items().iter().map(|p| {
            ListItem::new(format!(
                "{:<12}{:<12}{:<6}{:<10}{:<10}{:<12}",
                truncate(p.participant_id.as_str(), 11),
                truncate(p.study_id.as_str(), 11),
                p.age.map(|a| a.to_string()).unwrap_or_default(),
                truncate(p.gender.as_deref().unwrap_or(""), 9),
                p.group_type.map(|g| g.as_str()).unwrap_or(""),
                p.enrolled_on.map(display_date).unwrap_or_default(),
            ))
        }));

        // Row 0 of the widget is the header
        let mut state = ListState::default();
        state.select(self.state.selected().map(|row| row + 1));

        let group = self.filter.group.map(|g| g.as_str()).unwrap_or("All");
        let title = format!("Participants ({} of {}) - group: {}", self.list.len(), self.all.len(), group);
        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL).border_style(Styles::active_border()))
            .highlight_style(Styles::selected());
        f.render_stateful_widget(list, chunks[1], &mut state);

        let footer = Paragraph::new(format!(
            "Page {}/{}  ←/→ page  / search  g group  r refresh  Enter open",
            self.list.current_page() + 1,
            self.list.total_pages()
        ))
        .style(Styles::inactive());
        f.render_widget(footer, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ParticipantId, StudyId};
    use crossterm::event::KeyModifiers;

    fn participant(id: u32, group: GroupType) -> Participant {
        Participant {
            participant_id: ParticipantId::new(id.to_string()),
            study_id: StudyId::padded("CS", id),
            age: Some(50),
            gender: None,
            group_type: Some(group),
            status: None,
            enrolled_on: None,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen() -> ParticipantListScreen {
        let mut screen = ParticipantListScreen::new(3);
        screen.set_participants(
            (1..=7)
                .map(|i| participant(i, if i % 2 == 0 { GroupType::Control } else { GroupType::Study }))
                .collect(),
        );
        screen
    }

    #[test]
    fn test_enter_navigates_with_params() {
        let mut screen = screen();
        screen.handle_key(key(KeyCode::Down));
        let action = screen.handle_key(key(KeyCode::Enter));
        match action {
            ScreenAction::Navigate(NavAction::To(Route::Participant(params))) => {
                assert_eq!(params.patient_id.as_str(), "2");
                assert_eq!(params.study_id.as_str(), "CS-0002");
                assert_eq!(params.age, Some(50));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_search_and_group_filters() {
        let mut screen = screen();
        screen.handle_key(key(KeyCode::Char('/')));
        assert!(screen.is_searching());
        screen.handle_key(key(KeyCode::Char('7')));
        assert_eq!(screen.list.len(), 1);
        screen.handle_key(key(KeyCode::Backspace));
        screen.handle_key(key(KeyCode::Enter));
        assert_eq!(screen.list.len(), 7);

        screen.handle_key(key(KeyCode::Char('g')));
        assert_eq!(screen.list.len(), 4);
        screen.handle_key(key(KeyCode::Char('g')));
        assert_eq!(screen.list.len(), 3);
        screen.handle_key(key(KeyCode::Char('g')));
        assert_eq!(screen.list.len(), 7);
    }

    #[test]
    fn test_select_remembered_participant_changes_page() {
        let mut screen = screen();
        assert!(screen.select_participant("5"));
        assert_eq!(screen.list.current_page(), 1);
        assert_eq!(screen.selected().map(|p| p.participant_id.as_str()), Some("5"));
        assert!(!screen.select_participant("99"));
    }
}
