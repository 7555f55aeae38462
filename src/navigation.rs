//! Screen routes and the back stack
//!
//! Route parameters are the only contract between screens: a list screen
//! hands the next screen the identifiers it needs and nothing else.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::forms::FormKind;
use crate::models::{ParticipantId, StudyId};

/// Identifiers passed from one screen to the next
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteParams {
    pub patient_id: ParticipantId,
    pub age: Option<u32>,
    pub study_id: StudyId,
    pub observation_id: Option<String>,
    #[serde(rename = "CreatedDate")]
    pub created_date: Option<NaiveDate>,
}

impl RouteParams {
    pub fn new(patient_id: ParticipantId, study_id: StudyId, age: Option<u32>) -> Self {
        Self {
            patient_id,
            age,
            study_id,
            observation_id: None,
            created_date: None,
        }
    }

    pub fn with_observation(mut self, observation_id: impl Into<String>) -> Self {
        self.observation_id = Some(observation_id.into());
        self
    }

    pub fn with_created_date(mut self, date: NaiveDate) -> Self {
        self.created_date = Some(date);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    ParticipantList,
    /// Sessions and forms of one participant
    Participant(RouteParams),
    Form { kind: FormKind, params: RouteParams },
}

impl Route {
    pub fn title(&self) -> String {
        match self {
            Route::ParticipantList => "Participants".to_string(),
            Route::Participant(params) => format!("Participant {} ({})", params.patient_id, params.study_id),
            Route::Form { kind, params } => format!("{} - {}", kind.title(), params.study_id),
        }
    }

    pub fn params(&self) -> Option<&RouteParams> {
        match self {
            Route::ParticipantList => None,
            Route::Participant(params) | Route::Form { params, .. } => Some(params),
        }
    }
}

/// Navigation request produced by screens and toasts
#[derive(Debug, Clone, PartialEq)]
pub enum NavAction {
    Back,
    To(Route),
}

/// Back stack; the root route is never popped
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::ParticipantList)
    }
}

impl Navigator {
    pub fn new(root: Route) -> Self {
        Self { stack: vec![root] }
    }

    pub fn current(&self) -> &Route {
        // The stack always holds the root.
        &self.stack[self.stack.len() - 1]
    }

    pub fn push(&mut self, route: Route) {
        self.stack.push(route);
    }

    /// Pop the current route; returns false when already at the root
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    pub fn apply(&mut self, action: NavAction) {
        match action {
            NavAction::Back => {
                self.back();
            }
            NavAction::To(route) => self.push(route),
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> RouteParams {
        RouteParams::new(ParticipantId::new("12"), StudyId::new("CS-0012"), Some(61))
    }

    #[test]
    fn test_back_stops_at_root() {
        let mut nav = Navigator::default();
        nav.push(Route::Participant(params()));
        nav.push(Route::Form { kind: FormKind::AdverseEvent, params: params() });
        assert_eq!(nav.depth(), 3);

        assert!(nav.back());
        assert!(matches!(nav.current(), Route::Participant(_)));
        assert!(nav.back());
        assert!(!nav.back());
        assert_eq!(nav.current(), &Route::ParticipantList);
    }

    #[test]
    fn test_apply_actions() {
        let mut nav = Navigator::default();
        nav.apply(NavAction::To(Route::Participant(params())));
        assert_eq!(nav.current().params().map(|p| p.patient_id.as_str()), Some("12"));
        nav.apply(NavAction::Back);
        assert_eq!(nav.current(), &Route::ParticipantList);
    }

    #[test]
    fn test_route_params_wire_names() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let json = serde_json::to_value(params().with_observation("9").with_created_date(date)).unwrap();
        assert_eq!(json["patientId"], "12");
        assert_eq!(json["studyId"], "CS-0012");
        assert_eq!(json["age"], 61);
        assert_eq!(json["observationId"], "9");
        assert_eq!(json["CreatedDate"], "2024-05-02");
    }
}
