use tracing::info;

use crate::gateway::{Gateway, GatewayError, TrialApi};
use crate::models::{GroupType, Participant};

/// Fetch every participant visible to `user_id`
pub async fn fetch_participants<G: Gateway + ?Sized>(
    gateway: &G,
    user_id: Option<&str>,
) -> Result<Vec<Participant>, GatewayError> {
    let query: Vec<(String, String)> = user_id
        .map(|id| vec![("UserId".to_string(), id.to_string())])
        .unwrap_or_default();

    let response = gateway.get(TrialApi::PARTICIPANTS_ENDPOINT, &query).await?;
    let participants: Vec<Participant> = response.decode_rows(TrialApi::PARTICIPANTS_ENDPOINT);
    info!("Fetched {} participants", participants.len());
    Ok(participants)
}

/// Client-side participant filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantFilter {
    /// Case-insensitive substring of participant id or study id
    pub text: Option<String>,
    pub group: Option<GroupType>,
}

impl ParticipantFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = if text.trim().is_empty() { None } else { Some(text) };
        self
    }

    pub fn with_group(mut self, group: GroupType) -> Self {
        self.group = Some(group);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.group.is_none()
    }

    pub fn matches(&self, participant: &Participant) -> bool {
        if let Some(group) = self.group {
            if participant.group_type != Some(group) {
                return false;
            }
        }

        match &self.text {
            Some(text) => {
                let needle = text.trim().to_lowercase();
                participant.participant_id.as_str().to_lowercase().contains(&needle)
                    || participant.study_id.as_str().to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    pub fn apply(&self, participants: &[Participant]) -> Vec<Participant> {
        participants.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use serde_json::json;

    fn rows() -> Vec<serde_json::Value> {
        vec![
            json!({"ParticipantId": 1, "StudyId": "CS-0001", "Age": 58, "GroupType": "Study"}),
            json!({"ParticipantId": 2, "StudyId": "CS-0002", "Age": "63", "GroupType": "Controlled"}),
            json!({"ParticipantId": 13, "StudyId": "CS-0013", "GroupType": "Study"}),
            json!({"StudyId": "broken row"}),
        ]
    }

    #[tokio::test]
    async fn test_fetch_sends_user_and_skips_bad_rows() {
        let gateway = MemoryGateway::new();
        gateway.respond_rows(TrialApi::PARTICIPANTS_ENDPOINT, rows());

        let participants = fetch_participants(&gateway, Some("nurse.kim")).await.unwrap();
        assert_eq!(participants.len(), 3);

        let calls = gateway.calls();
        assert_eq!(calls[0].method, "GET");
        assert_eq!(calls[0].query, vec![("UserId".to_string(), "nurse.kim".to_string())]);
    }

    #[tokio::test]
    async fn test_fetch_propagates_backend_errors() {
        let gateway = MemoryGateway::new();
        gateway.fail(TrialApi::PARTICIPANTS_ENDPOINT, 401, "expired");
        assert!(fetch_participants(&gateway, None).await.is_err());
    }

    #[tokio::test]
    async fn test_filter_by_text_and_group() {
        let gateway = MemoryGateway::new();
        gateway.respond_rows(TrialApi::PARTICIPANTS_ENDPOINT, rows());
        let participants = fetch_participants(&gateway, None).await.unwrap();

        let by_text = ParticipantFilter::new().with_text("001");
        let ids: Vec<_> = by_text.apply(&participants).iter().map(|p| p.participant_id.to_string()).collect();
        assert_eq!(ids, vec!["1", "13"]);

        let control = ParticipantFilter::new().with_group(GroupType::Control);
        assert_eq!(control.apply(&participants).len(), 1);

        let both = ParticipantFilter::new().with_text("13").with_group(GroupType::Control);
        assert!(both.apply(&participants).is_empty());

        assert!(ParticipantFilter::new().with_text("  ").is_empty());
    }
}
