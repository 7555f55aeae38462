use tracing::info;

use crate::gateway::{Gateway, GatewayError, TrialApi};
use crate::models::{ParticipantId, StudyId, VrSession};

/// Fetch the VR sessions of one participant, ordered by session number
pub async fn fetch_sessions<G: Gateway + ?Sized>(
    gateway: &G,
    participant_id: &ParticipantId,
    study_id: &StudyId,
) -> Result<Vec<VrSession>, GatewayError> {
    let query = vec![
        ("ParticipantId".to_string(), participant_id.to_string()),
        ("StudyId".to_string(), study_id.to_string()),
    ];

    let response = gateway.get(TrialApi::VR_SESSIONS_ENDPOINT, &query).await?;
    let mut sessions: Vec<VrSession> = response.decode_rows(TrialApi::VR_SESSIONS_ENDPOINT);
    sessions.sort_by_key(|s| (s.session_no.unwrap_or(u32::MAX), s.session_date));
    info!("Fetched {} VR sessions for participant {}", sessions.len(), participant_id);
    Ok(sessions)
}
