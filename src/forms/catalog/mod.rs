//! The form catalogue: one static schema per data-capture form

mod adverse_event;
pub mod distress;
mod exit_interview;
pub mod fact_g;
mod informed_consent;
mod screening;
mod study_observation;
mod vr_session;

use crate::forms::schema::{FormKind, FormSchema};

pub fn schema_for(kind: FormKind) -> &'static FormSchema {
    match kind {
        FormKind::AdverseEvent => &adverse_event::SCHEMA,
        FormKind::ExitInterview => &exit_interview::SCHEMA,
        FormKind::InformedConsent => &informed_consent::SCHEMA,
        FormKind::Screening => &screening::SCHEMA,
        FormKind::PreVrQuestionnaire => &vr_session::PRE_SCHEMA,
        FormKind::PostVrQuestionnaire => &vr_session::POST_SCHEMA,
        FormKind::StudyObservation => &study_observation::SCHEMA,
        FormKind::FactG => &fact_g::SCHEMA,
        FormKind::DistressThermometer => &distress::SCHEMA,
    }
}
