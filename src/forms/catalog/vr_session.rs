//! Questionnaires filled in before and after each VR session

use crate::forms::schema::{ChoiceOption, FieldSpec, FormKind, FormSchema, MultiEncoding, YES_NO};

const PRE_FIELDS: &[FieldSpec] = &[
    FieldSpec::number("session_no", "SessionNo", "Session number").required(),
    FieldSpec::rating("pain", "PainScore", "Pain (0-10)", 0, 10).required(),
    FieldSpec::rating("anxiety", "AnxietyScore", "Anxiety (0-10)", 0, 10).required(),
    FieldSpec::choice("nausea", "HasNausea", "Nausea", YES_NO).required(),
    FieldSpec::choice("headache", "HasHeadache", "Headache", YES_NO),
    FieldSpec::choice("medication", "PainMedicationTaken", "Pain medication today", YES_NO),
    FieldSpec::text("medication_details", "MedicationDetails", "Medication and dose")
        .revealed_by("medication", "Yes"),
    FieldSpec::choice("ready", "ReadyForSession", "Ready for session", YES_NO).required(),
    FieldSpec::long_text("not_ready_reason", "NotReadyReason", "Reason not ready")
        .required()
        .revealed_by("ready", "No"),
];

const SYMPTOMS: &[ChoiceOption] = &[
    ChoiceOption::new("1", "Nausea"),
    ChoiceOption::new("2", "Dizziness"),
    ChoiceOption::new("3", "Eye strain"),
    ChoiceOption::new("4", "Headache"),
    ChoiceOption::new("5", "Disorientation"),
    ChoiceOption::new("6", "Sweating"),
];

const POST_FIELDS: &[FieldSpec] = &[
    FieldSpec::number("session_no", "SessionNo", "Session number").required(),
    FieldSpec::choice("completed", "SessionCompleted", "Session completed", YES_NO).required(),
    FieldSpec::long_text("stop_reason", "StopReason", "Reason session stopped")
        .required()
        .revealed_by("completed", "No"),
    FieldSpec::number("duration", "DurationMinutes", "Duration (minutes)"),
    FieldSpec::rating("pain", "PainScore", "Pain (0-10)", 0, 10).required(),
    FieldSpec::rating("anxiety", "AnxietyScore", "Anxiety (0-10)", 0, 10).required(),
    FieldSpec::multi("symptoms", "CybersicknessSymptoms", "Cybersickness symptoms", SYMPTOMS, MultiEncoding::CommaJoined),
    FieldSpec::rating("enjoyment", "Enjoyment", "Enjoyment (1-5)", 1, 5),
    FieldSpec::long_text("comments", "Comments", "Comments"),
];

pub static PRE_SCHEMA: FormSchema = FormSchema {
    kind: FormKind::PreVrQuestionnaire,
    title: "Pre-VR Questionnaire",
    load_endpoints: &["/GetPreVRSessionQuestionnaire"],
    save_endpoint: "/AddUpdatePreVRSessionQuestionnaire",
    id_column: "PreVRId",
    date_column: Some("SessionDate"),
    fields: PRE_FIELDS,
    check: None,
    derive: None,
};

pub static POST_SCHEMA: FormSchema = FormSchema {
    kind: FormKind::PostVrQuestionnaire,
    title: "Post-VR Questionnaire",
    load_endpoints: &["/GetPostVRSessionQuestionnaire"],
    save_endpoint: "/AddUpdatePostVRSessionQuestionnaire",
    id_column: "PostVRId",
    date_column: Some("SessionDate"),
    fields: POST_FIELDS,
    check: None,
    derive: None,
};
