use crate::forms::schema::{ChoiceOption, FieldSpec, FormKind, FormSchema, YES_NO};

const ENGAGEMENT: &[ChoiceOption] = &[
    ChoiceOption::new("Low", "Low"),
    ChoiceOption::new("Moderate", "Moderate"),
    ChoiceOption::new("High", "High"),
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::today("observation_date", "ObservationDate", "Observation date").required(),
    FieldSpec::text("observer", "ObserverName", "Observer").required(),
    FieldSpec::number("session_no", "SessionNo", "Session number"),
    FieldSpec::choice("engagement", "EngagementLevel", "Engagement", ENGAGEMENT).required(),
    FieldSpec::choice("technical_issues", "TechnicalIssues", "Technical issues", YES_NO).required(),
    FieldSpec::long_text("technical_details", "TechnicalIssueDetails", "Technical issue details")
        .required()
        .revealed_by("technical_issues", "Yes"),
    FieldSpec::choice("distress_observed", "DistressObserved", "Distress observed", YES_NO).required(),
    FieldSpec::long_text("distress_details", "DistressDetails", "Distress details")
        .revealed_by("distress_observed", "Yes"),
    FieldSpec::long_text("observations", "Observations", "Observations"),
];

pub static SCHEMA: FormSchema = FormSchema {
    kind: FormKind::StudyObservation,
    title: "Study Observation",
    load_endpoints: &["/GetStudyObservation"],
    save_endpoint: "/AddUpdateStudyObservation",
    id_column: "ObservationId",
    date_column: None,
    fields: FIELDS,
    check: None,
    derive: None,
};
