use crate::forms::schema::{
    ChoiceOption, FieldSpec, FormKind, FormSchema, MultiEncoding, YES_NO, YES_NO_UNCERTAIN,
};

const EXIT_REASONS: &[ChoiceOption] = &[
    ChoiceOption::new("1", "Time commitment"),
    ChoiceOption::new("2", "Side effects of VR"),
    ChoiceOption::new("3", "Health deteriorated"),
    ChoiceOption::new("4", "Lost interest"),
    ChoiceOption::new("5", "Travel difficulties"),
    ChoiceOption::new("6", "Other"),
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::today("interview_date", "InterviewDate", "Interview date").required(),
    FieldSpec::choice("completed", "CompletedStudy", "Completed the study", YES_NO).required(),
    FieldSpec::long_text("reason", "ReasonNotCompleted", "Reason for not completing")
        .required()
        .revealed_by("completed", "No"),
    FieldSpec::multi("exit_reasons", "ExitReasons", "Contributing reasons", EXIT_REASONS, MultiEncoding::CommaJoined)
        .revealed_by("completed", "No"),
    FieldSpec::rating("overall_experience", "OverallExperience", "Overall experience (1-5)", 1, 5).required(),
    FieldSpec::long_text("most_helpful", "MostHelpful", "Most helpful part"),
    FieldSpec::long_text("least_helpful", "LeastHelpful", "Least helpful part"),
    FieldSpec::choice("recommend", "WouldRecommend", "Would recommend to others", YES_NO_UNCERTAIN).required(),
    FieldSpec::long_text("suggestions", "Suggestions", "Suggestions"),
];

pub static SCHEMA: FormSchema = FormSchema {
    kind: FormKind::ExitInterview,
    title: "Exit Interview",
    load_endpoints: &["/GetExitInterviewQuestions", "/GetParticipantExitInterview"],
    save_endpoint: "/AddUpdateExitInterview",
    id_column: "ExitInterviewId",
    date_column: None,
    fields: FIELDS,
    check: None,
    derive: None,
};
