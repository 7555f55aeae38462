//! Weekly distress thermometer with its problem checklist

use serde_json::{json, Value};

use crate::forms::schema::{ChoiceOption, FieldSpec, FormKind, FormSchema, MultiEncoding};
use crate::forms::FormValues;
use crate::scoring::{DistressIndex, ProblemArea};

const PRACTICAL: &[ChoiceOption] = &[
    ChoiceOption::new("1", "Child care"),
    ChoiceOption::new("2", "Housing"),
    ChoiceOption::new("3", "Insurance or financial"),
    ChoiceOption::new("4", "Transportation"),
    ChoiceOption::new("5", "Work or school"),
    ChoiceOption::new("6", "Treatment decisions"),
];

const FAMILY: &[ChoiceOption] = &[
    ChoiceOption::new("1", "Dealing with children"),
    ChoiceOption::new("2", "Dealing with partner"),
    ChoiceOption::new("3", "Ability to have children"),
    ChoiceOption::new("4", "Family health issues"),
];

const EMOTIONAL: &[ChoiceOption] = &[
    ChoiceOption::new("1", "Depression"),
    ChoiceOption::new("2", "Fears"),
    ChoiceOption::new("3", "Nervousness"),
    ChoiceOption::new("4", "Sadness"),
    ChoiceOption::new("5", "Worry"),
    ChoiceOption::new("6", "Loss of interest in usual activities"),
];

const SPIRITUAL: &[ChoiceOption] = &[
    ChoiceOption::new("1", "Spiritual or religious concerns"),
];

const PHYSICAL: &[ChoiceOption] = &[
    ChoiceOption::new("1", "Appearance"),
    ChoiceOption::new("2", "Bathing or dressing"),
    ChoiceOption::new("3", "Breathing"),
    ChoiceOption::new("4", "Eating"),
    ChoiceOption::new("5", "Fatigue"),
    ChoiceOption::new("6", "Getting around"),
    ChoiceOption::new("7", "Memory or concentration"),
    ChoiceOption::new("8", "Nausea"),
    ChoiceOption::new("9", "Pain"),
    ChoiceOption::new("10", "Sleep"),
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::rating("rating", "DistressScore", "Distress this week (0-10)", 0, 10).required(),
    FieldSpec::multi("practical", "PracticalProblems", "Practical problems", PRACTICAL, MultiEncoding::CommaJoined),
    FieldSpec::multi("family", "FamilyProblems", "Family problems", FAMILY, MultiEncoding::CommaJoined),
    FieldSpec::multi("emotional", "EmotionalProblems", "Emotional problems", EMOTIONAL, MultiEncoding::CommaJoined),
    FieldSpec::multi("spiritual", "SpiritualConcerns", "Spiritual concerns", SPIRITUAL, MultiEncoding::CommaJoined),
    FieldSpec::multi("physical", "PhysicalProblems", "Physical problems", PHYSICAL, MultiEncoding::CommaJoined),
    FieldSpec::long_text("other", "OtherProblems", "Other problems"),
];

fn area_key(area: ProblemArea) -> &'static str {
    match area {
        ProblemArea::Practical => "practical",
        ProblemArea::Family => "family",
        ProblemArea::Emotional => "emotional",
        ProblemArea::Spiritual => "spiritual",
        ProblemArea::Physical => "physical",
    }
}

/// Distress index of the current answers
pub fn index(values: &FormValues) -> DistressIndex {
    DistressIndex::compute(values.rating("rating"), |area| values.multi(area_key(area)).len())
}

fn derive(values: &FormValues) -> Vec<(&'static str, Value)> {
    let index = index(values);
    vec![
        ("TotalProblems", json!(index.total_problems)),
        ("IsSignificant", json!(if index.significant { "Yes" } else { "No" })),
    ]
}

pub static SCHEMA: FormSchema = FormSchema {
    kind: FormKind::DistressThermometer,
    title: "Distress Thermometer Weekly",
    load_endpoints: &["/GetParticipantDistressWeeklyScore"],
    save_endpoint: "/AddUpdateParticipantDistressWeeklyScore",
    id_column: "PDWSID",
    date_column: Some("CreatedDate"),
    fields: FIELDS,
    check: None,
    derive: Some(derive),
};
