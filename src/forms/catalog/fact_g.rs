//! FACT-G weekly quality-of-life questionnaire
//!
//! Field keys are the lower-cased item codes so answers can be looked up by
//! the scoring tables.

use serde_json::{json, Value};

use crate::forms::schema::{FieldSpec, FormKind, FormSchema};
use crate::forms::FormValues;
use crate::scoring::{FactGScores, Subscale};

const fn item(key: &'static str, column: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec::rating(key, column, label, 0, 4).required()
}

const FIELDS: &[FieldSpec] = &[
    item("gp1", "GP1", "GP1 Lack of energy"),
    item("gp2", "GP2", "GP2 Nausea"),
    item("gp3", "GP3", "GP3 Trouble meeting family needs"),
    item("gp4", "GP4", "GP4 Pain"),
    item("gp5", "GP5", "GP5 Bothered by treatment side effects"),
    item("gp6", "GP6", "GP6 Feel ill"),
    item("gp7", "GP7", "GP7 Forced to spend time in bed"),
    item("gs1", "GS1", "GS1 Close to friends"),
    item("gs2", "GS2", "GS2 Emotional support from family"),
    item("gs3", "GS3", "GS3 Support from friends"),
    item("gs4", "GS4", "GS4 Family has accepted illness"),
    item("gs5", "GS5", "GS5 Satisfied with family communication"),
    item("gs6", "GS6", "GS6 Close to partner"),
    item("gs7", "GS7", "GS7 Satisfied with sex life"),
    item("ge1", "GE1", "GE1 Feel sad"),
    item("ge2", "GE2", "GE2 Satisfied with coping"),
    item("ge3", "GE3", "GE3 Losing hope"),
    item("ge4", "GE4", "GE4 Feel nervous"),
    item("ge5", "GE5", "GE5 Worry about dying"),
    item("ge6", "GE6", "GE6 Worry condition will get worse"),
    item("gf1", "GF1", "GF1 Able to work"),
    item("gf2", "GF2", "GF2 Work is fulfilling"),
    item("gf3", "GF3", "GF3 Able to enjoy life"),
    item("gf4", "GF4", "GF4 Accepted illness"),
    item("gf5", "GF5", "GF5 Sleeping well"),
    item("gf6", "GF6", "GF6 Enjoying usual fun things"),
    item("gf7", "GF7", "GF7 Content with quality of life"),
];

pub const TOTAL_COLUMN: &str = "FactGTotalScore";

/// Score the current answers
pub fn scores(values: &FormValues) -> FactGScores {
    FactGScores::compute(|code| values.rating(&code.to_lowercase()))
}

fn derive(values: &FormValues) -> Vec<(&'static str, Value)> {
    let scores = scores(values);
    let mut derived: Vec<(&'static str, Value)> = Subscale::ALL
        .iter()
        .map(|subscale| (subscale.column(), json!(scores.subscale(*subscale))))
        .collect();
    derived.push((TOTAL_COLUMN, json!(scores.total)));
    derived
}

pub static SCHEMA: FormSchema = FormSchema {
    kind: FormKind::FactG,
    title: "FACT-G Weekly",
    load_endpoints: &["/GetParticipantFactG"],
    save_endpoint: "/AddUpdateParticipantFactG",
    id_column: "FactGId",
    date_column: Some("CreatedDate"),
    fields: FIELDS,
    check: None,
    derive: Some(derive),
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::fact_g::ITEMS;
    use chrono::NaiveDate;

    #[test]
    fn test_fields_follow_item_table() {
        assert_eq!(FIELDS.len(), ITEMS.len());
        for (field, item) in FIELDS.iter().zip(ITEMS.iter()) {
            assert_eq!(field.column, item.code);
            assert_eq!(field.key, item.code.to_lowercase());
        }
    }

    #[test]
    fn test_derived_scores_in_payload_columns() {
        let mut values = FormValues::defaults(&SCHEMA, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        for field in FIELDS {
            values.set_input(field.key, "2").unwrap();
        }
        values.set_input("gp1", "0").unwrap();
        values.set_input("gs1", "4").unwrap();

        let derived = derive(&values);
        let get = |column: &str| derived.iter().find(|(c, _)| *c == column).map(|(_, v)| v.clone());

        // PWB: gp1 reversed to 4, six more reversed 2s
        assert_eq!(get("PWBScore"), Some(json!(16)));
        // SWB: 4 + six 2s
        assert_eq!(get("SWBScore"), Some(json!(16)));
        // EWB: one positive and five reversed items, all 2
        assert_eq!(get("EWBScore"), Some(json!(12)));
        assert_eq!(get("FWBScore"), Some(json!(14)));
        assert_eq!(get(TOTAL_COLUMN), Some(json!(58)));
    }
}
