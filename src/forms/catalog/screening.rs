use crate::forms::schema::{ChoiceOption, FieldSpec, FormKind, FormSchema, MultiEncoding, YES_NO};
use crate::forms::FormValues;

const ECOG: &[ChoiceOption] = &[
    ChoiceOption::new("0", "0 - Fully active"),
    ChoiceOption::new("1", "1 - Restricted in strenuous activity"),
    ChoiceOption::new("2", "2 - Ambulatory, self-care"),
    ChoiceOption::new("3", "3 - Limited self-care"),
    ChoiceOption::new("4", "4 - Completely disabled"),
];

const EPILEPSY: &str = "1";

const CLINICAL_CONDITIONS: &[ChoiceOption] = &[
    ChoiceOption::new(EPILEPSY, "Epilepsy or seizures"),
    ChoiceOption::new("2", "Severe motion sickness"),
    ChoiceOption::new("3", "Vertigo"),
    ChoiceOption::new("4", "Visual impairment"),
    ChoiceOption::new("5", "Hearing impairment"),
    ChoiceOption::new("6", "Open wounds on face or head"),
    ChoiceOption::new("7", "Active psychiatric disorder"),
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::today("screening_date", "ScreeningDate", "Screening date").required(),
    FieldSpec::number("age", "Age", "Age").required(),
    FieldSpec::text("diagnosis", "CancerDiagnosis", "Diagnosis").required(),
    FieldSpec::choice("ecog", "ECOGStatus", "ECOG performance status", ECOG).required(),
    FieldSpec::multi(
        "conditions",
        "ClinicalConditions",
        "Clinical checklist",
        CLINICAL_CONDITIONS,
        MultiEncoding::IdObjects,
    ),
    FieldSpec::choice("motion_sickness", "MotionSicknessHistory", "History of motion sickness", YES_NO).required(),
    FieldSpec::long_text("motion_sickness_details", "MotionSicknessDetails", "Motion sickness details")
        .revealed_by("motion_sickness", "Yes"),
    FieldSpec::choice("eligible", "IsEligible", "Eligible", YES_NO).required(),
    FieldSpec::long_text("ineligible_reason", "IneligibleReason", "Reason not eligible")
        .required()
        .revealed_by("eligible", "No"),
];

fn check(values: &FormValues) -> Result<(), String> {
    if let Ok(age) = values.text("age").parse::<f64>() {
        if !(18.0..=120.0).contains(&age) {
            return Err("Participants must be 18 or older".to_string());
        }
    }
    if values.text("eligible") == "Yes" && values.multi("conditions").iter().any(|c| c == EPILEPSY) {
        return Err("Participants with epilepsy or seizures cannot be marked eligible".to_string());
    }
    Ok(())
}

pub static SCHEMA: FormSchema = FormSchema {
    kind: FormKind::Screening,
    title: "Screening",
    load_endpoints: &["/GetParticipantScreening"],
    save_endpoint: "/AddUpdateParticipantScreening",
    id_column: "ScreeningId",
    date_column: None,
    fields: FIELDS,
    check: Some(check),
    derive: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn values() -> FormValues {
        FormValues::defaults(&SCHEMA, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap())
    }

    #[test]
    fn test_epilepsy_blocks_eligibility() {
        let mut values = values();
        values.set_input("eligible", "Yes").unwrap();
        values.toggle_option("conditions", "Vertigo").unwrap();
        assert!(check(&values).is_ok());

        values.toggle_option("conditions", "1").unwrap();
        assert!(check(&values).is_err());

        values.set_input("eligible", "No").unwrap();
        assert!(check(&values).is_ok());
    }

    #[test]
    fn test_minimum_age() {
        let mut values = values();
        values.set_input("age", "17").unwrap();
        assert!(check(&values).is_err());
        values.set_input("age", "64").unwrap();
        assert!(check(&values).is_ok());
    }
}
