use crate::forms::schema::{FieldSpec, FormKind, FormSchema, YES_NO};
use crate::forms::FormValues;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::today("consent_date", "ConsentDate", "Consent date").required(),
    FieldSpec::choice("read_sheet", "ReadInformationSheet", "Read the information sheet", YES_NO).required(),
    FieldSpec::choice("questions_answered", "QuestionsAnswered", "Questions answered", YES_NO).required(),
    FieldSpec::choice("voluntary", "UnderstandsVoluntary", "Understands participation is voluntary", YES_NO)
        .required(),
    FieldSpec::choice("data_use", "AgreesToDataUse", "Agrees to use of data", YES_NO).required(),
    FieldSpec::choice("future_contact", "AgreesToFutureContact", "Agrees to future contact", YES_NO),
    FieldSpec::choice("consent_given", "ConsentGiven", "Consent given", YES_NO).required(),
    FieldSpec::text("signed_by", "ParticipantSignatureName", "Signed by")
        .required()
        .revealed_by("consent_given", "Yes"),
    FieldSpec::text("witness", "WitnessName", "Witness").revealed_by("consent_given", "Yes"),
    FieldSpec::long_text("decline_reason", "DeclineReason", "Reason for declining").revealed_by("consent_given", "No"),
];

/// Keys that must all be answered `Yes` before consent can be recorded
const PREREQUISITES: &[&str] = &["read_sheet", "questions_answered", "voluntary", "data_use"];

fn check(values: &FormValues) -> Result<(), String> {
    if values.text("consent_given") != "Yes" {
        return Ok(());
    }
    let unmet: Vec<&str> = PREREQUISITES
        .iter()
        .filter(|key| values.text(key) != "Yes")
        .filter_map(|key| SCHEMA.field(key).map(|f| f.label))
        .collect();
    if unmet.is_empty() {
        Ok(())
    } else {
        Err(format!("Consent cannot be given without: {}", unmet.join(", ")))
    }
}

pub static SCHEMA: FormSchema = FormSchema {
    kind: FormKind::InformedConsent,
    title: "Informed Consent",
    load_endpoints: &["/GetParticipantInformedConsent"],
    save_endpoint: "/AddUpdateInformedConsent",
    id_column: "ConsentId",
    date_column: None,
    fields: FIELDS,
    check: Some(check),
    derive: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_consent_requires_prerequisites() {
        let mut values = FormValues::defaults(&SCHEMA, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        values.set_input("consent_given", "Yes").unwrap();
        values.set_input("read_sheet", "Yes").unwrap();
        values.set_input("questions_answered", "Yes").unwrap();
        values.set_input("voluntary", "No").unwrap();
        values.set_input("data_use", "Yes").unwrap();

        let err = check(&values).unwrap_err();
        assert!(err.contains("voluntary"));

        values.set_input("voluntary", "Yes").unwrap();
        assert!(check(&values).is_ok());

        values.set_input("voluntary", "No").unwrap();
        values.set_input("consent_given", "No").unwrap();
        assert!(check(&values).is_ok());
    }
}
