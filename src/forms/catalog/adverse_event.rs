use crate::forms::schema::{
    ChoiceOption, FieldSpec, FormKind, FormSchema, MultiEncoding, YES_NO, YES_NO_UNCERTAIN,
};

const SEVERITY: &[ChoiceOption] = &[
    ChoiceOption::new("Mild", "Mild"),
    ChoiceOption::new("Moderate", "Moderate"),
    ChoiceOption::new("Severe", "Severe"),
];

const ACTION_TAKEN: &[ChoiceOption] = &[
    ChoiceOption::new("None", "No action"),
    ChoiceOption::new("Paused", "Session paused"),
    ChoiceOption::new("Stopped", "Session stopped"),
    ChoiceOption::new("Withdrawn", "Withdrawn from study"),
];

const OUTCOMES: &[ChoiceOption] = &[
    ChoiceOption::new("1", "Recovered"),
    ChoiceOption::new("2", "Recovering"),
    ChoiceOption::new("3", "Not recovered"),
    ChoiceOption::new("4", "Recovered with sequelae"),
    ChoiceOption::new("5", "Fatal"),
    ChoiceOption::new("6", "Unknown"),
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::today("event_date", "EventDate", "Date of event").required(),
    FieldSpec::long_text("description", "AEDescription", "Description").required(),
    FieldSpec::choice("severity", "Severity", "Severity", SEVERITY).required(),
    FieldSpec::choice("related", "IsRelatedToVR", "Related to VR", YES_NO_UNCERTAIN).required(),
    FieldSpec::choice("serious", "IsSerious", "Serious adverse event", YES_NO).required(),
    FieldSpec::long_text("serious_details", "SeriousDetails", "Serious event details")
        .required()
        .revealed_by("serious", "Yes"),
    FieldSpec::choice("action_taken", "ActionTaken", "Action taken", ACTION_TAKEN),
    FieldSpec::multi("outcomes", "Outcomes", "Outcome", OUTCOMES, MultiEncoding::IdObjects),
    FieldSpec::choice("reported", "ReportedToPI", "Reported to PI", YES_NO),
    FieldSpec::date("report_date", "ReportDate", "Date reported").revealed_by("reported", "Yes"),
    FieldSpec::long_text("notes", "Notes", "Notes"),
];

fn check(values: &crate::forms::FormValues) -> Result<(), String> {
    if let (Some(event), Some(report)) = (values.date("event_date"), values.date("report_date")) {
        if values.is_revealed_key("report_date") && report < event {
            return Err("Report date cannot be before the event".to_string());
        }
    }
    Ok(())
}

pub static SCHEMA: FormSchema = FormSchema {
    kind: FormKind::AdverseEvent,
    title: "Adverse Event",
    load_endpoints: &["/GetParticipantAdverseEvent"],
    save_endpoint: "/AddUpdateParticipantAdverseEvent",
    id_column: "AEId",
    date_column: None,
    fields: FIELDS,
    check: Some(check),
    derive: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormValues;
    use chrono::NaiveDate;

    #[test]
    fn test_report_date_not_before_event() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let mut values = FormValues::defaults(&SCHEMA, today);
        values.set_input("reported", "Yes").unwrap();
        values.set_input("report_date", "2024-06-01").unwrap();
        assert!(check(&values).is_err());

        values.set_input("report_date", "2024-06-04").unwrap();
        assert!(check(&values).is_ok());

        values.set_input("report_date", "2024-06-01").unwrap();
        values.set_input("reported", "No").unwrap();
        assert!(check(&values).is_ok());
    }
}
