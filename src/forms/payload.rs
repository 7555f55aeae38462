//! Mapping between form values and backend rows
//!
//! Outgoing payloads are keyed by backend column names. Incoming rows are
//! read leniently: unknown columns are ignored and values that do not fit a
//! field are skipped with a warning.

use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::forms::controller::FormContext;
use crate::forms::schema::{FieldKind, FieldSpec, MultiEncoding};
use crate::forms::values::{FieldValue, FormValues};
use crate::models::{iso_date, parse_date};

/// Assemble the save payload for a form.
///
/// The id column is `null` until the backend has assigned a key. Fields whose
/// reveal condition does not hold are sent as `null`.
pub fn build_payload(
    values: &FormValues,
    context: &FormContext,
    record_id: Option<i64>,
    selected_date: Option<NaiveDate>,
) -> Value {
    let schema = values.schema();
    let mut payload = Map::new();

    payload.insert(schema.id_column.to_string(), record_id.map_or(Value::Null, Value::from));
    payload.insert("ParticipantId".to_string(), json!(context.participant_id.as_str()));
    payload.insert("StudyId".to_string(), json!(context.study_id.as_str()));

    let user = context.user_id.as_deref().map_or(Value::Null, |u| json!(u));
    payload.insert("CreatedBy".to_string(), user.clone());
    payload.insert("UpdatedBy".to_string(), user);

    if let (Some(column), Some(date)) = (schema.date_column, selected_date) {
        payload.insert(column.to_string(), json!(iso_date(date)));
    }

    for (spec, value) in values.iter() {
        let encoded = if values.is_revealed(spec) {
            encode_field(spec, value)
        } else {
            Value::Null
        };
        payload.insert(spec.column.to_string(), encoded);
    }

    if let Some(derive) = schema.derive {
        for (column, value) in derive(values) {
            payload.insert(column.to_string(), value);
        }
    }

    Value::Object(payload)
}

/// Wire value of one field
pub fn encode_field(spec: &FieldSpec, value: &FieldValue) -> Value {
    match (spec.kind, value) {
        (FieldKind::Multi { encoding, .. }, FieldValue::Multi(ids)) => encode_multi(encoding, ids),
        (FieldKind::Multi { encoding, .. }, _) => encode_multi(encoding, &[]),
        (_, FieldValue::Text(s)) => json!(s),
        (_, FieldValue::Date(d)) => json!(iso_date(*d)),
        (_, FieldValue::Rating(v)) => json!(v),
        (FieldKind::Text | FieldKind::LongText | FieldKind::Choice(_), _) => json!(""),
        _ => Value::Null,
    }
}

fn encode_multi(encoding: MultiEncoding, ids: &[String]) -> Value {
    match encoding {
        MultiEncoding::CommaJoined => json!(ids.join(",")),
        MultiEncoding::IdObjects => Value::Array(
            ids.iter()
                .map(|id| match id.parse::<i64>() {
                    Ok(n) => json!({ "Id": n }),
                    Err(_) => json!({ "Id": id }),
                })
                .collect(),
        ),
    }
}

/// Fill `values` from a backend row. Missing and `null` columns keep their
/// current value.
pub fn populate(values: &mut FormValues, row: &Map<String, Value>) {
    let schema = values.schema();
    for spec in schema.fields {
        let Some(raw) = row.get(spec.column) else {
            continue;
        };
        if raw.is_null() {
            continue;
        }

        let Some(decoded) = decode_field(spec, raw) else {
            warn!("{}: cannot read column {} from {}", schema.title, spec.column, raw);
            continue;
        };

        if let Err(e) = values.set(spec.key, decoded) {
            warn!("{}: ignoring stored value for {}: {}", schema.title, spec.column, e);
        }
    }
}

fn decode_field(spec: &FieldSpec, raw: &Value) -> Option<FieldValue> {
    match spec.kind {
        FieldKind::Text | FieldKind::LongText | FieldKind::Number | FieldKind::Choice(_) => {
            scalar_text(raw).map(FieldValue::Text)
        }
        FieldKind::Date { .. } => raw.as_str().and_then(parse_date).map(FieldValue::Date),
        FieldKind::Rating { .. } => match raw {
            Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
            Value::String(s) if s.trim().is_empty() => return Some(FieldValue::Empty),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .map(FieldValue::Rating),
        FieldKind::Multi { .. } => decode_multi(raw).map(FieldValue::Multi),
    }
}

fn scalar_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "Yes" } else { "No" }.to_string()),
        _ => None,
    }
}

/// Accepts `"1,4"`, `[1, 4]`, `["1", "4"]` and `[{"Id": 1}, {"Id": 4}]`
fn decode_multi(raw: &Value) -> Option<Vec<String>> {
    match raw {
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(obj) => obj.get("Id").or_else(|| obj.get("id")).and_then(scalar_text),
                    other => scalar_text(other),
                })
                .collect(),
        ),
        _ => None,
    }
}

/// Primary key from a backend row; accepts numbers and numeric strings
pub fn extract_record_id(row: &Map<String, Value>, id_column: &str) -> Option<i64> {
    match row.get(id_column)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::schema::FormKind;
    use crate::models::{ParticipantId, StudyId};

    fn context() -> FormContext {
        FormContext::new(ParticipantId::new("42"), StudyId::new("CS-0042")).with_user("nurse.kim")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[test]
    fn test_payload_create_mode_sends_null_key() {
        let schema = FormKind::AdverseEvent.schema();
        let values = FormValues::defaults(schema, today());
        let payload = build_payload(&values, &context(), None, None);

        assert_eq!(payload["AEId"], Value::Null);
        assert_eq!(payload["ParticipantId"], json!("42"));
        assert_eq!(payload["StudyId"], json!("CS-0042"));
        assert_eq!(payload["CreatedBy"], json!("nurse.kim"));
        assert_eq!(payload["EventDate"], json!("2024-06-03"));
    }

    #[test]
    fn test_payload_hidden_explanation_is_null() {
        let schema = FormKind::ExitInterview.schema();
        let mut values = FormValues::defaults(schema, today());
        values.set_input("completed", "No").unwrap();
        values.set_input("reason", "Moved away").unwrap();

        let payload = build_payload(&values, &context(), Some(9), None);
        assert_eq!(payload["ExitInterviewId"], json!(9));
        assert_eq!(payload["ReasonNotCompleted"], json!("Moved away"));

        values.set_input("completed", "Yes").unwrap();
        let payload = build_payload(&values, &context(), Some(9), None);
        assert_eq!(payload["ReasonNotCompleted"], Value::Null);
    }

    #[test]
    fn test_multi_encodings() {
        assert_eq!(
            encode_multi(MultiEncoding::CommaJoined, &["1".to_string(), "4".to_string()]),
            json!("1,4")
        );
        assert_eq!(
            encode_multi(MultiEncoding::IdObjects, &["1".to_string(), "x".to_string()]),
            json!([{"Id": 1}, {"Id": "x"}])
        );
        assert_eq!(encode_multi(MultiEncoding::IdObjects, &[]), json!([]));
        assert_eq!(encode_multi(MultiEncoding::CommaJoined, &[]), json!(""));
    }

    #[test]
    fn test_dated_form_carries_selected_date() {
        let schema = FormKind::DistressThermometer.schema();
        let values = FormValues::defaults(schema, today());
        let date = NaiveDate::from_ymd_opt(2024, 5, 27).unwrap();
        let payload = build_payload(&values, &context(), None, Some(date));
        assert_eq!(payload[schema.date_column.unwrap()], json!("2024-05-27"));
    }

    #[test]
    fn test_populate_reads_lenient_rows() {
        let schema = FormKind::AdverseEvent.schema();
        let mut values = FormValues::defaults(schema, today());
        let row = json!({
            "AEId": "17",
            "EventDate": "2024-04-02T00:00:00",
            "AEDescription": "Mild dizziness after session",
            "IsSerious": "No",
            "Outcomes": [{"Id": 1}, {"Id": 2}],
            "Severity": null,
            "Unrelated": "ignored"
        });
        let row = row.as_object().unwrap();
        populate(&mut values, row);

        assert_eq!(values.date("event_date"), NaiveDate::from_ymd_opt(2024, 4, 2));
        assert_eq!(values.text("description"), "Mild dizziness after session");
        assert_eq!(values.text("serious"), "No");
        assert_eq!(values.multi("outcomes"), &["1".to_string(), "2".to_string()]);
        assert_eq!(values.get("severity"), Some(&FieldValue::Empty));
        assert_eq!(extract_record_id(row, "AEId"), Some(17));
    }

    #[test]
    fn test_populate_skips_values_that_do_not_fit() {
        let schema = FormKind::AdverseEvent.schema();
        let mut values = FormValues::defaults(schema, today());
        let row = json!({"Severity": "Catastrophic", "EventDate": "soon"});
        populate(&mut values, row.as_object().unwrap());
        assert_eq!(values.get("severity"), Some(&FieldValue::Empty));
        assert_eq!(values.date("event_date"), Some(today()));
    }

    #[test]
    fn test_decode_multi_shapes() {
        assert_eq!(decode_multi(&json!("1, 4,")), Some(vec!["1".to_string(), "4".to_string()]));
        assert_eq!(decode_multi(&json!([3, "5"])), Some(vec!["3".to_string(), "5".to_string()]));
        assert_eq!(decode_multi(&json!(7)), None);
    }

    #[test]
    fn test_extract_record_id_rejects_placeholders() {
        let row = json!({"PDWSID": 0, "AEId": "abc", "ConsentId": 12});
        let row = row.as_object().unwrap();
        assert_eq!(extract_record_id(row, "PDWSID"), None);
        assert_eq!(extract_record_id(row, "AEId"), None);
        assert_eq!(extract_record_id(row, "ConsentId"), Some(12));
        assert_eq!(extract_record_id(row, "Missing"), None);
    }
}
