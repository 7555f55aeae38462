use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Wire format for dates sent to and read from the backend
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
/// Format dates are shown in on screen
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Clinical-trial subject identifier. The backend sends it as either a
/// number or a string; both are normalised to the string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ParticipantId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(ParticipantId(lenient_string(deserializer)?))
    }
}

/// Study instance identifier, usually zero-padded (`CS-0001`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(transparent)]
pub struct StudyId(pub String);

impl StudyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build a zero-padded study id from a prefix and sequence number
    pub fn padded(prefix: &str, number: u32) -> Self {
        Self(format!("{}-{:04}", prefix, number))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StudyId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(StudyId(lenient_string(deserializer)?))
    }
}

/// Trial-arm assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupType {
    Study,
    Control,
}

impl GroupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupType::Study => "Study",
            GroupType::Control => "Control",
        }
    }

    /// Parse the backend spelling; `Controlled` and `Control` are the same arm
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "study" => Some(GroupType::Study),
            "control" | "controlled" => Some(GroupType::Control),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for GroupType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        GroupType::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown group type: {}", raw)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Participant {
    #[serde(rename = "ParticipantId")]
    pub participant_id: ParticipantId,
    #[serde(rename = "StudyId", default)]
    pub study_id: StudyId,
    #[serde(rename = "Age", default, deserialize_with = "lenient_optional_u32")]
    pub age: Option<u32>,
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    #[serde(rename = "GroupType", default, deserialize_with = "lenient_group_type")]
    pub group_type: Option<GroupType>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
    #[serde(rename = "CreatedDate", default, deserialize_with = "lenient_optional_date")]
    pub enrolled_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VrSession {
    #[serde(rename = "SessionId", deserialize_with = "lenient_string")]
    pub session_id: String,
    #[serde(rename = "ParticipantId")]
    pub participant_id: ParticipantId,
    #[serde(rename = "StudyId", default)]
    pub study_id: StudyId,
    #[serde(rename = "SessionNo", default, deserialize_with = "lenient_optional_u32")]
    pub session_no: Option<u32>,
    #[serde(rename = "SessionDate", default, deserialize_with = "lenient_optional_date")]
    pub session_date: Option<NaiveDate>,
    #[serde(rename = "ModuleName", default)]
    pub module: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
}

/// Format a date for display (`DD-MM-YYYY`)
pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Format a date for the wire (`YYYY-MM-DD`)
pub fn iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Parse a date in any of the shapes the backend or a user produces:
/// `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS...`, or `DD-MM-YYYY`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let date_part = value.split(['T', ' ']).next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, ISO_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(date_part, DISPLAY_DATE_FORMAT))
        .ok()
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_optional_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_optional_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(parse_date))
}

fn lenient_group_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<GroupType>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(GroupType::parse))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_study_id_padding() {
        assert_eq!(StudyId::padded("CS", 1).as_str(), "CS-0001");
        assert_eq!(StudyId::padded("CS", 1234).as_str(), "CS-1234");
    }

    #[test]
    fn test_group_type_aliases() {
        assert_eq!(GroupType::parse("Study"), Some(GroupType::Study));
        assert_eq!(GroupType::parse("Controlled"), Some(GroupType::Control));
        assert_eq!(GroupType::parse("control"), Some(GroupType::Control));
        assert_eq!(GroupType::parse("placebo"), None);
    }

    #[test]
    fn test_date_formats() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(display_date(date), "05-03-2024");
        assert_eq!(iso_date(date), "2024-03-05");
        assert_eq!(parse_date("2024-03-05"), Some(date));
        assert_eq!(parse_date("05-03-2024"), Some(date));
        assert_eq!(parse_date("2024-03-05T10:15:00"), Some(date));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("March 5"), None);
    }

    #[test]
    fn test_participant_deserialization_is_lenient() {
        let row = json!({
            "ParticipantId": 42,
            "StudyId": "CS-0042",
            "Age": "57",
            "Gender": "Female",
            "GroupType": "Controlled",
            "Status": null,
            "CreatedDate": "2024-01-09T00:00:00"
        });
        let participant: Participant = serde_json::from_value(row).unwrap();
        assert_eq!(participant.participant_id.as_str(), "42");
        assert_eq!(participant.age, Some(57));
        assert_eq!(participant.group_type, Some(GroupType::Control));
        assert_eq!(participant.enrolled_on, NaiveDate::from_ymd_opt(2024, 1, 9));
        assert!(participant.status.is_none());
    }

    #[test]
    fn test_session_deserialization() {
        let row = json!({
            "SessionId": 7,
            "ParticipantId": "42",
            "StudyId": "CS-0042",
            "SessionNo": 3,
            "SessionDate": "2024-02-01",
            "ModuleName": "Relaxation"
        });
        let session: VrSession = serde_json::from_value(row).unwrap();
        assert_eq!(session.session_id, "7");
        assert_eq!(session.session_no, Some(3));
        assert_eq!(session.module.as_deref(), Some("Relaxation"));
        assert!(session.status.is_none());
    }
}
