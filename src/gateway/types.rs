//! Shared gateway types and endpoint constants

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Body shape every backend endpoint answers with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Result rows; absent or malformed data becomes an empty list
    #[serde(rename = "ResponseData", default, deserialize_with = "rows_or_empty")]
    pub response_data: Vec<Value>,
    /// Any other keys the endpoint sends alongside the rows
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseEnvelope {
    pub fn with_rows(rows: Vec<Value>) -> Self {
        Self {
            response_data: rows,
            extra: Map::new(),
        }
    }

    /// Parse a raw response body. Never fails: an empty or non-JSON body is
    /// treated as "no data", and a bare JSON array is taken as the rows.
    pub fn from_body(path: &str, body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => {
                serde_json::from_value(Value::Object(map)).unwrap_or_default()
            }
            Ok(Value::Array(rows)) => Self::with_rows(rows),
            Ok(other) => {
                warn!("Unexpected response body from {}: {}", path, other);
                Self::default()
            }
            Err(e) => {
                warn!("Response from {} is not JSON: {}", path, e);
                Self::default()
            }
        }
    }
}

/// Response returned by every gateway call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatewayResponse {
    /// HTTP status code
    pub status: u16,
    /// Decoded envelope
    pub data: ResponseEnvelope,
}

impl GatewayResponse {
    pub fn ok(data: ResponseEnvelope) -> Self {
        Self { status: 200, data }
    }

    pub fn rows(&self) -> &[Value] {
        &self.data.response_data
    }

    pub fn first_row(&self) -> Option<&Map<String, Value>> {
        self.data.response_data.first().and_then(Value::as_object)
    }

    pub fn is_empty(&self) -> bool {
        self.data.response_data.is_empty()
    }

    /// Decode rows into a typed model, skipping rows that do not fit
    pub fn decode_rows<T: DeserializeOwned>(&self, path: &str) -> Vec<T> {
        self.data
            .response_data
            .iter()
            .filter_map(|row| match serde_json::from_value::<T>(row.clone()) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!("Skipping malformed row from {}: {}", path, e);
                    None
                }
            })
            .collect()
    }
}

fn rows_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(rows) => rows,
        Value::Object(row) => vec![Value::Object(row)],
        _ => Vec::new(),
    })
}

/// Trial backend endpoints used outside the form catalogue
pub struct TrialApi;

impl TrialApi {
    /// Participant list for the logged-in user
    pub const PARTICIPANTS_ENDPOINT: &'static str = "/GetParticipantsList";
    /// VR sessions of one participant
    pub const VR_SESSIONS_ENDPOINT: &'static str = "/GetParticipantVRSessionsList";
}
