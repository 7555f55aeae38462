//! In-memory gateway with scripted responses
//!
//! Used by the test suites and by `--offline` runs of the binary. Every call
//! is recorded so callers can assert on exactly what would have been sent.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::gateway::{Gateway, GatewayError, GatewayResponse, ResponseEnvelope};

/// One call made against a `MemoryGateway`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
enum Scripted {
    Respond(GatewayResponse),
    Fail { status_code: u16, message: String },
}

#[derive(Default)]
pub struct MemoryGateway {
    scripts: Mutex<HashMap<String, Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
    /// Answer unscripted paths with empty data instead of an error
    lenient: bool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway that answers every unscripted path with no rows
    pub fn lenient() -> Self {
        Self {
            lenient: true,
            ..Self::default()
        }
    }

    /// Answer `path` with these rows
    pub fn respond_rows(&self, path: &str, rows: Vec<Value>) -> &Self {
        self.respond(path, GatewayResponse::ok(ResponseEnvelope::with_rows(rows)))
    }

    pub fn respond(&self, path: &str, response: GatewayResponse) -> &Self {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.insert(path.to_string(), Scripted::Respond(response));
        }
        self
    }

    /// Answer `path` with a backend error
    pub fn fail(&self, path: &str, status_code: u16, message: &str) -> &Self {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.insert(
                path.to_string(),
                Scripted::Fail {
                    status_code,
                    message: message.to_string(),
                },
            );
        }
        self
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Calls made to one path
    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|call| call.path == path).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    fn answer(&self, call: RecordedCall) -> Result<GatewayResponse, GatewayError> {
        let path = call.path.clone();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }

        let scripted = self
            .scripts
            .lock()
            .ok()
            .and_then(|scripts| scripts.get(&path).cloned());

        match scripted {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail { status_code, message }) => Err(GatewayError::Status {
                path,
                status_code,
                message,
            }),
            None if self.lenient => Ok(GatewayResponse::ok(ResponseEnvelope::default())),
            None => Err(GatewayError::Unscripted(path)),
        }
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn post(&self, path: &str, body: &Value) -> Result<GatewayResponse, GatewayError> {
        self.answer(RecordedCall {
            method: "POST",
            path: path.to_string(),
            body: Some(body.clone()),
            query: Vec::new(),
        })
    }

    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<GatewayResponse, GatewayError> {
        self.answer(RecordedCall {
            method: "GET",
            path: path.to_string(),
            body: None,
            query: query.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_scripted_rows_and_recording() {
        let gateway = MemoryGateway::new();
        gateway.respond_rows("/GetThing", vec![json!({"Id": 1})]);

        let response = gateway.post("/GetThing", &json!({"ParticipantId": "7"})).await.unwrap();
        assert_eq!(response.rows().len(), 1);

        let calls = gateway.calls_to("/GetThing");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].body, Some(json!({"ParticipantId": "7"})));
    }

    #[tokio::test]
    async fn test_failures_and_unscripted_paths() {
        let gateway = MemoryGateway::new();
        gateway.fail("/Save", 500, "boom");

        let err = gateway.post("/Save", &json!({})).await.unwrap_err();
        assert!(matches!(err, GatewayError::Status { status_code: 500, .. }));

        let err = gateway.get("/Unknown", &[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unscripted(_)));
        assert_eq!(gateway.call_count(), 2);

        let lenient = MemoryGateway::lenient();
        assert!(lenient.get("/Unknown", &[]).await.unwrap().is_empty());
    }
}
