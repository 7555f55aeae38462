//! HTTP gateway to the trial backend

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::gateway::{GatewayError, GatewayResponse, ResponseEnvelope};

/// Request/response access to the backend.
///
/// Calls are independent: there is no retry, cancellation or de-duplication,
/// and timeouts are whatever the implementation's client applies.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// POST a JSON body to an endpoint path
    async fn post(&self, path: &str, body: &Value) -> Result<GatewayResponse, GatewayError>;

    /// GET an endpoint path with query parameters
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<GatewayResponse, GatewayError>;
}

/// Gateway backed by `reqwest`
pub struct HttpGateway {
    client: Client,
    config: Config,
}

impl HttpGateway {
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        if config.api.base_url.trim().is_empty() {
            return Err(GatewayError::Config("API base URL is empty".to_string()));
        }

        let client = Client::builder()
            .user_agent(&config.api.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn finish(&self, path: &str, response: reqwest::Response) -> Result<GatewayResponse, GatewayError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!("{} answered {}: {}", path, status, message);
            return Err(GatewayError::Status {
                path: path.to_string(),
                status_code: status.as_u16(),
                message,
            });
        }

        let data = ResponseEnvelope::from_body(path, &body);
        debug!("{} answered {} with {} rows", path, status, data.response_data.len());

        Ok(GatewayResponse {
            status: status.as_u16(),
            data,
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn post(&self, path: &str, body: &Value) -> Result<GatewayResponse, GatewayError> {
        let url = self.config.endpoint_url(path);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        self.finish(path, response).await
    }

    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<GatewayResponse, GatewayError> {
        let url = self.config.endpoint_url(path);
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        self.finish(path, response).await
    }
}

/// Pull a readable message out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["Message", "message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}
