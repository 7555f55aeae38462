//! Gateway error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Backend returned status {status_code} for {path}: {message}")]
    Status {
        path: String,
        status_code: u16,
        message: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No scripted response for {0}")]
    Unscripted(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
