//! Form error types

use thiserror::Error;

use crate::gateway::GatewayError;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Unknown field '{field}' on {form}")]
    UnknownField { form: String, field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Required fields missing: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("{0}")]
    Rule(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
