//! Remote data gateway
//!
//! Thin request/response layer over the trial backend. Every call returns the
//! same `ResponseEnvelope` shape (`ResponseData` rows plus any extra keys);
//! what the backend does with a request is outside this crate.

pub mod types;
pub mod errors;
pub mod client;
pub mod memory;

pub use types::*;
pub use errors::GatewayError;
pub use client::{Gateway, HttpGateway};
pub use memory::{MemoryGateway, RecordedCall};
