//! Error types for the resource clients and the board controller.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the record does not exist" from "the server rejected the request". Every
//! server-side failure carries a human-readable `message` already resolved
//! from the error body (see `client::failure_from`), so callers never parse
//! raw bodies themselves.

use thiserror::Error;

/// Errors returned by `ResourceClient`, `ResourceApi` and transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be completed at the network level.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("{message}")]
    NotFound { message: String },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// A 204 arrived where an item body was required.
    #[error("HTTP {status}: response carried no content")]
    MissingBody { status: u16 },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Encode(String),

    /// The payload failed client-side validation; no request was built.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// HTTP status associated with the failure, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Server { status, .. } | ApiError::MissingBody { status } => Some(*status),
            _ => None,
        }
    }
}

/// A local constraint on a create/update payload was violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Environment configuration could not be read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid UUID: {value}")]
    InvalidActor { var: &'static str, value: String },

    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidBaseUrl { var: &'static str, value: String },
}
