//! Geo-index error types.
//!
//! This module defines the error type for all geo-index operations, covering
//! request validation, transport failures and malformed upstream responses.

use thiserror::Error;

/// Errors from geo-index operations.
///
/// Used by the `GeoIndexProvider` trait. Everything except `InvalidArgument`
/// means the geo index could not produce an answer and is reported upstream
/// as such.
#[derive(Debug, Clone, Error)]
pub enum GeoIndexError {
    /// The request was rejected before any network call (e.g. non-positive radius).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The geo index could not be reached.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The geo index answered with a non-success status or an unexpected data type.
    #[error("Upstream error: {0}")]
    UpstreamError(String),

    /// The response body did not have the expected shape.
    #[error("Payload error: {0}")]
    PayloadError(String),

    /// Failed to serialize the request body.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl GeoIndexError {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an upstream error.
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamError(msg.into())
    }

    /// Create a payload error.
    pub fn payload(msg: impl Into<String>) -> Self {
        Self::PayloadError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }
}

impl From<reqwest::Error> for GeoIndexError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::ConnectionError(err.to_string())
        } else if err.is_builder() {
            Self::SerializationError(err.to_string())
        } else if err.is_decode() {
            Self::PayloadError(err.to_string())
        } else {
            Self::UpstreamError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GeoIndexError {
    fn from(err: serde_json::Error) -> Self {
        Self::PayloadError(err.to_string())
    }
}
