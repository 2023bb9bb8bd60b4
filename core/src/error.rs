//! Error taxonomy for the network engine.
//!
//! # Design
//! The set of variants is closed. The engine classifies every failure into
//! exactly one of them and returns it unchanged; mapping to domain errors
//! (for example turning a 401 into "invalid credentials") is left to callers.

use bytes::Bytes;
use thiserror::Error;

/// Boxed cause carried by transport-level failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `NetworkClient` operations.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("The URL provided was invalid.")]
    InvalidUrl,

    /// The transport answered without usable status metadata.
    #[error("The server response was invalid.")]
    InvalidResponse,

    /// The server returned a status outside 200..=299.
    #[error("HTTP error occurred with status code: {status}.")]
    HttpError { status: u16, body: Option<Bytes> },

    #[error("Failed to decode response: {0}")]
    DecodingError(#[source] serde_json::Error),

    #[error("Failed to encode request: {0}")]
    EncodingError(#[source] serde_json::Error),

    #[error("No data was returned from the server.")]
    NoData,

    #[error("Network request failed: {0}")]
    NetworkFailure(#[source] BoxError),

    #[error("The request was cancelled.")]
    Cancelled,

    #[error("The request timed out.")]
    Timeout,

    #[error("An unknown error occurred.")]
    Unknown,
}

impl NetworkError {
    /// Status code of an `HttpError`, if this is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            NetworkError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn network_failure(cause: impl Into<BoxError>) -> Self {
        NetworkError::NetworkFailure(cause.into())
    }
}
