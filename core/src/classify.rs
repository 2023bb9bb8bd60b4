//! Pure mapping from transport outcomes to `NetworkError`.
//!
//! Nothing here retries or performs I/O. The executor calls
//! `classify_failure` for transport errors and `validate_response` for every
//! response before it looks at the body.

use std::fmt;

use bytes::Bytes;

use crate::error::{BoxError, NetworkError};
use crate::http::{ResponseMetadata, TransportResponse};

/// How a transport reports that it could not produce a response.
#[derive(Debug)]
pub enum TransportFailure {
    Cancelled,
    TimedOut,
    Failed(BoxError),
}

impl TransportFailure {
    pub fn failed(cause: impl Into<BoxError>) -> Self {
        TransportFailure::Failed(cause.into())
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Cancelled => write!(f, "cancelled"),
            TransportFailure::TimedOut => write!(f, "timed out"),
            TransportFailure::Failed(cause) => write!(f, "{cause}"),
        }
    }
}

impl std::error::Error for TransportFailure {}

pub fn classify_failure(failure: TransportFailure) -> NetworkError {
    match failure {
        TransportFailure::Cancelled => NetworkError::Cancelled,
        TransportFailure::TimedOut => NetworkError::Timeout,
        TransportFailure::Failed(cause) => NetworkError::NetworkFailure(cause),
    }
}

/// Split a response into body and metadata, rejecting unusable status lines.
pub fn response_parts(response: TransportResponse) -> Result<(Bytes, ResponseMetadata), NetworkError> {
    if !(100..=599).contains(&response.status) {
        return Err(NetworkError::InvalidResponse);
    }
    let meta = ResponseMetadata {
        status: response.status,
        headers: response.headers,
    };
    Ok((response.body, meta))
}

/// Require a 2xx status; anything else becomes `HttpError` carrying `body`.
pub fn require_success(meta: &ResponseMetadata, body: Option<Bytes>) -> Result<(), NetworkError> {
    if (200..=299).contains(&meta.status) {
        return Ok(());
    }
    Err(NetworkError::HttpError {
        status: meta.status,
        body,
    })
}

/// `response_parts` followed by `require_success`, keeping the body on error.
pub fn validate_response(response: TransportResponse) -> Result<(Bytes, ResponseMetadata), NetworkError> {
    let (body, meta) = response_parts(response)?;
    require_success(&meta, Some(body.clone()))?;
    Ok((body, meta))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &'static str) -> TransportResponse {
        TransportResponse {
            status,
            headers: Vec::new(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[test]
    fn failures_map_to_distinct_kinds() {
        assert!(matches!(classify_failure(TransportFailure::Cancelled), NetworkError::Cancelled));
        assert!(matches!(classify_failure(TransportFailure::TimedOut), NetworkError::Timeout));
        assert!(matches!(
            classify_failure(TransportFailure::failed("refused")),
            NetworkError::NetworkFailure(_)
        ));
    }

    #[test]
    fn success_range_is_inclusive() {
        for status in [200, 204, 299] {
            assert!(validate_response(response(status, "{}")).is_ok(), "{status}");
        }
    }

    #[test]
    fn non_2xx_is_http_error_with_body() {
        for status in [199, 300, 401, 500] {
            match validate_response(response(status, "oops")) {
                Err(NetworkError::HttpError { status: s, body }) => {
                    assert_eq!(s, status);
                    assert_eq!(body.as_deref(), Some(&b"oops"[..]));
                }
                other => panic!("{status}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn out_of_range_status_is_invalid_response() {
        assert!(matches!(validate_response(response(0, "")), Err(NetworkError::InvalidResponse)));
        assert!(matches!(response_parts(response(600, "")), Err(NetworkError::InvalidResponse)));
    }

    #[test]
    fn response_parts_does_not_require_2xx() {
        let (_, meta) = response_parts(response(404, "")).unwrap();
        assert_eq!(meta.status, 404);
    }
}
