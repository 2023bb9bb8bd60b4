//! In-process `Transport` that answers from the mock router.

use async_trait::async_trait;
use axum::{body::Body, http, Router};
use http_body_util::BodyExt;
use netlayer_core::{Transport, TransportFailure, TransportResponse, WireRequest};
use tower::ServiceExt;

use crate::handlers::MockFault;
use crate::{app, MockState, SharedBalance};

/// Sends wire requests straight into the mock router.
///
/// Dropping the future returned by `send` drops the handler mid-flight, so a
/// cancelled call never produces a response or a side effect.
#[derive(Debug, Clone)]
pub struct MockTransport {
    router: Router,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Realistic latency over the process-wide balance.
    pub fn new() -> Self {
        Self::with_state(MockState::shared())
    }

    /// Realistic latency over an explicit balance.
    pub fn with_balance(balance: SharedBalance) -> Self {
        Self::with_state(MockState {
            balance,
            ..MockState::shared()
        })
    }

    pub fn with_state(state: MockState) -> Self {
        Self { router: app(state) }
    }
}

fn to_http_request(request: WireRequest) -> Result<http::Request<Body>, TransportFailure> {
    let mut builder = http::Request::builder()
        .method(request.method.as_str())
        .uri(request.url.as_str());
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let body = request.body.map(Body::from).unwrap_or_else(Body::empty);
    builder.body(body).map_err(TransportFailure::failed)
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: WireRequest) -> Result<TransportResponse, TransportFailure> {
        let request = to_http_request(request)?;
        let response = match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };

        if let Some(MockFault(reason)) = response.extensions().get::<MockFault>() {
            return Err(TransportFailure::failed(format!("Mock request failed: {reason}")));
        }

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(TransportFailure::failed)?
            .to_bytes();

        Ok(TransportResponse { status, headers, body })
    }
}
