//! Pluggable transports.
//!
//! # Design
//! `NetworkClient` talks to the outside world only through `Transport`, so a
//! real network stack and a scripted backend are interchangeable. Transports
//! report failures as `TransportFailure`; turning those into `NetworkError`
//! is the executor's job.

use async_trait::async_trait;
use bytes::Bytes;

use crate::classify::TransportFailure;
use crate::http::{CachePolicy, HttpMethod, TransportResponse, WireRequest};

/// Sends a wire request and returns the raw response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: WireRequest) -> Result<TransportResponse, TransportFailure>;
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxies, TLS roots, pool limits).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        TransportFailure::TimedOut
    } else {
        TransportFailure::failed(err)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: WireRequest) -> Result<TransportResponse, TransportFailure> {
        let mut builder = self
            .client
            .request(reqwest_method(request.method), request.url)
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if request.cache_policy == CachePolicy::ReloadIgnoringLocalCacheData
            && !request.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("cache-control"))
        {
            builder = builder.header("Cache-Control", "no-cache");
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
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
        let body: Bytes = response.bytes().await.map_err(map_reqwest_error)?;

        Ok(TransportResponse { status, headers, body })
    }
}
