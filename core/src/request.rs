//! Declarative request descriptors and the builder that resolves them.
//!
//! # Design
//! A `NetworkRequest` describes one HTTP call: origin, path, method, optional
//! headers, query and body, plus the type its JSON response decodes into.
//! Only the first three are required; everything else has a default.
//! `build_wire_request` turns a descriptor into a `WireRequest` without any
//! I/O, so it can be exercised directly in tests.
//!
//! At most one body reaches the wire. A typed `encodable_body` always wins
//! over raw `body_parameters`.

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::NetworkError;
use crate::http::{CachePolicy, HttpMethod, WireRequest, DEFAULT_TIMEOUT};

/// A value that can be written as a JSON request body.
///
/// Implemented for every `Serialize` type so descriptors can hand out a
/// `&dyn JsonBody` without naming the concrete payload type.
pub trait JsonBody {
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error>;
}

impl<T: Serialize> JsonBody for T {
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Declarative description of a single HTTP call.
pub trait NetworkRequest {
    /// Type the 2xx response body is decoded into.
    type Response: DeserializeOwned;

    fn base_url(&self) -> &str;

    fn path(&self) -> &str;

    fn method(&self) -> HttpMethod;

    fn headers(&self) -> Option<HashMap<String, String>> {
        None
    }

    fn query_parameters(&self) -> Option<HashMap<String, String>> {
        None
    }

    /// Raw key/value body, used only when `encodable_body` is `None`.
    fn body_parameters(&self) -> Option<serde_json::Map<String, serde_json::Value>> {
        None
    }

    fn encodable_body(&self) -> Option<&dyn JsonBody> {
        None
    }

    fn timeout(&self) -> Duration {
        DEFAULT_TIMEOUT
    }

    fn cache_policy(&self) -> CachePolicy {
        CachePolicy::default()
    }

    fn build_wire_request(&self) -> Result<WireRequest, NetworkError> {
        build_wire_request(self)
    }
}

/// Resolve a descriptor into a wire request.
///
/// Fails with `InvalidUrl` when origin and path do not form an absolute URL,
/// and with `EncodingError` when the body cannot be serialized.
pub fn build_wire_request<R: NetworkRequest + ?Sized>(request: &R) -> Result<WireRequest, NetworkError> {
    let mut url = Url::parse(&format!("{}{}", request.base_url(), request.path()))
        .map_err(|_| NetworkError::InvalidUrl)?;
    if url.cannot_be_a_base() {
        return Err(NetworkError::InvalidUrl);
    }

    if let Some(query) = request.query_parameters().filter(|q| !q.is_empty()) {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &query {
            pairs.append_pair(key, value);
        }
    }

    let mut wire = WireRequest::new(request.method(), url);
    wire.timeout = request.timeout();
    wire.cache_policy = request.cache_policy();

    if let Some(headers) = request.headers() {
        for (name, value) in &headers {
            wire.set_header(name, value);
        }
    }

    let body = if let Some(typed) = request.encodable_body() {
        Some(typed.to_json().map_err(NetworkError::EncodingError)?)
    } else if let Some(params) = request.body_parameters() {
        Some(serde_json::to_vec(&params).map_err(NetworkError::EncodingError)?)
    } else {
        None
    };

    if let Some(body) = body {
        wire.set_header("Content-Type", "application/json");
        wire.body = Some(body.into());
    }

    Ok(wire)
}
