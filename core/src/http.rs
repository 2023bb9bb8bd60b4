//! Wire-level HTTP types shared by the builder, the executor and transports.
//!
//! # Design
//! A `WireRequest` is the fully resolved form of a descriptor: absolute URL,
//! method, headers, timeout, cache policy and optional body bytes. It is built
//! once per call and handed to a `Transport` by value. Transports answer with
//! a `TransportResponse`, which the executor validates before anything is
//! decoded.
//!
//! Headers are kept as an ordered list of pairs; insertion order carries no
//! meaning on the wire.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use url::Url;

/// Timeout applied when a descriptor does not override it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache behaviour requested for a call.
///
/// The engine never caches anything itself; the policy is carried through to
/// the transport untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    #[default]
    UseProtocolCachePolicy,
    ReloadIgnoringLocalCacheData,
    ReturnCacheDataElseLoad,
    ReturnCacheDataDontLoad,
}

/// A fully resolved, ready-to-send HTTP request.
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub url: Url,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
    pub cache_policy: CachePolicy,
    pub body: Option<Bytes>,
}

impl WireRequest {
    /// A bare request with default timeout and cache policy.
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            url,
            method,
            headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            cache_policy: CachePolicy::default(),
            body: None,
        }
    }

    /// Look up a header value, ignoring ASCII case in the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Set a header, replacing any existing value under the same name.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Replace the body with an explicit payload, as used by uploads.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Raw answer from a transport, before any validation.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

/// Status line and headers of a validated response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMetadata {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl ResponseMetadata {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
