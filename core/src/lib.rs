//! Protocol-driven HTTP request engine for the wallet API.
//!
//! # Overview
//! Callers describe a call declaratively with a `NetworkRequest`; a
//! `NetworkClient` resolves it into a `WireRequest`, sends it over an injected
//! `Transport`, validates the status and decodes the JSON body into the
//! descriptor's response type. Every failure is returned as one
//! `NetworkError` kind.
//!
//! # Design
//! - `build_wire_request` is pure, so request shapes are tested without I/O.
//! - `Transport` is the only I/O seam: `HttpTransport` for the real network,
//!   the mock-server crate's `MockTransport` for tests.
//! - The engine holds no per-call mutable state and never retries.
//! - Mapping engine errors to domain errors is left to callers; `services`
//!   holds the wallet's own per-service mappings.

pub mod classify;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod request;
pub mod services;
pub mod transport;
pub mod types;

pub use classify::TransportFailure;
pub use client::{CallHandle, ClientConfig, NetworkClient};
pub use error::{BoxError, NetworkError};
pub use http::{CachePolicy, HttpMethod, ResponseMetadata, TransportResponse, WireRequest, DEFAULT_TIMEOUT};
pub use request::{build_wire_request, JsonBody, NetworkRequest};
pub use services::{
    AuthError, AuthService, ContactsError, ContactsService, TransferError, TransferService, UserProfileError,
    UserProfileService,
};
pub use transport::{HttpTransport, Transport};
