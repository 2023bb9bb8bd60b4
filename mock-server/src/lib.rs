//! Scripted wallet backend for exercising `netlayer-core`.
//!
//! # Overview
//! The same axum `Router` serves two purposes: driven in-process by
//! `MockTransport` (no sockets involved) and served over TCP by the
//! `mock-server` binary. Handlers emulate the wallet API with fixed demo
//! data, per-endpoint latency and a balance shared across the process.
//!
//! # Design
//! - `capture_body` buffers every request body into a `CapturedBody`
//!   extension before any handler runs.
//! - Unknown paths, wrong methods on known paths and undecodable bodies
//!   answer with a `MockFault`-marked response, which `MockTransport`
//!   reports as a transport failure instead of an HTTP status.

pub mod balance;
pub mod config;
pub mod handlers;
pub mod models;
pub mod transport;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

pub use balance::SharedBalance;
pub use config::{ConfigError, Latency, ServerConfig};
pub use transport::MockTransport;

/// State shared by all handlers of one router.
#[derive(Debug, Clone, Default)]
pub struct MockState {
    pub balance: SharedBalance,
    pub latency: Latency,
}

impl MockState {
    /// Realistic latency over the process-wide balance.
    pub fn shared() -> Self {
        Self {
            balance: SharedBalance::global(),
            latency: Latency::realistic(),
        }
    }

    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/validate", get(handlers::validate_token))
        .route("/contacts", get(handlers::contacts))
        .route("/user/profile", get(handlers::profile))
        .route("/transfer/authorize", post(handlers::authorize_transfer))
        .method_not_allowed_fallback(handlers::unknown_path)
        .fallback(handlers::unknown_path)
        .layer(middleware::from_fn(handlers::capture_body))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}
