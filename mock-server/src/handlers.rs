//! Endpoint handlers for the mock wallet backend.
//!
//! # Design
//! Every handler first waits out its configured latency, then inspects the
//! request. Dropping the request future during that wait (a cancelled call)
//! means the handler never runs its side effects, so a cancelled transfer
//! leaves the balance untouched.
//!
//! Request bodies are read from the `CapturedBody` extension that
//! `capture_body` inserts, never from the body stream itself.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};
use bytes::Bytes;
use http_body_util::BodyExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{
    Contact, ContactsResponse, EmptyResponse, ErrorBody, LoginCredentials, LoginResponse,
    TransferAuthorizationResponse, TransferRequest, UserProfile, ValidateTokenResponse,
};
use crate::MockState;

pub const DEMO_EMAIL: &str = "test@paywallet.com";
pub const DEMO_PASSWORD: &str = "password123";
pub const DEMO_USER_ID: &str = "user_123";
pub const DEMO_USER_NAME: &str = "John Doe";
pub const MOCK_TOKEN_PREFIX: &str = "mock_token_";

/// Transfer amount that is always declined without touching the balance.
pub const DECLINED_AMOUNT: f64 = 403.0;

/// The full request body, buffered once before routing.
#[derive(Debug, Clone, Default)]
pub struct CapturedBody(pub Bytes);

/// Marks a response that stands for a transport-level failure rather than an
/// HTTP answer. `MockTransport` turns it into `TransportFailure::Failed`.
#[derive(Debug, Clone)]
pub struct MockFault(pub String);

/// Buffer the request body, whether it arrives whole or streamed, and keep a
/// copy in the request extensions.
pub async fn capture_body(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => return fault(format!("request body could not be read: {err}")),
    };
    let mut request = Request::from_parts(parts, Body::from(bytes.clone()));
    request.extensions_mut().insert(CapturedBody(bytes));
    next.run(request).await
}

pub fn fault(reason: impl Into<String>) -> Response {
    let reason = reason.into();
    warn!("mock fault: {reason}");
    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: "Mock request failed".to_string(),
        }),
    )
        .into_response();
    response.extensions_mut().insert(MockFault(reason));
    response
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION)?.to_str().ok()?.strip_prefix("Bearer ")
}

pub fn demo_contacts() -> Vec<Contact> {
    [
        ("1", "Alice Johnson", "alice@example.com"),
        ("2", "Bob Smith", "bob@example.com"),
        ("3", "Charlie Brown", "charlie@example.com"),
        ("4", "Diana Prince", "diana@example.com"),
        ("5", "Eve Wilson", "eve@example.com"),
    ]
    .into_iter()
    .map(|(id, name, email)| Contact {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        avatar_url: None,
    })
    .collect()
}

pub async fn login(State(state): State<MockState>, Extension(CapturedBody(body)): Extension<CapturedBody>) -> Response {
    tokio::time::sleep(state.latency.login).await;

    let Ok(credentials) = serde_json::from_slice::<LoginCredentials>(&body) else {
        return fault("login body is not valid credentials");
    };

    if credentials.email == DEMO_EMAIL && credentials.password == DEMO_PASSWORD {
        info!("login accepted for {}", credentials.email);
        Json(LoginResponse {
            token: format!("{MOCK_TOKEN_PREFIX}{}", Uuid::new_v4()),
            user_id: DEMO_USER_ID.to_string(),
            email: credentials.email,
        })
        .into_response()
    } else {
        info!("login rejected for {}", credentials.email);
        unauthorized("Invalid credentials")
    }
}

pub async fn logout(State(state): State<MockState>) -> Json<EmptyResponse> {
    tokio::time::sleep(state.latency.logout).await;
    Json(EmptyResponse {})
}

pub async fn validate_token(State(state): State<MockState>, headers: HeaderMap) -> Response {
    tokio::time::sleep(state.latency.validate).await;

    match bearer_token(&headers) {
        Some(token) => Json(ValidateTokenResponse {
            is_valid: token.starts_with(MOCK_TOKEN_PREFIX),
        })
        .into_response(),
        None => unauthorized("Unauthorized"),
    }
}

pub async fn contacts(State(state): State<MockState>, headers: HeaderMap) -> Response {
    tokio::time::sleep(state.latency.contacts).await;

    if !headers.contains_key(AUTHORIZATION) {
        return unauthorized("Unauthorized");
    }
    Json(ContactsResponse {
        contacts: demo_contacts(),
    })
    .into_response()
}

pub async fn profile(State(state): State<MockState>, headers: HeaderMap) -> Response {
    tokio::time::sleep(state.latency.profile).await;

    if !headers.contains_key(AUTHORIZATION) {
        return unauthorized("Unauthorized");
    }
    Json(UserProfile {
        user_id: DEMO_USER_ID.to_string(),
        name: DEMO_USER_NAME.to_string(),
        email: DEMO_EMAIL.to_string(),
        balance: state.balance.get().await,
    })
    .into_response()
}

pub async fn authorize_transfer(
    State(state): State<MockState>,
    headers: HeaderMap,
    Extension(CapturedBody(body)): Extension<CapturedBody>,
) -> Response {
    tokio::time::sleep(state.latency.transfer).await;

    if !headers.contains_key(AUTHORIZATION) {
        return unauthorized("Unauthorized");
    }
    let Ok(transfer) = serde_json::from_slice::<TransferRequest>(&body) else {
        return fault("transfer body is not a valid transfer request");
    };

    if transfer.amount == DECLINED_AMOUNT {
        info!("transfer of {} to {} declined", transfer.amount, transfer.recipient_id);
        return Json(TransferAuthorizationResponse {
            authorized: false,
            message: Some("Transaction declined. This amount cannot be processed at this time.".to_string()),
            new_balance: None,
        })
        .into_response();
    }

    let new_balance = state.balance.deduct(transfer.amount).await;
    debug!(
        "transfer of {} to {} authorized, balance now {new_balance}",
        transfer.amount, transfer.recipient_id
    );
    Json(TransferAuthorizationResponse {
        authorized: true,
        message: Some("Transfer authorized successfully".to_string()),
        new_balance: Some(new_balance),
    })
    .into_response()
}

/// Fallback for unrouted paths and for known paths hit with the wrong method.
pub async fn unknown_path(State(state): State<MockState>, request: Request) -> Response {
    tokio::time::sleep(state.latency.unrouted).await;
    fault(format!("no handler for {} {}", request.method(), request.uri().path()))
}
