//! `NetworkClient` driven end to end over `MockTransport`.
//!
//! Each test builds its own balance so tests can run in parallel without
//! sharing state.

use std::collections::HashMap;
use std::time::Duration;

use mock_server::handlers::demo_contacts;
use mock_server::{models, Latency, MockState, MockTransport, SharedBalance};
use netlayer_core::endpoints::{
    ContactsRequest, LoginRequest, LogoutRequest, TransferAuthorizationRequest, UserProfileRequest,
    ValidateTokenRequest, API_BASE_URL,
};
use netlayer_core::types::{Contact, ErrorBody, LoginResponse, TransferRequest, UserProfile};
use netlayer_core::{HttpMethod, JsonBody, NetworkClient, NetworkError, NetworkRequest};

fn client(balance: &SharedBalance, latency: Latency) -> NetworkClient {
    NetworkClient::new(MockTransport::with_state(MockState {
        balance: balance.clone(),
        latency,
    }))
}

fn instant_client(balance: &SharedBalance) -> NetworkClient {
    client(balance, Latency::none())
}

/// A request to `path` that carries no `Authorization` header.
struct Anonymous {
    method: HttpMethod,
    path: &'static str,
    body: Option<TransferRequest>,
}

impl NetworkRequest for Anonymous {
    type Response = serde_json::Value;

    fn base_url(&self) -> &str {
        API_BASE_URL
    }

    fn path(&self) -> &str {
        self.path
    }

    fn method(&self) -> HttpMethod {
        self.method
    }

    fn encodable_body(&self) -> Option<&dyn JsonBody> {
        self.body.as_ref().map(|b| b as &dyn JsonBody)
    }
}

/// Login with a short deadline.
struct ImpatientLogin(LoginRequest);

impl NetworkRequest for ImpatientLogin {
    type Response = LoginResponse;

    fn base_url(&self) -> &str {
        self.0.base_url()
    }

    fn path(&self) -> &str {
        self.0.path()
    }

    fn method(&self) -> HttpMethod {
        self.0.method()
    }

    fn encodable_body(&self) -> Option<&dyn JsonBody> {
        self.0.encodable_body()
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(50)
    }
}

/// Contacts endpoint decoded into the wrong shape.
struct ContactsAsProfile;

impl NetworkRequest for ContactsAsProfile {
    type Response = UserProfile;

    fn base_url(&self) -> &str {
        API_BASE_URL
    }

    fn path(&self) -> &str {
        "/contacts"
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn headers(&self) -> Option<HashMap<String, String>> {
        Some(HashMap::from([("Authorization".to_string(), "Bearer x".to_string())]))
    }
}

async fn login(client: &NetworkClient) -> LoginResponse {
    client
        .execute(&LoginRequest::new("test@paywallet.com", "password123"))
        .await
        .unwrap()
}

#[tokio::test]
async fn login_then_validate_token() {
    let balance = SharedBalance::default();
    let c = instant_client(&balance);

    let session = login(&c).await;
    assert!(session.token.starts_with("mock_token_"));
    assert_eq!(session.user_id, "user_123");
    assert_eq!(session.email, "test@paywallet.com");

    let valid = c.execute(&ValidateTokenRequest { token: session.token }).await.unwrap();
    assert!(valid.is_valid);

    let invalid = c
        .execute(&ValidateTokenRequest {
            token: "forged".to_string(),
        })
        .await
        .unwrap();
    assert!(!invalid.is_valid);
}

#[tokio::test]
async fn rejected_login_is_http_401_with_body() {
    let c = instant_client(&SharedBalance::default());
    match c.execute(&LoginRequest::new("test@paywallet.com", "wrong")).await {
        Err(NetworkError::HttpError { status: 401, body }) => {
            let body: ErrorBody = serde_json::from_slice(&body.unwrap()).unwrap();
            assert_eq!(body.error, "Invalid credentials");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn status_code_is_returned_where_execute_fails() {
    let c = instant_client(&SharedBalance::default());
    let bad = LoginRequest::new("someone@else.com", "password123");

    assert_eq!(c.execute_status_code(&bad).await.unwrap(), 401);
    assert!(matches!(c.execute(&bad).await, Err(NetworkError::HttpError { status: 401, .. })));
    assert!(matches!(c.execute_raw(&bad).await, Err(NetworkError::HttpError { status: 401, .. })));
}

#[tokio::test]
async fn logout_succeeds_with_empty_body() {
    let c = instant_client(&SharedBalance::default());
    assert_eq!(c.execute_status_code(&LogoutRequest).await.unwrap(), 200);
    c.execute(&LogoutRequest).await.unwrap();
}

#[tokio::test]
async fn contacts_match_backend_records() {
    let c = instant_client(&SharedBalance::default());
    let response = c
        .execute(&ContactsRequest {
            token: "anything".to_string(),
        })
        .await
        .unwrap();

    let expected: Vec<Contact> = demo_contacts()
        .into_iter()
        .map(|m| Contact {
            id: m.id,
            name: m.name,
            email: m.email,
            avatar_url: m.avatar_url,
        })
        .collect();
    assert_eq!(response.contacts, expected);
}

#[tokio::test]
async fn malformed_body_for_declared_type_is_decoding_error() {
    let c = instant_client(&SharedBalance::default());
    assert!(matches!(c.execute(&ContactsAsProfile).await, Err(NetworkError::DecodingError(_))));
}

#[tokio::test]
async fn missing_authorization_always_yields_401() {
    let c = instant_client(&SharedBalance::new(1000.0));
    let requests = [
        Anonymous {
            method: HttpMethod::Get,
            path: "/auth/validate",
            body: None,
        },
        Anonymous {
            method: HttpMethod::Get,
            path: "/contacts",
            body: None,
        },
        Anonymous {
            method: HttpMethod::Get,
            path: "/user/profile",
            body: None,
        },
        Anonymous {
            method: HttpMethod::Post,
            path: "/transfer/authorize",
            body: Some(TransferRequest {
                recipient_id: "1".to_string(),
                amount: 10.0,
            }),
        },
    ];
    for request in &requests {
        assert_eq!(c.execute_status_code(request).await.unwrap(), 401, "{}", request.path);
    }
}

#[tokio::test]
async fn unknown_path_is_network_failure() {
    let c = instant_client(&SharedBalance::default());
    let request = Anonymous {
        method: HttpMethod::Get,
        path: "/does/not/exist",
        body: None,
    };
    assert!(matches!(c.execute(&request).await, Err(NetworkError::NetworkFailure(_))));
    assert!(matches!(c.execute_status_code(&request).await, Err(NetworkError::NetworkFailure(_))));
}

#[tokio::test]
async fn wrong_method_on_known_path_is_network_failure() {
    let balance = SharedBalance::new(1000.0);
    let c = instant_client(&balance);
    let requests = [
        Anonymous {
            method: HttpMethod::Get,
            path: "/transfer/authorize",
            body: None,
        },
        Anonymous {
            method: HttpMethod::Get,
            path: "/auth/login",
            body: None,
        },
        Anonymous {
            method: HttpMethod::Post,
            path: "/contacts",
            body: None,
        },
    ];
    for request in &requests {
        assert!(
            matches!(c.execute(request).await, Err(NetworkError::NetworkFailure(_))),
            "{}",
            request.path
        );
        assert!(
            matches!(c.execute_status_code(request).await, Err(NetworkError::NetworkFailure(_))),
            "{}",
            request.path
        );
    }
    assert_eq!(balance.get().await, 1000.0);
}

#[tokio::test]
async fn unknown_path_waits_out_latency() {
    let c = client(&SharedBalance::default(), Latency::uniform(Duration::from_millis(200)));
    let request = Anonymous {
        method: HttpMethod::Get,
        path: "/does/not/exist",
        body: None,
    };
    let started = tokio::time::Instant::now();
    assert!(matches!(c.execute(&request).await, Err(NetworkError::NetworkFailure(_))));
    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn transfer_updates_profile_balance() {
    let balance = SharedBalance::new(1000.0);
    let c = instant_client(&balance);
    let token = login(&c).await.token;

    let result = c
        .execute(&TransferAuthorizationRequest::new("3", 125.5, &token))
        .await
        .unwrap();
    assert!(result.authorized);
    assert_eq!(result.new_balance, Some(874.5));

    let profile = c.execute(&UserProfileRequest { token }).await.unwrap();
    assert_eq!(profile.balance, 874.5);
    assert_eq!(profile.name, "John Doe");
    assert_eq!(profile.email.as_deref(), Some("test@paywallet.com"));
}

#[tokio::test]
async fn sentinel_amount_is_declined_without_deduction() {
    let balance = SharedBalance::new(1000.0);
    let c = instant_client(&balance);

    let result = c
        .execute(&TransferAuthorizationRequest::new("2", 403.0, "mock_token_x"))
        .await
        .unwrap();
    assert!(!result.authorized);
    assert!(result.new_balance.is_none());
    assert!(result.message.unwrap().contains("declined"));
    assert_eq!(balance.get().await, 1000.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_transfers_deduct_exactly() {
    let balance = SharedBalance::new(1000.0);
    let c = client(&balance, Latency::uniform(Duration::from_millis(20)));

    let mut calls = tokio::task::JoinSet::new();
    for i in 0..10 {
        let c = c.clone();
        calls.spawn(async move {
            c.execute(&TransferAuthorizationRequest::new(&i.to_string(), 50.0, "mock_token_x"))
                .await
        });
    }

    let mut seen = Vec::new();
    while let Some(joined) = calls.join_next().await {
        let result = joined.unwrap().unwrap();
        assert!(result.authorized);
        seen.push(result.new_balance.unwrap() as i64);
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..10).map(|i| 500 + 50 * i).collect::<Vec<i64>>());
    assert_eq!(balance.get().await, 500.0);
}

#[tokio::test]
async fn cancelled_login_never_returns_token() {
    let c = client(&SharedBalance::default(), Latency::realistic());
    let handle = c.spawn(LoginRequest::new("test@paywallet.com", "password123"));

    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.cancel();
    assert!(matches!(handle.join().await, Err(NetworkError::Cancelled)));
}

#[tokio::test]
async fn cancelled_transfer_leaves_balance_untouched() {
    let balance = SharedBalance::new(1000.0);
    let c = client(&balance, Latency::uniform(Duration::from_millis(300)));
    let handle = c.spawn(TransferAuthorizationRequest::new("2", 100.0, "mock_token_x"));

    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.cancel();
    assert!(matches!(handle.join().await, Err(NetworkError::Cancelled)));

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(balance.get().await, 1000.0);
}

#[tokio::test]
async fn deadline_shorter_than_latency_is_timeout() {
    let c = client(&SharedBalance::default(), Latency::uniform(Duration::from_millis(500)));
    let request = ImpatientLogin(LoginRequest::new("test@paywallet.com", "password123"));
    assert!(matches!(c.execute(&request).await, Err(NetworkError::Timeout)));
}

#[tokio::test]
async fn typed_body_round_trips_through_backend() {
    let original = TransferRequest {
        recipient_id: "4".to_string(),
        amount: 12.34,
    };
    let wire = TransferAuthorizationRequest {
        transfer: original.clone(),
        token: "mock_token_x".to_string(),
    }
    .build_wire_request()
    .unwrap();

    let decoded: models::TransferRequest = serde_json::from_slice(wire.body.as_deref().unwrap()).unwrap();
    assert_eq!(decoded.recipient_id, original.recipient_id);
    assert_eq!(decoded.amount, original.amount);

    let balance = SharedBalance::new(100.0);
    let result = instant_client(&balance)
        .execute(&TransferAuthorizationRequest {
            transfer: original,
            token: "mock_token_x".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(result.new_balance, Some(100.0 - 12.34));
}

#[tokio::test]
async fn upload_uses_explicit_payload() {
    let balance = SharedBalance::new(100.0);
    let c = instant_client(&balance);

    let mut wire = TransferAuthorizationRequest::new("1", 1.0, "mock_token_x")
        .build_wire_request()
        .unwrap();
    wire.body = None;
    let (body, meta) = c
        .upload(wire, serde_json::to_vec(&serde_json::json!({"recipientId": "1", "amount": 40})).unwrap())
        .await
        .unwrap();
    assert_eq!(meta.status, 200);
    let result: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(result["newBalance"], 60.0);
}

#[tokio::test]
async fn download_without_authorization_is_http_error() {
    let c = instant_client(&SharedBalance::default());
    let err = c.download("https://api.paywallet.com/contacts").await.unwrap_err();
    assert!(matches!(err, NetworkError::HttpError { status: 401, body: None }));
}
