//! Descriptors for the wallet API endpoints.
//!
//! Each type maps to exactly one HTTP call. Authenticated endpoints send the
//! caller's token as `Authorization: Bearer <token>`; the engine never looks
//! the token up itself.

use std::collections::HashMap;

use crate::http::HttpMethod;
use crate::request::{JsonBody, NetworkRequest};
use crate::types::{
    ContactsResponse, EmptyResponse, LoginCredentials, LoginResponse, TransferAuthorizationResponse,
    TransferRequest, UserProfile, ValidateTokenResponse,
};

/// Origin of the production wallet API.
pub const API_BASE_URL: &str = "https://api.paywallet.com";

fn bearer(token: &str) -> Option<HashMap<String, String>> {
    Some(HashMap::from([("Authorization".to_string(), format!("Bearer {token}"))]))
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub credentials: LoginCredentials,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            credentials: LoginCredentials {
                email: email.to_string(),
                password: password.to_string(),
            },
        }
    }
}

impl NetworkRequest for LoginRequest {
    type Response = LoginResponse;

    fn base_url(&self) -> &str {
        API_BASE_URL
    }

    fn path(&self) -> &str {
        "/auth/login"
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn encodable_body(&self) -> Option<&dyn JsonBody> {
        Some(&self.credentials)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogoutRequest;

impl NetworkRequest for LogoutRequest {
    type Response = EmptyResponse;

    fn base_url(&self) -> &str {
        API_BASE_URL
    }

    fn path(&self) -> &str {
        "/auth/logout"
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }
}

#[derive(Debug, Clone)]
pub struct ValidateTokenRequest {
    pub token: String,
}

impl NetworkRequest for ValidateTokenRequest {
    type Response = ValidateTokenResponse;

    fn base_url(&self) -> &str {
        API_BASE_URL
    }

    fn path(&self) -> &str {
        "/auth/validate"
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn headers(&self) -> Option<HashMap<String, String>> {
        bearer(&self.token)
    }
}

#[derive(Debug, Clone)]
pub struct ContactsRequest {
    pub token: String,
}

impl NetworkRequest for ContactsRequest {
    type Response = ContactsResponse;

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
        bearer(&self.token)
    }
}

#[derive(Debug, Clone)]
pub struct UserProfileRequest {
    pub token: String,
}

impl NetworkRequest for UserProfileRequest {
    type Response = UserProfile;

    fn base_url(&self) -> &str {
        API_BASE_URL
    }

    fn path(&self) -> &str {
        "/user/profile"
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn headers(&self) -> Option<HashMap<String, String>> {
        bearer(&self.token)
    }
}

#[derive(Debug, Clone)]
pub struct TransferAuthorizationRequest {
    pub transfer: TransferRequest,
    pub token: String,
}

impl TransferAuthorizationRequest {
    pub fn new(recipient_id: &str, amount: f64, token: &str) -> Self {
        Self {
            transfer: TransferRequest {
                recipient_id: recipient_id.to_string(),
                amount,
            },
            token: token.to_string(),
        }
    }
}

impl NetworkRequest for TransferAuthorizationRequest {
    type Response = TransferAuthorizationResponse;

    fn base_url(&self) -> &str {
        API_BASE_URL
    }

    fn path(&self) -> &str {
        "/transfer/authorize"
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn headers(&self) -> Option<HashMap<String, String>> {
        bearer(&self.token)
    }

    fn encodable_body(&self) -> Option<&dyn JsonBody> {
        Some(&self.transfer)
    }
}
