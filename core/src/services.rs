//! Wallet services layered over `NetworkClient`.
//!
//! Each service owns one endpoint group and translates `NetworkError` into its
//! own error kind through a `From` impl, so every caller decides what a 401
//! means for it. HTTP 401 and 403 become the credentials or authorization
//! kind, any other HTTP status, transport failure or timeout becomes the
//! network kind, and the remaining engine errors become `Unknown`.

use thiserror::Error;
use tracing::debug;

use crate::client::NetworkClient;
use crate::endpoints::{
    ContactsRequest, LoginRequest, LogoutRequest, TransferAuthorizationRequest, UserProfileRequest,
    ValidateTokenRequest,
};
use crate::error::NetworkError;
use crate::types::{Contact, LoginResponse, TransferAuthorizationResponse, UserProfile};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password. Try test@paywallet.com / password123")]
    InvalidCredentials,

    #[error("Network error occurred. Please try again.")]
    Network,

    #[error("An unknown error occurred.")]
    Unknown,
}

impl From<NetworkError> for AuthError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::HttpError { status: 401 | 403, .. } => AuthError::InvalidCredentials,
            NetworkError::HttpError { .. } | NetworkError::NetworkFailure(_) | NetworkError::Timeout => {
                AuthError::Network
            }
            _ => AuthError::Unknown,
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContactsError {
    #[error("Unauthorized. Please log in again.")]
    Unauthorized,

    #[error("Network error occurred. Please try again.")]
    Network,

    #[error("An unknown error occurred.")]
    Unknown,
}

impl From<NetworkError> for ContactsError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::HttpError { status: 401 | 403, .. } => ContactsError::Unauthorized,
            NetworkError::HttpError { .. } | NetworkError::NetworkFailure(_) | NetworkError::Timeout => {
                ContactsError::Network
            }
            _ => ContactsError::Unknown,
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UserProfileError {
    #[error("Unauthorized. Please log in again.")]
    Unauthorized,

    #[error("Network error occurred. Please try again.")]
    Network,

    #[error("An unknown error occurred.")]
    Unknown,
}

impl From<NetworkError> for UserProfileError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::HttpError { status: 401 | 403, .. } => UserProfileError::Unauthorized,
            NetworkError::HttpError { .. } | NetworkError::NetworkFailure(_) | NetworkError::Timeout => {
                UserProfileError::Network
            }
            _ => UserProfileError::Unknown,
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransferError {
    #[error("Transfer not authorized. Please try again.")]
    Unauthorized,

    #[error("Network error occurred. Please check your connection.")]
    Network,

    #[error("An unknown error occurred.")]
    Unknown,
}

impl From<NetworkError> for TransferError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::HttpError { status: 401 | 403, .. } => TransferError::Unauthorized,
            NetworkError::HttpError { .. } | NetworkError::NetworkFailure(_) | NetworkError::Timeout => {
                TransferError::Network
            }
            _ => TransferError::Unknown,
        }
    }
}

/// Login, logout and token validation.
#[derive(Debug, Clone, Default)]
pub struct AuthService {
    client: NetworkClient,
}

impl AuthService {
    pub fn new(client: NetworkClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let response = self.client.execute(&LoginRequest::new(email, password)).await?;
        Ok(response)
    }

    /// Any answer from the backend counts as logged out; only engine errors fail.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let status = self.client.execute_status_code(&LogoutRequest).await?;
        debug!("logout answered with status {status}");
        Ok(())
    }

    /// `false` for a rejected token and for any failure to ask.
    pub async fn validate_token(&self, token: &str) -> bool {
        let request = ValidateTokenRequest {
            token: token.to_string(),
        };
        match self.client.execute(&request).await {
            Ok(response) => response.is_valid,
            Err(err) => {
                debug!("token validation failed: {err}");
                false
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContactsService {
    client: NetworkClient,
}

impl ContactsService {
    pub fn new(client: NetworkClient) -> Self {
        Self { client }
    }

    pub async fn get_contacts(&self, token: &str) -> Result<Vec<Contact>, ContactsError> {
        let request = ContactsRequest {
            token: token.to_string(),
        };
        let response = self.client.execute(&request).await?;
        Ok(response.contacts)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserProfileService {
    client: NetworkClient,
}

impl UserProfileService {
    pub fn new(client: NetworkClient) -> Self {
        Self { client }
    }

    pub async fn get_user_profile(&self, token: &str) -> Result<UserProfile, UserProfileError> {
        let request = UserProfileRequest {
            token: token.to_string(),
        };
        Ok(self.client.execute(&request).await?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransferService {
    client: NetworkClient,
}

impl TransferService {
    pub fn new(client: NetworkClient) -> Self {
        Self { client }
    }

    /// A declined transfer is a successful answer with `authorized == false`.
    pub async fn authorize_transfer(
        &self,
        recipient_id: &str,
        amount: f64,
        token: &str,
    ) -> Result<TransferAuthorizationResponse, TransferError> {
        let request = TransferAuthorizationRequest::new(recipient_id, amount, token);
        Ok(self.client.execute(&request).await?)
    }
}
