//! Domain service for registration, login and bearer sessions.

use thiserror::Error;

use crate::api::types::{TokenDto, UserDto};
use crate::domain::{EntityRef, UserId};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(EntityRef),

    #[error("{0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub username: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a user with an Argon2id password hash.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`] for an empty username, malformed email or short password
    /// - [`AuthError::Conflict`] when the username or email is taken
    async fn register(&self, username: &str, email: &str, password: &str)
    -> Result<UserDto, AuthError>;

    /// Verifies credentials and issues a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<TokenDto, AuthError>;

    /// Resolves a bearer token to its caller.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] for unknown or expired tokens.
    async fn resolve(&self, token: &str) -> Result<Caller, AuthError>;

    /// Revokes a bearer token. Unknown tokens are ignored.
    async fn logout(&self, token: &str) -> Result<(), AuthError>;

    /// Public profile of a user.
    async fn get_user(&self, id: UserId) -> Result<UserDto, AuthError>;
}
