//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::info;

use crate::api::types::{TokenDto, UserDto};
use crate::config::SecurityConfig;
use crate::db::Store;
use crate::db::repositories::user::hash_password;
use crate::domain::{EntityKind, EntityRef, UserId};
use crate::services::auth_service::{AuthError, AuthService, Caller};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn validate_registration(&self, username: &str, email: &str, password: &str) -> Result<(), AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::Validation("Username cannot be empty".to_string()));
        }

        let email = email.trim();
        if email.len() < 3 || !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(AuthError::Validation(format!("Invalid email address: {email}")));
        }

        if password.chars().count() < self.security.min_password_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                self.security.min_password_length
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserDto, AuthError> {
        self.validate_registration(username, email, password)?;

        let username = username.trim();
        let email = email.trim();
        let users = self.store.user_repo();

        if users.get_by_username(username).await?.is_some() {
            return Err(AuthError::Conflict(format!("Username '{username}' is already taken")));
        }
        if users.get_by_email(email).await?.is_some() {
            return Err(AuthError::Conflict(format!("Email '{email}' is already registered")));
        }

        let security = self.security.clone();
        let password = password.to_string();
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password(&password, Some(&security)))
                .await
                .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {e}")))??;

        let user = users.create(username, email, password_hash).await?;
        info!(user_id = user.id, username = %user.username, "Registered user");

        Ok(UserDto::from(user))
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenDto, AuthError> {
        let user = self
            .store
            .user_repo()
            .verify_password(username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let ttl = Duration::hours(i64::from(self.security.session_ttl_hours));
        let session = self.store.session_repo().create(user.id, ttl).await?;

        info!(user_id = user.id, "User logged in");

        Ok(TokenDto {
            access_token: session.token,
            token_type: "bearer".to_string(),
            expires_at: session.expires_at.to_rfc3339(),
        })
    }

    async fn resolve(&self, token: &str) -> Result<Caller, AuthError> {
        let user = self
            .store
            .session_repo()
            .find_user(token, Utc::now())
            .await?
            .ok_or(AuthError::Unauthorized)?;

        Ok(Caller {
            id: UserId::new(user.id),
            username: user.username,
        })
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let sessions = self.store.session_repo();
        sessions.delete(token).await?;

        let purged = sessions.purge_expired(Utc::now()).await?;
        if purged > 0 {
            info!(purged, "Purged expired sessions");
        }

        Ok(())
    }

    async fn get_user(&self, id: UserId) -> Result<UserDto, AuthError> {
        let user = self
            .store
            .get_user(id.value())
            .await?
            .ok_or_else(|| AuthError::NotFound(EntityRef::new(EntityKind::User, id)))?;

        Ok(UserDto::from(user))
    }
}
