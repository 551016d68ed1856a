//! Per-user watch progress.
//!
//! Every operation is scoped to one user and only that user may call it.

use thiserror::Error;

use crate::api::types::ProgressDto;
use crate::domain::{AnimeId, EntityKind, EntityRef, UserId};
use crate::models::progress::ProgressPatch;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("{0} not found")]
    NotFound(EntityRef),

    #[error("Not allowed to access progress of user {0}")]
    Forbidden(UserId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ProgressError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ProgressError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl ProgressError {
    pub fn anime_not_found(id: AnimeId) -> Self {
        Self::NotFound(EntityRef::new(EntityKind::Anime, id))
    }
}

#[async_trait::async_trait]
pub trait ProgressService: Send + Sync {
    /// Returns the progress row of (user, anime), creating the default row
    /// (0 episodes, "Plan to Watch", no score) on first access.
    ///
    /// # Errors
    ///
    /// - [`ProgressError::Forbidden`] when `caller` is not `user`
    /// - [`ProgressError::NotFound`] when the anime does not exist
    async fn get_or_create(
        &self,
        caller: UserId,
        user: UserId,
        anime: AnimeId,
    ) -> Result<ProgressDto, ProgressError>;

    /// Creates or updates the progress row with the supplied fields.
    ///
    /// # Errors
    ///
    /// Additionally returns [`ProgressError::Validation`] for a negative
    /// episode count or a score outside 1..=10.
    async fn upsert(
        &self,
        caller: UserId,
        user: UserId,
        anime: AnimeId,
        patch: ProgressPatch,
    ) -> Result<ProgressDto, ProgressError>;

    /// All progress rows of a user, most recently updated first.
    async fn list_for_user(
        &self,
        caller: UserId,
        user: UserId,
    ) -> Result<Vec<ProgressDto>, ProgressError>;
}
