//! Per-user favorites of anime and characters.

use thiserror::Error;

use crate::api::types::FavoriteDto;
use crate::domain::{EntityKind, EntityRef, FavoriteId, FavoriteTarget, UserId};

#[derive(Debug, Error)]
pub enum FavoriteError {
    #[error("{0} not found")]
    NotFound(EntityRef),

    #[error("Not allowed to access favorites of user {0}")]
    Forbidden(UserId),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for FavoriteError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for FavoriteError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl FavoriteError {
    pub fn favorite_not_found(id: FavoriteId) -> Self {
        Self::NotFound(EntityRef::new(EntityKind::Favorite, id))
    }
}

#[async_trait::async_trait]
pub trait FavoriteService: Send + Sync {
    /// Marks a target as favorite. Adding the same target again returns the
    /// existing favorite.
    ///
    /// # Errors
    ///
    /// - [`FavoriteError::Forbidden`] when `caller` is not `user`
    /// - [`FavoriteError::NotFound`] when the target does not exist
    async fn add_favorite(
        &self,
        caller: UserId,
        user: UserId,
        target: FavoriteTarget,
    ) -> Result<FavoriteDto, FavoriteError>;

    /// Favorites of a user, each with a summary of its target.
    async fn list_favorites(
        &self,
        caller: UserId,
        user: UserId,
    ) -> Result<Vec<FavoriteDto>, FavoriteError>;

    /// # Errors
    ///
    /// Returns [`FavoriteError::NotFound`] when the favorite does not exist
    /// or belongs to another user.
    async fn remove_favorite(
        &self,
        caller: UserId,
        user: UserId,
        favorite: FavoriteId,
    ) -> Result<(), FavoriteError>;
}
