//! `SeaORM` implementation of the `ProgressService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::api::types::ProgressDto;
use crate::db::Store;
use crate::domain::{AnimeId, UserId};
use crate::models::progress::ProgressPatch;
use crate::services::progress_service::{ProgressError, ProgressService};

pub struct SeaOrmProgressService {
    store: Store,
}

impl SeaOrmProgressService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn authorize(caller: UserId, user: UserId) -> Result<(), ProgressError> {
        if caller != user {
            return Err(ProgressError::Forbidden(user));
        }
        Ok(())
    }

    async fn ensure_anime(&self, anime: AnimeId) -> Result<(), ProgressError> {
        if !self.store.anime_exists(anime.value()).await? {
            return Err(ProgressError::anime_not_found(anime));
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressService for SeaOrmProgressService {
    async fn get_or_create(
        &self,
        caller: UserId,
        user: UserId,
        anime: AnimeId,
    ) -> Result<ProgressDto, ProgressError> {
        Self::authorize(caller, user)?;
        self.ensure_anime(anime).await?;

        let row = self
            .store
            .progress_repo()
            .get_or_create(user.value(), anime.value())
            .await?;

        ProgressDto::try_from(row).map_err(ProgressError::Internal)
    }

    async fn upsert(
        &self,
        caller: UserId,
        user: UserId,
        anime: AnimeId,
        patch: ProgressPatch,
    ) -> Result<ProgressDto, ProgressError> {
        Self::authorize(caller, user)?;
        patch.validate().map_err(ProgressError::Validation)?;
        self.ensure_anime(anime).await?;

        let row = self
            .store
            .progress_repo()
            .upsert(user.value(), anime.value(), &patch)
            .await?;

        info!(
            user_id = %user,
            anime_id = %anime,
            fields = ?patch.supplied_fields(),
            "Updated watch progress"
        );
        metrics::counter!("progress_updates_total").increment(1);

        ProgressDto::try_from(row).map_err(ProgressError::Internal)
    }

    async fn list_for_user(
        &self,
        caller: UserId,
        user: UserId,
    ) -> Result<Vec<ProgressDto>, ProgressError> {
        Self::authorize(caller, user)?;

        self.store
            .progress_repo()
            .list_for_user(user.value())
            .await?
            .into_iter()
            .map(|row| ProgressDto::try_from(row).map_err(ProgressError::Internal))
            .collect()
    }
}
