//! `SeaORM` implementation of the `FavoriteService` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::api::types::{
    AnimeSummaryDto, CharacterSummaryDto, FavoriteDto, FavoriteTargetDto,
};
use crate::db::Store;
use crate::domain::{FavoriteId, FavoriteTarget, UserId};
use crate::entities::user_favorites;
use crate::services::favorite_service::{FavoriteError, FavoriteService};

pub struct SeaOrmFavoriteService {
    store: Store,
}

impl SeaOrmFavoriteService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn authorize(caller: UserId, user: UserId) -> Result<(), FavoriteError> {
        if caller != user {
            return Err(FavoriteError::Forbidden(user));
        }
        Ok(())
    }

    async fn ensure_target(&self, target: FavoriteTarget) -> Result<(), FavoriteError> {
        let exists = match target {
            FavoriteTarget::Anime(id) => self.store.anime_exists(id.value()).await?,
            FavoriteTarget::Character(id) => self
                .store
                .catalog_repo()
                .get_character(id.value())
                .await?
                .is_some(),
        };

        if !exists {
            return Err(FavoriteError::NotFound(target.entity_ref()));
        }
        Ok(())
    }

    /// Resolves favorites to summaries of their targets in two batched
    /// lookups.
    async fn to_dtos(
        &self,
        rows: Vec<user_favorites::Model>,
    ) -> Result<Vec<FavoriteDto>, FavoriteError> {
        let anime_ids: Vec<i32> = rows.iter().filter_map(|f| f.anime_id).collect();
        let character_ids: Vec<i32> = rows.iter().filter_map(|f| f.character_id).collect();

        let anime: HashMap<i32, AnimeSummaryDto> = self
            .store
            .anime_repo()
            .get_by_ids(&anime_ids)
            .await?
            .into_iter()
            .map(|a| (a.id, AnimeSummaryDto::from(a)))
            .collect();
        let characters: HashMap<i32, CharacterSummaryDto> = self
            .store
            .catalog_repo()
            .get_characters_by_ids(&character_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, CharacterSummaryDto::from(c)))
            .collect();

        let mut favorites = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(target) = FavoriteTarget::from_columns(row.anime_id, row.character_id) else {
                warn!(favorite_id = row.id, "Skipping favorite without a single target");
                continue;
            };

            let summary = match target {
                FavoriteTarget::Anime(id) => {
                    anime.get(&id.value()).cloned().map(FavoriteTargetDto::Anime)
                }
                FavoriteTarget::Character(id) => characters
                    .get(&id.value())
                    .cloned()
                    .map(FavoriteTargetDto::Character),
            };

            let Some(summary) = summary else {
                warn!(favorite_id = row.id, target = %target.entity_ref(), "Favorite target is gone");
                continue;
            };

            favorites.push(FavoriteDto::new(&row, summary));
        }

        Ok(favorites)
    }
}

#[async_trait]
impl FavoriteService for SeaOrmFavoriteService {
    async fn add_favorite(
        &self,
        caller: UserId,
        user: UserId,
        target: FavoriteTarget,
    ) -> Result<FavoriteDto, FavoriteError> {
        Self::authorize(caller, user)?;
        self.ensure_target(target).await?;

        let row = self.store.favorite_repo().add(user.value(), target).await?;
        info!(user_id = %user, target = %target.entity_ref(), favorite_id = row.id, "Added favorite");

        self.to_dtos(vec![row])
            .await?
            .pop()
            .ok_or_else(|| FavoriteError::NotFound(target.entity_ref()))
    }

    async fn list_favorites(
        &self,
        caller: UserId,
        user: UserId,
    ) -> Result<Vec<FavoriteDto>, FavoriteError> {
        Self::authorize(caller, user)?;

        let rows = self.store.favorite_repo().list_for_user(user.value()).await?;
        self.to_dtos(rows).await
    }

    async fn remove_favorite(
        &self,
        caller: UserId,
        user: UserId,
        favorite: FavoriteId,
    ) -> Result<(), FavoriteError> {
        Self::authorize(caller, user)?;

        if !self
            .store
            .favorite_repo()
            .remove(user.value(), favorite.value())
            .await?
        {
            return Err(FavoriteError::favorite_not_found(favorite));
        }
        Ok(())
    }
}
