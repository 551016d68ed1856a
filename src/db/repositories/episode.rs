use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use crate::entities::{episodes, prelude::*};
use crate::models::episode::{EpisodePatch, NewEpisode};

/// Repository for the episodes of catalog anime
pub struct EpisodeRepository {
    conn: DatabaseConnection,
}

impl EpisodeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, input: NewEpisode) -> Result<episodes::Model> {
        Ok(input.into_active_model().insert(&self.conn).await?)
    }

    pub async fn get(&self, id: i32) -> Result<Option<episodes::Model>> {
        Ok(Episodes::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn list_for_anime(&self, anime_id: i32) -> Result<Vec<episodes::Model>> {
        let rows = Episodes::find()
            .filter(episodes::Column::AnimeId.eq(anime_id))
            .order_by_asc(episodes::Column::EpisodeNumber)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// Whether another episode of `anime_id` already uses `episode_number`.
    pub async fn number_taken(
        &self,
        anime_id: i32,
        episode_number: i32,
        excluding: Option<i32>,
    ) -> Result<bool> {
        let mut query = Episodes::find()
            .filter(episodes::Column::AnimeId.eq(anime_id))
            .filter(episodes::Column::EpisodeNumber.eq(episode_number));

        if let Some(id) = excluding {
            query = query.filter(episodes::Column::Id.ne(id));
        }

        Ok(query.count(&self.conn).await? > 0)
    }

    pub async fn update(&self, id: i32, patch: &EpisodePatch) -> Result<Option<episodes::Model>> {
        let Some(existing) = Episodes::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: episodes::ActiveModel = existing.clone().into();
        patch.apply(&mut active);
        if !active.is_changed() {
            return Ok(Some(existing));
        }

        Ok(Some(active.update(&self.conn).await?))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Episodes::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
