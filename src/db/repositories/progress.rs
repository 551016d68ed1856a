use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::domain::WatchStatus;
use crate::entities::{prelude::*, user_anime_progress};
use crate::models::progress::ProgressPatch;

pub struct ProgressRepository {
    conn: DatabaseConnection,
}

/// Inserts the default row for (user, anime) unless one exists, then reads
/// the row back. Relies on the unique index over the pair.
async fn ensure_row<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    anime_id: i32,
) -> Result<user_anime_progress::Model> {
    UserAnimeProgress::insert(user_anime_progress::ActiveModel {
        user_id: Set(user_id),
        anime_id: Set(anime_id),
        episodes_watched: Set(0),
        status: Set(WatchStatus::default().as_str().to_string()),
        score: Set(None),
        last_updated: Set(Utc::now()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([
            user_anime_progress::Column::UserId,
            user_anime_progress::Column::AnimeId,
        ])
        .do_nothing()
        .to_owned(),
    )
    .exec_without_returning(conn)
    .await?;

    UserAnimeProgress::find()
        .filter(user_anime_progress::Column::UserId.eq(user_id))
        .filter(user_anime_progress::Column::AnimeId.eq(anime_id))
        .one(conn)
        .await?
        .with_context(|| format!("Progress row for user {user_id}, anime {anime_id} vanished"))
}

impl ProgressRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns the progress row, creating the default one first if needed.
    pub async fn get_or_create(
        &self,
        user_id: i32,
        anime_id: i32,
    ) -> Result<user_anime_progress::Model> {
        let txn = self.conn.begin().await?;
        let row = ensure_row(&txn, user_id, anime_id).await?;
        txn.commit().await?;
        Ok(row)
    }

    /// Creates or updates the row with the supplied fields and bumps
    /// `last_updated`.
    pub async fn upsert(
        &self,
        user_id: i32,
        anime_id: i32,
        patch: &ProgressPatch,
    ) -> Result<user_anime_progress::Model> {
        let txn = self.conn.begin().await?;

        let existing = ensure_row(&txn, user_id, anime_id).await?;
        let mut active: user_anime_progress::ActiveModel = existing.into();

        if let Some(episodes) = patch.episodes_watched {
            active.episodes_watched = Set(episodes);
        }
        if let Some(status) = patch.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(score) = patch.score {
            active.score = Set(score);
        }
        active.last_updated = Set(Utc::now());

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        Ok(updated)
    }

    /// Every progress row of a user, most recently updated first.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<user_anime_progress::Model>> {
        Ok(UserAnimeProgress::find()
            .filter(user_anime_progress::Column::UserId.eq(user_id))
            .order_by_desc(user_anime_progress::Column::LastUpdated)
            .order_by_desc(user_anime_progress::Column::Id)
            .all(&self.conn)
            .await?)
    }
}
