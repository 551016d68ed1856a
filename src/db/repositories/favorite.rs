use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::FavoriteTarget;
use crate::entities::{prelude::*, user_favorites};

pub struct FavoriteRepository {
    conn: DatabaseConnection,
}

impl FavoriteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Adds a favorite, or returns the existing one for the same target.
    pub async fn add(&self, user_id: i32, target: FavoriteTarget) -> Result<user_favorites::Model> {
        let (anime_id, character_id) = target.to_columns();
        let target_column = match target {
            FavoriteTarget::Anime(_) => user_favorites::Column::AnimeId,
            FavoriteTarget::Character(_) => user_favorites::Column::CharacterId,
        };

        let txn = self.conn.begin().await?;

        UserFavorites::insert(user_favorites::ActiveModel {
            user_id: Set(user_id),
            anime_id: Set(anime_id),
            character_id: Set(character_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([user_favorites::Column::UserId, target_column])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

        let target_id = anime_id.or(character_id);
        let row = UserFavorites::find()
            .filter(user_favorites::Column::UserId.eq(user_id))
            .filter(target_column.eq(target_id))
            .one(&txn)
            .await?
            .with_context(|| format!("Favorite of user {user_id} vanished after insert"))?;

        txn.commit().await?;
        Ok(row)
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<user_favorites::Model>> {
        Ok(UserFavorites::find()
            .filter(user_favorites::Column::UserId.eq(user_id))
            .order_by_asc(user_favorites::Column::Id)
            .all(&self.conn)
            .await?)
    }

    /// Removes a favorite only if it belongs to `user_id`.
    pub async fn remove(&self, user_id: i32, favorite_id: i32) -> Result<bool> {
        let result = UserFavorites::delete_many()
            .filter(user_favorites::Column::Id.eq(favorite_id))
            .filter(user_favorites::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
