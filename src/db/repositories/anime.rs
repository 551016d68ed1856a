use anyhow::Result;
use sea_orm::sea_query::{Expr, Func, LikeExpr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::info;

use super::links::{insert_genre_links, replace_genre_links};
use crate::domain::Pagination;
use crate::entities::{
    anime, anime_characters, anime_genres, episodes, genres, prelude::*, user_anime_progress,
    user_favorites,
};
use crate::models::anime::{AnimeFilters, AnimePatch, NewAnime};

pub struct AnimeRepository {
    conn: DatabaseConnection,
}

/// Escapes LIKE wildcards so user input only ever matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_ci(column: anime::Column, pattern: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col((anime::Entity, column))))
        .like(LikeExpr::new(pattern).escape('\\'))
}

impl AnimeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        let count = Anime::find_by_id(id).count(&self.conn).await?;
        Ok(count > 0)
    }

    pub async fn get(&self, id: i32) -> Result<Option<anime::Model>> {
        Ok(Anime::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn get_by_ids(&self, ids: &[i32]) -> Result<Vec<anime::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(Anime::find()
            .filter(anime::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await?)
    }

    /// Conjunctive catalog search, ordered by id.
    pub async fn search(
        &self,
        filters: &AnimeFilters,
        pagination: Pagination,
    ) -> Result<Vec<anime::Model>> {
        let mut query = Anime::find();

        if let Some(term) = filters
            .search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            // SQLite's LOWER() only folds ASCII; fold the term the same way.
            let pattern = format!("%{}%", escape_like(&term.to_ascii_lowercase()));
            query = query.filter(
                Condition::any()
                    .add(contains_ci(anime::Column::Title, &pattern))
                    .add(contains_ci(anime::Column::NativeTitle, &pattern)),
            );
        }

        if let Some(status) = filters.status.as_deref() {
            query = query.filter(anime::Column::Status.eq(status));
        }

        if let Some(genre_name) = filters.genre_name.as_deref() {
            query = query.filter(
                anime::Column::Id.in_subquery(
                    Query::select()
                        .column((anime_genres::Entity, anime_genres::Column::AnimeId))
                        .from(anime_genres::Entity)
                        .inner_join(
                            genres::Entity,
                            Expr::col((genres::Entity, genres::Column::Id))
                                .equals((anime_genres::Entity, anime_genres::Column::GenreId)),
                        )
                        .and_where(Expr::col((genres::Entity, genres::Column::Name)).eq(genre_name))
                        .to_owned(),
                ),
            );
        }

        let rows = query
            .order_by_asc(anime::Column::Id)
            .offset(pagination.skip)
            .limit(pagination.limit)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// Inserts the anime and its genre links in one transaction.
    pub async fn create(&self, input: NewAnime) -> Result<anime::Model> {
        let genre_ids = input.genres.clone();
        let txn = self.conn.begin().await?;

        let model = input.into_active_model().insert(&txn).await?;
        insert_genre_links(&txn, model.id, &genre_ids).await?;

        txn.commit().await?;

        info!(anime_id = model.id, title = %model.title, "Created anime");
        Ok(model)
    }

    /// Applies the supplied fields; replaces the genre set when the patch
    /// carries one. Returns `None` when the anime does not exist.
    pub async fn update(&self, id: i32, patch: &AnimePatch) -> Result<Option<anime::Model>> {
        let txn = self.conn.begin().await?;

        let Some(existing) = Anime::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let mut active: anime::ActiveModel = existing.clone().into();
        patch.apply(&mut active);
        let updated = if active.is_changed() {
            active.update(&txn).await?
        } else {
            existing
        };

        if let Some(genre_ids) = &patch.genres {
            replace_genre_links(&txn, id, genre_ids).await?;
        }

        txn.commit().await?;
        Ok(Some(updated))
    }

    /// Deletes an anime together with everything that hangs off it.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        AnimeGenres::delete_many()
            .filter(anime_genres::Column::AnimeId.eq(id))
            .exec(&txn)
            .await?;
        AnimeCharacters::delete_many()
            .filter(anime_characters::Column::AnimeId.eq(id))
            .exec(&txn)
            .await?;
        Episodes::delete_many()
            .filter(episodes::Column::AnimeId.eq(id))
            .exec(&txn)
            .await?;
        UserAnimeProgress::delete_many()
            .filter(user_anime_progress::Column::AnimeId.eq(id))
            .exec(&txn)
            .await?;
        UserFavorites::delete_many()
            .filter(user_favorites::Column::AnimeId.eq(id))
            .exec(&txn)
            .await?;

        let result = Anime::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed anime with ID: {}", id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
        assert_eq!(escape_like("naruto"), "naruto");
    }
}
