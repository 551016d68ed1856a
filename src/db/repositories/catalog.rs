//! Flat catalog reference data: studios, genres, characters and voice actors.

use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait, Value,
};
use tracing::info;

use crate::domain::Pagination;
use crate::entities::{
    anime, anime_characters, anime_genres, character_voice_actors, characters, genres,
    prelude::*, studios, user_favorites, voice_actors,
};
use crate::models::catalog::{NewCharacter, NewGenre, NewStudio, NewVoiceActor};

pub struct CatalogRepository {
    conn: DatabaseConnection,
}

impl CatalogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Studios
    // ========================================================================

    pub async fn create_studio(&self, input: NewStudio) -> Result<studios::Model> {
        let model = studios::ActiveModel {
            name: Set(input.name),
            country: Set(input.country),
            founded_year: Set(input.founded_year),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(model)
    }

    pub async fn get_studio(&self, id: i32) -> Result<Option<studios::Model>> {
        Ok(Studios::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn find_studio_by_name(&self, name: &str) -> Result<Option<studios::Model>> {
        Ok(Studios::find()
            .filter(studios::Column::Name.eq(name))
            .one(&self.conn)
            .await?)
    }

    pub async fn get_studios_by_ids(&self, ids: &[i32]) -> Result<Vec<studios::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(Studios::find()
            .filter(studios::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await?)
    }

    pub async fn list_studios(&self, pagination: Pagination) -> Result<Vec<studios::Model>> {
        Ok(Studios::find()
            .order_by_asc(studios::Column::Id)
            .offset(pagination.skip)
            .limit(pagination.limit)
            .all(&self.conn)
            .await?)
    }

    /// Deletes a studio; its anime stay in the catalog without a studio.
    pub async fn delete_studio(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        Anime::update_many()
            .col_expr(anime::Column::StudioId, Expr::value(Value::Int(None)))
            .filter(anime::Column::StudioId.eq(id))
            .exec(&txn)
            .await?;

        let result = Studios::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // Genres
    // ========================================================================

    pub async fn create_genre(&self, input: NewGenre) -> Result<genres::Model> {
        let model = genres::ActiveModel {
            name: Set(input.name),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(model)
    }

    pub async fn get_genre(&self, id: i32) -> Result<Option<genres::Model>> {
        Ok(Genres::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn find_genre_by_name(&self, name: &str) -> Result<Option<genres::Model>> {
        Ok(Genres::find()
            .filter(genres::Column::Name.eq(name))
            .one(&self.conn)
            .await?)
    }

    pub async fn get_genres_by_ids(&self, ids: &[i32]) -> Result<Vec<genres::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(Genres::find()
            .filter(genres::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await?)
    }

    pub async fn list_genres(&self, pagination: Pagination) -> Result<Vec<genres::Model>> {
        Ok(Genres::find()
            .order_by_asc(genres::Column::Id)
            .offset(pagination.skip)
            .limit(pagination.limit)
            .all(&self.conn)
            .await?)
    }

    pub async fn delete_genre(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        AnimeGenres::delete_many()
            .filter(anime_genres::Column::GenreId.eq(id))
            .exec(&txn)
            .await?;

        let result = Genres::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // Characters
    // ========================================================================

    pub async fn create_character(&self, input: NewCharacter) -> Result<characters::Model> {
        let model = characters::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            image_url: Set(input.image_url),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(model)
    }

    pub async fn get_character(&self, id: i32) -> Result<Option<characters::Model>> {
        Ok(Characters::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn get_characters_by_ids(&self, ids: &[i32]) -> Result<Vec<characters::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(Characters::find()
            .filter(characters::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await?)
    }

    pub async fn list_characters(&self, pagination: Pagination) -> Result<Vec<characters::Model>> {
        Ok(Characters::find()
            .order_by_asc(characters::Column::Id)
            .offset(pagination.skip)
            .limit(pagination.limit)
            .all(&self.conn)
            .await?)
    }

    pub async fn delete_character(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        AnimeCharacters::delete_many()
            .filter(anime_characters::Column::CharacterId.eq(id))
            .exec(&txn)
            .await?;
        CharacterVoiceActors::delete_many()
            .filter(character_voice_actors::Column::CharacterId.eq(id))
            .exec(&txn)
            .await?;
        UserFavorites::delete_many()
            .filter(user_favorites::Column::CharacterId.eq(id))
            .exec(&txn)
            .await?;

        let result = Characters::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed character with ID: {}", id);
        }
        Ok(removed)
    }

    // ========================================================================
    // Voice actors
    // ========================================================================

    pub async fn create_voice_actor(&self, input: NewVoiceActor) -> Result<voice_actors::Model> {
        let model = voice_actors::ActiveModel {
            name: Set(input.name),
            nationality: Set(input.nationality),
            birthdate: Set(input.birthdate),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(model)
    }

    pub async fn get_voice_actor(&self, id: i32) -> Result<Option<voice_actors::Model>> {
        Ok(VoiceActors::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn list_voice_actors(
        &self,
        pagination: Pagination,
    ) -> Result<Vec<voice_actors::Model>> {
        Ok(VoiceActors::find()
            .order_by_asc(voice_actors::Column::Id)
            .offset(pagination.skip)
            .limit(pagination.limit)
            .all(&self.conn)
            .await?)
    }

    pub async fn delete_voice_actor(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        CharacterVoiceActors::delete_many()
            .filter(character_voice_actors::Column::VoiceActorId.eq(id))
            .exec(&txn)
            .await?;

        let result = VoiceActors::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }
}
