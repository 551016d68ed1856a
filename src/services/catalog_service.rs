//! Domain service for the anime catalog: search, anime and episode CRUD and
//! the flat reference data (studios, genres, characters, voice actors).

use thiserror::Error;

use crate::api::types::{
    AnimeDto, CharacterDto, EpisodeDto, GenreDto, StudioDto, VoiceActorDto,
};
use crate::domain::{
    AnimeId, CharacterId, EntityKind, EntityRef, EpisodeId, GenreId, Pagination, StudioId,
    VoiceActorId,
};
use crate::models::anime::{AnimeFilters, AnimePatch, NewAnime};
use crate::models::catalog::{NewCharacter, NewGenre, NewStudio, NewVoiceActor};
use crate::models::episode::{EpisodePatch, NewEpisode};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0} not found")]
    NotFound(EntityRef),

    #[error("{0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn not_found(kind: EntityKind, id: impl Into<i32>) -> Self {
        Self::NotFound(EntityRef::new(kind, id))
    }
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Filtered, paginated list of anime ordered by id. No match is an
    /// empty list.
    async fn search(
        &self,
        filters: &AnimeFilters,
        pagination: Pagination,
    ) -> Result<Vec<AnimeDto>, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the anime does not exist.
    async fn get_anime(&self, id: AnimeId) -> Result<AnimeDto, CatalogError>;

    /// Creates an anime and links its genres atomically.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] for an unknown studio or genre id
    /// - [`CatalogError::Validation`] for an empty title
    async fn create_anime(&self, input: NewAnime) -> Result<AnimeDto, CatalogError>;

    async fn update_anime(&self, id: AnimeId, patch: AnimePatch) -> Result<AnimeDto, CatalogError>;

    /// Deletes an anime with its episodes, links, progress and favorites.
    async fn delete_anime(&self, id: AnimeId) -> Result<(), CatalogError>;

    /// Episodes of an anime ordered by episode number.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the anime does not exist.
    async fn episodes_of(&self, anime: AnimeId) -> Result<Vec<EpisodeDto>, CatalogError>;

    async fn create_episode(&self, input: NewEpisode) -> Result<EpisodeDto, CatalogError>;

    async fn get_episode(&self, id: EpisodeId) -> Result<EpisodeDto, CatalogError>;

    async fn update_episode(
        &self,
        id: EpisodeId,
        patch: EpisodePatch,
    ) -> Result<EpisodeDto, CatalogError>;

    async fn delete_episode(&self, id: EpisodeId) -> Result<(), CatalogError>;

    async fn create_studio(&self, input: NewStudio) -> Result<StudioDto, CatalogError>;
    async fn get_studio(&self, id: StudioId) -> Result<StudioDto, CatalogError>;
    async fn list_studios(&self, pagination: Pagination) -> Result<Vec<StudioDto>, CatalogError>;
    async fn delete_studio(&self, id: StudioId) -> Result<(), CatalogError>;

    async fn create_genre(&self, input: NewGenre) -> Result<GenreDto, CatalogError>;
    async fn get_genre(&self, id: GenreId) -> Result<GenreDto, CatalogError>;
    async fn list_genres(&self, pagination: Pagination) -> Result<Vec<GenreDto>, CatalogError>;
    async fn delete_genre(&self, id: GenreId) -> Result<(), CatalogError>;

    async fn create_character(&self, input: NewCharacter) -> Result<CharacterDto, CatalogError>;
    async fn get_character(&self, id: CharacterId) -> Result<CharacterDto, CatalogError>;
    async fn list_characters(
        &self,
        pagination: Pagination,
    ) -> Result<Vec<CharacterDto>, CatalogError>;
    async fn delete_character(&self, id: CharacterId) -> Result<(), CatalogError>;

    async fn create_voice_actor(&self, input: NewVoiceActor)
    -> Result<VoiceActorDto, CatalogError>;
    async fn get_voice_actor(&self, id: VoiceActorId) -> Result<VoiceActorDto, CatalogError>;
    async fn list_voice_actors(
        &self,
        pagination: Pagination,
    ) -> Result<Vec<VoiceActorDto>, CatalogError>;
    async fn delete_voice_actor(&self, id: VoiceActorId) -> Result<(), CatalogError>;
}
