//! Association manager for the catalog's many-to-many relations.
//!
//! Both endpoints of a link must exist; the left endpoint is checked first so
//! the error names the first missing record.

use thiserror::Error;

use crate::api::types::{
    AnimeGenreLinkDto, AnimeCharacterLinkDto, CharacterAppearanceDto,
    CharacterVoiceActorLinkDto, GenreDto, LinkedCharacterDto, LinkedVoiceActorDto,
    VoicedCharacterDto,
};
use crate::domain::{AnimeId, CharacterId, EntityKind, EntityRef, GenreId, VoiceActorId};

#[derive(Debug, Error)]
pub enum LinkError {
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

impl LinkError {
    pub fn not_found(kind: EntityKind, id: impl Into<i32>) -> Self {
        Self::NotFound(EntityRef::new(kind, id))
    }
}

impl From<sea_orm::DbErr> for LinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for LinkError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait LinkService: Send + Sync {
    /// Links a genre to an anime. Linking an existing pair is a no-op.
    async fn link_genre(&self, anime: AnimeId, genre: GenreId)
    -> Result<AnimeGenreLinkDto, LinkError>;

    /// Removes a genre link. Removing a missing link succeeds.
    async fn unlink_genre(&self, anime: AnimeId, genre: GenreId) -> Result<(), LinkError>;

    async fn genres_of(&self, anime: AnimeId) -> Result<Vec<GenreDto>, LinkError>;

    /// Links a character to an anime with a role.
    ///
    /// # Errors
    ///
    /// - [`LinkError::Validation`] when `role` is missing or blank
    /// - [`LinkError::Conflict`] when the pair is already linked
    async fn link_character(
        &self,
        anime: AnimeId,
        character: CharacterId,
        role: Option<&str>,
    ) -> Result<AnimeCharacterLinkDto, LinkError>;

    async fn unlink_character(&self, anime: AnimeId, character: CharacterId)
    -> Result<(), LinkError>;

    async fn characters_of(&self, anime: AnimeId) -> Result<Vec<LinkedCharacterDto>, LinkError>;

    async fn anime_of_character(
        &self,
        character: CharacterId,
    ) -> Result<Vec<CharacterAppearanceDto>, LinkError>;

    /// Links a voice actor to a character for a language. Re-linking the
    /// same pair replaces the language.
    async fn link_voice_actor(
        &self,
        character: CharacterId,
        voice_actor: VoiceActorId,
        language: Option<&str>,
    ) -> Result<CharacterVoiceActorLinkDto, LinkError>;

    async fn unlink_voice_actor(
        &self,
        character: CharacterId,
        voice_actor: VoiceActorId,
    ) -> Result<(), LinkError>;

    async fn voice_actors_of(
        &self,
        character: CharacterId,
    ) -> Result<Vec<LinkedVoiceActorDto>, LinkError>;

    async fn characters_of_voice_actor(
        &self,
        voice_actor: VoiceActorId,
    ) -> Result<Vec<VoicedCharacterDto>, LinkError>;
}
