//! `SeaORM` implementation of the `LinkService` trait.

use async_trait::async_trait;
use tracing::debug;

use crate::api::types::{
    AnimeCharacterLinkDto, AnimeGenreLinkDto, AnimeSummaryDto, CharacterAppearanceDto,
    CharacterDto, CharacterVoiceActorLinkDto, GenreDto, LinkedCharacterDto, LinkedVoiceActorDto,
    VoiceActorDto, VoicedCharacterDto,
};
use crate::db::Store;
use crate::domain::{AnimeId, CharacterId, EntityKind, GenreId, VoiceActorId};
use crate::services::link_service::{LinkError, LinkService};

pub struct SeaOrmLinkService {
    store: Store,
}

/// Trims a required edge attribute, rejecting blank values.
fn required_attr<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, LinkError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| LinkError::Validation(format!("{name} is required")))
}

impl SeaOrmLinkService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn ensure_anime(&self, id: AnimeId) -> Result<(), LinkError> {
        if !self.store.anime_exists(id.value()).await? {
            return Err(LinkError::not_found(EntityKind::Anime, id));
        }
        Ok(())
    }

    async fn ensure_genre(&self, id: GenreId) -> Result<(), LinkError> {
        if self.store.catalog_repo().get_genre(id.value()).await?.is_none() {
            return Err(LinkError::not_found(EntityKind::Genre, id));
        }
        Ok(())
    }

    async fn ensure_character(&self, id: CharacterId) -> Result<(), LinkError> {
        if self
            .store
            .catalog_repo()
            .get_character(id.value())
            .await?
            .is_none()
        {
            return Err(LinkError::not_found(EntityKind::Character, id));
        }
        Ok(())
    }

    async fn ensure_voice_actor(&self, id: VoiceActorId) -> Result<(), LinkError> {
        if self
            .store
            .catalog_repo()
            .get_voice_actor(id.value())
            .await?
            .is_none()
        {
            return Err(LinkError::not_found(EntityKind::VoiceActor, id));
        }
        Ok(())
    }
}

#[async_trait]
impl LinkService for SeaOrmLinkService {
    async fn link_genre(
        &self,
        anime: AnimeId,
        genre: GenreId,
    ) -> Result<AnimeGenreLinkDto, LinkError> {
        self.ensure_anime(anime).await?;
        self.ensure_genre(genre).await?;

        self.store
            .link_repo()
            .link_genre(anime.value(), genre.value())
            .await?;

        Ok(AnimeGenreLinkDto {
            anime_id: anime.value(),
            genre_id: genre.value(),
        })
    }

    async fn unlink_genre(&self, anime: AnimeId, genre: GenreId) -> Result<(), LinkError> {
        self.ensure_anime(anime).await?;
        self.ensure_genre(genre).await?;

        let removed = self
            .store
            .link_repo()
            .unlink_genre(anime.value(), genre.value())
            .await?;
        debug!(anime_id = %anime, genre_id = %genre, removed, "Unlinked genre");
        Ok(())
    }

    async fn genres_of(&self, anime: AnimeId) -> Result<Vec<GenreDto>, LinkError> {
        self.ensure_anime(anime).await?;

        let rows = self.store.link_repo().genres_of(anime.value()).await?;
        Ok(rows.into_iter().map(GenreDto::from).collect())
    }

    async fn link_character(
        &self,
        anime: AnimeId,
        character: CharacterId,
        role: Option<&str>,
    ) -> Result<AnimeCharacterLinkDto, LinkError> {
        self.ensure_anime(anime).await?;
        self.ensure_character(character).await?;
        let role = required_attr("role", role)?;

        let created = self
            .store
            .link_repo()
            .link_character(anime.value(), character.value(), role)
            .await?;

        if !created {
            return Err(LinkError::Conflict(format!(
                "Character {character} is already linked to anime {anime}"
            )));
        }

        Ok(AnimeCharacterLinkDto {
            anime_id: anime.value(),
            character_id: character.value(),
            role: role.to_string(),
        })
    }

    async fn unlink_character(
        &self,
        anime: AnimeId,
        character: CharacterId,
    ) -> Result<(), LinkError> {
        self.ensure_anime(anime).await?;
        self.ensure_character(character).await?;

        self.store
            .link_repo()
            .unlink_character(anime.value(), character.value())
            .await?;
        Ok(())
    }

    async fn characters_of(&self, anime: AnimeId) -> Result<Vec<LinkedCharacterDto>, LinkError> {
        self.ensure_anime(anime).await?;

        let rows = self.store.link_repo().characters_of(anime.value()).await?;
        Ok(rows
            .into_iter()
            .map(|(character, role)| LinkedCharacterDto {
                character: CharacterDto::from(character),
                role,
            })
            .collect())
    }

    async fn anime_of_character(
        &self,
        character: CharacterId,
    ) -> Result<Vec<CharacterAppearanceDto>, LinkError> {
        self.ensure_character(character).await?;

        let rows = self
            .store
            .link_repo()
            .anime_of_character(character.value())
            .await?;
        Ok(rows
            .into_iter()
            .map(|(anime, role)| CharacterAppearanceDto {
                anime: AnimeSummaryDto::from(anime),
                role,
            })
            .collect())
    }

    async fn link_voice_actor(
        &self,
        character: CharacterId,
        voice_actor: VoiceActorId,
        language: Option<&str>,
    ) -> Result<CharacterVoiceActorLinkDto, LinkError> {
        self.ensure_character(character).await?;
        self.ensure_voice_actor(voice_actor).await?;
        let language = required_attr("language", language)?;

        self.store
            .link_repo()
            .link_voice_actor(character.value(), voice_actor.value(), language)
            .await?;

        Ok(CharacterVoiceActorLinkDto {
            character_id: character.value(),
            voice_actor_id: voice_actor.value(),
            language: language.to_string(),
        })
    }

    async fn unlink_voice_actor(
        &self,
        character: CharacterId,
        voice_actor: VoiceActorId,
    ) -> Result<(), LinkError> {
        self.ensure_character(character).await?;
        self.ensure_voice_actor(voice_actor).await?;

        self.store
            .link_repo()
            .unlink_voice_actor(character.value(), voice_actor.value())
            .await?;
        Ok(())
    }

    async fn voice_actors_of(
        &self,
        character: CharacterId,
    ) -> Result<Vec<LinkedVoiceActorDto>, LinkError> {
        self.ensure_character(character).await?;

        let rows = self
            .store
            .link_repo()
            .voice_actors_of(character.value())
            .await?;
        Ok(rows
            .into_iter()
            .map(|(voice_actor, language)| LinkedVoiceActorDto {
                voice_actor: VoiceActorDto::from(voice_actor),
                language,
            })
            .collect())
    }

    async fn characters_of_voice_actor(
        &self,
        voice_actor: VoiceActorId,
    ) -> Result<Vec<VoicedCharacterDto>, LinkError> {
        self.ensure_voice_actor(voice_actor).await?;

        let rows = self
            .store
            .link_repo()
            .characters_of_voice_actor(voice_actor.value())
            .await?;
        Ok(rows
            .into_iter()
            .map(|(character, language)| VoicedCharacterDto {
                character: CharacterDto::from(character),
                language,
            })
            .collect())
    }
}
