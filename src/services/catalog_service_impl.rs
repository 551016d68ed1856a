//! `SeaORM` implementation of the `CatalogService` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::info;

use crate::api::types::{
    AnimeDto, CharacterDto, EpisodeDto, GenreDto, StudioDto, VoiceActorDto,
};
use crate::db::Store;
use crate::domain::{
    AnimeId, CharacterId, EntityKind, EpisodeId, GenreId, Pagination, StudioId, VoiceActorId,
};
use crate::entities::anime;
use crate::models::anime::{AnimeFilters, AnimePatch, NewAnime};
use crate::models::catalog::{NewCharacter, NewGenre, NewStudio, NewVoiceActor};
use crate::models::episode::{EpisodePatch, NewEpisode};
use crate::services::catalog_service::{CatalogError, CatalogService};

pub struct SeaOrmCatalogService {
    store: Store,
}

fn require_text(field: &str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: Option<i32>) -> Result<(), CatalogError> {
    match value {
        Some(v) if v < 0 => Err(CatalogError::Validation(format!(
            "{field} must not be negative (got {v})"
        ))),
        _ => Ok(()),
    }
}

fn require_episode_number(number: i32) -> Result<(), CatalogError> {
    if number <= 0 {
        return Err(CatalogError::Validation(format!(
            "Invalid episode number: {number}. Episode must be a positive integer"
        )));
    }
    Ok(())
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Builds DTOs for a page of anime with two batched lookups.
    async fn to_dtos(&self, models: Vec<anime::Model>) -> Result<Vec<AnimeDto>, CatalogError> {
        let anime_ids: Vec<i32> = models.iter().map(|a| a.id).collect();
        let studio_ids: Vec<i32> = models.iter().filter_map(|a| a.studio_id).collect();

        let studios: HashMap<i32, _> = self
            .store
            .catalog_repo()
            .get_studios_by_ids(&studio_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        let mut genres = self
            .store
            .link_repo()
            .genres_for_anime_ids(&anime_ids)
            .await?;

        Ok(models
            .into_iter()
            .map(|model| {
                let studio = model.studio_id.and_then(|id| studios.get(&id));
                let anime_genres = genres.remove(&model.id).unwrap_or_default();
                AnimeDto::from_parts(&model, studio, anime_genres)
            })
            .collect())
    }

    async fn to_dto(&self, model: anime::Model) -> Result<AnimeDto, CatalogError> {
        let studio = match model.studio_id {
            Some(id) => self.store.catalog_repo().get_studio(id).await?,
            None => None,
        };
        let genres = self.store.link_repo().genres_of(model.id).await?;

        Ok(AnimeDto::from_parts(&model, studio.as_ref(), genres))
    }

    async fn ensure_studio(&self, studio_id: Option<i32>) -> Result<(), CatalogError> {
        if let Some(id) = studio_id
            && self.store.catalog_repo().get_studio(id).await?.is_none()
        {
            return Err(CatalogError::not_found(EntityKind::Studio, id));
        }
        Ok(())
    }

    /// Reports the first genre id that does not exist.
    async fn ensure_genres(&self, genre_ids: &[i32]) -> Result<(), CatalogError> {
        let found = self
            .store
            .catalog_repo()
            .get_genres_by_ids(genre_ids)
            .await?;

        if let Some(missing) = genre_ids
            .iter()
            .find(|id| !found.iter().any(|g| g.id == **id))
        {
            return Err(CatalogError::not_found(EntityKind::Genre, *missing));
        }
        Ok(())
    }

    async fn ensure_anime(&self, id: i32) -> Result<(), CatalogError> {
        if !self.store.anime_exists(id).await? {
            return Err(CatalogError::not_found(EntityKind::Anime, id));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn search(
        &self,
        filters: &AnimeFilters,
        pagination: Pagination,
    ) -> Result<Vec<AnimeDto>, CatalogError> {
        let rows = self.store.anime_repo().search(filters, pagination).await?;
        self.to_dtos(rows).await
    }

    async fn get_anime(&self, id: AnimeId) -> Result<AnimeDto, CatalogError> {
        let model = self
            .store
            .anime_repo()
            .get(id.value())
            .await?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Anime, id))?;

        self.to_dto(model).await
    }

    async fn create_anime(&self, input: NewAnime) -> Result<AnimeDto, CatalogError> {
        require_text("title", &input.title)?;
        require_non_negative("episodes_total", input.episodes_total)?;
        self.ensure_studio(input.studio_id).await?;
        self.ensure_genres(&input.genres).await?;

        let model = self.store.anime_repo().create(input).await?;
        self.to_dto(model).await
    }

    async fn update_anime(&self, id: AnimeId, patch: AnimePatch) -> Result<AnimeDto, CatalogError> {
        if let Some(title) = &patch.title {
            require_text("title", title)?;
        }
        require_non_negative("episodes_total", patch.episodes_total.flatten())?;
        self.ensure_studio(patch.studio_id.flatten()).await?;
        if let Some(genre_ids) = &patch.genres {
            self.ensure_genres(genre_ids).await?;
        }

        let model = self
            .store
            .anime_repo()
            .update(id.value(), &patch)
            .await?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Anime, id))?;

        info!(anime_id = %id, fields = ?patch.supplied_fields(), "Updated anime");
        self.to_dto(model).await
    }

    async fn delete_anime(&self, id: AnimeId) -> Result<(), CatalogError> {
        if !self.store.anime_repo().delete(id.value()).await? {
            return Err(CatalogError::not_found(EntityKind::Anime, id));
        }
        Ok(())
    }

    async fn episodes_of(&self, anime: AnimeId) -> Result<Vec<EpisodeDto>, CatalogError> {
        self.ensure_anime(anime.value()).await?;

        let rows = self
            .store
            .episode_repo()
            .list_for_anime(anime.value())
            .await?;
        Ok(rows.into_iter().map(EpisodeDto::from).collect())
    }

    async fn create_episode(&self, input: NewEpisode) -> Result<EpisodeDto, CatalogError> {
        require_episode_number(input.episode_number)?;
        require_non_negative("duration_minutes", input.duration_minutes)?;
        self.ensure_anime(input.anime_id).await?;

        let episodes = self.store.episode_repo();
        if episodes
            .number_taken(input.anime_id, input.episode_number, None)
            .await?
        {
            return Err(CatalogError::Conflict(format!(
                "Anime {} already has episode {}",
                input.anime_id, input.episode_number
            )));
        }

        Ok(EpisodeDto::from(episodes.create(input).await?))
    }

    async fn get_episode(&self, id: EpisodeId) -> Result<EpisodeDto, CatalogError> {
        self.store
            .episode_repo()
            .get(id.value())
            .await?
            .map(EpisodeDto::from)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Episode, id))
    }

    async fn update_episode(
        &self,
        id: EpisodeId,
        patch: EpisodePatch,
    ) -> Result<EpisodeDto, CatalogError> {
        let episodes = self.store.episode_repo();
        let existing = episodes
            .get(id.value())
            .await?
            .ok_or_else(|| CatalogError::not_found(EntityKind::Episode, id))?;

        if let Some(number) = patch.episode_number {
            require_episode_number(number)?;
            if episodes
                .number_taken(existing.anime_id, number, Some(existing.id))
                .await?
            {
                return Err(CatalogError::Conflict(format!(
                    "Anime {} already has episode {number}",
                    existing.anime_id
                )));
            }
        }
        require_non_negative("duration_minutes", patch.duration_minutes.flatten())?;

        episodes
            .update(id.value(), &patch)
            .await?
            .map(EpisodeDto::from)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Episode, id))
    }

    async fn delete_episode(&self, id: EpisodeId) -> Result<(), CatalogError> {
        if !self.store.episode_repo().delete(id.value()).await? {
            return Err(CatalogError::not_found(EntityKind::Episode, id));
        }
        Ok(())
    }

    async fn create_studio(&self, input: NewStudio) -> Result<StudioDto, CatalogError> {
        require_text("name", &input.name)?;
        let repo = self.store.catalog_repo();
        if repo.find_studio_by_name(&input.name).await?.is_some() {
            return Err(CatalogError::Conflict(format!(
                "Studio '{}' already exists",
                input.name
            )));
        }

        Ok(StudioDto::from(repo.create_studio(input).await?))
    }

    async fn get_studio(&self, id: StudioId) -> Result<StudioDto, CatalogError> {
        self.store
            .catalog_repo()
            .get_studio(id.value())
            .await?
            .map(StudioDto::from)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Studio, id))
    }

    async fn list_studios(&self, pagination: Pagination) -> Result<Vec<StudioDto>, CatalogError> {
        let rows = self.store.catalog_repo().list_studios(pagination).await?;
        Ok(rows.into_iter().map(StudioDto::from).collect())
    }

    async fn delete_studio(&self, id: StudioId) -> Result<(), CatalogError> {
        if !self.store.catalog_repo().delete_studio(id.value()).await? {
            return Err(CatalogError::not_found(EntityKind::Studio, id));
        }
        Ok(())
    }

    async fn create_genre(&self, input: NewGenre) -> Result<GenreDto, CatalogError> {
        require_text("name", &input.name)?;
        let repo = self.store.catalog_repo();
        if repo.find_genre_by_name(&input.name).await?.is_some() {
            return Err(CatalogError::Conflict(format!(
                "Genre '{}' already exists",
                input.name
            )));
        }

        Ok(GenreDto::from(repo.create_genre(input).await?))
    }

    async fn get_genre(&self, id: GenreId) -> Result<GenreDto, CatalogError> {
        self.store
            .catalog_repo()
            .get_genre(id.value())
            .await?
            .map(GenreDto::from)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Genre, id))
    }

    async fn list_genres(&self, pagination: Pagination) -> Result<Vec<GenreDto>, CatalogError> {
        let rows = self.store.catalog_repo().list_genres(pagination).await?;
        Ok(rows.into_iter().map(GenreDto::from).collect())
    }

    async fn delete_genre(&self, id: GenreId) -> Result<(), CatalogError> {
        if !self.store.catalog_repo().delete_genre(id.value()).await? {
            return Err(CatalogError::not_found(EntityKind::Genre, id));
        }
        Ok(())
    }

    async fn create_character(&self, input: NewCharacter) -> Result<CharacterDto, CatalogError> {
        require_text("name", &input.name)?;
        let model = self.store.catalog_repo().create_character(input).await?;
        Ok(CharacterDto::from(model))
    }

    async fn get_character(&self, id: CharacterId) -> Result<CharacterDto, CatalogError> {
        self.store
            .catalog_repo()
            .get_character(id.value())
            .await?
            .map(CharacterDto::from)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Character, id))
    }

    async fn list_characters(
        &self,
        pagination: Pagination,
    ) -> Result<Vec<CharacterDto>, CatalogError> {
        let rows = self.store.catalog_repo().list_characters(pagination).await?;
        Ok(rows.into_iter().map(CharacterDto::from).collect())
    }

    async fn delete_character(&self, id: CharacterId) -> Result<(), CatalogError> {
        if !self.store.catalog_repo().delete_character(id.value()).await? {
            return Err(CatalogError::not_found(EntityKind::Character, id));
        }
        Ok(())
    }

    async fn create_voice_actor(
        &self,
        input: NewVoiceActor,
    ) -> Result<VoiceActorDto, CatalogError> {
        require_text("name", &input.name)?;
        let model = self.store.catalog_repo().create_voice_actor(input).await?;
        Ok(VoiceActorDto::from(model))
    }

    async fn get_voice_actor(&self, id: VoiceActorId) -> Result<VoiceActorDto, CatalogError> {
        self.store
            .catalog_repo()
            .get_voice_actor(id.value())
            .await?
            .map(VoiceActorDto::from)
            .ok_or_else(|| CatalogError::not_found(EntityKind::VoiceActor, id))
    }

    async fn list_voice_actors(
        &self,
        pagination: Pagination,
    ) -> Result<Vec<VoiceActorDto>, CatalogError> {
        let rows = self
            .store
            .catalog_repo()
            .list_voice_actors(pagination)
            .await?;
        Ok(rows.into_iter().map(VoiceActorDto::from).collect())
    }

    async fn delete_voice_actor(&self, id: VoiceActorId) -> Result<(), CatalogError> {
        if !self
            .store
            .catalog_repo()
            .delete_voice_actor(id.value())
            .await?
        {
            return Err(CatalogError::not_found(EntityKind::VoiceActor, id));
        }
        Ok(())
    }
}
