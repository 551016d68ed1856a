use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_id;
use super::{
    AnimeCharacterLinkDto, AnimeGenreLinkDto, ApiError, ApiResponse, AppState,
    CharacterAppearanceDto, CharacterVoiceActorLinkDto, GenreDto, LinkedCharacterDto,
    LinkedVoiceActorDto, VoicedCharacterDto,
};
use crate::domain::{AnimeId, CharacterId, GenreId, VoiceActorId};
use crate::services::LinkError;

#[derive(Debug, Default, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LanguageQuery {
    pub language: Option<String>,
}

impl From<LinkError> for ApiError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::NotFound(entity) => Self::missing(entity),
            LinkError::Conflict(msg) => Self::Conflict(msg),
            LinkError::Validation(msg) => Self::validation(msg),
            LinkError::Database(msg) => Self::DatabaseError(msg),
            LinkError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Anime <-> Genre
// ============================================================================

/// GET /anime/{id}/genres
pub async fn list_anime_genres(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<GenreDto>>>, ApiError> {
    let id = validate_id("anime", id)?;
    let genres = state.link_service().genres_of(AnimeId::new(id)).await?;
    Ok(Json(ApiResponse::success(genres)))
}

/// POST /anime/{id}/genres/{genre_id}
pub async fn link_genre(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path((id, genre_id)): Path<(i32, i32)>,
) -> Result<(StatusCode, Json<ApiResponse<AnimeGenreLinkDto>>), ApiError> {
    let id = validate_id("anime", id)?;
    let genre_id = validate_id("genre", genre_id)?;

    let link = state
        .link_service()
        .link_genre(AnimeId::new(id), GenreId::new(genre_id))
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(link))))
}

/// DELETE /anime/{id}/genres/{genre_id}
pub async fn unlink_genre(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path((id, genre_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id("anime", id)?;
    let genre_id = validate_id("genre", genre_id)?;

    state
        .link_service()
        .unlink_genre(AnimeId::new(id), GenreId::new(genre_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Anime <-> Character
// ============================================================================

/// GET /anime/{id}/characters
pub async fn list_anime_characters(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<LinkedCharacterDto>>>, ApiError> {
    let id = validate_id("anime", id)?;
    let characters = state.link_service().characters_of(AnimeId::new(id)).await?;
    Ok(Json(ApiResponse::success(characters)))
}

/// POST /anime/{id}/characters/{character_id}?role=
pub async fn link_character(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path((id, character_id)): Path<(i32, i32)>,
    Query(query): Query<RoleQuery>,
) -> Result<(StatusCode, Json<ApiResponse<AnimeCharacterLinkDto>>), ApiError> {
    let id = validate_id("anime", id)?;
    let character_id = validate_id("character", character_id)?;

    let link = state
        .link_service()
        .link_character(
            AnimeId::new(id),
            CharacterId::new(character_id),
            query.role.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(link))))
}

/// DELETE /anime/{id}/characters/{character_id}
pub async fn unlink_character(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path((id, character_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id("anime", id)?;
    let character_id = validate_id("character", character_id)?;

    state
        .link_service()
        .unlink_character(AnimeId::new(id), CharacterId::new(character_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /characters/{id}/anime
pub async fn list_character_anime(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<CharacterAppearanceDto>>>, ApiError> {
    let id = validate_id("character", id)?;
    let anime = state
        .link_service()
        .anime_of_character(CharacterId::new(id))
        .await?;
    Ok(Json(ApiResponse::success(anime)))
}

// ============================================================================
// Character <-> Voice actor
// ============================================================================

/// GET /characters/{id}/voice-actors
pub async fn list_character_voice_actors(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<LinkedVoiceActorDto>>>, ApiError> {
    let id = validate_id("character", id)?;
    let voice_actors = state
        .link_service()
        .voice_actors_of(CharacterId::new(id))
        .await?;
    Ok(Json(ApiResponse::success(voice_actors)))
}

/// POST /characters/{id}/voice-actors/{voice_actor_id}?language=
pub async fn link_voice_actor(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path((id, voice_actor_id)): Path<(i32, i32)>,
    Query(query): Query<LanguageQuery>,
) -> Result<(StatusCode, Json<ApiResponse<CharacterVoiceActorLinkDto>>), ApiError> {
    let id = validate_id("character", id)?;
    let voice_actor_id = validate_id("voice actor", voice_actor_id)?;

    let link = state
        .link_service()
        .link_voice_actor(
            CharacterId::new(id),
            VoiceActorId::new(voice_actor_id),
            query.language.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(link))))
}

/// DELETE /characters/{id}/voice-actors/{voice_actor_id}
pub async fn unlink_voice_actor(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path((id, voice_actor_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id("character", id)?;
    let voice_actor_id = validate_id("voice actor", voice_actor_id)?;

    state
        .link_service()
        .unlink_voice_actor(CharacterId::new(id), VoiceActorId::new(voice_actor_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /voice-actors/{id}/characters
pub async fn list_voice_actor_characters(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<VoicedCharacterDto>>>, ApiError> {
    let id = validate_id("voice actor", id)?;
    let characters = state
        .link_service()
        .characters_of_voice_actor(VoiceActorId::new(id))
        .await?;
    Ok(Json(ApiResponse::success(characters)))
}
