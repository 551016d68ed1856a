//! Handlers for studios, genres, characters and voice actors.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{PageQuery, validate_id, validate_pagination};
use super::{ApiError, ApiResponse, AppState, CharacterDto, GenreDto, StudioDto, VoiceActorDto};
use crate::domain::{CharacterId, GenreId, StudioId, VoiceActorId};
use crate::models::catalog::{NewCharacter, NewGenre, NewStudio, NewVoiceActor};

type Created<T> = (StatusCode, Json<ApiResponse<T>>);

// ============================================================================
// Studios
// ============================================================================

pub async fn create_studio(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Json(payload): Json<NewStudio>,
) -> Result<Created<StudioDto>, ApiError> {
    let studio = state.catalog_service().create_studio(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(studio))))
}

pub async fn list_studios(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<StudioDto>>>, ApiError> {
    let pagination = validate_pagination(page.skip, page.limit, &state.config().catalog)?;
    let studios = state.catalog_service().list_studios(pagination).await?;
    Ok(Json(ApiResponse::success(studios)))
}

pub async fn get_studio(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<StudioDto>>, ApiError> {
    let id = validate_id("studio", id)?;
    let studio = state.catalog_service().get_studio(StudioId::new(id)).await?;
    Ok(Json(ApiResponse::success(studio)))
}

pub async fn delete_studio(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id("studio", id)?;
    state.catalog_service().delete_studio(StudioId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Genres
// ============================================================================

pub async fn create_genre(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Json(payload): Json<NewGenre>,
) -> Result<Created<GenreDto>, ApiError> {
    let genre = state.catalog_service().create_genre(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(genre))))
}

pub async fn list_genres(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<GenreDto>>>, ApiError> {
    let pagination = validate_pagination(page.skip, page.limit, &state.config().catalog)?;
    let genres = state.catalog_service().list_genres(pagination).await?;
    Ok(Json(ApiResponse::success(genres)))
}

pub async fn get_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<GenreDto>>, ApiError> {
    let id = validate_id("genre", id)?;
    let genre = state.catalog_service().get_genre(GenreId::new(id)).await?;
    Ok(Json(ApiResponse::success(genre)))
}

pub async fn delete_genre(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id("genre", id)?;
    state.catalog_service().delete_genre(GenreId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Characters
// ============================================================================

pub async fn create_character(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Json(payload): Json<NewCharacter>,
) -> Result<Created<CharacterDto>, ApiError> {
    let character = state.catalog_service().create_character(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(character))))
}

pub async fn list_characters(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<CharacterDto>>>, ApiError> {
    let pagination = validate_pagination(page.skip, page.limit, &state.config().catalog)?;
    let characters = state.catalog_service().list_characters(pagination).await?;
    Ok(Json(ApiResponse::success(characters)))
}

pub async fn get_character(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CharacterDto>>, ApiError> {
    let id = validate_id("character", id)?;
    let character = state
        .catalog_service()
        .get_character(CharacterId::new(id))
        .await?;
    Ok(Json(ApiResponse::success(character)))
}

pub async fn delete_character(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id("character", id)?;
    state
        .catalog_service()
        .delete_character(CharacterId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Voice actors
// ============================================================================

pub async fn create_voice_actor(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Json(payload): Json<NewVoiceActor>,
) -> Result<Created<VoiceActorDto>, ApiError> {
    let voice_actor = state.catalog_service().create_voice_actor(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(voice_actor))))
}

pub async fn list_voice_actors(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<VoiceActorDto>>>, ApiError> {
    let pagination = validate_pagination(page.skip, page.limit, &state.config().catalog)?;
    let voice_actors = state.catalog_service().list_voice_actors(pagination).await?;
    Ok(Json(ApiResponse::success(voice_actors)))
}

pub async fn get_voice_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<VoiceActorDto>>, ApiError> {
    let id = validate_id("voice actor", id)?;
    let voice_actor = state
        .catalog_service()
        .get_voice_actor(VoiceActorId::new(id))
        .await?;
    Ok(Json(ApiResponse::success(voice_actor)))
}

pub async fn delete_voice_actor(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id("voice actor", id)?;
    state
        .catalog_service()
        .delete_voice_actor(VoiceActorId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
