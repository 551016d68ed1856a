use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, EpisodeDto};
use crate::domain::{AnimeId, EpisodeId};
use crate::models::episode::{EpisodePatch, NewEpisode};

/// POST /episodes
pub async fn create_episode(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Json(payload): Json<NewEpisode>,
) -> Result<(StatusCode, Json<ApiResponse<EpisodeDto>>), ApiError> {
    validate_id("anime", payload.anime_id)?;
    let episode = state.catalog_service().create_episode(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(episode))))
}

/// GET /episodes/anime/{anime_id}
pub async fn list_for_anime(
    State(state): State<Arc<AppState>>,
    Path(anime_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<EpisodeDto>>>, ApiError> {
    let anime_id = validate_id("anime", anime_id)?;
    let episodes = state
        .catalog_service()
        .episodes_of(AnimeId::new(anime_id))
        .await?;
    Ok(Json(ApiResponse::success(episodes)))
}

/// GET /episodes/{id}
pub async fn get_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EpisodeDto>>, ApiError> {
    let id = validate_id("episode", id)?;
    let episode = state.catalog_service().get_episode(EpisodeId::new(id)).await?;
    Ok(Json(ApiResponse::success(episode)))
}

/// PUT /episodes/{id}
pub async fn update_episode(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<i32>,
    Json(patch): Json<EpisodePatch>,
) -> Result<Json<ApiResponse<EpisodeDto>>, ApiError> {
    let id = validate_id("episode", id)?;
    let episode = state
        .catalog_service()
        .update_episode(EpisodeId::new(id), patch)
        .await?;
    Ok(Json(ApiResponse::success(episode)))
}

/// DELETE /episodes/{id}
pub async fn delete_episode(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id("episode", id)?;
    state
        .catalog_service()
        .delete_episode(EpisodeId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
