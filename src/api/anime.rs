use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{non_blank, validate_id, validate_pagination};
use super::{AnimeDto, ApiError, ApiResponse, AppState, EpisodeDto};
use crate::domain::AnimeId;
use crate::models::anime::{AnimeFilters, AnimePatch, NewAnime};
use crate::services::CatalogError;

#[derive(Debug, Default, Deserialize)]
pub struct AnimeListQuery {
    pub search: Option<String>,
    pub genre_name: Option<String>,
    pub status: Option<String>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(entity) => Self::missing(entity),
            CatalogError::Conflict(msg) => Self::Conflict(msg),
            CatalogError::Validation(msg) => Self::validation(msg),
            CatalogError::Database(msg) => Self::DatabaseError(msg),
            CatalogError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// GET /anime?search=&genre_name=&status=&skip=&limit=
pub async fn list_anime(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnimeListQuery>,
) -> Result<Json<ApiResponse<Vec<AnimeDto>>>, ApiError> {
    let pagination = validate_pagination(query.skip, query.limit, &state.config().catalog)?;
    let filters = AnimeFilters {
        search: non_blank(query.search),
        genre_name: non_blank(query.genre_name),
        status: non_blank(query.status),
    };

    let anime = state.catalog_service().search(&filters, pagination).await?;
    Ok(Json(ApiResponse::success(anime)))
}

/// POST /anime
pub async fn create_anime(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Json(payload): Json<NewAnime>,
) -> Result<(StatusCode, Json<ApiResponse<AnimeDto>>), ApiError> {
    let anime = state.catalog_service().create_anime(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(anime))))
}

/// GET /anime/{id}
pub async fn get_anime(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<AnimeDto>>, ApiError> {
    let id = validate_id("anime", id)?;
    let anime = state.catalog_service().get_anime(AnimeId::new(id)).await?;
    Ok(Json(ApiResponse::success(anime)))
}

/// PUT /anime/{id}
pub async fn update_anime(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<i32>,
    Json(patch): Json<AnimePatch>,
) -> Result<Json<ApiResponse<AnimeDto>>, ApiError> {
    let id = validate_id("anime", id)?;
    let anime = state
        .catalog_service()
        .update_anime(AnimeId::new(id), patch)
        .await?;
    Ok(Json(ApiResponse::success(anime)))
}

/// DELETE /anime/{id}
pub async fn delete_anime(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id("anime", id)?;
    state.catalog_service().delete_anime(AnimeId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /anime/{id}/episodes
pub async fn list_episodes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<EpisodeDto>>>, ApiError> {
    let id = validate_id("anime", id)?;
    let episodes = state.catalog_service().episodes_of(AnimeId::new(id)).await?;
    Ok(Json(ApiResponse::success(episodes)))
}
