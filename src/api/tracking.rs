//! Per-user progress and favorites.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, FavoriteDto, ProgressDto};
use crate::domain::{AnimeId, FavoriteId, FavoriteTarget, UserId, WatchStatus};
use crate::models::double_option;
use crate::models::progress::ProgressPatch;
use crate::services::{FavoriteError, ProgressError};

#[derive(Debug, Deserialize)]
pub struct UpsertProgressRequest {
    pub user_id: i32,
    #[serde(default)]
    pub episodes_watched: Option<i32>,
    #[serde(default)]
    pub status: Option<WatchStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub score: Option<Option<i32>>,
}

impl UpsertProgressRequest {
    fn into_parts(self) -> (i32, ProgressPatch) {
        (
            self.user_id,
            ProgressPatch {
                episodes_watched: self.episodes_watched,
                status: self.status,
                score: self.score,
            },
        )
    }
}

/// Body of `POST /users/{id}/favorites`. Exactly one id must be present.
#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    #[serde(default)]
    pub anime_id: Option<i32>,
    #[serde(default)]
    pub character_id: Option<i32>,
}

impl TryFrom<AddFavoriteRequest> for FavoriteTarget {
    type Error = ApiError;

    fn try_from(req: AddFavoriteRequest) -> Result<Self, Self::Error> {
        FavoriteTarget::from_columns(req.anime_id, req.character_id).ok_or_else(|| {
            ApiError::unprocessable("Provide exactly one of anime_id or character_id")
        })
    }
}

impl From<ProgressError> for ApiError {
    fn from(err: ProgressError) -> Self {
        match err {
            ProgressError::NotFound(entity) => Self::missing(entity),
            ProgressError::Forbidden(_) => {
                Self::forbidden("Not allowed to access another user's progress")
            }
            ProgressError::Validation(msg) => Self::validation(msg),
            ProgressError::Database(msg) => Self::DatabaseError(msg),
            ProgressError::Internal(msg) => Self::internal(msg),
        }
    }
}

impl From<FavoriteError> for ApiError {
    fn from(err: FavoriteError) -> Self {
        match err {
            FavoriteError::NotFound(entity) => Self::missing(entity),
            FavoriteError::Forbidden(_) => {
                Self::forbidden("Not allowed to access another user's favorites")
            }
            FavoriteError::Database(msg) => Self::DatabaseError(msg),
            FavoriteError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Progress
// ============================================================================

/// GET /anime/{id}/progress/{user_id}
///
/// Creates the default row on first access.
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path((anime_id, user_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<ProgressDto>>, ApiError> {
    let anime_id = validate_id("anime", anime_id)?;
    let user_id = validate_id("user", user_id)?;

    let progress = state
        .progress_service()
        .get_or_create(user.id, UserId::new(user_id), AnimeId::new(anime_id))
        .await?;
    Ok(Json(ApiResponse::success(progress)))
}

/// POST /anime/{id}/progress
pub async fn upsert_progress(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(anime_id): Path<i32>,
    Json(payload): Json<UpsertProgressRequest>,
) -> Result<Json<ApiResponse<ProgressDto>>, ApiError> {
    let anime_id = validate_id("anime", anime_id)?;
    let (user_id, patch) = payload.into_parts();
    let user_id = validate_id("user", user_id)?;

    let progress = state
        .progress_service()
        .upsert(user.id, UserId::new(user_id), AnimeId::new(anime_id), patch)
        .await?;
    Ok(Json(ApiResponse::success(progress)))
}

/// GET /users/{id}/progress
pub async fn list_progress(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<ProgressDto>>>, ApiError> {
    let user_id = validate_id("user", user_id)?;

    let progress = state
        .progress_service()
        .list_for_user(user.id, UserId::new(user_id))
        .await?;
    Ok(Json(ApiResponse::success(progress)))
}

// ============================================================================
// Favorites
// ============================================================================

/// GET /users/{id}/favorites
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<FavoriteDto>>>, ApiError> {
    let user_id = validate_id("user", user_id)?;

    let favorites = state
        .favorite_service()
        .list_favorites(user.id, UserId::new(user_id))
        .await?;
    Ok(Json(ApiResponse::success(favorites)))
}

/// POST /users/{id}/favorites
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(user_id): Path<i32>,
    Json(payload): Json<AddFavoriteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FavoriteDto>>), ApiError> {
    let user_id = validate_id("user", user_id)?;
    let target = FavoriteTarget::try_from(payload)?;

    let favorite = state
        .favorite_service()
        .add_favorite(user.id, UserId::new(user_id), target)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(favorite))))
}

/// DELETE /users/{id}/favorites/{favorite_id}
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path((user_id, favorite_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let user_id = validate_id("user", user_id)?;
    let favorite_id = validate_id("favorite", favorite_id)?;

    state
        .favorite_service()
        .remove_favorite(user.id, UserId::new(user_id), FavoriteId::new(favorite_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CharacterId;

    #[test]
    fn favorite_request_needs_exactly_one_target() {
        let req: AddFavoriteRequest = serde_json::from_str(r#"{"character_id": 4}"#).unwrap();
        assert_eq!(
            FavoriteTarget::try_from(req).unwrap(),
            FavoriteTarget::Character(CharacterId::new(4))
        );

        for body in [r#"{}"#, r#"{"anime_id": 1, "character_id": 2}"#] {
            let req: AddFavoriteRequest = serde_json::from_str(body).unwrap();
            assert!(matches!(
                FavoriteTarget::try_from(req),
                Err(ApiError::Unprocessable(_))
            ));
        }
    }

    #[test]
    fn progress_request_keeps_explicit_null_score() {
        let req: UpsertProgressRequest =
            serde_json::from_str(r#"{"user_id": 3, "score": null}"#).unwrap();
        let (user_id, patch) = req.into_parts();
        assert_eq!(user_id, 3);
        assert_eq!(patch.score, Some(None));
        assert_eq!(patch.status, None);
    }
}
