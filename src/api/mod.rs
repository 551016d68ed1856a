use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

mod anime;
pub mod auth;
mod catalog;
mod episodes;
mod error;
mod links;
mod observability;
mod tracking;
pub mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use crate::services::{AuthService, CatalogService, FavoriteService, LinkService, ProgressService};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn catalog_service(&self) -> &Arc<dyn CatalogService> {
        &self.shared.catalog_service
    }

    #[must_use]
    pub fn link_service(&self) -> &Arc<dyn LinkService> {
        &self.shared.link_service
    }

    #[must_use]
    pub fn progress_service(&self) -> &Arc<dyn ProgressService> {
        &self.shared.progress_service
    }

    #[must_use]
    pub fn favorite_service(&self) -> &Arc<dyn FavoriteService> {
        &self.shared.favorite_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(auth_routes())
        .merge(catalog_routes())
        .merge(link_routes())
        .merge(tracking_routes())
        .route("/health", get(observability::health))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/users/me", get(auth::me))
        .route("/users/{id}", get(auth::get_user))
}

fn catalog_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/anime", get(anime::list_anime).post(anime::create_anime))
        .route(
            "/anime/{id}",
            get(anime::get_anime)
                .put(anime::update_anime)
                .delete(anime::delete_anime),
        )
        .route("/anime/{id}/episodes", get(anime::list_episodes))
        .route("/episodes", post(episodes::create_episode))
        .route("/episodes/anime/{anime_id}", get(episodes::list_for_anime))
        .route(
            "/episodes/{id}",
            get(episodes::get_episode)
                .put(episodes::update_episode)
                .delete(episodes::delete_episode),
        )
        .route(
            "/studios",
            get(catalog::list_studios).post(catalog::create_studio),
        )
        .route(
            "/studios/{id}",
            get(catalog::get_studio).delete(catalog::delete_studio),
        )
        .route("/genres", get(catalog::list_genres).post(catalog::create_genre))
        .route(
            "/genres/{id}",
            get(catalog::get_genre).delete(catalog::delete_genre),
        )
        .route(
            "/characters",
            get(catalog::list_characters).post(catalog::create_character),
        )
        .route(
            "/characters/{id}",
            get(catalog::get_character).delete(catalog::delete_character),
        )
        .route(
            "/voice-actors",
            get(catalog::list_voice_actors).post(catalog::create_voice_actor),
        )
        .route(
            "/voice-actors/{id}",
            get(catalog::get_voice_actor).delete(catalog::delete_voice_actor),
        )
}

fn link_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/anime/{id}/genres", get(links::list_anime_genres))
        .route(
            "/anime/{id}/genres/{genre_id}",
            post(links::link_genre).delete(links::unlink_genre),
        )
        .route("/anime/{id}/characters", get(links::list_anime_characters))
        .route(
            "/anime/{id}/characters/{character_id}",
            post(links::link_character).delete(links::unlink_character),
        )
        .route("/characters/{id}/anime", get(links::list_character_anime))
        .route(
            "/characters/{id}/voice-actors",
            get(links::list_character_voice_actors),
        )
        .route(
            "/characters/{id}/voice-actors/{voice_actor_id}",
            post(links::link_voice_actor).delete(links::unlink_voice_actor),
        )
        .route(
            "/voice-actors/{id}/characters",
            get(links::list_voice_actor_characters),
        )
}

fn tracking_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/anime/{id}/progress", post(tracking::upsert_progress))
        .route(
            "/anime/{id}/progress/{user_id}",
            get(tracking::get_progress),
        )
        .route("/users/{id}/progress", get(tracking::list_progress))
        .route(
            "/users/{id}/favorites",
            get(tracking::list_favorites).post(tracking::add_favorite),
        )
        .route(
            "/users/{id}/favorites/{favorite_id}",
            delete(tracking::remove_favorite),
        )
}
