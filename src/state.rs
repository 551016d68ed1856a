use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CatalogService, FavoriteService, LinkService, ProgressService,
    SeaOrmAuthService, SeaOrmCatalogService, SeaOrmFavoriteService, SeaOrmLinkService,
    SeaOrmProgressService,
};

/// Long-lived state shared by every request: configuration, the database
/// store and the domain services built on top of it.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub catalog_service: Arc<dyn CatalogService>,

    pub link_service: Arc<dyn LinkService>,

    pub progress_service: Arc<dyn ProgressService>,

    pub favorite_service: Arc<dyn FavoriteService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires the services around an already connected store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;
        let catalog_service =
            Arc::new(SeaOrmCatalogService::new(store.clone())) as Arc<dyn CatalogService>;
        let link_service = Arc::new(SeaOrmLinkService::new(store.clone())) as Arc<dyn LinkService>;
        let progress_service =
            Arc::new(SeaOrmProgressService::new(store.clone())) as Arc<dyn ProgressService>;
        let favorite_service =
            Arc::new(SeaOrmFavoriteService::new(store.clone())) as Arc<dyn FavoriteService>;

        Self {
            config: Arc::new(config),
            store,
            auth_service,
            catalog_service,
            link_service,
            progress_service,
            favorite_service,
        }
    }
}
