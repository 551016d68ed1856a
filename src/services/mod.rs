pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, Caller};
pub use auth_service_impl::SeaOrmAuthService;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService};
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod link_service;
pub mod link_service_impl;
pub use link_service::{LinkError, LinkService};
pub use link_service_impl::SeaOrmLinkService;

pub mod progress_service;
pub mod progress_service_impl;
pub use progress_service::{ProgressError, ProgressService};
pub use progress_service_impl::SeaOrmProgressService;

pub mod favorite_service;
pub mod favorite_service_impl;
pub use favorite_service::{FavoriteError, FavoriteService};
pub use favorite_service_impl::SeaOrmFavoriteService;
