pub mod anime;
pub mod catalog;
pub mod episode;
pub mod favorite;
pub mod links;
pub mod progress;
pub mod session;
pub mod user;
