pub mod prelude;

pub mod anime;
pub mod anime_characters;
pub mod anime_genres;
pub mod character_voice_actors;
pub mod characters;
pub mod episodes;
pub mod genres;
pub mod studios;
pub mod user_anime_progress;
pub mod user_favorites;
pub mod user_sessions;
pub mod users;
pub mod voice_actors;
