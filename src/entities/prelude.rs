pub use super::anime::Entity as Anime;
pub use super::anime_characters::Entity as AnimeCharacters;
pub use super::anime_genres::Entity as AnimeGenres;
pub use super::character_voice_actors::Entity as CharacterVoiceActors;
pub use super::characters::Entity as Characters;
pub use super::episodes::Entity as Episodes;
pub use super::genres::Entity as Genres;
pub use super::studios::Entity as Studios;
pub use super::user_anime_progress::Entity as UserAnimeProgress;
pub use super::user_favorites::Entity as UserFavorites;
pub use super::user_sessions::Entity as UserSessions;
pub use super::users::Entity as Users;
pub use super::voice_actors::Entity as VoiceActors;
