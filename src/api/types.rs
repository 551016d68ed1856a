use chrono::NaiveDate;
use serde::Serialize;

use crate::db::User;
use crate::domain::WatchStatus;
use crate::entities::{
    anime, characters, episodes, genres, studios, user_anime_progress, user_favorites,
    voice_actors,
};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenDto {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: String,
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct StudioDto {
    pub id: i32,
    pub name: String,
    pub country: Option<String>,
    pub founded_year: Option<i32>,
}

impl From<studios::Model> for StudioDto {
    fn from(model: studios::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            country: model.country,
            founded_year: model.founded_year,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudioSummaryDto {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreDto {
    pub id: i32,
    pub name: String,
}

impl From<genres::Model> for GenreDto {
    fn from(model: genres::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnimeDto {
    pub id: i32,
    pub title: String,
    pub native_title: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub synopsis: Option<String>,
    pub episodes_total: Option<i32>,
    pub release_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub cover_url: Option<String>,
    pub studio_id: Option<i32>,
    pub studio: Option<StudioSummaryDto>,
    pub genres: Vec<GenreDto>,
}

impl AnimeDto {
    #[must_use]
    pub fn from_parts(
        model: &anime::Model,
        studio: Option<&studios::Model>,
        genres: Vec<genres::Model>,
    ) -> Self {
        Self {
            id: model.id,
            title: model.title.clone(),
            native_title: model.native_title.clone(),
            status: model.status.clone(),
            kind: model.kind.clone(),
            synopsis: model.synopsis.clone(),
            episodes_total: model.episodes_total,
            release_date: model.release_date,
            end_date: model.end_date,
            cover_url: model.cover_url.clone(),
            studio_id: model.studio_id,
            studio: studio.map(|s| StudioSummaryDto {
                id: s.id,
                name: s.name.clone(),
            }),
            genres: genres.into_iter().map(GenreDto::from).collect(),
        }
    }
}

/// Compact projection used where an anime is referenced, not shown.
#[derive(Debug, Clone, Serialize)]
pub struct AnimeSummaryDto {
    pub id: i32,
    pub title: String,
    pub cover_url: Option<String>,
    pub status: Option<String>,
}

impl From<anime::Model> for AnimeSummaryDto {
    fn from(model: anime::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            cover_url: model.cover_url,
            status: model.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EpisodeDto {
    pub id: i32,
    pub anime_id: i32,
    pub episode_number: i32,
    pub title: Option<String>,
    pub duration_minutes: Option<i32>,
    pub air_date: Option<NaiveDate>,
}

impl From<episodes::Model> for EpisodeDto {
    fn from(model: episodes::Model) -> Self {
        Self {
            id: model.id,
            anime_id: model.anime_id,
            episode_number: model.episode_number,
            title: model.title,
            duration_minutes: model.duration_minutes,
            air_date: model.air_date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl From<characters::Model> for CharacterDto {
    fn from(model: characters::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            image_url: model.image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterSummaryDto {
    pub id: i32,
    pub name: String,
    pub image_url: Option<String>,
}

impl From<characters::Model> for CharacterSummaryDto {
    fn from(model: characters::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            image_url: model.image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceActorDto {
    pub id: i32,
    pub name: String,
    pub nationality: Option<String>,
    pub birthdate: Option<NaiveDate>,
}

impl From<voice_actors::Model> for VoiceActorDto {
    fn from(model: voice_actors::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            nationality: model.nationality,
            birthdate: model.birthdate,
        }
    }
}

// ============================================================================
// Links
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AnimeGenreLinkDto {
    pub anime_id: i32,
    pub genre_id: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnimeCharacterLinkDto {
    pub anime_id: i32,
    pub character_id: i32,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterVoiceActorLinkDto {
    pub character_id: i32,
    pub voice_actor_id: i32,
    pub language: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkedCharacterDto {
    #[serde(flatten)]
    pub character: CharacterDto,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterAppearanceDto {
    pub anime: AnimeSummaryDto,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkedVoiceActorDto {
    #[serde(flatten)]
    pub voice_actor: VoiceActorDto,
    pub language: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoicedCharacterDto {
    #[serde(flatten)]
    pub character: CharacterDto,
    pub language: String,
}

// ============================================================================
// Tracking
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ProgressDto {
    pub id: i32,
    pub user_id: i32,
    pub anime_id: i32,
    pub episodes_watched: i32,
    pub status: WatchStatus,
    pub score: Option<i32>,
    pub last_updated: String,
}

impl TryFrom<user_anime_progress::Model> for ProgressDto {
    type Error = String;

    fn try_from(model: user_anime_progress::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            anime_id: model.anime_id,
            episodes_watched: model.episodes_watched,
            status: model.status.parse()?,
            score: model.score,
            last_updated: model.last_updated.to_rfc3339(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FavoriteTargetDto {
    Anime(AnimeSummaryDto),
    Character(CharacterSummaryDto),
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteDto {
    pub id: i32,
    pub user_id: i32,
    pub anime_id: Option<i32>,
    pub character_id: Option<i32>,
    pub created_at: String,
    pub target: FavoriteTargetDto,
}

impl FavoriteDto {
    #[must_use]
    pub fn new(row: &user_favorites::Model, target: FavoriteTargetDto) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            anime_id: row.anime_id,
            character_id: row.character_id,
            created_at: row.created_at.to_rfc3339(),
            target,
        }
    }
}

// ============================================================================
// System
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn favorite_target_is_tagged_by_kind() {
        let dto = FavoriteTargetDto::Character(CharacterSummaryDto {
            id: 2,
            name: "Holo".to_string(),
            image_url: None,
        });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["kind"], "character");
        assert_eq!(json["name"], "Holo");
    }

    #[test]
    fn linked_character_flattens_role() {
        let dto = LinkedCharacterDto {
            character: CharacterDto {
                id: 1,
                name: "Lawrence".to_string(),
                description: None,
                image_url: None,
            },
            role: "Main".to_string(),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["role"], "Main");
    }

    #[test]
    fn error_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::<()>::error("nope")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "nope");
        assert!(json.get("data").is_none());
    }
}
