//! Domain types for the catalog and per-user tracking with strong typing.
//!
//! Identifiers follow the Newtype pattern so a `CharacterId` can never be
//! passed where an `AnimeId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(&self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self::new(id)
            }
        }
    };
}

entity_id!(
    /// Identifier of a registered user.
    UserId
);
entity_id!(
    /// Identifier of an anime title in the catalog.
    AnimeId
);
entity_id!(CharacterId);
entity_id!(GenreId);
entity_id!(StudioId);
entity_id!(VoiceActorId);
entity_id!(EpisodeId);
entity_id!(FavoriteId);

/// Kinds of records that can be referenced (and therefore be missing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Studio,
    Anime,
    Episode,
    Genre,
    Character,
    VoiceActor,
    Favorite,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Studio => "Studio",
            Self::Anime => "Anime",
            Self::Episode => "Episode",
            Self::Genre => "Genre",
            Self::Character => "Character",
            Self::VoiceActor => "Voice actor",
            Self::Favorite => "Favorite",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to one record, used to name the missing endpoint in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: i32,
}

impl EntityRef {
    #[must_use]
    pub fn new(kind: EntityKind, id: impl Into<i32>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Watch state of a (user, anime) pair.
///
/// This is a label, not a workflow: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WatchStatus {
    Watching,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
    Dropped,
    #[default]
    #[serde(rename = "Plan to Watch")]
    PlanToWatch,
}

impl WatchStatus {
    pub const ALL: [Self; 5] = [
        Self::Watching,
        Self::Completed,
        Self::OnHold,
        Self::Dropped,
        Self::PlanToWatch,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Watching => "Watching",
            Self::Completed => "Completed",
            Self::OnHold => "On Hold",
            Self::Dropped => "Dropped",
            Self::PlanToWatch => "Plan to Watch",
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown watch status: {s}"))
    }
}

/// What a favorite points at. Exactly one case is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FavoriteTarget {
    Anime(AnimeId),
    Character(CharacterId),
}

impl FavoriteTarget {
    /// Builds a target from the two nullable storage columns.
    ///
    /// Returns `None` when both or neither are set.
    #[must_use]
    pub fn from_columns(anime_id: Option<i32>, character_id: Option<i32>) -> Option<Self> {
        match (anime_id, character_id) {
            (Some(id), None) => Some(Self::Anime(AnimeId::new(id))),
            (None, Some(id)) => Some(Self::Character(CharacterId::new(id))),
            _ => None,
        }
    }

    /// Splits the target back into `(anime_id, character_id)` columns.
    #[must_use]
    pub const fn to_columns(&self) -> (Option<i32>, Option<i32>) {
        match self {
            Self::Anime(id) => (Some(id.value()), None),
            Self::Character(id) => (None, Some(id.value())),
        }
    }

    #[must_use]
    pub fn entity_ref(&self) -> EntityRef {
        match self {
            Self::Anime(id) => EntityRef::new(EntityKind::Anime, *id),
            Self::Character(id) => EntityRef::new(EntityKind::Character, *id),
        }
    }
}

/// Offset/limit window over a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u64,
    pub limit: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anime_id_conversions() {
        let id = AnimeId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(i32::from(id), 42);
        assert_eq!(AnimeId::from(42), id);
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&UserId::new(7)).unwrap();
        assert_eq!(json, "7");
        let id: CharacterId = serde_json::from_str("3").unwrap();
        assert_eq!(id, CharacterId::new(3));
    }

    #[test]
    fn watch_status_labels() {
        assert_eq!(WatchStatus::default(), WatchStatus::PlanToWatch);
        assert_eq!(
            serde_json::to_string(&WatchStatus::OnHold).unwrap(),
            "\"On Hold\""
        );
        for status in WatchStatus::ALL {
            assert_eq!(status.as_str().parse::<WatchStatus>().unwrap(), status);
        }
        assert!("plan to watch".parse::<WatchStatus>().is_err());
    }

    #[test]
    fn favorite_target_requires_exactly_one_column() {
        assert_eq!(
            FavoriteTarget::from_columns(Some(5), None),
            Some(FavoriteTarget::Anime(AnimeId::new(5)))
        );
        assert_eq!(
            FavoriteTarget::from_columns(None, Some(2)),
            Some(FavoriteTarget::Character(CharacterId::new(2)))
        );
        assert_eq!(FavoriteTarget::from_columns(Some(1), Some(2)), None);
        assert_eq!(FavoriteTarget::from_columns(None, None), None);
        assert_eq!(
            FavoriteTarget::Character(CharacterId::new(9)).to_columns(),
            (None, Some(9))
        );
    }

    #[test]
    fn entity_ref_display() {
        let r = EntityRef::new(EntityKind::VoiceActor, 12);
        assert_eq!(r.to_string(), "Voice actor 12");
    }
}
