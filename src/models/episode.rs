use chrono::NaiveDate;
use sea_orm::Set;
use serde::Deserialize;

use super::double_option;
use crate::entities::episodes;

#[derive(Debug, Clone, Deserialize)]
pub struct NewEpisode {
    pub anime_id: i32,
    pub episode_number: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub air_date: Option<NaiveDate>,
}

impl NewEpisode {
    #[must_use]
    pub fn into_active_model(self) -> episodes::ActiveModel {
        episodes::ActiveModel {
            anime_id: Set(self.anime_id),
            episode_number: Set(self.episode_number),
            title: Set(self.title),
            duration_minutes: Set(self.duration_minutes),
            air_date: Set(self.air_date),
            ..Default::default()
        }
    }
}

/// Partial update of an episode. The owning anime cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EpisodePatch {
    #[serde(default)]
    pub episode_number: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub duration_minutes: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub air_date: Option<Option<NaiveDate>>,
}

impl EpisodePatch {
    pub fn apply(&self, active: &mut episodes::ActiveModel) {
        if let Some(number) = self.episode_number {
            active.episode_number = Set(number);
        }
        if let Some(title) = &self.title {
            active.title = Set(title.clone());
        }
        if let Some(duration) = self.duration_minutes {
            active.duration_minutes = Set(duration);
        }
        if let Some(air_date) = self.air_date {
            active.air_date = Set(air_date);
        }
    }
}
