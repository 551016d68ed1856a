use chrono::NaiveDate;
use sea_orm::Set;
use serde::Deserialize;

use super::double_option;
use crate::entities::anime;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAnime {
    pub title: String,
    #[serde(default, alias = "japanese_title")]
    pub native_title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub episodes_total: Option<i32>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub studio_id: Option<i32>,
    /// Genre ids to link on creation. Duplicates collapse to one link.
    #[serde(default)]
    pub genres: Vec<i32>,
}

impl NewAnime {
    #[must_use]
    pub fn into_active_model(self) -> anime::ActiveModel {
        anime::ActiveModel {
            title: Set(self.title),
            native_title: Set(self.native_title),
            status: Set(self.status),
            kind: Set(self.kind),
            synopsis: Set(self.synopsis),
            episodes_total: Set(self.episodes_total),
            release_date: Set(self.release_date),
            end_date: Set(self.end_date),
            cover_url: Set(self.cover_url),
            studio_id: Set(self.studio_id),
            ..Default::default()
        }
    }
}

/// Partial update of an anime. `genres`, when supplied, replaces the whole
/// genre set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnimePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "japanese_title", deserialize_with = "double_option")]
    pub native_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub status: Option<Option<String>>,
    #[serde(default, rename = "type", deserialize_with = "double_option")]
    pub kind: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub synopsis: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub episodes_total: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub release_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cover_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub studio_id: Option<Option<i32>>,
    #[serde(default)]
    pub genres: Option<Vec<i32>>,
}

impl AnimePatch {
    /// Names of the scalar fields present in this patch, in declaration order.
    #[must_use]
    pub fn supplied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.native_title.is_some() {
            fields.push("native_title");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        if self.kind.is_some() {
            fields.push("type");
        }
        if self.synopsis.is_some() {
            fields.push("synopsis");
        }
        if self.episodes_total.is_some() {
            fields.push("episodes_total");
        }
        if self.release_date.is_some() {
            fields.push("release_date");
        }
        if self.end_date.is_some() {
            fields.push("end_date");
        }
        if self.cover_url.is_some() {
            fields.push("cover_url");
        }
        if self.studio_id.is_some() {
            fields.push("studio_id");
        }
        fields
    }

    /// Writes the supplied scalar fields into `active`; other columns stay
    /// `NotSet` and are left untouched by the update.
    pub fn apply(&self, active: &mut anime::ActiveModel) {
        if let Some(title) = &self.title {
            active.title = Set(title.clone());
        }
        if let Some(native_title) = &self.native_title {
            active.native_title = Set(native_title.clone());
        }
        if let Some(status) = &self.status {
            active.status = Set(status.clone());
        }
        if let Some(kind) = &self.kind {
            active.kind = Set(kind.clone());
        }
        if let Some(synopsis) = &self.synopsis {
            active.synopsis = Set(synopsis.clone());
        }
        if let Some(total) = self.episodes_total {
            active.episodes_total = Set(total);
        }
        if let Some(date) = self.release_date {
            active.release_date = Set(date);
        }
        if let Some(date) = self.end_date {
            active.end_date = Set(date);
        }
        if let Some(cover_url) = &self.cover_url {
            active.cover_url = Set(cover_url.clone());
        }
        if let Some(studio_id) = self.studio_id {
            active.studio_id = Set(studio_id);
        }
    }
}

/// Conjunctive filters for catalog search.
#[derive(Debug, Clone, Default)]
pub struct AnimeFilters {
    /// Case-insensitive substring of the title or native title.
    pub search: Option<String>,
    /// Exact genre name.
    pub genre_name: Option<String>,
    /// Exact status.
    pub status: Option<String>,
}
