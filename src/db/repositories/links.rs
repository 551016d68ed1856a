//! Junction tables between catalog entities.
//!
//! Each link kind keeps its own duplicate policy: genre links are
//! idempotent, character links report an existing pair, voice actor links
//! overwrite the language. Listings follow junction insertion order.

use std::collections::HashMap;

use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::{
    anime, anime_characters, anime_genres, character_voice_actors, characters, genres,
    prelude::*, voice_actors,
};

pub struct LinkRepository {
    conn: DatabaseConnection,
}

/// Pairs each linked row with its edge attribute, in link order.
///
/// Links whose target no longer resolves are skipped, and a target listed
/// twice is only returned once.
fn in_link_order<M, A>(links: Vec<(i32, A)>, models: Vec<M>, id_of: impl Fn(&M) -> i32) -> Vec<(M, A)> {
    let mut by_id: HashMap<i32, M> = models.into_iter().map(|m| (id_of(&m), m)).collect();

    links
        .into_iter()
        .filter_map(|(id, attr)| by_id.remove(&id).map(|m| (m, attr)))
        .collect()
}

fn dedup_ids(ids: &[i32]) -> Vec<i32> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}

/// Links `genre_ids` to an anime, ignoring pairs that already exist.
pub(crate) async fn insert_genre_links<C: ConnectionTrait>(
    conn: &C,
    anime_id: i32,
    genre_ids: &[i32],
) -> Result<()> {
    let rows: Vec<anime_genres::ActiveModel> = dedup_ids(genre_ids)
        .into_iter()
        .map(|genre_id| anime_genres::ActiveModel {
            anime_id: Set(anime_id),
            genre_id: Set(genre_id),
        })
        .collect();

    if rows.is_empty() {
        return Ok(());
    }

    AnimeGenres::insert_many(rows)
        .on_conflict(
            OnConflict::columns([anime_genres::Column::AnimeId, anime_genres::Column::GenreId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    Ok(())
}

/// Clears and re-links an anime's genres. The caller owns the transaction.
pub(crate) async fn replace_genre_links<C: ConnectionTrait>(
    conn: &C,
    anime_id: i32,
    genre_ids: &[i32],
) -> Result<()> {
    AnimeGenres::delete_many()
        .filter(anime_genres::Column::AnimeId.eq(anime_id))
        .exec(conn)
        .await?;

    insert_genre_links(conn, anime_id, genre_ids).await
}

impl LinkRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Anime <-> Genre
    // ========================================================================

    pub async fn link_genre(&self, anime_id: i32, genre_id: i32) -> Result<()> {
        insert_genre_links(&self.conn, anime_id, &[genre_id]).await
    }

    pub async fn unlink_genre(&self, anime_id: i32, genre_id: i32) -> Result<bool> {
        let result = AnimeGenres::delete_many()
            .filter(anime_genres::Column::AnimeId.eq(anime_id))
            .filter(anime_genres::Column::GenreId.eq(genre_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn genres_of(&self, anime_id: i32) -> Result<Vec<genres::Model>> {
        let links: Vec<(i32, ())> = AnimeGenres::find()
            .filter(anime_genres::Column::AnimeId.eq(anime_id))
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|link| (link.genre_id, ()))
            .collect();

        let ids: Vec<i32> = links.iter().map(|(id, _)| *id).collect();
        let models = Genres::find()
            .filter(genres::Column::Id.is_in(ids))
            .all(&self.conn)
            .await?;

        Ok(in_link_order(links, models, |g| g.id)
            .into_iter()
            .map(|(genre, ())| genre)
            .collect())
    }

    /// Genres of several anime at once, keyed by anime id.
    pub async fn genres_for_anime_ids(
        &self,
        anime_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<genres::Model>>> {
        if anime_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let links = AnimeGenres::find()
            .filter(anime_genres::Column::AnimeId.is_in(anime_ids.iter().copied()))
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.conn)
            .await?;

        let genre_ids: Vec<i32> = dedup_ids(&links.iter().map(|l| l.genre_id).collect::<Vec<_>>());
        let by_id: HashMap<i32, genres::Model> = Genres::find()
            .filter(genres::Column::Id.is_in(genre_ids))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|g| (g.id, g))
            .collect();

        let mut grouped: HashMap<i32, Vec<genres::Model>> = HashMap::new();
        for link in links {
            if let Some(genre) = by_id.get(&link.genre_id) {
                grouped.entry(link.anime_id).or_default().push(genre.clone());
            }
        }

        Ok(grouped)
    }

    // ========================================================================
    // Anime <-> Character
    // ========================================================================

    /// Returns `false` when the pair was already linked; the existing role
    /// is left untouched.
    pub async fn link_character(&self, anime_id: i32, character_id: i32, role: &str) -> Result<bool> {
        let inserted = AnimeCharacters::insert(anime_characters::ActiveModel {
            anime_id: Set(anime_id),
            character_id: Set(character_id),
            role: Set(role.to_string()),
        })
        .on_conflict(
            OnConflict::columns([
                anime_characters::Column::AnimeId,
                anime_characters::Column::CharacterId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await?;

        Ok(inserted > 0)
    }

    pub async fn unlink_character(&self, anime_id: i32, character_id: i32) -> Result<bool> {
        let result = AnimeCharacters::delete_many()
            .filter(anime_characters::Column::AnimeId.eq(anime_id))
            .filter(anime_characters::Column::CharacterId.eq(character_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Characters of an anime with their role.
    pub async fn characters_of(&self, anime_id: i32) -> Result<Vec<(characters::Model, String)>> {
        let links: Vec<(i32, String)> = AnimeCharacters::find()
            .filter(anime_characters::Column::AnimeId.eq(anime_id))
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|link| (link.character_id, link.role))
            .collect();

        let ids: Vec<i32> = links.iter().map(|(id, _)| *id).collect();
        let models = Characters::find()
            .filter(characters::Column::Id.is_in(ids))
            .all(&self.conn)
            .await?;

        Ok(in_link_order(links, models, |c| c.id))
    }

    /// Anime a character appears in, with the character's role in each.
    pub async fn anime_of_character(&self, character_id: i32) -> Result<Vec<(anime::Model, String)>> {
        let links: Vec<(i32, String)> = AnimeCharacters::find()
            .filter(anime_characters::Column::CharacterId.eq(character_id))
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|link| (link.anime_id, link.role))
            .collect();

        let ids: Vec<i32> = links.iter().map(|(id, _)| *id).collect();
        let models = Anime::find()
            .filter(anime::Column::Id.is_in(ids))
            .all(&self.conn)
            .await?;

        Ok(in_link_order(links, models, |a| a.id))
    }

    // ========================================================================
    // Character <-> Voice actor
    // ========================================================================

    /// Inserts the pair or overwrites the language of an existing one.
    pub async fn link_voice_actor(
        &self,
        character_id: i32,
        voice_actor_id: i32,
        language: &str,
    ) -> Result<()> {
        CharacterVoiceActors::insert(character_voice_actors::ActiveModel {
            character_id: Set(character_id),
            voice_actor_id: Set(voice_actor_id),
            language: Set(language.to_string()),
        })
        .on_conflict(
            OnConflict::columns([
                character_voice_actors::Column::CharacterId,
                character_voice_actors::Column::VoiceActorId,
            ])
            .update_column(character_voice_actors::Column::Language)
            .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await?;

        Ok(())
    }

    pub async fn unlink_voice_actor(&self, character_id: i32, voice_actor_id: i32) -> Result<bool> {
        let result = CharacterVoiceActors::delete_many()
            .filter(character_voice_actors::Column::CharacterId.eq(character_id))
            .filter(character_voice_actors::Column::VoiceActorId.eq(voice_actor_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn voice_actors_of(
        &self,
        character_id: i32,
    ) -> Result<Vec<(voice_actors::Model, String)>> {
        let links: Vec<(i32, String)> = CharacterVoiceActors::find()
            .filter(character_voice_actors::Column::CharacterId.eq(character_id))
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|link| (link.voice_actor_id, link.language))
            .collect();

        let ids: Vec<i32> = links.iter().map(|(id, _)| *id).collect();
        let models = VoiceActors::find()
            .filter(voice_actors::Column::Id.is_in(ids))
            .all(&self.conn)
            .await?;

        Ok(in_link_order(links, models, |v| v.id))
    }

    pub async fn characters_of_voice_actor(
        &self,
        voice_actor_id: i32,
    ) -> Result<Vec<(characters::Model, String)>> {
        let links: Vec<(i32, String)> = CharacterVoiceActors::find()
            .filter(character_voice_actors::Column::VoiceActorId.eq(voice_actor_id))
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|link| (link.character_id, link.language))
            .collect();

        let ids: Vec<i32> = links.iter().map(|(id, _)| *id).collect();
        let models = Characters::find()
            .filter(characters::Column::Id.is_in(ids))
            .all(&self.conn)
            .await?;

        Ok(in_link_order(links, models, |c| c.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_order_is_kept_and_missing_targets_skipped() {
        let links = vec![(3, "Main"), (1, "Supporting"), (9, "Main"), (3, "Main")];
        let models = vec![1, 3];
        let ordered = in_link_order(links, models, |m| *m);
        assert_eq!(ordered, vec![(3, "Main"), (1, "Supporting")]);
    }

    #[test]
    fn duplicate_genre_ids_collapse() {
        assert_eq!(dedup_ids(&[2, 1, 2, 1, 5]), vec![2, 1, 5]);
    }
}
