use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::user::{User, generate_token};
use crate::entities::{user_sessions, users};

pub struct SessionRepository {
    conn: DatabaseConnection,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Issue a fresh token for `user_id` valid for `ttl`.
    pub async fn create(&self, user_id: i32, ttl: Duration) -> Result<user_sessions::Model> {
        let now = Utc::now();
        let model = user_sessions::Model {
            token: generate_token(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
        };

        user_sessions::Entity::insert(user_sessions::ActiveModel {
            token: Set(model.token.clone()),
            user_id: Set(model.user_id),
            created_at: Set(model.created_at),
            expires_at: Set(model.expires_at),
        })
        .exec_without_returning(&self.conn)
        .await
        .context("Failed to insert session")?;

        Ok(model)
    }

    /// Resolve a token to its user if the session has not expired at `now`.
    pub async fn find_user(&self, token: &str, now: DateTime<Utc>) -> Result<Option<User>> {
        let row = user_sessions::Entity::find_by_id(token.to_string())
            .filter(user_sessions::Column::ExpiresAt.gt(now))
            .find_also_related(users::Entity)
            .one(&self.conn)
            .await
            .context("Failed to query session")?;

        Ok(row.and_then(|(_, user)| user.map(User::from)))
    }

    pub async fn delete(&self, token: &str) -> Result<bool> {
        let result = user_sessions::Entity::delete_by_id(token.to_string())
            .exec(&self.conn)
            .await
            .context("Failed to delete session")?;
        Ok(result.rows_affected > 0)
    }

    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = user_sessions::Entity::delete_many()
            .filter(user_sessions::Column::ExpiresAt.lte(now))
            .exec(&self.conn)
            .await
            .context("Failed to purge expired sessions")?;
        Ok(result.rows_affected)
    }
}
