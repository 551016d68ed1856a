use crate::entities::prelude::*;
use crate::entities::{user_anime_progress, user_favorites};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(UserSessions)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(UserAnimeProgress)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // A favorite points at exactly one target kind.
        manager
            .create_table(
                schema
                    .create_table_from_entity(UserFavorites)
                    .if_not_exists()
                    .check(Expr::cust(
                        "(anime_id IS NULL) <> (character_id IS NULL)",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_progress_user_anime")
                    .table(UserAnimeProgress)
                    .col(user_anime_progress::Column::UserId)
                    .col(user_anime_progress::Column::AnimeId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // NULLs are distinct in unique indexes, so each index only
        // constrains rows of its own target kind.
        manager
            .create_index(
                Index::create()
                    .name("idx_favorites_user_anime")
                    .table(UserFavorites)
                    .col(user_favorites::Column::UserId)
                    .col(user_favorites::Column::AnimeId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_favorites_user_character")
                    .table(UserFavorites)
                    .col(user_favorites::Column::UserId)
                    .col(user_favorites::Column::CharacterId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserFavorites).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserAnimeProgress).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserSessions).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
