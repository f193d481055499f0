use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProfileFeedItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfileFeedItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProfileFeedItems::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(ProfileFeedItems::StatusText)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfileFeedItems::CreatedOn)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_feed_items_user")
                            .from(ProfileFeedItems::Table, ProfileFeedItems::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_profile_feed_items_user_id")
                    .table(ProfileFeedItems::Table)
                    .col(ProfileFeedItems::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProfileFeedItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProfileFeedItems {
    Table,
    Id,
    UserId,
    StatusText,
    CreatedOn,
}
