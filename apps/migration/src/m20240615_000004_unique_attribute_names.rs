use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn unique_name_index<T: IntoIden + Copy + 'static>(name: &str, table: T, user_id: T, column: T) -> IndexCreateStatement {
    Index::create()
        .name(name)
        .table(table)
        .col(user_id)
        .col(column)
        .unique()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(unique_name_index(
                "idx_tags_user_id_name",
                Tags::Table,
                Tags::UserId,
                Tags::Name,
            ))
            .await?;
        manager
            .create_index(unique_name_index(
                "idx_ingredients_user_id_name",
                Ingredients::Table,
                Ingredients::UserId,
                Ingredients::Name,
            ))
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_ingredients_user_id_name")
                    .table(Ingredients::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_tags_user_id_name")
                    .table(Tags::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Tags {
    Table,
    UserId,
    Name,
}

#[derive(DeriveIden, Clone, Copy)]
enum Ingredients {
    Table,
    UserId,
    Name,
}
