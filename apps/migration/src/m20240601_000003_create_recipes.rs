use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Owned, named table shared by tags and ingredients.
fn attribute_table<T: IntoIden + Copy + 'static>(
    table: T,
    id: T,
    user_id: T,
    name: T,
    fk_name: &str,
) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(id).uuid().not_null().primary_key())
        .col(ColumnDef::new(user_id).uuid().not_null())
        .col(ColumnDef::new(name).string_len(255).not_null())
        .foreign_key(
            ForeignKey::create()
                .name(fk_name)
                .from(table, user_id)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

/// Recipe link table with a composite key; rows go when either side goes.
fn link_table<L: IntoIden + Copy + 'static, T: IntoIden + Copy + 'static>(
    link: (L, L, L),
    target: (T, T),
    prefix: &str,
) -> TableCreateStatement {
    let (table, recipe_id, target_id) = link;
    let (target_table, target_pk) = target;

    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(recipe_id).uuid().not_null())
        .col(ColumnDef::new(target_id).uuid().not_null())
        .primary_key(Index::create().col(recipe_id).col(target_id))
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{prefix}_recipe"))
                .from(table, recipe_id)
                .to(Recipes::Table, Recipes::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{prefix}_target"))
                .from(table, target_id)
                .to(target_table, target_pk)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Recipes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Recipes::UserId).uuid().not_null())
                    .col(ColumnDef::new(Recipes::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Recipes::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Recipes::TimeMinutes).integer().not_null())
                    .col(ColumnDef::new(Recipes::Price).decimal_len(5, 2).not_null())
                    .col(
                        ColumnDef::new(Recipes::Link)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipes_user")
                            .from(Recipes::Table, Recipes::UserId)
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
                    .name("idx_recipes_user_id")
                    .table(Recipes::Table)
                    .col(Recipes::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(attribute_table(
                Tags::Table,
                Tags::Id,
                Tags::UserId,
                Tags::Name,
                "fk_tags_user",
            ))
            .await?;
        manager
            .create_table(attribute_table(
                Ingredients::Table,
                Ingredients::Id,
                Ingredients::UserId,
                Ingredients::Name,
                "fk_ingredients_user",
            ))
            .await?;

        manager
            .create_table(link_table(
                (RecipeTags::Table, RecipeTags::RecipeId, RecipeTags::TagId),
                (Tags::Table, Tags::Id),
                "recipe_tags",
            ))
            .await?;
        manager
            .create_table(link_table(
                (
                    RecipeIngredients::Table,
                    RecipeIngredients::RecipeId,
                    RecipeIngredients::IngredientId,
                ),
                (Ingredients::Table, Ingredients::Id),
                "recipe_ingredients",
            ))
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecipeIngredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ingredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Recipes {
    Table,
    Id,
    UserId,
    Title,
    Description,
    TimeMinutes,
    Price,
    Link,
}

#[derive(DeriveIden, Clone, Copy)]
enum Tags {
    Table,
    Id,
    UserId,
    Name,
}

#[derive(DeriveIden, Clone, Copy)]
enum Ingredients {
    Table,
    Id,
    UserId,
    Name,
}

#[derive(DeriveIden, Clone, Copy)]
enum RecipeTags {
    Table,
    RecipeId,
    TagId,
}

#[derive(DeriveIden, Clone, Copy)]
enum RecipeIngredients {
    Table,
    RecipeId,
    IngredientId,
}
