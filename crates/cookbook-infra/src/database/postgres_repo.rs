//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, OnConflict, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbConn, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use cookbook_core::domain::{Ingredient, ProfileFeedItem, Recipe, RecipeLinks, Tag, User};
use cookbook_core::error::RepoError;
use cookbook_core::filter::{AttributeFilter, ProfileFilter};
use cookbook_core::ports::{
    AttributeRepository, BaseRepository, FeedRepository, RecipeRepository, UserRepository,
};

use super::entity::feed_item::{self, Entity as FeedEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::entity::{ingredient, recipe, recipe_ingredient, recipe_tag, tag};
use super::postgres_base::{PostgresBaseRepository, query_error, write_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL profile feed repository.
pub type PostgresFeedRepository = PostgresBaseRepository<FeedEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<tag::Entity>;

/// PostgreSQL ingredient repository.
pub type PostgresIngredientRepository = PostgresBaseRepository<ingredient::Entity>;

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

/// Escape LIKE wildcards so a search term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self, filter: &ProfileFilter) -> Result<Vec<User>, RepoError> {
        let mut query = UserEntity::find();

        if let Some(term) = &filter.search {
            let pattern = like_pattern(term);
            query = query.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(user::Column::Name))).like(pattern.as_str()))
                    .add(Expr::expr(Func::lower(Expr::col(user::Column::Email))).like(pattern.as_str())),
            );
        }

        let result = query
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl FeedRepository for PostgresFeedRepository {
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<ProfileFeedItem>, RepoError> {
        let result = FeedEntity::find()
            .filter(feed_item::Column::UserId.eq(user_id))
            .order_by_desc(feed_item::Column::CreatedOn)
            .order_by_desc(feed_item::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// Implements `AttributeRepository` for a tag-like entity and its link table.
///
/// `assigned_only` is an `IN (SELECT <link column> FROM <link table>)`
/// filter, so a record linked from several recipes still yields one row.
macro_rules! impl_attribute_repository {
    ($repo:ty, $domain:ty, $entity:ident, $link:ident, $link_column:ident) => {
        #[async_trait]
        impl AttributeRepository<$domain> for $repo {
            async fn list_by_owner(
                &self,
                user_id: Uuid,
                filter: AttributeFilter,
            ) -> Result<Vec<$domain>, RepoError> {
                let mut query = $entity::Entity::find().filter($entity::Column::UserId.eq(user_id));

                if filter.assigned_only {
                    query = query.filter(
                        $entity::Column::Id.in_subquery(
                            Query::select()
                                .column($link::Column::$link_column)
                                .from($link::Entity)
                                .to_owned(),
                        ),
                    );
                }

                let result = query
                    .order_by_asc($entity::Column::Name)
                    .order_by_asc($entity::Column::Id)
                    .all(&self.db)
                    .await
                    .map_err(query_error)?;

                Ok(result.into_iter().map(Into::into).collect())
            }

            async fn find_by_name(
                &self,
                user_id: Uuid,
                name: &str,
            ) -> Result<Option<$domain>, RepoError> {
                let result = $entity::Entity::find()
                    .filter($entity::Column::UserId.eq(user_id))
                    .filter($entity::Column::Name.eq(name))
                    .order_by_asc($entity::Column::Id)
                    .one(&self.db)
                    .await
                    .map_err(query_error)?;

                Ok(result.map(Into::into))
            }
        }
    };
}

impl_attribute_repository!(PostgresTagRepository, Tag, tag, recipe_tag, TagId);
impl_attribute_repository!(
    PostgresIngredientRepository,
    Ingredient,
    ingredient,
    recipe_ingredient,
    IngredientId
);

/// Generates a find-or-create over one attribute table.
///
/// The insert skips rows that hit the `(user_id, name)` unique index, so a
/// concurrent writer creating the same name is read back instead of failing.
macro_rules! impl_get_or_create {
    ($fn_name:ident, $domain:ty, $entity:ident) => {
        async fn $fn_name<C: ConnectionTrait>(
            db: &C,
            owner: Uuid,
            names: &[String],
        ) -> Result<Vec<$domain>, RepoError> {
            let mut records: Vec<$domain> = Vec::with_capacity(names.len());
            for name in names {
                $entity::Entity::insert($entity::ActiveModel::from(<$domain>::new(owner, name.clone())))
                    .on_conflict(
                        OnConflict::columns([$entity::Column::UserId, $entity::Column::Name])
                            .do_nothing()
                            .to_owned(),
                    )
                    .exec_without_returning(db)
                    .await
                    .map_err(write_error)?;

                let record = $entity::Entity::find()
                    .filter($entity::Column::UserId.eq(owner))
                    .filter($entity::Column::Name.eq(name.as_str()))
                    .one(db)
                    .await
                    .map_err(query_error)?
                    .ok_or(RepoError::NotFound)?;
                records.push(record.into());
            }
            records.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(records)
        }
    };
}

impl_get_or_create!(get_or_create_tags, Tag, tag);
impl_get_or_create!(get_or_create_ingredients, Ingredient, ingredient);

/// PostgreSQL recipe repository. Link rows live in `recipe_tags` and
/// `recipe_ingredients` and are rewritten with the recipe in one transaction.
pub struct PostgresRecipeRepository {
    db: DbConn,
}

type Links = (HashMap<Uuid, Vec<Tag>>, HashMap<Uuid, Vec<Ingredient>>);

impl PostgresRecipeRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn load_links<C: ConnectionTrait>(db: &C, recipe_ids: &[Uuid]) -> Result<Links, RepoError> {
        let mut tags: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        let mut ingredients: HashMap<Uuid, Vec<Ingredient>> = HashMap::new();
        if recipe_ids.is_empty() {
            return Ok((tags, ingredients));
        }

        let tag_rows = recipe_tag::Entity::find()
            .filter(recipe_tag::Column::RecipeId.is_in(recipe_ids.iter().copied()))
            .find_also_related(tag::Entity)
            .all(db)
            .await
            .map_err(query_error)?;
        for (link, record) in tag_rows {
            if let Some(record) = record {
                tags.entry(link.recipe_id).or_default().push(record.into());
            }
        }

        let ingredient_rows = recipe_ingredient::Entity::find()
            .filter(recipe_ingredient::Column::RecipeId.is_in(recipe_ids.iter().copied()))
            .find_also_related(ingredient::Entity)
            .all(db)
            .await
            .map_err(query_error)?;
        for (link, record) in ingredient_rows {
            if let Some(record) = record {
                ingredients
                    .entry(link.recipe_id)
                    .or_default()
                    .push(record.into());
            }
        }

        for linked in tags.values_mut() {
            linked.sort_by(|a, b| a.name.cmp(&b.name));
        }
        for linked in ingredients.values_mut() {
            linked.sort_by(|a, b| a.name.cmp(&b.name));
        }

        Ok((tags, ingredients))
    }

    async fn write_links<C: ConnectionTrait>(db: &C, recipe: &Recipe) -> Result<(), RepoError> {
        recipe_tag::Entity::delete_many()
            .filter(recipe_tag::Column::RecipeId.eq(recipe.id))
            .exec(db)
            .await
            .map_err(query_error)?;
        recipe_ingredient::Entity::delete_many()
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe.id))
            .exec(db)
            .await
            .map_err(query_error)?;

        let tag_rows: Vec<recipe_tag::ActiveModel> = recipe
            .tag_ids()
            .into_iter()
            .map(|tag_id| recipe_tag::ActiveModel {
                recipe_id: Set(recipe.id),
                tag_id: Set(tag_id),
            })
            .collect();
        if !tag_rows.is_empty() {
            recipe_tag::Entity::insert_many(tag_rows)
                .exec_without_returning(db)
                .await
                .map_err(write_error)?;
        }

        let ingredient_rows: Vec<recipe_ingredient::ActiveModel> = recipe
            .ingredient_ids()
            .into_iter()
            .map(|ingredient_id| recipe_ingredient::ActiveModel {
                recipe_id: Set(recipe.id),
                ingredient_id: Set(ingredient_id),
            })
            .collect();
        if !ingredient_rows.is_empty() {
            recipe_ingredient::Entity::insert_many(ingredient_rows)
                .exec_without_returning(db)
                .await
                .map_err(write_error)?;
        }

        Ok(())
    }

    async fn resolve_links<C: ConnectionTrait>(
        db: &C,
        mut recipe: Recipe,
        links: RecipeLinks,
    ) -> Result<Recipe, RepoError> {
        if let Some(names) = links.tags {
            recipe.tags = get_or_create_tags(db, recipe.user_id, &names).await?;
        }
        if let Some(names) = links.ingredients {
            recipe.ingredients = get_or_create_ingredients(db, recipe.user_id, &names).await?;
        }
        Ok(recipe)
    }

    fn assemble(models: Vec<recipe::Model>, links: Links) -> Result<Vec<Recipe>, RepoError> {
        let (mut tags, mut ingredients) = links;
        models
            .into_iter()
            .map(|model| {
                let id = model.id;
                model.into_domain(
                    tags.remove(&id).unwrap_or_default(),
                    ingredients.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    }
}

#[async_trait]
impl BaseRepository<Recipe, Uuid> for PostgresRecipeRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, RepoError> {
        let Some(model) = recipe::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?
        else {
            return Ok(None);
        };

        let links = Self::load_links(&self.db, &[id]).await?;
        Ok(Self::assemble(vec![model], links)?.pop())
    }

    async fn insert(&self, recipe: Recipe) -> Result<Recipe, RepoError> {
        self.insert_with_links(recipe, RecipeLinks::default()).await
    }

    async fn update(&self, recipe: Recipe) -> Result<Recipe, RepoError> {
        self.update_with_links(recipe, RecipeLinks::default()).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = recipe::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl RecipeRepository for PostgresRecipeRepository {
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Recipe>, RepoError> {
        let models = recipe::Entity::find()
            .filter(recipe::Column::UserId.eq(user_id))
            .order_by_desc(recipe::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let links = Self::load_links(&self.db, &ids).await?;
        Self::assemble(models, links)
    }

    async fn insert_with_links(&self, recipe: Recipe, links: RecipeLinks) -> Result<Recipe, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        let recipe = Self::resolve_links(&txn, recipe, links).await?;
        let model = recipe::ActiveModel::from(&recipe)
            .insert(&txn)
            .await
            .map_err(write_error)?;
        Self::write_links(&txn, &recipe).await?;

        txn.commit().await.map_err(query_error)?;
        model.into_domain(recipe.tags, recipe.ingredients)
    }

    async fn update_with_links(&self, recipe: Recipe, links: RecipeLinks) -> Result<Recipe, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        let recipe = Self::resolve_links(&txn, recipe, links).await?;
        let model = recipe::ActiveModel::from(&recipe)
            .update(&txn)
            .await
            .map_err(write_error)?;
        Self::write_links(&txn, &recipe).await?;

        txn.commit().await.map_err(query_error)?;
        model.into_domain(recipe.tags, recipe.ingredients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("nope"), "***");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Al_ice%"), "%al\\_ice\\%%");
    }
}
