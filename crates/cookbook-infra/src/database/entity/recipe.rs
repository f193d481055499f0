//! Recipe entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use cookbook_core::domain::{Ingredient, Price, Recipe, Tag};
use cookbook_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub time_minutes: i32,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub price: Decimal,
    pub link: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::recipe_tag::Entity")]
    TagLink,
    #[sea_orm(has_many = "super::recipe_ingredient::Entity")]
    IngredientLink,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::recipe_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::recipe_tag::Relation::Recipe.def().rev())
    }
}

impl Related<super::ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        super::recipe_ingredient::Relation::Ingredient.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::recipe_ingredient::Relation::Recipe.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Build the domain recipe from this row and its resolved links.
    pub fn into_domain(
        self,
        tags: Vec<Tag>,
        ingredients: Vec<Ingredient>,
    ) -> Result<Recipe, RepoError> {
        Ok(Recipe {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            time_minutes: self.time_minutes,
            price: price_from_decimal(self.price)?,
            link: self.link,
            tags,
            ingredients,
        })
    }
}

/// Scalar columns of a domain recipe; links are written separately.
impl From<&Recipe> for ActiveModel {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: Set(recipe.id),
            user_id: Set(recipe.user_id),
            title: Set(recipe.title.clone()),
            description: Set(recipe.description.clone()),
            time_minutes: Set(recipe.time_minutes),
            price: Set(price_to_decimal(recipe.price)),
            link: Set(recipe.link.clone()),
        }
    }
}

pub fn price_to_decimal(price: Price) -> Decimal {
    Decimal::new(price.cents(), 2)
}

pub fn price_from_decimal(value: Decimal) -> Result<Price, RepoError> {
    let mut value = value.round_dp(2);
    value.rescale(2);
    let cents = i64::try_from(value.mantissa())
        .map_err(|_| RepoError::Query(format!("price out of range: {value}")))?;
    Price::from_cents(cents).map_err(|e| RepoError::Query(e.to_string()))
}
