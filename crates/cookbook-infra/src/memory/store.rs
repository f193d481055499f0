//! Shared in-memory tables.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use cookbook_core::access::Owned;
use cookbook_core::domain::{
    Ingredient, ProfileFeedItem, Recipe, RecipeAttribute, RecipeLinks, Tag, User,
};
use cookbook_core::error::RepoError;

/// A recipe row with its links stored as id sets, like a join table.
#[derive(Debug, Clone)]
pub struct RecipeRow {
    pub recipe: Recipe,
    pub tag_ids: BTreeSet<Uuid>,
    pub ingredient_ids: BTreeSet<Uuid>,
}

impl RecipeRow {
    pub fn from_recipe(mut recipe: Recipe) -> Self {
        let tag_ids = recipe.tags.drain(..).map(|t| t.id).collect();
        let ingredient_ids = recipe.ingredients.drain(..).map(|i| i.id).collect();
        Self {
            recipe,
            tag_ids,
            ingredient_ids,
        }
    }
}

/// All tables. Keys are UUID v7, so map order is creation order.
#[derive(Debug, Default)]
pub struct Tables {
    pub users: BTreeMap<Uuid, User>,
    pub feed: BTreeMap<Uuid, ProfileFeedItem>,
    pub recipes: BTreeMap<Uuid, RecipeRow>,
    pub tags: BTreeMap<Uuid, Tag>,
    pub ingredients: BTreeMap<Uuid, Ingredient>,
}

impl Tables {
    /// Rebuild a recipe with its current linked records, ordered by name.
    pub fn resolve(&self, row: &RecipeRow) -> Recipe {
        let mut recipe = row.recipe.clone();
        recipe.tags = resolve_links(&self.tags, &row.tag_ids);
        recipe.ingredients = resolve_links(&self.ingredients, &row.ingredient_ids);
        recipe
    }

    /// Build the row for a recipe write. Named links are found or created
    /// among the owner's records; absent lists keep the recipe's own links.
    pub fn link_row(&mut self, recipe: Recipe, links: RecipeLinks) -> Result<RecipeRow, RepoError> {
        if !self.users.contains_key(&recipe.user_id) {
            return Err(RepoError::Constraint("Unknown owner".to_string()));
        }
        let owner = recipe.user_id;
        let mut row = RecipeRow::from_recipe(recipe);
        if let Some(names) = links.tags {
            row.tag_ids = Tag::get_or_create(self, owner, &names);
        }
        if let Some(names) = links.ingredients {
            row.ingredient_ids = Ingredient::get_or_create(self, owner, &names);
        }
        Ok(row)
    }

    /// Remove a user and every record the user owns.
    pub fn delete_user_cascade(&mut self, user_id: Uuid) -> bool {
        if self.users.remove(&user_id).is_none() {
            return false;
        }
        self.feed.retain(|_, item| item.user_id != user_id);
        self.recipes.retain(|_, row| row.recipe.user_id != user_id);

        let tags: Vec<Uuid> = owned_ids(&self.tags, user_id);
        let ingredients: Vec<Uuid> = owned_ids(&self.ingredients, user_id);
        for id in tags {
            Tag::remove(self, id);
        }
        for id in ingredients {
            Ingredient::remove(self, id);
        }
        true
    }
}

fn resolve_links<A: RecipeAttribute>(table: &BTreeMap<Uuid, A>, ids: &BTreeSet<Uuid>) -> Vec<A> {
    let mut linked: Vec<A> = ids.iter().filter_map(|id| table.get(id).cloned()).collect();
    linked.sort_by(|a, b| a.name().cmp(b.name()));
    linked
}

fn owned_ids<A: RecipeAttribute>(table: &BTreeMap<Uuid, A>, user_id: Uuid) -> Vec<Uuid> {
    table
        .values()
        .filter(|record| record.is_owned_by(user_id))
        .map(|record| record.id())
        .collect()
}

/// Table access for one attribute kind.
pub trait AttributeTable: RecipeAttribute {
    fn table(tables: &Tables) -> &BTreeMap<Uuid, Self>;
    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<Uuid, Self>;
    fn links(row: &RecipeRow) -> &BTreeSet<Uuid>;
    fn links_mut(row: &mut RecipeRow) -> &mut BTreeSet<Uuid>;

    /// The owner's record with exactly this name, if any.
    fn find_named(tables: &Tables, owner: Uuid, name: &str) -> Option<Uuid> {
        Self::table(tables)
            .values()
            .find(|record| record.is_owned_by(owner) && record.name() == name)
            .map(|record| record.id())
    }

    /// Ids of the owner's records named `names`, creating missing ones.
    fn get_or_create(tables: &mut Tables, owner: Uuid, names: &[String]) -> BTreeSet<Uuid> {
        names
            .iter()
            .map(|name| match Self::find_named(tables, owner, name) {
                Some(id) => id,
                None => {
                    let record = Self::create(owner, name.clone());
                    let id = record.id();
                    Self::table_mut(tables).insert(id, record);
                    id
                }
            })
            .collect()
    }

    /// Remove a record and its recipe links.
    fn remove(tables: &mut Tables, id: Uuid) -> bool {
        if Self::table_mut(tables).remove(&id).is_none() {
            return false;
        }
        for row in tables.recipes.values_mut() {
            Self::links_mut(row).remove(&id);
        }
        true
    }
}

impl AttributeTable for Tag {
    fn table(tables: &Tables) -> &BTreeMap<Uuid, Self> {
        &tables.tags
    }

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<Uuid, Self> {
        &mut tables.tags
    }

    fn links(row: &RecipeRow) -> &BTreeSet<Uuid> {
        &row.tag_ids
    }

    fn links_mut(row: &mut RecipeRow) -> &mut BTreeSet<Uuid> {
        &mut row.tag_ids
    }
}

impl AttributeTable for Ingredient {
    fn table(tables: &Tables) -> &BTreeMap<Uuid, Self> {
        &tables.ingredients
    }

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<Uuid, Self> {
        &mut tables.ingredients
    }

    fn links(row: &RecipeRow) -> &BTreeSet<Uuid> {
        &row.ingredient_ids
    }

    fn links_mut(row: &mut RecipeRow) -> &mut BTreeSet<Uuid> {
        &mut row.ingredient_ids
    }
}

/// In-memory store shared by the in-memory repositories.
///
/// One async `RwLock` guards every table, so each repository call is atomic.
/// Data is lost on process restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub(crate) tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}
