//! Recipe use-cases.

use std::sync::Arc;

use uuid::Uuid;

use crate::access::{Operation, Owned, authorize};
use crate::domain::{Recipe, RecipeChanges, RecipeLinks};
use crate::error::{DomainError, FieldErrors};
use crate::ports::RecipeRepository;

/// Recipe service. Tag and ingredient names in the payload are validated
/// here and resolved by the repository in the same write as the recipe.
pub struct RecipeService {
    recipes: Arc<dyn RecipeRepository>,
}

impl RecipeService {
    pub fn new(recipes: Arc<dyn RecipeRepository>) -> Self {
        Self { recipes }
    }

    /// The requester's recipes, newest first.
    pub async fn list(&self, requester: Uuid) -> Result<Vec<Recipe>, DomainError> {
        Ok(self.recipes.list_by_owner(requester).await?)
    }

    pub async fn get(&self, requester: Uuid, id: Uuid) -> Result<Recipe, DomainError> {
        self.find_owned(requester, id).await
    }

    pub async fn create(
        &self,
        requester: Uuid,
        changes: RecipeChanges,
    ) -> Result<Recipe, DomainError> {
        changes.require_complete()?;
        let links = validate(&changes)?;

        let mut recipe = Recipe::new(requester, String::new(), 0, Default::default());
        recipe.apply(&changes);

        let saved = self.recipes.insert_with_links(recipe, links).await?;
        tracing::info!(recipe_id = %saved.id, user_id = %requester, "Recipe created");
        Ok(saved)
    }

    /// Update a recipe. With `partial == false` every required field must be
    /// present; link lists replace the current links only when provided.
    pub async fn update(
        &self,
        requester: Uuid,
        id: Uuid,
        changes: RecipeChanges,
        partial: bool,
    ) -> Result<Recipe, DomainError> {
        let mut recipe = self.find_owned(requester, id).await?;
        authorize(requester, &recipe, Operation::Write)?;

        if !partial {
            changes.require_complete()?;
        }
        let links = validate(&changes)?;

        recipe.apply(&changes);
        Ok(self.recipes.update_with_links(recipe, links).await?)
    }

    pub async fn delete(&self, requester: Uuid, id: Uuid) -> Result<(), DomainError> {
        let recipe = self.find_owned(requester, id).await?;
        authorize(requester, &recipe, Operation::Write)?;

        self.recipes.delete(id).await?;
        tracing::info!(recipe_id = %id, "Recipe deleted");
        Ok(())
    }

    async fn find_owned(&self, requester: Uuid, id: Uuid) -> Result<Recipe, DomainError> {
        match self.recipes.find_by_id(id).await? {
            Some(recipe) if recipe.is_owned_by(requester) => Ok(recipe),
            _ => Err(DomainError::NotFound {
                entity_type: "recipe",
                id,
            }),
        }
    }
}

/// Every field and link name is checked before anything is written.
fn validate(changes: &RecipeChanges) -> Result<RecipeLinks, DomainError> {
    let mut errors = FieldErrors::default();
    changes.validate(&mut errors);
    let links = changes.links(&mut errors);
    errors.into_result()?;
    Ok(links)
}
