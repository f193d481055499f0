use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{ProfileFeedItem, Recipe, RecipeAttribute, RecipeLinks, User};
use crate::error::RepoError;
use crate::filter::{AttributeFilter, ProfileFilter};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with `RepoError::NotFound` if absent.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their (normalized) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// All users matching `filter`, oldest first.
    async fn list(&self, filter: &ProfileFilter) -> Result<Vec<User>, RepoError>;
}

/// Profile feed repository.
#[async_trait]
pub trait FeedRepository: BaseRepository<ProfileFeedItem, Uuid> {
    /// Feed items owned by `user_id`, newest first.
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<ProfileFeedItem>, RepoError>;
}

/// Recipe repository. Insert and update persist the tag/ingredient links
/// carried by the recipe, replacing any previous links.
#[async_trait]
pub trait RecipeRepository: BaseRepository<Recipe, Uuid> {
    /// Recipes owned by `user_id`, newest (highest id) first.
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Recipe>, RepoError>;

    /// Insert a recipe, resolving `links` to the owner's tags and ingredients
    /// (creating missing ones). Either everything is written or nothing is.
    async fn insert_with_links(&self, recipe: Recipe, links: RecipeLinks) -> Result<Recipe, RepoError>;

    /// Update counterpart of [`RecipeRepository::insert_with_links`].
    async fn update_with_links(&self, recipe: Recipe, links: RecipeLinks) -> Result<Recipe, RepoError>;
}

/// Tag or ingredient repository.
#[async_trait]
pub trait AttributeRepository<A: RecipeAttribute>: BaseRepository<A, Uuid> {
    /// Records owned by `user_id` ordered by name, optionally restricted to
    /// those linked to at least one recipe. Each record appears once.
    async fn list_by_owner(
        &self,
        user_id: Uuid,
        filter: AttributeFilter,
    ) -> Result<Vec<A>, RepoError>;

    /// Exact-name lookup within one owner's records.
    async fn find_by_name(&self, user_id: Uuid, name: &str) -> Result<Option<A>, RepoError>;
}
