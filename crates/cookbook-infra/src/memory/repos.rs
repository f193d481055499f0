//! In-memory repository implementations over [`MemoryStore`].

use std::collections::HashSet;
use std::marker::PhantomData;

use async_trait::async_trait;
use uuid::Uuid;

use cookbook_core::access::Owned;
use cookbook_core::domain::{ProfileFeedItem, Recipe, RecipeAttribute, RecipeLinks, User};
use cookbook_core::error::RepoError;
use cookbook_core::filter::{AttributeFilter, ProfileFilter, retain_assigned};
use cookbook_core::ports::{
    AttributeRepository, BaseRepository, FeedRepository, RecipeRepository, UserRepository,
};

use super::store::{AttributeTable, MemoryStore};

/// In-memory user repository. Deleting a user removes everything it owns.
pub struct InMemoryUserRepository {
    store: MemoryStore,
}

impl InMemoryUserRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        let slot = tables.users.get_mut(&user.id).ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.delete_user_cascade(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self, filter: &ProfileFilter) -> Result<Vec<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|u| filter.matches(&u.name, &u.email))
            .cloned()
            .collect())
    }
}

/// In-memory profile feed repository.
pub struct InMemoryFeedRepository {
    store: MemoryStore,
}

impl InMemoryFeedRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<ProfileFeedItem, Uuid> for InMemoryFeedRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProfileFeedItem>, RepoError> {
        Ok(self.store.tables.read().await.feed.get(&id).cloned())
    }

    async fn insert(&self, item: ProfileFeedItem) -> Result<ProfileFeedItem, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.users.contains_key(&item.user_id) {
            return Err(RepoError::Constraint("Unknown owner".to_string()));
        }
        tables.feed.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update(&self, item: ProfileFeedItem) -> Result<ProfileFeedItem, RepoError> {
        let mut tables = self.store.tables.write().await;
        let slot = tables.feed.get_mut(&item.id).ok_or(RepoError::NotFound)?;
        slot.status_text = item.status_text;
        Ok(slot.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.feed.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl FeedRepository for InMemoryFeedRepository {
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<ProfileFeedItem>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .feed
            .values()
            .rev()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// In-memory recipe repository; links are kept as id sets per recipe.
pub struct InMemoryRecipeRepository {
    store: MemoryStore,
}

impl InMemoryRecipeRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Recipe, Uuid> for InMemoryRecipeRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.recipes.get(&id).map(|row| tables.resolve(row)))
    }

    async fn insert(&self, recipe: Recipe) -> Result<Recipe, RepoError> {
        self.insert_with_links(recipe, RecipeLinks::default()).await
    }

    async fn update(&self, recipe: Recipe) -> Result<Recipe, RepoError> {
        self.update_with_links(recipe, RecipeLinks::default()).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.recipes.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl RecipeRepository for InMemoryRecipeRepository {
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Recipe>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .recipes
            .values()
            .rev()
            .filter(|row| row.recipe.user_id == user_id)
            .map(|row| tables.resolve(row))
            .collect())
    }

    async fn insert_with_links(&self, recipe: Recipe, links: RecipeLinks) -> Result<Recipe, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.recipes.contains_key(&recipe.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        let row = tables.link_row(recipe, links)?;
        let saved = tables.resolve(&row);
        tables.recipes.insert(row.recipe.id, row);
        Ok(saved)
    }

    async fn update_with_links(&self, recipe: Recipe, links: RecipeLinks) -> Result<Recipe, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.recipes.contains_key(&recipe.id) {
            return Err(RepoError::NotFound);
        }
        let row = tables.link_row(recipe, links)?;
        let saved = tables.resolve(&row);
        tables.recipes.insert(row.recipe.id, row);
        Ok(saved)
    }
}

/// In-memory tag or ingredient repository.
pub struct InMemoryAttributeRepository<A> {
    store: MemoryStore,
    _attribute: PhantomData<fn() -> A>,
}

impl<A> InMemoryAttributeRepository<A> {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store,
            _attribute: PhantomData,
        }
    }
}

#[async_trait]
impl<A: AttributeTable> BaseRepository<A, Uuid> for InMemoryAttributeRepository<A> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<A>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(A::table(&tables).get(&id).cloned())
    }

    async fn insert(&self, record: A) -> Result<A, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.users.contains_key(&record.owner_id()) {
            return Err(RepoError::Constraint("Unknown owner".to_string()));
        }
        if A::find_named(&tables, record.owner_id(), record.name()).is_some() {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        A::table_mut(&mut tables).insert(record.id(), record.clone());
        Ok(record)
    }

    async fn update(&self, record: A) -> Result<A, RepoError> {
        let mut tables = self.store.tables.write().await;
        if A::find_named(&tables, record.owner_id(), record.name())
            .is_some_and(|id| id != record.id())
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        let slot = A::table_mut(&mut tables)
            .get_mut(&record.id())
            .ok_or(RepoError::NotFound)?;
        *slot = record.clone();
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if A::remove(&mut tables, id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl<A: AttributeTable> AttributeRepository<A> for InMemoryAttributeRepository<A> {
    async fn list_by_owner(
        &self,
        user_id: Uuid,
        filter: AttributeFilter,
    ) -> Result<Vec<A>, RepoError> {
        let tables = self.store.tables.read().await;

        let mut candidates: Vec<A> = A::table(&tables)
            .values()
            .filter(|record| record.is_owned_by(user_id))
            .cloned()
            .collect();
        candidates.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));

        if !filter.assigned_only {
            return Ok(candidates);
        }

        let referenced: HashSet<Uuid> = tables
            .recipes
            .values()
            .flat_map(|row| A::links(row).iter().copied())
            .collect();
        Ok(retain_assigned(candidates, &referenced))
    }

    async fn find_by_name(&self, user_id: Uuid, name: &str) -> Result<Option<A>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(A::find_named(&tables, user_id, name).and_then(|id| A::table(&tables).get(&id).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cookbook_core::domain::{Ingredient, Price, Tag};

    async fn seed_user(store: &MemoryStore, email: &str) -> User {
        let repo = InMemoryUserRepository::new(store.clone());
        repo.insert(User::new(email.into(), "Test".into(), "hash".into()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_constraint_error() {
        let store = MemoryStore::new();
        seed_user(&store, "dup@example.com").await;

        let repo = InMemoryUserRepository::new(store);
        let result = repo
            .insert(User::new("dup@example.com".into(), "Other".into(), "hash".into()))
            .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_deleting_tag_unlinks_it_from_recipes() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "cook@example.com").await;
        let tags = InMemoryAttributeRepository::<Tag>::new(store.clone());
        let recipes = InMemoryRecipeRepository::new(store.clone());

        let tag = tags.insert(Tag::new(user.id, "Vegan".into())).await.unwrap();
        let mut recipe = Recipe::new(user.id, "Salad".into(), 5, Price::from_cents(300).unwrap());
        recipe.tags = vec![tag.clone()];
        let recipe = recipes.insert(recipe).await.unwrap();
        assert_eq!(recipe.tags, vec![tag.clone()]);

        tags.delete(tag.id).await.unwrap();

        let reloaded = recipes.find_by_id(recipe.id).await.unwrap().unwrap();
        assert!(reloaded.tags.is_empty());
    }

    #[tokio::test]
    async fn test_user_delete_cascades_to_owned_records() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "gone@example.com").await;
        let users = InMemoryUserRepository::new(store.clone());
        let ingredients = InMemoryAttributeRepository::<Ingredient>::new(store.clone());
        let feed = InMemoryFeedRepository::new(store.clone());

        let salt = ingredients
            .insert(Ingredient::new(user.id, "Salt".into()))
            .await
            .unwrap();
        let item = feed
            .insert(ProfileFeedItem::new(user.id, "hi".into()))
            .await
            .unwrap();

        users.delete(user.id).await.unwrap();

        assert!(ingredients.find_by_id(salt.id).await.unwrap().is_none());
        assert!(feed.find_by_id(item.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_with_links_reuses_existing_names() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "links@example.com").await;
        let tags = InMemoryAttributeRepository::<Tag>::new(store.clone());
        let recipes = InMemoryRecipeRepository::new(store.clone());
        let vegan = tags.insert(Tag::new(user.id, "Vegan".into())).await.unwrap();

        let recipe = Recipe::new(user.id, "Salad".into(), 5, Price::from_cents(300).unwrap());
        let saved = recipes
            .insert_with_links(
                recipe,
                RecipeLinks {
                    tags: Some(vec!["Vegan".into(), "Quick".into()]),
                    ingredients: None,
                },
            )
            .await
            .unwrap();

        let names: Vec<_> = saved.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Quick", "Vegan"]);
        assert!(saved.tags.contains(&vegan));
        let all = tags.list_by_owner(user.id, AttributeFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_with_links_for_unknown_owner_writes_nothing() {
        let store = MemoryStore::new();
        let recipes = InMemoryRecipeRepository::new(store.clone());
        let owner = Uuid::now_v7();

        let recipe = Recipe::new(owner, "Ghost".into(), 5, Price::from_cents(100).unwrap());
        let result = recipes
            .insert_with_links(
                recipe,
                RecipeLinks {
                    tags: Some(vec!["Spooky".into()]),
                    ingredients: None,
                },
            )
            .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
        assert!(store.tables.read().await.tags.is_empty());
    }

    #[tokio::test]
    async fn test_attribute_names_are_unique_per_owner() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "unique@example.com").await;
        let tags = InMemoryAttributeRepository::<Tag>::new(store);

        tags.insert(Tag::new(user.id, "Vegan".into())).await.unwrap();
        let result = tags.insert(Tag::new(user.id, "Vegan".into())).await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_owner() {
        let tags = InMemoryAttributeRepository::<Tag>::new(MemoryStore::new());

        let result = tags.insert(Tag::new(Uuid::now_v7(), "Orphan".into())).await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }
}
