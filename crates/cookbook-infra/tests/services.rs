//! Use-case tests running the core services over the in-memory store.

use std::sync::Arc;

use uuid::Uuid;

use cookbook_core::DomainError;
use cookbook_core::domain::{Ingredient, NewUser, ProfileChanges, RecipeChanges, Tag, User};
use cookbook_core::filter::{AttributeFilter, ProfileFilter};
use cookbook_core::ports::{AuthError, PasswordService};
use cookbook_core::services::{AttributeService, FeedService, RecipeService, UserService};
use cookbook_infra::{
    InMemoryAttributeRepository, InMemoryFeedRepository, InMemoryRecipeRepository,
    InMemoryUserRepository, MemoryStore,
};

/// Reversible stand-in so tests don't pay for Argon2.
struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash.strip_prefix("plain$") == Some(password))
    }
}

struct Services {
    users: UserService,
    feed: FeedService,
    recipes: RecipeService,
    tags: AttributeService<Tag>,
    ingredients: AttributeService<Ingredient>,
}

fn services() -> Services {
    let store = MemoryStore::new();

    Services {
        users: UserService::new(
            Arc::new(InMemoryUserRepository::new(store.clone())),
            Arc::new(PlainPasswords),
        ),
        feed: FeedService::new(Arc::new(InMemoryFeedRepository::new(store.clone()))),
        tags: AttributeService::new(Arc::new(InMemoryAttributeRepository::<Tag>::new(
            store.clone(),
        ))),
        ingredients: AttributeService::new(Arc::new(
            InMemoryAttributeRepository::<Ingredient>::new(store.clone()),
        )),
        recipes: RecipeService::new(Arc::new(InMemoryRecipeRepository::new(store))),
    }
}

async fn user(services: &Services, email: &str) -> User {
    services
        .users
        .create_user(NewUser {
            email: email.to_string(),
            name: "Test Name".to_string(),
            password: "testpass123".to_string(),
        })
        .await
        .unwrap()
}

fn recipe(title: &str, tags: &[&str], ingredients: &[&str]) -> RecipeChanges {
    RecipeChanges {
        title: Some(title.to_string()),
        time_minutes: Some(10),
        price: Some("5.00".parse().unwrap()),
        tags: Some(tags.iter().map(|s| s.to_string()).collect()),
        ingredients: Some(ingredients.iter().map(|s| s.to_string()).collect()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_user_normalizes_and_hashes() {
    let services = services();

    let created = user(&services, "test@LONDONAPPDEV.COM").await;

    assert_eq!(created.email, "test@londonappdev.com");
    assert_ne!(created.password_hash, "testpass123");
    assert!(created.is_active);
    assert!(!created.is_staff);
}

#[tokio::test]
async fn test_create_user_without_email_fails() {
    let services = services();

    let result = services
        .users
        .create_user(NewUser {
            email: String::new(),
            name: "Test".into(),
            password: "testpass123".into(),
        })
        .await;

    assert!(matches!(result, Err(DomainError::Validation(e)) if e.contains("email")));
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let services = services();
    user(&services, "dup@example.com").await;

    let result = services
        .users
        .create_user(NewUser {
            email: "dup@example.com".into(),
            name: "Other".into(),
            password: "testpass123".into(),
        })
        .await;

    assert!(matches!(result, Err(DomainError::Duplicate(_))));
}

#[tokio::test]
async fn test_superuser_flags() {
    let services = services();

    let admin = services
        .users
        .create_superuser(NewUser {
            email: "admin@example.com".into(),
            name: "Admin".into(),
            password: "testpass123".into(),
        })
        .await
        .unwrap();

    assert!(admin.is_staff);
    assert!(admin.is_superuser);
}

#[tokio::test]
async fn test_authenticate() {
    let services = services();
    let created = user(&services, "cook@example.com").await;

    let logged_in = services
        .users
        .authenticate("cook@example.com", "testpass123")
        .await
        .unwrap();
    assert_eq!(logged_in.id, created.id);

    let rejected = services.users.authenticate("cook@example.com", "wrong").await;
    assert!(matches!(rejected, Err(DomainError::Validation(_))));

    let unknown = services.users.authenticate("nobody@example.com", "testpass123").await;
    assert!(matches!(unknown, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_profile_search_and_foreign_update() {
    let services = services();
    let alice = user(&services, "alice@example.com").await;
    let bob = user(&services, "bob@example.com").await;

    let found = services
        .users
        .list(&ProfileFilter::search("ALICE"))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, alice.id);

    let denied = services
        .users
        .update(
            bob.id,
            alice.id,
            ProfileChanges {
                name: Some("Hacked".into()),
                ..Default::default()
            },
            true,
        )
        .await;
    assert!(matches!(denied, Err(DomainError::Forbidden { .. })));

    let renamed = services
        .users
        .update(
            alice.id,
            alice.id,
            ProfileChanges {
                name: Some("Alice".into()),
                ..Default::default()
            },
            true,
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Alice");
}

#[tokio::test]
async fn test_feed_ownership() {
    let services = services();
    let alice = user(&services, "alice@example.com").await;
    let bob = user(&services, "bob@example.com").await;

    let item = services
        .feed
        .create(alice.id, "Baking bread".into())
        .await
        .unwrap();

    assert!(services.feed.list(bob.id).await.unwrap().is_empty());
    assert_eq!(services.feed.get(bob.id, item.id).await.unwrap().id, item.id);

    let denied = services.feed.delete(bob.id, item.id).await;
    assert!(matches!(denied, Err(DomainError::Forbidden { .. })));

    services.feed.delete(alice.id, item.id).await.unwrap();
    assert!(services.feed.list(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_tags_are_owner_scoped() {
    let services = services();
    let alice = user(&services, "alice@example.com").await;
    let bob = user(&services, "bob@example.com").await;

    services.tags.create(bob.id, "Fruity").await.unwrap();
    let comfort = services.tags.create(alice.id, "Comfort Food").await.unwrap();

    let listed = services
        .tags
        .list(alice.id, AttributeFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Comfort Food");

    let foreign = services.tags.get(bob.id, comfort.id).await;
    assert!(matches!(foreign, Err(DomainError::NotFound { .. })));

    let foreign_delete = services.tags.delete(bob.id, comfort.id).await;
    assert!(matches!(foreign_delete, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_tag_rename_keeps_owner() {
    let services = services();
    let alice = user(&services, "alice@example.com").await;
    let tag = services.tags.create(alice.id, "Dinner").await.unwrap();

    let renamed = services.tags.rename(alice.id, tag.id, "Dessert").await.unwrap();

    assert_eq!(renamed.name, "Dessert");
    assert_eq!(renamed.user_id, alice.id);
}

#[tokio::test]
async fn test_assigned_only_ingredients() {
    let services = services();
    let alice = user(&services, "alice@example.com").await;

    services
        .recipes
        .create(alice.id, recipe("Apple crumble", &[], &["Apples"]))
        .await
        .unwrap();
    services.ingredients.create(alice.id, "Turkey").await.unwrap();

    let all = services
        .ingredients
        .list(alice.id, AttributeFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let assigned = services
        .ingredients
        .list(alice.id, AttributeFilter { assigned_only: true })
        .await
        .unwrap();
    let names: Vec<_> = assigned.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Apples"]);
}

#[tokio::test]
async fn test_assigned_only_is_unique() {
    let services = services();
    let alice = user(&services, "alice@example.com").await;

    services
        .recipes
        .create(alice.id, recipe("Pancakes", &["Breakfast"], &[]))
        .await
        .unwrap();
    services
        .recipes
        .create(alice.id, recipe("Porridge", &["Breakfast"], &[]))
        .await
        .unwrap();
    services.tags.create(alice.id, "Lunch").await.unwrap();

    let assigned = services
        .tags
        .list(alice.id, AttributeFilter { assigned_only: true })
        .await
        .unwrap();

    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].name, "Breakfast");
}

#[tokio::test]
async fn test_recipes_newest_first_and_scoped() {
    let services = services();
    let alice = user(&services, "alice@example.com").await;
    let bob = user(&services, "bob@example.com").await;

    services
        .recipes
        .create(alice.id, recipe("First", &[], &[]))
        .await
        .unwrap();
    let second = services
        .recipes
        .create(alice.id, recipe("Second", &[], &[]))
        .await
        .unwrap();
    services
        .recipes
        .create(bob.id, recipe("Bob's", &[], &[]))
        .await
        .unwrap();

    let listed = services.recipes.list(alice.id).await.unwrap();
    let titles: Vec<_> = listed.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Second", "First"]);

    let foreign = services.recipes.get(bob.id, second.id).await;
    assert!(matches!(foreign, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_recipe_partial_update_keeps_links() {
    let services = services();
    let alice = user(&services, "alice@example.com").await;
    let created = services
        .recipes
        .create(alice.id, recipe("Curry", &["Spicy", "Dinner"], &["Rice"]))
        .await
        .unwrap();

    let tag_names: Vec<_> = created.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tag_names, ["Dinner", "Spicy"]);

    let updated = services
        .recipes
        .update(
            alice.id,
            created.id,
            RecipeChanges {
                title: Some("Green curry".into()),
                ..Default::default()
            },
            true,
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Green curry");
    assert_eq!(updated.tags.len(), 2);
    assert_eq!(updated.ingredients.len(), 1);

    let cleared = services
        .recipes
        .update(
            alice.id,
            created.id,
            RecipeChanges {
                tags: Some(Vec::new()),
                ..Default::default()
            },
            true,
        )
        .await
        .unwrap();
    assert!(cleared.tags.is_empty());
}

#[tokio::test]
async fn test_recipe_full_update_requires_fields() {
    let services = services();
    let alice = user(&services, "alice@example.com").await;
    let created = services
        .recipes
        .create(alice.id, recipe("Soup", &[], &[]))
        .await
        .unwrap();

    let result = services
        .recipes
        .update(
            alice.id,
            created.id,
            RecipeChanges {
                title: Some("Stew".into()),
                ..Default::default()
            },
            false,
        )
        .await;

    assert!(matches!(result, Err(DomainError::Validation(e)) if e.contains("price")));
}

#[tokio::test]
async fn test_deleting_user_cascades() {
    let services = services();
    let alice = user(&services, "alice@example.com").await;
    services
        .recipes
        .create(alice.id, recipe("Toast", &["Breakfast"], &["Bread"]))
        .await
        .unwrap();
    services.feed.create(alice.id, "Hello".into()).await.unwrap();

    services.users.delete(alice.id, alice.id).await.unwrap();

    assert!(services.recipes.list(alice.id).await.unwrap().is_empty());
    assert!(services.feed.list(alice.id).await.unwrap().is_empty());
    assert!(
        services
            .tags
            .list(alice.id, AttributeFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(matches!(
        services.users.get(alice.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let services = services();
    let alice = user(&services, "alice@example.com").await;

    assert!(matches!(
        services.tags.get(alice.id, Uuid::now_v7()).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        services.feed.get(alice.id, Uuid::now_v7()).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_failed_recipe_create_writes_nothing() {
    let services = services();
    let alice = user(&services, "alice@example.com").await;

    let result = services
        .recipes
        .create(alice.id, recipe("Orphans", &["Dessert"], &["   "]))
        .await;

    assert!(matches!(result, Err(DomainError::Validation(e)) if e.contains("ingredients")));
    assert!(
        services
            .tags
            .list(alice.id, AttributeFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(services.recipes.list(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_recipe_update_keeps_links() {
    let services = services();
    let alice = user(&services, "alice@example.com").await;
    let created = services
        .recipes
        .create(alice.id, recipe("Curry", &["Spicy"], &["Rice"]))
        .await
        .unwrap();

    let result = services
        .recipes
        .update(
            alice.id,
            created.id,
            RecipeChanges {
                tags: Some(vec!["Vegan".into()]),
                ingredients: Some(vec![String::new()]),
                ..Default::default()
            },
            true,
        )
        .await;
    assert!(matches!(result, Err(DomainError::Validation(_))));

    let tags = services
        .tags
        .list(alice.id, AttributeFilter::default())
        .await
        .unwrap();
    let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Spicy"]);
    assert_eq!(services.recipes.get(alice.id, created.id).await.unwrap(), created);
}

#[tokio::test]
async fn test_recipe_reuses_existing_tag() {
    let services = services();
    let alice = user(&services, "alice@example.com").await;
    let vegan = services.tags.create(alice.id, "Vegan").await.unwrap();

    let created = services
        .recipes
        .create(alice.id, recipe("Salad", &["Vegan", " Vegan "], &[]))
        .await
        .unwrap();

    assert_eq!(created.tags, vec![vegan]);
    let tags = services
        .tags
        .list(alice.id, AttributeFilter::default())
        .await
        .unwrap();
    assert_eq!(tags.len(), 1);
}

#[tokio::test]
async fn test_tag_names_are_unique_per_owner() {
    let services = services();
    let alice = user(&services, "alice@example.com").await;
    let bob = user(&services, "bob@example.com").await;
    services.tags.create(alice.id, "Vegan").await.unwrap();
    let lunch = services.tags.create(alice.id, "Lunch").await.unwrap();

    let duplicate = services.tags.create(alice.id, "Vegan").await;
    assert!(matches!(duplicate, Err(DomainError::Duplicate(_))));

    let clash = services.tags.rename(alice.id, lunch.id, "Vegan").await;
    assert!(matches!(clash, Err(DomainError::Duplicate(_))));

    services.tags.create(bob.id, "Vegan").await.unwrap();
}
