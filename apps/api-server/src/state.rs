//! Application state - shared across all handlers.

use std::sync::Arc;

use cookbook_core::DomainError;
use cookbook_core::domain::{Ingredient, NewUser, Tag};
use cookbook_core::ports::{
    AttributeRepository, FeedRepository, PasswordService, RecipeRepository, TokenService,
    UserRepository,
};
use cookbook_core::services::{AttributeService, FeedService, RecipeService, UserService};
use cookbook_infra::{
    Argon2PasswordService, InMemoryAttributeRepository, InMemoryFeedRepository,
    InMemoryRecipeRepository, InMemoryUserRepository, JwtTokenService, MemoryStore,
};

use crate::config::AppConfig;

/// Repository set the services are built on.
struct Repositories {
    users: Arc<dyn UserRepository>,
    feed: Arc<dyn FeedRepository>,
    recipes: Arc<dyn RecipeRepository>,
    tags: Arc<dyn AttributeRepository<Tag>>,
    ingredients: Arc<dyn AttributeRepository<Ingredient>>,
}

impl Repositories {
    fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(InMemoryUserRepository::new(store.clone())),
            feed: Arc::new(InMemoryFeedRepository::new(store.clone())),
            recipes: Arc::new(InMemoryRecipeRepository::new(store.clone())),
            tags: Arc::new(InMemoryAttributeRepository::<Tag>::new(store.clone())),
            ingredients: Arc::new(InMemoryAttributeRepository::<Ingredient>::new(store)),
        }
    }

    #[cfg(feature = "postgres")]
    async fn postgres(config: &cookbook_infra::DatabaseConfig) -> anyhow::Result<Self> {
        use cookbook_infra::{
            PostgresFeedRepository, PostgresIngredientRepository, PostgresRecipeRepository,
            PostgresTagRepository, PostgresUserRepository,
        };
        use migration::{Migrator, MigratorTrait};

        let db = cookbook_infra::connect(config).await?;
        Migrator::up(&db, None).await?;
        tracing::info!("Database migrations applied");

        Ok(Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            feed: Arc::new(PostgresFeedRepository::new(db.clone())),
            recipes: Arc::new(PostgresRecipeRepository::new(db.clone())),
            tags: Arc::new(PostgresTagRepository::new(db.clone())),
            ingredients: Arc::new(PostgresIngredientRepository::new(db)),
        })
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub feed: Arc<FeedService>,
    pub recipes: Arc<RecipeService>,
    pub tags: Arc<AttributeService<Tag>>,
    pub ingredients: Arc<AttributeService<Ingredient>>,
    pub tokens: Arc<dyn TokenService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let repos = match &config.database {
            #[cfg(feature = "postgres")]
            Some(db_config) => Repositories::postgres(db_config).await?,
            #[cfg(not(feature = "postgres"))]
            Some(_) => {
                tracing::warn!("Built without postgres support; ignoring DATABASE_URL");
                Repositories::in_memory()
            }
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Repositories::in_memory()
            }
        };

        let state = Self::assemble(
            repos,
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            Arc::new(Argon2PasswordService::new()),
        );
        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(tokens: Arc<dyn TokenService>, passwords: Arc<dyn PasswordService>) -> Self {
        Self::assemble(Repositories::in_memory(), tokens, passwords)
    }

    fn assemble(
        repos: Repositories,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(repos.users, passwords)),
            feed: Arc::new(FeedService::new(repos.feed)),
            recipes: Arc::new(RecipeService::new(repos.recipes)),
            tags: Arc::new(AttributeService::new(repos.tags)),
            ingredients: Arc::new(AttributeService::new(repos.ingredients)),
            tokens,
        }
    }

    /// Create the configured superuser unless that email is already taken.
    pub async fn bootstrap_superuser(&self, superuser: Option<NewUser>) -> anyhow::Result<()> {
        let Some(superuser) = superuser else {
            return Ok(());
        };

        match self.users.create_superuser(superuser).await {
            Ok(user) => tracing::info!(user_id = %user.id, "Superuser bootstrapped"),
            Err(DomainError::Duplicate(_)) => tracing::debug!("Superuser already exists"),
            Err(e) => return Err(anyhow::anyhow!("superuser bootstrap failed: {e}")),
        }
        Ok(())
    }
}
