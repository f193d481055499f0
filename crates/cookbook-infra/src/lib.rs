//! # Cookbook Infrastructure
//!
//! Concrete implementations of the ports defined in `cookbook-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory repositories only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `auth` - JWT tokens and Argon2 password hashing
//! - `rate-limit` - Per-key rate limiting via governor

pub mod database;
pub mod memory;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use database::DatabaseConfig;
pub use memory::{
    InMemoryAttributeRepository, InMemoryFeedRepository, InMemoryRecipeRepository,
    InMemoryUserRepository, MemoryStore,
};

#[cfg(feature = "postgres")]
pub use database::{
    PostgresFeedRepository, PostgresIngredientRepository, PostgresRecipeRepository,
    PostgresTagRepository, PostgresUserRepository, connect,
};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
