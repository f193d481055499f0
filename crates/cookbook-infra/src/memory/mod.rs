//! In-memory repositories - used when no database is configured, and in tests.

mod repos;
mod store;

pub use repos::{
    InMemoryAttributeRepository, InMemoryFeedRepository, InMemoryRecipeRepository,
    InMemoryUserRepository,
};
pub use store::MemoryStore;
