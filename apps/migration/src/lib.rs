//! Schema migrations.

pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_users;
mod m20240601_000002_create_feed_items;
mod m20240601_000003_create_recipes;
mod m20240615_000004_unique_attribute_names;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_users::Migration),
            Box::new(m20240601_000002_create_feed_items::Migration),
            Box::new(m20240601_000003_create_recipes::Migration),
            Box::new(m20240615_000004_unique_attribute_names::Migration),
        ]
    }
}
