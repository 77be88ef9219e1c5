//! Migrator registering entity-specific migrations in dependency order.
//! Parents are created before the tables referencing them.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_product;
mod m20240101_000002_create_team;
mod m20240101_000003_create_service;
mod m20240101_000004_create_config;
mod m20240101_000005_create_project;
mod m20240101_000006_create_template;
mod m20240101_000007_create_project_template;
mod m20240101_000008_create_service_dependency;
mod m20240101_000009_create_service_dependency_template;
mod m20240101_000010_create_task;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_product::Migration),
            Box::new(m20240101_000002_create_team::Migration),
            Box::new(m20240101_000003_create_service::Migration),
            Box::new(m20240101_000004_create_config::Migration),
            Box::new(m20240101_000005_create_project::Migration),
            Box::new(m20240101_000006_create_template::Migration),
            Box::new(m20240101_000007_create_project_template::Migration),
            Box::new(m20240101_000008_create_service_dependency::Migration),
            Box::new(m20240101_000009_create_service_dependency_template::Migration),
            Box::new(m20240101_000010_create_task::Migration),
        ]
    }
}
