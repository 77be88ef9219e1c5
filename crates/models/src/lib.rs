pub mod errors;
pub mod db;
pub mod schema;
pub mod plan;

pub mod product;
pub mod team;
pub mod service;
pub mod config;
pub mod service_dependency;
pub mod project;
pub mod template;
pub mod project_template;
pub mod service_dependency_template;
pub mod task;

pub use plan::{Node, Plan, Record, Relations, Row};
pub use schema::{CatalogEntity, EntityKind, EntitySchema, Fields, Relationship};

#[cfg(test)]
mod tests;
