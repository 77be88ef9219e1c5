use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, DatabaseBackend, EntityTrait, PaginatorTrait, Statement};

use super::support::test_db;
use crate::{product, project_template};

/// Connect through the configured pool and run a trivial query
#[tokio::test]
async fn test_basic_connection() -> Result<()> {
    let t = test_db().await?;
    assert_eq!(t.db.get_database_backend(), DatabaseBackend::Sqlite);

    let stmt = Statement::from_string(DatabaseBackend::Sqlite, "SELECT 1 AS test".to_string());
    let row = t.db.query_one(stmt).await?.expect("one row");
    let value: i32 = row.try_get("", "test")?;
    assert_eq!(value, 1);
    Ok(())
}

/// Migrations create every table and can run twice
#[tokio::test]
async fn test_migrations_are_idempotent() -> Result<()> {
    let t = test_db().await?;
    migration::Migrator::up(&t.db, None).await?;

    assert_eq!(product::Entity::find().count(&t.db).await?, 0);
    assert_eq!(project_template::Entity::find().count(&t.db).await?, 0);
    Ok(())
}

/// sqlx turns SQLite foreign key enforcement on
#[tokio::test]
async fn test_foreign_keys_enforced() -> Result<()> {
    let t = test_db().await?;
    let stmt = Statement::from_string(DatabaseBackend::Sqlite, "PRAGMA foreign_keys".to_string());
    let row = t.db.query_one(stmt).await?.expect("pragma row");
    let enabled: i32 = row.try_get_by_index(0)?;
    assert_eq!(enabled, 1);
    Ok(())
}
