#![cfg(test)]
use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

use crate::catalog::Catalog;

/// Migrated SQLite file that lives as long as the value.
pub struct TestDb {
    _dir: TempDir,
    pub db: DatabaseConnection,
}

impl TestDb {
    pub fn catalog(&self) -> Catalog {
        Catalog::from_connection(self.db.clone())
    }
}

pub async fn get_db() -> Result<TestDb, anyhow::Error> {
    let dir = tempfile::tempdir()?;
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("catalog.db").display());
    let cfg = DatabaseConfig { url, ..Default::default() };
    let db = models::db::connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(TestDb { _dir: dir, db })
}
