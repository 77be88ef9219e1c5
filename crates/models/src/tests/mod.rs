/// Connection and schema bootstrap tests
pub mod db_tests;



pub mod support {
    use anyhow::Result;
    use configs::DatabaseConfig;
    use sea_orm::DatabaseConnection;
    use tempfile::TempDir;

    use crate::db::connect_and_migrate;

    /// A migrated SQLite database living in a temp dir for the test's lifetime.
    pub struct TestDb {
        _dir: TempDir,
        pub db: DatabaseConnection,
    }

    pub async fn test_db() -> Result<TestDb> {
        let dir = tempfile::tempdir()?;
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("catalog.db").display());
        let cfg = DatabaseConfig { url, ..Default::default() };
        let db = connect_and_migrate(&cfg).await?;
        Ok(TestDb { _dir: dir, db })
    }
}
