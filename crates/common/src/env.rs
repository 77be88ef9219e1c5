//! Environment/runtime helpers
//!
//! Sanity checks to ensure the storage location exists at startup.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Filesystem path of a SQLite database URL, if it points at a file.
///
/// `sqlite::memory:` and non-SQLite URLs yield `None`.
pub fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Ensure the directory holding a file-backed SQLite database exists.
pub async fn ensure_env(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_file_path(database_url) else {
        debug!("database is not file backed; nothing to prepare");
        return Ok(());
    };
    let dir = match path.parent() {
        Some(dir) if dir != Path::new("") => dir,
        _ => return Ok(()),
    };
    if tokio::fs::metadata(dir).await.is_err() {
        info!(dir = %dir.display(), "creating database directory");
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    Ok(())
}
