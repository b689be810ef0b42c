//! Storage layer: catalog store pool setup and migrations.
//!
//! The catalog database is owned by the ingestion application; this crate
//! only opens it. `connect` never creates a missing database file; callers
//! that need to wait for the store to appear do so before connecting.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};

pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let mut url = database_url.to_string();
    if !database_url.starts_with("sqlite:") {
        let path = PathBuf::from(database_url);
        let norm = path.to_string_lossy().replace('\\', "/");
        if path.is_absolute() {
            url = format!("sqlite:///{}", norm.trim_start_matches('/'));
        } else {
            url = format!("sqlite://{}", norm);
        }
    }
    let mut opts = SqlitePoolOptions::new();
    if url.contains("memory") {
        opts = opts.max_connections(1);
    } else {
        opts = opts.max_connections(5);
    }
    let pool = opts.connect(&url).await?;
    Ok(pool)
}

/// Whether the store's backing file exists yet. Memory URLs always count as
/// present.
pub fn store_exists(database_url: &str) -> bool {
    if database_url.contains("memory") {
        return true;
    }
    let path = database_url.strip_prefix("sqlite://").unwrap_or(database_url);
    Path::new(path).exists()
}

pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    // Applies SQLx migrations located in crates/storage/migrations.
    // Safe to run multiple times (idempotent).
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
