//! Delete, cleanup, index and backup commands

use crate::backup::{write_backup, BackupStats};
use crate::config::Config;
use crate::db::DictDb;
use crate::error::Result;
use crate::progress::Step;
use std::path::PathBuf;
use tracing::info;

/// Remove the database file; returns the path when something was deleted
pub fn cmd_delete(config: &Config) -> Result<Option<PathBuf>> {
    let path = config.db_path();
    if !path.is_file() {
        return Ok(None);
    }
    std::fs::remove_file(&path)?;
    info!(path = %path.display(), "Deleted database");
    println!("Deleted {}", path.display());
    Ok(Some(path))
}

/// Drop the lookup indexes and vacuum the database, creating an empty one if
/// nothing has been built yet
pub async fn cmd_cleanup(config: &Config) -> Result<()> {
    let step = Step::start("Optimizing database size");
    let db = match DictDb::open(&config.db_path()).await {
        Ok(db) => db,
        Err(e) => {
            step.fail();
            return Err(e);
        }
    };
    let result = db.cleanup().await;
    db.close().await;
    match result {
        Ok(()) => step.ok(),
        Err(e) => {
            step.fail();
            return Err(e);
        }
    }
    Ok(())
}

/// Recreate the lookup indexes removed by cleanup
pub async fn cmd_index(config: &Config) -> Result<Vec<String>> {
    let db = DictDb::open_existing(&config.db_path()).await?;
    db.create_indices().await?;
    let indexes = db.list_indexes().await?;
    db.close().await;
    info!(?indexes, "Recreated lookup indexes");
    Ok(indexes)
}

/// Zip the data directory
pub fn cmd_backup(config: &Config) -> Result<BackupStats> {
    crate::progress::with_step("Zipping backup data", |_| write_backup(config))
}

/// Print backup stats to console
pub fn print_backup_stats(stats: &BackupStats) {
    println!(
        "Backup written to {} ({} files, {} bytes, {} skipped)",
        stats.path.display(),
        stats.files,
        stats.bytes,
        stats.skipped
    );
}
