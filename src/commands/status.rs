//! Status command implementation

use crate::config::Config;
use crate::db::{DbStats, DictDb};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Presence of one downloaded source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFileStatus {
    pub name: String,
    pub path: String,
    pub present: bool,
    pub bytes: u64,
}

/// Status information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusInfo {
    pub config_path: String,
    pub data_dir: String,
    pub db_path: String,
    pub db_exists: bool,
    pub sources: Vec<SourceFileStatus>,
    pub corpus_cached: bool,
    pub license_present: bool,
    pub db_stats: Option<DbStats>,
}

fn file_status(name: &str, path: &std::path::Path) -> SourceFileStatus {
    let bytes = std::fs::metadata(path).map(|m| m.len()).ok();
    SourceFileStatus {
        name: name.to_string(),
        path: path.display().to_string(),
        present: bytes.is_some(),
        bytes: bytes.unwrap_or(0),
    }
}

/// Get data directory and database status
pub async fn cmd_status(config: &Config) -> Result<StatusInfo> {
    info!("Getting status");

    let mut sources = vec![file_status(
        &config.unihan.name,
        &config.source_path(&config.unihan.out_filename),
    )];
    for source in &config.dictionaries {
        sources.push(file_status(
            &source.name,
            &config.source_path(&source.out_filename),
        ));
    }

    let db_path = config.db_path();
    let db_exists = db_path.is_file();
    let db_stats = if db_exists {
        let db = DictDb::open_existing(&db_path).await?;
        let stats = db.stats().await;
        db.close().await;
        Some(stats?)
    } else {
        None
    };

    Ok(StatusInfo {
        config_path: config.paths.config_file.display().to_string(),
        data_dir: config.data_dir.display().to_string(),
        db_path: db_path.display().to_string(),
        db_exists,
        sources,
        corpus_cached: config.corpus_cache_path().is_file(),
        license_present: config.license_path().is_file(),
        db_stats,
    })
}

/// Print status to console
pub fn print_status(status: &StatusInfo) {
    println!("\n📊 cidian Status\n");
    println!("Configuration: {}", status.config_path);
    println!("Data directory: {}", status.data_dir);

    println!("\nSources:");
    for source in &status.sources {
        if source.present {
            println!("  ✓ {} ({} bytes)", source.name, source.bytes);
        } else {
            println!("  ✗ {} (run with --download)", source.name);
        }
    }
    let mark = |present: bool| if present { "✓" } else { "✗" };
    println!("  {} Sentence corpus cache", mark(status.corpus_cached));
    println!("  {} License document", mark(status.license_present));

    println!("\nDatabase: {}", status.db_path);
    match &status.db_stats {
        Some(stats) => {
            println!("  Characters: {}", stats.characters);
            println!("  Words: {}", stats.words);
            let indexes = if stats.indexes.is_empty() {
                "none (run 'cidian index' to recreate)".to_string()
            } else {
                stats.indexes.join(", ")
            };
            println!("  Indexes: {}", indexes);
        }
        None => println!("  Not built (run with --populate)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::test_support::write_sources;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_status_before_and_after_build() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data_dir = tmp.path().to_path_buf();

        let status = cmd_status(&config).await.unwrap();
        assert!(!status.db_exists);
        assert!(status.db_stats.is_none());
        assert_eq!(status.sources.len(), 5);
        assert!(status.sources.iter().all(|s| !s.present));

        write_sources(&config);
        let db = DictDb::open(&config.db_path()).await.unwrap();
        db.recreate_hanzi_table().await.unwrap();
        db.recreate_words_table().await.unwrap();
        db.close().await;

        let status = cmd_status(&config).await.unwrap();
        assert!(status.sources.iter().all(|s| s.present));
        let stats = status.db_stats.unwrap();
        assert_eq!(stats.words, 0);
        assert_eq!(stats.indexes.len(), 3);
    }
}
