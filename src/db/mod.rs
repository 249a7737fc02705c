//! Dictionary storage using SQLite
//!
//! This module handles the `hanzi` and `cidian` tables:
//! - Rebuilding both tables from scratch
//! - Word upserts that merge glosses on key conflicts
//! - Index removal and space reclamation before shipping
//! - Lookups against the built store

mod schema;

pub use schema::*;

use crate::error::{Error, Result};
use crate::models::{merge_definitions, HanziEntry, WordEntry};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{Sqlite, Transaction};
use std::path::Path;
use tracing::{debug, info};

/// What a word upsert did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// New (traditional, pinyin) key
    Inserted,
    /// Existing key; glosses concatenated, usage overwritten
    Merged,
    /// Existing key; Cantonese fields overwritten
    Replaced,
}

/// Row counts of the built store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DbStats {
    /// Characters with a Mandarin reading
    pub characters: usize,
    /// Words with a simplified form
    pub words: usize,
    /// Lookup indexes currently present
    pub indexes: Vec<String>,
}

/// Dictionary database handle
#[derive(Clone)]
pub struct DictDb {
    pool: SqlitePool,
}

impl DictDb {
    /// Open (creating if needed) the dictionary database
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Rollback journal keeps the shipped database a single file
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete)
            .synchronous(SqliteSynchronous::Normal);

        debug!("Connecting to SQLite database at {:?}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Open an existing database, failing if the file has not been built
    pub async fn open_existing(db_path: &Path) -> Result<Self> {
        if !db_path.exists() {
            return Err(Error::NotBuilt(db_path.display().to_string()));
        }
        Self::open(db_path).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Check whether a table exists
    pub async fn has_table(&self, name: &str) -> Result<bool> {
        let result: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(result.is_some())
    }

    // ===== Hanzi =====

    /// Drop and recreate the `hanzi` table
    pub async fn recreate_hanzi_table(&self) -> Result<()> {
        info!("Creating hanzi table");
        sqlx::query(HANZI_TABLE_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert characters in one transaction
    pub async fn insert_hanzi(&self, entries: &[HanziEntry]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO hanzi (cp, kMandarin, kCantonese, kSimplifiedVariant, kTraditionalVariant)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&entry.cp)
            .bind(&entry.mandarin)
            .bind(&entry.cantonese)
            .bind(&entry.simplified_variant)
            .bind(&entry.traditional_variant)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(entries.len())
    }

    /// Look up one character
    pub async fn lookup_hanzi(&self, cp: &str) -> Result<Option<HanziEntry>> {
        let entry = sqlx::query_as::<_, HanziEntry>("SELECT * FROM hanzi WHERE cp = ?")
            .bind(cp)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entry)
    }

    // ===== Words =====

    /// Drop and recreate the `cidian` table
    pub async fn recreate_words_table(&self) -> Result<()> {
        info!("Creating cidian table");
        sqlx::query(WORDS_TABLE_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Start a word import; everything upserted is committed together
    pub async fn begin_word_import(&self) -> Result<WordImport<'static>> {
        let tx = self.pool.begin().await?;
        Ok(WordImport {
            tx,
            stats: ImportStats::default(),
        })
    }

    /// Get a word by its key
    pub async fn get_word(&self, traditional: &str, pinyin: &str) -> Result<Option<WordEntry>> {
        let entry = sqlx::query_as::<_, WordEntry>(
            "SELECT * FROM cidian WHERE traditional = ? AND pinyin = ?",
        )
        .bind(traditional)
        .bind(pinyin)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    /// Words written `text` in either script
    pub async fn lookup_words(&self, text: &str) -> Result<Vec<WordEntry>> {
        let entries = sqlx::query_as::<_, WordEntry>(
            "SELECT * FROM cidian WHERE simplified = ? OR traditional = ? ORDER BY pinyin",
        )
        .bind(text)
        .bind(text)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    // ===== Maintenance =====

    /// Remove lookup indexes and defragment
    pub async fn cleanup(&self) -> Result<()> {
        sqlx::query(DROP_INDICES_SQL).execute(&self.pool).await?;
        sqlx::query("VACUUM").execute(&self.pool).await?;
        Ok(())
    }

    /// Recreate the lookup indexes dropped by cleanup
    pub async fn create_indices(&self) -> Result<()> {
        sqlx::query(CREATE_INDICES_SQL).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn count_hanzi(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(kMandarin) FROM hanzi")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    pub async fn count_words(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(simplified) FROM cidian")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    /// Lookup indexes currently present
    pub async fn list_indexes(&self) -> Result<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type='index' AND name IN (?, ?, ?) ORDER BY name",
        )
        .bind(INDEX_NAMES[0])
        .bind(INDEX_NAMES[1])
        .bind(INDEX_NAMES[2])
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }

    /// Row counts, treating missing tables as empty
    pub async fn stats(&self) -> Result<DbStats> {
        let characters = if self.has_table("hanzi").await? {
            self.count_hanzi().await?
        } else {
            0
        };
        let words = if self.has_table("cidian").await? {
            self.count_words().await?
        } else {
            0
        };
        Ok(DbStats {
            characters,
            words,
            indexes: self.list_indexes().await?,
        })
    }
}

/// Counters for one word import
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportStats {
    pub inserted: usize,
    pub merged: usize,
    pub replaced: usize,
}

impl ImportStats {
    pub fn total(&self) -> usize {
        self.inserted + self.merged + self.replaced
    }

    fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Merged => self.merged += 1,
            UpsertOutcome::Replaced => self.replaced += 1,
        }
    }
}

/// An open word import transaction
pub struct WordImport<'c> {
    tx: Transaction<'c, Sqlite>,
    stats: ImportStats,
}

impl WordImport<'_> {
    /// Insert a word, or merge it into the row sharing its key
    pub async fn upsert(&mut self, mut entry: WordEntry) -> Result<UpsertOutcome> {
        entry.normalize();

        let inserted = sqlx::query(
            r#"
            INSERT INTO cidian (traditional, simplified, pinyin, pinyin_tw, jyutping, classifiers, variants,
                                english, english_hk, german, french, english_usage)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(traditional, pinyin) DO NOTHING
            "#,
        )
        .bind(&entry.traditional)
        .bind(&entry.simplified)
        .bind(&entry.pinyin)
        .bind(&entry.pinyin_tw)
        .bind(&entry.jyutping)
        .bind(&entry.classifiers)
        .bind(&entry.variants)
        .bind(&entry.english)
        .bind(&entry.english_hk)
        .bind(&entry.german)
        .bind(&entry.french)
        .bind(&entry.english_usage)
        .execute(&mut *self.tx)
        .await?
        .rows_affected();

        let outcome = if inserted > 0 {
            UpsertOutcome::Inserted
        } else if entry.is_cantonese() {
            sqlx::query(
                "UPDATE cidian SET jyutping = ?, english_hk = ? WHERE traditional = ? AND pinyin = ?",
            )
            .bind(&entry.jyutping)
            .bind(&entry.english_hk)
            .bind(&entry.traditional)
            .bind(&entry.pinyin)
            .execute(&mut *self.tx)
            .await?;
            UpsertOutcome::Replaced
        } else {
            let (english, german, french): (Option<String>, Option<String>, Option<String>) =
                sqlx::query_as(
                    "SELECT english, german, french FROM cidian WHERE traditional = ? AND pinyin = ?",
                )
                .bind(&entry.traditional)
                .bind(&entry.pinyin)
                .fetch_one(&mut *self.tx)
                .await?;

            // A source only carries its own gloss column, so merging the
            // others against None keeps the stored value.
            sqlx::query(
                r#"
                UPDATE cidian SET english = ?, german = ?, french = ?, english_usage = ?
                WHERE traditional = ? AND pinyin = ?
                "#,
            )
            .bind(merge_definitions(english.as_deref(), entry.english.as_deref()))
            .bind(merge_definitions(german.as_deref(), entry.german.as_deref()))
            .bind(merge_definitions(french.as_deref(), entry.french.as_deref()))
            .bind(&entry.english_usage)
            .bind(&entry.traditional)
            .bind(&entry.pinyin)
            .execute(&mut *self.tx)
            .await?;
            UpsertOutcome::Merged
        };

        self.stats.record(outcome);
        Ok(outcome)
    }

    pub fn stats(&self) -> &ImportStats {
        &self.stats
    }

    /// Commit every upsert made through this import
    pub async fn commit(self) -> Result<ImportStats> {
        self.tx.commit().await?;
        Ok(self.stats)
    }
}
