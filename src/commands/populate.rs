//! Populate command - build the hanzi and cidian tables from downloaded sources

use crate::config::Config;
use crate::corpus::SentenceCorpus;
use crate::db::{DictDb, ImportStats};
use crate::error::Result;
use crate::license::write_license;
use crate::parse::{open_source, parse_unihan, read_entries, read_source};
use crate::progress::{with_step, Step};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Populate statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopulateStats {
    /// Unihan rows inserted
    pub hanzi_rows: usize,
    /// Characters with a Mandarin reading
    pub characters: usize,
    /// Word import counters per dictionary
    pub imports: BTreeMap<String, ImportStats>,
    /// Words with a simplified form
    pub words: usize,
}

/// Rebuild the hanzi table from the Unihan export
pub async fn cmd_populate_hanzi(
    config: &Config,
    db: &DictDb,
    stats: &mut PopulateStats,
) -> Result<()> {
    let step = Step::start("Importing Unihan database");
    let result = async {
        let xml = read_source(&config.source_path(&config.unihan.out_filename))?;
        let entries = parse_unihan(&xml);
        db.recreate_hanzi_table().await?;
        db.insert_hanzi(&entries).await
    }
    .await;

    match result {
        Ok(rows) => {
            step.ok();
            stats.hanzi_rows = rows;
        }
        Err(e) => {
            step.fail();
            return Err(e);
        }
    }

    stats.characters = db.count_hanzi().await?;
    println!("Imported {} characters", stats.characters);
    Ok(())
}

/// Rebuild the cidian table from every dictionary, attaching usage sentences
pub async fn cmd_populate_words(
    config: &Config,
    db: &DictDb,
    stats: &mut PopulateStats,
) -> Result<()> {
    let corpus = with_step("Loading sentence corpus", |step| {
        let corpus = SentenceCorpus::read_cache(open_source(&config.corpus_cache_path())?)?;
        step.detail(format!("{} pairs", corpus.len()));
        Ok::<_, crate::error::Error>(corpus)
    })?;
    let max_usage = config.usage.max_usage_sentences;

    db.recreate_words_table().await?;
    let mut import = db.begin_word_import().await?;

    for source in &config.dictionaries {
        let step = Step::start(format!("Importing {}, this may take a while", source.name));
        let before = import.stats().clone();

        let result = async {
            let reader = open_source(&config.source_path(&source.out_filename))?;
            for entry in read_entries(reader, source) {
                let mut entry = entry?;
                entry.english_usage =
                    corpus.usage_for(&entry.simplified, &entry.traditional, max_usage);
                import.upsert(entry).await?;
                let done = import.stats().total() - before.total();
                if done % 10_000 == 0 {
                    step.detail(format!("{} entries", done));
                }
            }
            Ok::<_, crate::error::Error>(())
        }
        .await;

        if let Err(e) = result {
            step.fail();
            return Err(e);
        }
        step.ok();

        let after = import.stats();
        let delta = ImportStats {
            inserted: after.inserted - before.inserted,
            merged: after.merged - before.merged,
            replaced: after.replaced - before.replaced,
        };
        debug!(
            source = %source.name,
            inserted = delta.inserted,
            merged = delta.merged,
            replaced = delta.replaced,
            "Imported dictionary"
        );
        stats.imports.insert(source.name.clone(), delta);
    }

    import.commit().await?;
    stats.words = db.count_words().await?;
    println!("Imported {} words", stats.words);
    Ok(())
}

/// Execute populate command: license, characters, then words
pub async fn cmd_populate(config: &Config) -> Result<PopulateStats> {
    info!(db = %config.db_path().display(), "Populating database");

    with_step("Updating license document", |_| write_license(config))?;

    let db = DictDb::open(&config.db_path()).await?;
    let mut stats = PopulateStats::default();
    let result = async {
        cmd_populate_hanzi(config, &db, &mut stats).await?;
        cmd_populate_words(config, &db, &mut stats).await
    }
    .await;
    db.close().await;
    result?;

    Ok(stats)
}

/// Print populate stats to console
pub fn print_populate_stats(stats: &PopulateStats) {
    println!("\n📥 Populate Complete\n");
    println!("Characters: {} ({} rows)", stats.characters, stats.hanzi_rows);
    println!("Words: {}", stats.words);
    for (name, import) in &stats.imports {
        println!(
            "  {}: {} new, {} merged, {} replaced",
            name, import.inserted, import.merged, import.replaced
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::test_support::write_sources;
    use tempfile::TempDir;

    fn test_config(tmp: &TempDir) -> Config {
        let mut config = Config::default();
        config.data_dir = tmp.path().join("data");
        write_sources(&config);
        std::fs::write(
            config.corpus_cache_path(),
            "Hello.\t你好。\nTen thousand.\t一萬。\n",
        )
        .unwrap();
        config
    }

    #[tokio::test]
    async fn test_populate_builds_both_tables() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);

        let stats = cmd_populate(&config).await.unwrap();
        assert_eq!(stats.hanzi_rows, 2);
        assert_eq!(stats.characters, 2);
        assert_eq!(stats.words, 2);
        assert_eq!(stats.imports["CC-CEDICT"].inserted, 2);
        assert_eq!(stats.imports["HanDeDICT"].merged, 1);
        assert_eq!(stats.imports["CC-Canto"].replaced, 1);
        assert!(config.license_path().exists());

        let db = DictDb::open_existing(&config.db_path()).await.unwrap();
        let word = db.get_word("你好", "ni3 hao3").await.unwrap().unwrap();
        assert_eq!(word.english.as_deref(), Some("hello\nhi"));
        assert_eq!(word.german.as_deref(), Some("Hallo"));
        assert_eq!(word.french.as_deref(), Some("bonjour"));
        assert_eq!(word.jyutping.as_deref(), Some("nei5 hou2"));
        assert_eq!(word.english_hk.as_deref(), Some("hello\nhow do you do"));
        assert_eq!(word.english_usage.as_deref(), Some("你好。\nHello."));

        let wan = db.get_word("萬", "wan4").await.unwrap().unwrap();
        assert_eq!(wan.classifiers.as_deref(), Some("個|个[ge4]"));
        assert_eq!(wan.english_usage.as_deref(), Some("一萬。\nTen thousand."));

        let hanzi = db.lookup_hanzi("万").await.unwrap().unwrap();
        assert_eq!(hanzi.traditional_variant.as_deref(), Some("萬"));
    }

    #[tokio::test]
    async fn test_populate_is_repeatable() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);

        let first = cmd_populate(&config).await.unwrap();
        let second = cmd_populate(&config).await.unwrap();
        assert_eq!(first.words, second.words);
        assert_eq!(first.characters, second.characters);

        let db = DictDb::open_existing(&config.db_path()).await.unwrap();
        let word = db.get_word("你好", "ni3 hao3").await.unwrap().unwrap();
        assert_eq!(word.english.as_deref(), Some("hello\nhi"));
    }

    #[tokio::test]
    async fn test_populate_without_corpus_cache() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        std::fs::remove_file(config.corpus_cache_path()).unwrap();

        let err = cmd_populate(&config).await.unwrap_err();
        assert!(matches!(err, crate::error::Error::SourceMissing(_)));
    }
}
