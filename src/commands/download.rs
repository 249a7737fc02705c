//! Download command - fetch every source into the data directory

use crate::config::Config;
use crate::corpus::SentenceCorpus;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::progress::Step;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Download statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadStats {
    /// Files written for Unihan and each dictionary
    pub files: Vec<PathBuf>,
    /// Source sentences loaded
    pub source_sentences: usize,
    /// Target sentences loaded
    pub target_sentences: usize,
    /// Links loaded
    pub links: usize,
    /// Pairs in the merged corpus cache
    pub corpus_pairs: usize,
}

async fn run_step<T, F>(message: String, fut: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    let step = Step::start(message);
    match fut.await {
        Ok(value) => {
            step.ok();
            Ok(value)
        }
        Err(e) => {
            step.fail();
            Err(e)
        }
    }
}

/// Download Unihan and every dictionary source
pub async fn cmd_download_dictionaries(
    config: &Config,
    fetcher: &Fetcher,
    stats: &mut DownloadStats,
) -> Result<()> {
    let path = run_step(
        format!("Downloading {}", config.unihan.name),
        fetcher.download_unihan(&config.unihan),
    )
    .await?;
    stats.files.push(path);

    for source in &config.dictionaries {
        let path = run_step(
            format!("Downloading {} Dictionary", source.name),
            fetcher.download_dictionary(source),
        )
        .await?;
        stats.files.push(path);
    }

    Ok(())
}

/// Download both sentence exports and the link table, merge them and write
/// the corpus cache
pub async fn cmd_download_corpus(
    config: &Config,
    fetcher: &Fetcher,
    stats: &mut DownloadStats,
) -> Result<SentenceCorpus> {
    let root = &config.tatoeba.download_root;
    let source_lang = &config.tatoeba.source_lang;
    let target_lang = &config.tatoeba.target_lang;

    let source = run_step(
        format!("Downloading Tatoeba {} sentences", source_lang),
        fetcher.download_sentences(root, source_lang),
    )
    .await?;
    let target = run_step(
        format!("Downloading Tatoeba {} sentences", target_lang),
        fetcher.download_sentences(root, target_lang),
    )
    .await?;
    let links = run_step(
        "Downloading Tatoeba links".to_string(),
        fetcher.download_links(root),
    )
    .await?;

    let corpus = SentenceCorpus::merge(&source, &target, &links);
    corpus.write_cache(&config.corpus_cache_path())?;
    info!(
        pairs = corpus.len(),
        path = %config.corpus_cache_path().display(),
        "Merged sentence corpus"
    );

    stats.source_sentences = source.len();
    stats.target_sentences = target.len();
    stats.links = links.len();
    stats.corpus_pairs = corpus.len();
    Ok(corpus)
}

/// Execute download command
pub async fn cmd_download(config: &Config) -> Result<DownloadStats> {
    info!(data_dir = %config.data_dir.display(), "Starting download");
    std::fs::create_dir_all(&config.data_dir)?;

    let fetcher = Fetcher::from_config(config)?;
    let mut stats = DownloadStats::default();
    cmd_download_dictionaries(config, &fetcher, &mut stats).await?;
    cmd_download_corpus(config, &fetcher, &mut stats).await?;
    Ok(stats)
}

/// Print download stats to console
pub fn print_download_stats(stats: &DownloadStats) {
    println!("\n⬇️  Download Complete\n");
    println!("Files saved: {}", stats.files.len());
    for file in &stats.files {
        println!("  {}", file.display());
    }
    println!(
        "Sentences: {} source, {} target, {} links",
        stats.source_sentences, stats.target_sentences, stats.links
    );
    println!("Corpus pairs: {}", stats.corpus_pairs);
}
