//! Lookup command - query the built database

use crate::config::Config;
use crate::db::DictDb;
use crate::error::Result;
use crate::models::{HanziEntry, WordEntry};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Words and characters matching a lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupResult {
    pub query: String,
    pub words: Vec<WordEntry>,
    pub characters: Vec<HanziEntry>,
}

/// Execute lookup command
pub async fn cmd_lookup(config: &Config, text: &str) -> Result<LookupResult> {
    info!(text, "Looking up");

    let db = DictDb::open_existing(&config.db_path()).await?;
    let words = db.lookup_words(text).await?;

    let mut characters = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for ch in text.chars().filter(|ch| seen.insert(*ch)) {
        if let Some(entry) = db.lookup_hanzi(&ch.to_string()).await? {
            characters.push(entry);
        }
    }
    db.close().await;

    Ok(LookupResult {
        query: text.to_string(),
        words,
        characters,
    })
}

fn print_field(label: &str, value: Option<&str>) {
    let Some(value) = value else { return };
    let mut lines = value.lines();
    if let Some(first) = lines.next() {
        println!("  {:<11} {}", label, first);
    }
    for line in lines {
        println!("  {:<11} {}", "", line);
    }
}

/// Print lookup result to console
pub fn print_lookup(result: &LookupResult) {
    if result.words.is_empty() && result.characters.is_empty() {
        println!("No entries for '{}'", result.query);
        return;
    }

    for word in &result.words {
        println!("\n{} / {} [{}]", word.traditional, word.simplified, word.pinyin);
        print_field("Taiwan:", word.pinyin_tw.as_deref());
        print_field("Jyutping:", word.jyutping.as_deref());
        print_field("Classifier:", word.classifiers.as_deref());
        print_field("Variants:", word.variants.as_deref());
        print_field("English:", word.english.as_deref());
        print_field("HK English:", word.english_hk.as_deref());
        print_field("German:", word.german.as_deref());
        print_field("French:", word.french.as_deref());
        print_field("Usage:", word.english_usage.as_deref());
    }

    if !result.characters.is_empty() {
        println!("\nCharacters:");
        for hanzi in &result.characters {
            println!(
                "  {}  {}  {}",
                hanzi.cp,
                hanzi.mandarin.as_deref().unwrap_or("-"),
                hanzi.cantonese.as_deref().unwrap_or("-")
            );
            if let Some(simplified) = &hanzi.simplified_variant {
                println!("     simplified: {}", simplified);
            }
            if let Some(traditional) = &hanzi.traditional_variant {
                println!("     traditional: {}", traditional);
            }
        }
    }
}
