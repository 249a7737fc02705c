//! Dictionary records stored in the `hanzi` and `cidian` tables

use crate::sources::GlossLang;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single character from Unihan
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct HanziEntry {
    /// The character itself
    pub cp: String,

    #[sqlx(rename = "kMandarin")]
    #[serde(rename = "kMandarin")]
    pub mandarin: Option<String>,

    #[sqlx(rename = "kCantonese")]
    #[serde(rename = "kCantonese")]
    pub cantonese: Option<String>,

    /// Simplified variant characters, `", "`-joined
    #[sqlx(rename = "kSimplifiedVariant")]
    #[serde(rename = "kSimplifiedVariant")]
    pub simplified_variant: Option<String>,

    /// Traditional variant characters, `", "`-joined
    #[sqlx(rename = "kTraditionalVariant")]
    #[serde(rename = "kTraditionalVariant")]
    pub traditional_variant: Option<String>,
}

/// A word keyed by (traditional, pinyin)
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct WordEntry {
    pub traditional: String,
    pub simplified: String,
    pub pinyin: String,
    pub pinyin_tw: Option<String>,
    pub jyutping: Option<String>,
    pub classifiers: Option<String>,
    pub variants: Option<String>,
    pub english: Option<String>,
    pub english_hk: Option<String>,
    pub german: Option<String>,
    pub french: Option<String>,
    /// Usage sentence pairs, `"<target>\n<source>"` blocks separated by a blank line
    pub english_usage: Option<String>,
}

impl WordEntry {
    pub fn set_gloss(&mut self, lang: GlossLang, value: Option<String>) {
        let slot = match lang {
            GlossLang::English => &mut self.english,
            GlossLang::EnglishHk => &mut self.english_hk,
            GlossLang::German => &mut self.german,
            GlossLang::French => &mut self.french,
        };
        *slot = value;
    }

    /// Entries carrying jyutping come from a Cantonese dictionary and
    /// overwrite instead of merging
    pub fn is_cantonese(&self) -> bool {
        self.jyutping.is_some()
    }

    /// Lower-case the romanization fields
    pub fn normalize(&mut self) {
        self.pinyin = self.pinyin.to_lowercase();
        for field in [&mut self.pinyin_tw, &mut self.jyutping] {
            if let Some(value) = field.as_mut() {
                *value = value.to_lowercase();
            }
        }
    }
}

/// Combine two gloss blobs, newline-separated, skipping empty sides
pub fn merge_definitions(old: Option<&str>, new: Option<&str>) -> Option<String> {
    match (old.filter(|s| !s.is_empty()), new.filter(|s| !s.is_empty())) {
        (None, None) => None,
        (Some(old), None) => Some(old.to_string()),
        (None, Some(new)) => Some(new.to_string()),
        (Some(old), Some(new)) => Some(format!("{}\n{}", old, new)),
    }
}
