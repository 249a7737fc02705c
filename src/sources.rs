//! Dictionary source inventory
//!
//! Describes where each upstream dictionary lives, which file it produces in
//! the data directory, how its lines are laid out and which gloss column it
//! feeds.

use serde::{Deserialize, Serialize};

/// Gloss column a dictionary contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlossLang {
    English,
    EnglishHk,
    German,
    French,
}

impl GlossLang {
    /// Column name in the `cidian` table
    pub fn column(&self) -> &'static str {
        match self {
            GlossLang::English => "english",
            GlossLang::EnglishHk => "english_hk",
            GlossLang::German => "german",
            GlossLang::French => "french",
        }
    }

    /// Separator between definitions in the raw gloss blob
    pub fn delimiter(&self) -> char {
        match self {
            GlossLang::EnglishHk => ';',
            _ => '/',
        }
    }
}

/// Line layout of a CEDICT-family file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineFormat {
    /// `trad simp [pin1 yin1] /def/def/`
    #[default]
    Cedict,
    /// `trad simp [pin1 yin1] {jyut6 ping3} /def;def/`
    Canto,
}

/// An upstream dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDefinition {
    /// Display name, also used in the license document
    pub name: String,

    /// Download URL (`.u8` plain text, otherwise a zip archive)
    pub url: String,

    /// File written into the data directory (zip member name for archives)
    pub out_filename: String,

    /// Gloss column fed by this source
    #[serde(default = "default_lang")]
    pub lang: GlossLang,

    /// Line layout
    #[serde(default)]
    pub format: LineFormat,

    /// Stop copying license comments after the first line starting with this
    #[serde(default)]
    pub license_stop_marker: Option<String>,
}

fn default_lang() -> GlossLang {
    GlossLang::English
}

impl SourceDefinition {
    /// Whether the payload is served as plain text rather than a zip archive
    pub fn is_plain_text(&self) -> bool {
        self.url.ends_with(".u8")
    }
}

/// The Unihan XML export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnihanSource {
    pub name: String,
    pub url: String,
    pub out_filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_dictionaries;

    #[test]
    fn test_gloss_lang_toml_names() {
        #[derive(Deserialize)]
        struct Row {
            lang: GlossLang,
        }

        for lang in [
            GlossLang::English,
            GlossLang::EnglishHk,
            GlossLang::German,
            GlossLang::French,
        ] {
            let row: Row = toml::from_str(&format!("lang = \"{}\"", lang.column())).unwrap();
            assert_eq!(row.lang, lang);
        }
        assert!(toml::from_str::<Row>("lang = \"klingon\"").is_err());
    }

    #[test]
    fn test_cantonese_uses_semicolons() {
        assert_eq!(GlossLang::EnglishHk.delimiter(), ';');
        assert_eq!(GlossLang::German.delimiter(), '/');
    }

    #[test]
    fn test_default_inventory() {
        let sources = default_dictionaries();
        let names: Vec<_> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["CC-CEDICT", "HanDeDICT", "CFDICT", "CC-Canto"]);

        let handedict = &sources[1];
        assert!(handedict.is_plain_text());
        assert_eq!(handedict.lang, GlossLang::German);
        assert_eq!(handedict.license_stop_marker.as_deref(), Some("# Siehe https"));

        let canto = &sources[3];
        assert!(!canto.is_plain_text());
        assert_eq!(canto.format, LineFormat::Canto);
    }

    #[test]
    fn test_source_definition_toml_defaults() {
        let src: SourceDefinition = toml::from_str(
            r#"
            name = "Custom"
            url = "https://example.com/custom.u8"
            out_filename = "custom.u8"
            "#,
        )
        .unwrap();
        assert_eq!(src.lang, GlossLang::English);
        assert_eq!(src.format, LineFormat::Cedict);
        assert!(src.license_stop_marker.is_none());
    }
}
