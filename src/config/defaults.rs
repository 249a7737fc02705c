//! Default values for configuration

use crate::sources::{GlossLang, LineFormat, SourceDefinition, UnihanSource};
use std::path::PathBuf;

/// Default data directory (`CIDIAN_DATA_DIR`, else ~/.cidian/data)
pub fn default_data_dir() -> PathBuf {
    std::env::var("CIDIAN_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".cidian")
                .join("data")
        })
}

/// Default database file name
pub fn default_db_file_name() -> String {
    "chinese.db".to_string()
}

/// Default license document file name
pub fn default_license_file_name() -> String {
    "COPYING.txt".to_string()
}

/// Default backup archive file name
pub fn default_backup_file_name() -> String {
    "db.zip".to_string()
}

/// Default user agent (some sources reject requests without a browser one)
pub fn default_user_agent() -> String {
    "Mozilla/5.0 Gecko/20100101 Firefox/84.0".to_string()
}

/// Default request timeout in seconds
pub fn default_http_timeout() -> u64 {
    300
}

/// Default Tatoeba export root
pub fn default_tatoeba_root() -> String {
    "https://downloads.tatoeba.org/exports/".to_string()
}

/// Default corpus source language (usage sentence translation)
pub fn default_tatoeba_source_lang() -> String {
    "eng".to_string()
}

/// Default corpus target language (sentence searched for the headword)
pub fn default_tatoeba_target_lang() -> String {
    "cmn".to_string()
}

/// Default: keep every matching usage sentence
pub fn default_max_usage_sentences() -> usize {
    0
}

/// Default Unihan source
pub fn default_unihan() -> UnihanSource {
    UnihanSource {
        name: "Unihan".to_string(),
        url: "https://unicode.org/Public/UCD/latest/ucdxml/ucd.unihan.flat.zip".to_string(),
        out_filename: "ucd.unihan.flat.xml".to_string(),
    }
}

/// Default dictionary inventory, in import order
pub fn default_dictionaries() -> Vec<SourceDefinition> {
    vec![
        SourceDefinition {
            name: "CC-CEDICT".to_string(),
            url: "https://www.mdbg.net/chinese/export/cedict/cedict_1_0_ts_utf-8_mdbg.zip"
                .to_string(),
            out_filename: "cedict_ts.u8".to_string(),
            lang: GlossLang::English,
            format: LineFormat::Cedict,
            license_stop_marker: None,
        },
        SourceDefinition {
            name: "HanDeDICT".to_string(),
            url: "https://raw.githubusercontent.com/gugray/HanDeDict/master/handedict.u8"
                .to_string(),
            out_filename: "handedict.u8".to_string(),
            lang: GlossLang::German,
            format: LineFormat::Cedict,
            license_stop_marker: Some("# Siehe https".to_string()),
        },
        SourceDefinition {
            name: "CFDICT".to_string(),
            url: "https://chine.in/mandarin/dictionnaire/CFDICT/cfdict.zip".to_string(),
            out_filename: "cfdict.u8".to_string(),
            lang: GlossLang::French,
            format: LineFormat::Cedict,
            license_stop_marker: None,
        },
        SourceDefinition {
            name: "CC-Canto".to_string(),
            url: "https://cantonese.org/cccanto-160115.zip".to_string(),
            out_filename: "cccanto-webdist.txt".to_string(),
            lang: GlossLang::EnglishHk,
            format: LineFormat::Canto,
            license_stop_marker: None,
        },
    ]
}
