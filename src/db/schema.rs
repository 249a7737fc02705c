//! SQLite schema definition

/// Character table, one row per Unihan codepoint with a Chinese reading
pub const HANZI_TABLE_SQL: &str = r#"
DROP TABLE IF EXISTS hanzi;
CREATE TABLE hanzi (
    cp TEXT,
    kMandarin TEXT,
    kCantonese TEXT,
    kSimplifiedVariant TEXT,
    kTraditionalVariant TEXT
);
CREATE UNIQUE INDEX icp ON hanzi (cp);
"#;

/// Word table keyed by (traditional, pinyin)
pub const WORDS_TABLE_SQL: &str = r#"
DROP TABLE IF EXISTS cidian;
CREATE TABLE cidian (
    traditional TEXT,
    simplified TEXT,
    pinyin TEXT,
    pinyin_tw TEXT,
    jyutping TEXT,
    classifiers TEXT,
    variants TEXT,
    english TEXT,
    english_hk TEXT,
    german TEXT,
    french TEXT,
    english_usage TEXT,
    PRIMARY KEY (traditional, pinyin)
);
CREATE INDEX isimplified ON cidian (simplified);
CREATE UNIQUE INDEX itraditional ON cidian (traditional, pinyin);
"#;

/// Lookup indexes, dropped by cleanup to shrink the shipped file
pub const CREATE_INDICES_SQL: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS icp ON hanzi (cp);
CREATE INDEX IF NOT EXISTS isimplified ON cidian (simplified);
CREATE UNIQUE INDEX IF NOT EXISTS itraditional ON cidian (traditional, pinyin);
"#;

pub const DROP_INDICES_SQL: &str = r#"
DROP INDEX IF EXISTS icp;
DROP INDEX IF EXISTS isimplified;
DROP INDEX IF EXISTS itraditional;
"#;

/// Names of the lookup indexes
pub const INDEX_NAMES: [&str; 3] = ["icp", "isimplified", "itraditional"];
