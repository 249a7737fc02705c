//! Configuration management for cidian
//!
//! Handles loading, saving, and validating configuration from TOML files.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use crate::sources::{SourceDefinition, UnihanSource};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding downloads, the database and the license document
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// SQLite database file name inside `data_dir`
    #[serde(default = "default_db_file_name")]
    pub db_file_name: String,

    /// License aggregation document file name inside `data_dir`
    #[serde(default = "default_license_file_name")]
    pub license_file_name: String,

    /// Backup archive file name inside `data_dir`
    #[serde(default = "default_backup_file_name")]
    pub backup_file_name: String,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Unihan character database source
    #[serde(default = "default_unihan")]
    pub unihan: UnihanSource,

    /// Word dictionaries, imported in this order
    #[serde(default = "default_dictionaries")]
    pub dictionaries: Vec<SourceDefinition>,

    /// Tatoeba sentence corpus configuration
    #[serde(default)]
    pub tatoeba: TatoebaConfig,

    /// Usage sentence configuration
    #[serde(default)]
    pub usage: UsageConfig,

    /// Paths configuration (internal, not user-editable)
    #[serde(skip)]
    pub paths: PathsConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

/// Tatoeba corpus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TatoebaConfig {
    /// Export root; per-language files live under `per_language/`
    #[serde(default = "default_tatoeba_root")]
    pub download_root: String,

    /// Language of the translation shown under each usage sentence
    #[serde(default = "default_tatoeba_source_lang")]
    pub source_lang: String,

    /// Language searched for dictionary headwords
    #[serde(default = "default_tatoeba_target_lang")]
    pub target_lang: String,
}

/// Usage sentence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageConfig {
    /// Maximum sentence pairs per word (0 = unlimited)
    #[serde(default = "default_max_usage_sentences")]
    pub max_usage_sentences: usize,
}

/// Internal paths configuration
#[derive(Debug, Clone, Default)]
pub struct PathsConfig {
    /// Path to config file
    pub config_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            db_file_name: default_db_file_name(),
            license_file_name: default_license_file_name(),
            backup_file_name: default_backup_file_name(),
            http: HttpConfig::default(),
            unihan: default_unihan(),
            dictionaries: default_dictionaries(),
            tatoeba: TatoebaConfig::default(),
            usage: UsageConfig::default(),
            paths: PathsConfig {
                config_file: Self::default_config_path(),
            },
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_http_timeout(),
        }
    }
}

impl Default for TatoebaConfig {
    fn default() -> Self {
        Self {
            download_root: default_tatoeba_root(),
            source_lang: default_tatoeba_source_lang(),
            target_lang: default_tatoeba_target_lang(),
        }
    }
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            max_usage_sentences: default_max_usage_sentences(),
        }
    }
}

impl Config {
    /// Get the default base directory for cidian (~/.cidian)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cidian")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.paths = PathsConfig {
            config_file: config_path.to_path_buf(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path` (or the default location), falling
    /// back to defaults when no file exists
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_config_path);

        if config_path.exists() {
            return Self::load(&config_path);
        }

        if path.is_some() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        debug!("No config file found, using defaults");
        let mut config = Config::default();
        config.paths.config_file = config_path;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.paths.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.paths.config_file, content)?;
        info!("Saved config to {:?}", self.paths.config_file);
        Ok(())
    }

    /// Path to the SQLite database
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    /// Path to the license aggregation document
    pub fn license_path(&self) -> PathBuf {
        self.data_dir.join(&self.license_file_name)
    }

    /// Path to the backup archive
    pub fn backup_path(&self) -> PathBuf {
        self.data_dir.join(&self.backup_file_name)
    }

    /// Path of a downloaded source file
    pub fn source_path(&self, out_filename: &str) -> PathBuf {
        self.data_dir.join(out_filename)
    }

    /// Path of the cached sentence corpus (`eng_cmn.csv`)
    pub fn corpus_cache_path(&self) -> PathBuf {
        self.data_dir.join(format!(
            "{}_{}.csv",
            self.tatoeba.source_lang, self.tatoeba.target_lang
        ))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_secs == 0 {
            return Err(Error::Config(
                "http.timeout_secs must be positive".to_string(),
            ));
        }

        if self.db_file_name.trim().is_empty() {
            return Err(Error::Config("db_file_name must not be empty".to_string()));
        }

        Url::parse(&self.unihan.url)
            .map_err(|e| Error::Config(format!("unihan.url is invalid: {}", e)))?;
        Url::parse(&self.tatoeba.download_root)
            .map_err(|e| Error::Config(format!("tatoeba.download_root is invalid: {}", e)))?;

        if self.tatoeba.source_lang.is_empty() || self.tatoeba.target_lang.is_empty() {
            return Err(Error::Config(
                "tatoeba.source_lang and tatoeba.target_lang must be set".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for source in &self.dictionaries {
            if !names.insert(source.name.to_lowercase()) {
                return Err(Error::Config(format!(
                    "Duplicate dictionary name: {}",
                    source.name
                )));
            }
            Url::parse(&source.url).map_err(|e| {
                Error::Config(format!("dictionaries '{}' url is invalid: {}", source.name, e))
            })?;
            if source.out_filename.trim().is_empty() {
                return Err(Error::Config(format!(
                    "dictionaries '{}' needs an out_filename",
                    source.name
                )));
            }
        }

        Ok(())
    }
}
