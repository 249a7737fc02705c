//! Init command implementation

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Write a default configuration file and create the data directory
pub fn cmd_init(config_path: &Path, data_dir: Option<PathBuf>, force: bool) -> Result<Config> {
    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    let mut config = Config::default();
    config.paths.config_file = config_path.to_path_buf();
    if let Some(data_dir) = data_dir {
        config.data_dir = data_dir;
    }

    config.save()?;
    std::fs::create_dir_all(&config.data_dir)?;
    info!(config = %config_path.display(), data_dir = %config.data_dir.display(), "Initialized");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        let data_dir = tmp.path().join("data");

        cmd_init(&path, Some(data_dir.clone()), false).unwrap();
        assert!(data_dir.is_dir());

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.data_dir, data_dir);
        assert_eq!(loaded.dictionaries.len(), 4);
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "db_file_name = \"mine.db\"\n").unwrap();

        assert!(matches!(
            cmd_init(&path, None, false),
            Err(Error::Config(_))
        ));
        cmd_init(&path, Some(tmp.path().join("data")), true).unwrap();
        assert_eq!(Config::load(&path).unwrap().db_file_name, "chinese.db");
    }
}
