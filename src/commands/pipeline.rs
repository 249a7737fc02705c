//! Pipeline orchestration for the action flags

use crate::backup::BackupStats;
use crate::commands::{
    cmd_backup, cmd_cleanup, cmd_delete, cmd_download, cmd_populate, print_backup_stats,
    print_download_stats, print_populate_stats, DownloadStats, PopulateStats,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::license::write_license;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// One pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Delete,
    Download,
    Populate,
    Cleanup,
    Zip,
}

/// The action flags as given on the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionFlags {
    pub delete: bool,
    pub download: bool,
    pub populate: bool,
    pub cleanup: bool,
    pub zip: bool,
    pub update: bool,
    pub all: bool,
}

impl ActionFlags {
    /// Stages to run, in order. `all` wins over `update`, which wins over the
    /// individual flags.
    pub fn plan(&self) -> Vec<Action> {
        use Action::*;
        if self.all {
            return vec![Delete, Download, Populate, Cleanup, Zip];
        }
        if self.update {
            return vec![Delete, Download, Populate];
        }
        [
            (self.delete, Delete),
            (self.download, Download),
            (self.populate, Populate),
            (self.cleanup, Cleanup),
            (self.zip, Zip),
        ]
        .into_iter()
        .filter_map(|(on, action)| on.then_some(action))
        .collect()
    }

    /// Whether any action flag was given
    pub fn any(&self) -> bool {
        !self.plan().is_empty()
    }
}

/// What happened to the license document at the end of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum LicenseRefresh {
    Written { path: PathBuf },
    SourcesMissing { missing: String },
}

/// Report of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub actions: Vec<Action>,
    pub deleted: Option<PathBuf>,
    pub download: Option<DownloadStats>,
    pub populate: Option<PopulateStats>,
    pub cleaned: bool,
    pub backup: Option<BackupStats>,
    pub license: LicenseRefresh,
}

/// Rewrite the license document; missing source files are reported, not fatal
pub fn refresh_license(config: &Config) -> Result<LicenseRefresh> {
    match write_license(config) {
        Ok(path) => Ok(LicenseRefresh::Written { path }),
        Err(Error::SourceMissing(missing)) => {
            warn!(%missing, "License not refreshed");
            Ok(LicenseRefresh::SourcesMissing { missing })
        }
        Err(e) => Err(e),
    }
}

/// Run the planned stages in order, then refresh the license document
pub async fn cmd_pipeline(config: &Config, flags: ActionFlags) -> Result<RunReport> {
    let started_at = Utc::now();
    let actions = flags.plan();
    info!(?actions, "Starting pipeline");

    let mut deleted = None;
    let mut download = None;
    let mut populate = None;
    let mut cleaned = false;
    let mut backup = None;

    for &action in &actions {
        match action {
            Action::Delete => deleted = cmd_delete(config)?,
            Action::Download => download = Some(cmd_download(config).await?),
            Action::Populate => populate = Some(cmd_populate(config).await?),
            Action::Cleanup => {
                cmd_cleanup(config).await?;
                cleaned = true;
            }
            Action::Zip => backup = Some(cmd_backup(config)?),
        }
    }

    let license = refresh_license(config)?;
    let finished_at = Utc::now();
    info!(
        elapsed_ms = (finished_at - started_at).num_milliseconds(),
        "Pipeline finished"
    );

    Ok(RunReport {
        started_at,
        finished_at,
        actions,
        deleted,
        download,
        populate,
        cleaned,
        backup,
        license,
    })
}

/// Print run report to console
pub fn print_run_report(report: &RunReport) {
    if let Some(stats) = &report.download {
        print_download_stats(stats);
    }
    if let Some(stats) = &report.populate {
        print_populate_stats(stats);
    }
    if report.cleaned {
        println!("Removed lookup indexes and compacted the database");
    }
    if let Some(stats) = &report.backup {
        print_backup_stats(stats);
    }
    if let LicenseRefresh::SourcesMissing { .. } = report.license {
        println!("No files found, you might need to run with --download first");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::test_support::write_sources;
    use tempfile::TempDir;

    #[test]
    fn test_plan_precedence() {
        use Action::*;
        let all = ActionFlags {
            all: true,
            update: true,
            ..Default::default()
        };
        assert_eq!(all.plan(), vec![Delete, Download, Populate, Cleanup, Zip]);

        let update = ActionFlags {
            update: true,
            zip: true,
            ..Default::default()
        };
        assert_eq!(update.plan(), vec![Delete, Download, Populate]);

        let some = ActionFlags {
            zip: true,
            populate: true,
            ..Default::default()
        };
        assert_eq!(some.plan(), vec![Populate, Zip]);
        assert!(!ActionFlags::default().any());
    }

    #[tokio::test]
    async fn test_empty_run_reports_missing_sources() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data_dir = tmp.path().to_path_buf();

        let report = cmd_pipeline(&config, ActionFlags::default()).await.unwrap();
        assert!(report.actions.is_empty());
        match &report.license {
            LicenseRefresh::SourcesMissing { missing } => {
                assert!(missing.ends_with(&config.unihan.out_filename))
            }
            other => panic!("unexpected license status: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_populate_cleanup_zip_run() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data_dir = tmp.path().join("data");
        write_sources(&config);
        std::fs::write(config.corpus_cache_path(), "Hello.\t你好。\n").unwrap();

        let flags = ActionFlags {
            delete: true,
            populate: true,
            cleanup: true,
            zip: true,
            ..Default::default()
        };
        let report = cmd_pipeline(&config, flags).await.unwrap();
        assert_eq!(report.deleted, None);
        assert_eq!(report.populate.as_ref().unwrap().words, 2);
        assert!(report.cleaned);
        // Five sources plus the corpus cache; database and license excluded
        assert_eq!(report.backup.as_ref().unwrap().files, 6);
        assert!(matches!(report.license, LicenseRefresh::Written { .. }));
        assert!(report.finished_at >= report.started_at);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["license"]["status"], "written");
        assert_eq!(json["actions"][0], "delete");

        let decoded: RunReport = serde_json::from_value(json).unwrap();
        let backup = decoded.backup.unwrap();
        assert_eq!(backup.files, 6);
        assert_eq!(backup.path, config.backup_path());
    }
}
