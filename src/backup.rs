//! Zip backup of the data directory

use crate::config::Config;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Statistics from writing a backup archive
#[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
pub struct BackupStats {
    pub path: PathBuf,
    pub files: usize,
    pub skipped: usize,
    pub bytes: u64,
}

/// File name fragments never included in a backup
fn excluded_fragments(config: &Config) -> [&str; 5] {
    [
        config.db_file_name.as_str(),
        "-journal",
        config.license_file_name.as_str(),
        "update",
        config.backup_file_name.as_str(),
    ]
}

fn is_excluded(name: &str, fragments: &[&str]) -> bool {
    fragments.iter().any(|f| !f.is_empty() && name.contains(f))
}

/// Zip every file under `root` into `writer`, naming entries
/// `<root dir name>/<relative path>`. `output` is the archive being written
/// and is left out without counting as skipped.
fn zip_dir<W: Write + Seek>(
    root: &Path,
    writer: W,
    output: &Path,
    fragments: &[&str],
    stats: &mut BackupStats,
) -> Result<W> {
    let prefix = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(writer);

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.path() == output {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if is_excluded(&file_name, fragments) {
            debug!(file = %file_name, "Skipping excluded file");
            stats.skipped += 1;
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| Error::Other(e.to_string()))?;
        let mut name = prefix.clone();
        for part in rel.components() {
            if !name.is_empty() {
                name.push('/');
            }
            name.push_str(&part.as_os_str().to_string_lossy());
        }

        zip.start_file(name, options)?;
        let mut file = File::open(entry.path())?;
        stats.bytes += std::io::copy(&mut file, &mut zip)?;
        stats.files += 1;
    }

    Ok(zip.finish()?)
}

/// Write the backup archive of the data directory
pub fn write_backup(config: &Config) -> Result<BackupStats> {
    let path = config.backup_path();
    let mut stats = BackupStats {
        path: path.clone(),
        ..Default::default()
    };

    // Build in a sibling temp file so the walk never sees a half-written archive
    let tmp = path.with_extension("zip.part");
    let fragments = excluded_fragments(config);
    let writer = File::create(&tmp)?;

    match zip_dir(&config.data_dir, writer, &tmp, &fragments, &mut stats) {
        Ok(file) => {
            file.sync_all()?;
            std::fs::rename(&tmp, &path)?;
        }
        Err(e) => {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
    }

    debug!(path = %path.display(), files = stats.files, "Wrote backup archive");
    Ok(stats)
}
