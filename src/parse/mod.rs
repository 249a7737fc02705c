//! Source file parsing
//!
//! This module handles:
//! - CEDICT-family line dictionaries (CC-CEDICT, HanDeDICT, CFDICT, CC-Canto)
//! - The Unihan flat XML export
//! - License header extraction from both

mod cedict;
mod unihan;

pub use cedict::*;
pub use unihan::*;

use crate::error::{Error, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Open a downloaded source file, mapping a missing file to `SourceMissing`
pub fn open_source(path: &Path) -> Result<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::SourceMissing(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Read a downloaded source file to a string, mapping a missing file to `SourceMissing`
pub fn read_source(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::SourceMissing(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
