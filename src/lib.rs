//! cidian - builds the Chinese dictionary database
//!
//! This crate provides:
//! - Downloads of the Unihan database, the CEDICT-family dictionaries and
//!   the Tatoeba sentence corpus
//! - Parsers for each source format
//! - A SQLite store (`hanzi` and `cidian` tables) with merge-on-conflict
//!   word imports and usage sentences
//! - The aggregated license document and a zip backup of the data directory

pub mod backup;
pub mod commands;
pub mod config;
pub mod corpus;
pub mod db;
pub mod error;
pub mod fetch;
pub mod license;
pub mod models;
pub mod parse;
pub mod progress;
pub mod sources;

pub use config::Config;
pub use error::{Error, Result};
