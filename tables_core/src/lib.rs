//! Weighted outcome tables rolled by chance-style and corruption-style
//! currencies. Tables are loaded from TOML, may nest other tables, and are
//! filtered by item level and base type before each roll.

mod config;
mod outcome;
mod registry;
mod table;

pub use outcome::Outcome;
pub use registry::OutcomeTableRegistry;
pub use table::OutcomeTable;

use std::path::PathBuf;
use thiserror::Error;

/// Error loading outcome table configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("Parse error in '{path}': {error}")]
    Parse {
        error: toml::de::Error,
        path: PathBuf,
    },
    #[error("Validation error in '{path}': {message}")]
    Validation { message: String, path: PathBuf },
}

/// Error rolling an outcome table
#[derive(Debug, Error)]
pub enum RollError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),
    #[error("Cycle detected in table references: {0}")]
    CycleDetected(String),
    #[error("Invalid entry type: {0}")]
    InvalidEntryType(String),
}
