//! Error types for content loading, requests and rule-level crafting failures

use crate::types::{AffixType, Rarity};
use std::path::PathBuf;
use thiserror::Error;

/// Malformed or missing content. Fatal at load time.
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
    #[error(transparent)]
    Tables(#[from] tables_core::ConfigError),
}

impl ConfigError {
    pub(crate) fn validation(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::Validation {
            message: message.into(),
            path: path.into(),
        }
    }
}

/// A malformed request: reported to the caller instead of as a simulation outcome
#[derive(Debug, Error)]
pub enum CraftError {
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
    #[error("Unknown omen: {0}")]
    UnknownOmen(String),
}

/// Why a mechanic refused or failed to change an item.
///
/// These never escape the engine as errors; they become `success = false`
/// outcomes carrying the original item.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CraftFailure {
    #[error("{currency} requires {expected} item, but the item is {found}")]
    RarityMismatch {
        currency: String,
        expected: &'static str,
        found: Rarity,
    },
    #[error("Corrupted items cannot be modified")]
    Corrupted,
    #[error("No {0} slot available")]
    NoSlotAvailable(SlotRequirement),
    #[error("Item has no modifiers")]
    NoModifiers,
    #[error("Item level {level} is outside the range {min}-{max}")]
    LevelOutOfRange { level: u32, min: u32, max: u32 },
    #[error("{0}")]
    NotApplicable(String),
    #[error("No suitable modifier found for {0}")]
    PoolExhausted(SlotRequirement),
    #[error("The item was not turned into a unique")]
    ChanceFailed,
    #[error("Item already carries a desecrated modifier")]
    AlreadyDesecrated,
    #[error("Item has no unrevealed modifiers")]
    NothingToReveal,
}

/// Which affix slot a failed roll was aiming for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRequirement {
    Any,
    Only(AffixType),
}

impl From<Option<AffixType>> for SlotRequirement {
    fn from(value: Option<AffixType>) -> Self {
        value.map_or(SlotRequirement::Any, SlotRequirement::Only)
    }
}

impl std::fmt::Display for SlotRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotRequirement::Any => write!(f, "affix"),
            SlotRequirement::Only(affix_type) => write!(f, "{}", affix_type),
        }
    }
}
