//! Content configuration records and loading
//!
//! A content directory holds one TOML file per record kind plus an
//! `outcomes/` directory of weighted outcome tables:
//!
//! ```text
//! content/
//!   modifiers.toml    [[modifiers]]
//!   currencies.toml   [[currencies]]
//!   essences.toml     [[essences]]
//!   omens.toml        [[omens]]
//!   bones.toml        [[bones]]
//!   settings.toml     hidden_tags = [...]
//!   outcomes/*.toml
//! ```

use crate::error::ConfigError;
use crate::mechanics::MechanicKind;
use crate::omen::OmenRule;
use crate::types::{AffixType, DefenseType};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use tables_core::OutcomeTableRegistry;

/// Lowest item level; the default modifier requirement
pub const MIN_ITEM_LEVEL: u32 = 1;
/// Highest item level; the default upper bound for bones
pub const MAX_ITEM_LEVEL: u32 = 100;

/// One modifier definition
#[derive(Debug, Clone, Deserialize)]
pub struct ModifierConfig {
    pub name: String,
    pub affix_type: AffixType,
    pub tier: u32,
    pub stat_text: String,
    /// One `[min, max]` pair per stat line; hybrids carry several
    #[serde(default)]
    pub stat_ranges: Vec<[f64; 2]>,
    /// Shorthand for a single range
    #[serde(default)]
    pub stat_min: Option<f64>,
    #[serde(default)]
    pub stat_max: Option<f64>,
    #[serde(default = "default_item_level")]
    pub required_item_level: u32,
    #[serde(default)]
    pub mod_group: String,
    #[serde(default)]
    pub applicable_items: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_exclusive: bool,
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Narrows a generic `armour` match to bases providing one of these defences
    #[serde(default)]
    pub defence_types: Vec<DefenseType>,
}

impl ModifierConfig {
    /// All ranges, merging the shorthand fields
    pub fn ranges(&self) -> Vec<(f64, f64)> {
        let mut ranges: Vec<(f64, f64)> = self.stat_ranges.iter().map(|r| (r[0], r[1])).collect();
        if ranges.is_empty() {
            if let (Some(min), Some(max)) = (self.stat_min, self.stat_max) {
                ranges.push((min, max));
            }
        }
        ranges
    }
}

/// A currency: a named, parametrized mechanic
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyConfig {
    pub name: String,
    pub mechanic: MechanicKind,
    /// `[min, max]` modifiers rolled when a mechanic fills a rare item
    #[serde(default)]
    pub mod_count: Option<[u32; 2]>,
    /// Outcome table driving Vaal and Chance mechanics
    #[serde(default)]
    pub outcome_table: Option<String>,
    /// Lowest required level a rolled modifier may have
    #[serde(default)]
    pub min_modifier_level: Option<u32>,
    #[serde(default = "default_stack_size")]
    pub stack_size: u32,
}

/// An essence: guarantees one modifier
#[derive(Debug, Clone, Deserialize)]
pub struct EssenceConfig {
    pub name: String,
    pub tier: String,
    pub essence_type: String,
    /// Name of the guaranteed modifier
    pub modifier: String,
    /// Exact tier of the guaranteed modifier; the best tier the item level allows when absent
    #[serde(default)]
    pub modifier_tier: Option<u32>,
    #[serde(default)]
    pub mod_count: Option<[u32; 2]>,
    #[serde(default = "default_stack_size")]
    pub stack_size: u32,
}

/// An omen: alters how a mechanic selects modifiers
#[derive(Debug, Clone, Deserialize)]
pub struct OmenConfig {
    pub name: String,
    /// Currency name or mechanic kind (`exalted`, `regal`, ...) the omen applies to
    pub affects: String,
    pub rule: OmenRule,
    #[serde(default)]
    pub top_tiers: Option<u32>,
    #[serde(default = "default_stack_size")]
    pub stack_size: u32,
}

/// A desecration bone
#[derive(Debug, Clone, Deserialize)]
pub struct BoneConfig {
    pub name: String,
    /// Body part (`jawbone`, `rib`, `collarbone`); also the tag revealed modifiers must carry
    pub part: String,
    pub tier: String,
    #[serde(default)]
    pub boss_tags: Vec<String>,
    #[serde(default = "default_item_level")]
    pub min_item_level: u32,
    #[serde(default = "default_max_item_level")]
    pub max_item_level: u32,
    #[serde(default)]
    pub applicable_items: Vec<String>,
    #[serde(default = "default_stack_size")]
    pub stack_size: u32,
}

/// Global content settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsConfig {
    /// Extra tags that never participate in matching
    #[serde(default)]
    pub hidden_tags: Vec<String>,
}

fn default_item_level() -> u32 {
    MIN_ITEM_LEVEL
}
fn default_max_item_level() -> u32 {
    MAX_ITEM_LEVEL
}
fn default_weight() -> u32 {
    1
}
fn default_stack_size() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
struct ModifiersFile {
    #[serde(default)]
    modifiers: Vec<ModifierConfig>,
}

#[derive(Debug, Deserialize)]
struct CurrenciesFile {
    #[serde(default)]
    currencies: Vec<CurrencyConfig>,
}

#[derive(Debug, Deserialize)]
struct EssencesFile {
    #[serde(default)]
    essences: Vec<EssenceConfig>,
}

#[derive(Debug, Deserialize)]
struct OmensFile {
    #[serde(default)]
    omens: Vec<OmenConfig>,
}

#[derive(Debug, Deserialize)]
struct BonesFile {
    #[serde(default)]
    bones: Vec<BoneConfig>,
}

/// Content file kinds within a content directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFile {
    Modifiers,
    Currencies,
    Essences,
    Omens,
    Bones,
    Settings,
}

impl ContentFile {
    pub fn file_name(&self) -> &'static str {
        match self {
            ContentFile::Modifiers => "modifiers.toml",
            ContentFile::Currencies => "currencies.toml",
            ContentFile::Essences => "essences.toml",
            ContentFile::Omens => "omens.toml",
            ContentFile::Bones => "bones.toml",
            ContentFile::Settings => "settings.toml",
        }
    }

    fn required(&self) -> bool {
        matches!(self, ContentFile::Modifiers | ContentFile::Currencies)
    }

    fn all() -> &'static [ContentFile] {
        &[
            ContentFile::Modifiers,
            ContentFile::Currencies,
            ContentFile::Essences,
            ContentFile::Omens,
            ContentFile::Bones,
            ContentFile::Settings,
        ]
    }
}

/// Raw, parsed-but-unvalidated content records
#[derive(Debug, Clone, Default)]
pub struct ContentSource {
    pub modifiers: Vec<ModifierConfig>,
    pub currencies: Vec<CurrencyConfig>,
    pub essences: Vec<EssenceConfig>,
    pub omens: Vec<OmenConfig>,
    pub bones: Vec<BoneConfig>,
    pub settings: SettingsConfig,
    pub tables: OutcomeTableRegistry,
}

impl ContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every content file from a directory
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let mut source = Self::new();

        for file in ContentFile::all() {
            let path = dir.join(file.file_name());
            if !path.exists() {
                if file.required() {
                    return Err(ConfigError::Io {
                        error: std::io::Error::new(
                            std::io::ErrorKind::NotFound,
                            "required content file is missing",
                        ),
                        path: Some(path),
                    });
                }
                continue;
            }

            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                error: e,
                path: Some(path.clone()),
            })?;
            source.parse_at(*file, &path, &content)?;
        }

        source.tables = OutcomeTableRegistry::load(&dir.join("outcomes"))?;
        Ok(source)
    }

    /// Parse a content file from a string, appending its records
    pub fn parse(&mut self, file: ContentFile, content: &str) -> Result<(), ConfigError> {
        self.parse_at(file, Path::new(file.file_name()), content)
    }

    /// Parse an outcome table from a string
    pub fn add_table(&mut self, origin: &str, content: &str) -> Result<(), ConfigError> {
        self.tables.load_str(origin, content)?;
        Ok(())
    }

    fn parse_at(&mut self, file: ContentFile, path: &Path, content: &str) -> Result<(), ConfigError> {
        match file {
            ContentFile::Modifiers => {
                let parsed: ModifiersFile = parse_toml(path, content)?;
                self.modifiers.extend(parsed.modifiers);
            }
            ContentFile::Currencies => {
                let parsed: CurrenciesFile = parse_toml(path, content)?;
                self.currencies.extend(parsed.currencies);
            }
            ContentFile::Essences => {
                let parsed: EssencesFile = parse_toml(path, content)?;
                self.essences.extend(parsed.essences);
            }
            ContentFile::Omens => {
                let parsed: OmensFile = parse_toml(path, content)?;
                self.omens.extend(parsed.omens);
            }
            ContentFile::Bones => {
                let parsed: BonesFile = parse_toml(path, content)?;
                self.bones.extend(parsed.bones);
            }
            ContentFile::Settings => {
                let parsed: SettingsConfig = parse_toml(path, content)?;
                self.settings.hidden_tags.extend(parsed.hidden_tags);
            }
        }
        Ok(())
    }
}

fn parse_toml<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse {
        error: e,
        path: path.to_path_buf(),
    })
}
