//! Modifier definitions and the immutable catalog that indexes them

use crate::config::ModifierConfig;
use crate::error::ConfigError;
use crate::exclusion::exclusion_group_id;
use crate::types::{AffixType, DefenseType, Tag};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Tag marking modifiers that only essences can grant
pub const ESSENCE_ONLY: &str = "essence_only";
/// Tag marking modifiers that only desecration reveals can grant
pub const DESECRATED_ONLY: &str = "desecrated_only";

/// Internal tags that never gate player-facing themes
const SYSTEM_TAGS: &[&str] = &["default", ESSENCE_ONLY, DESECRATED_ONLY];

/// Numeric range of one stat line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatRange {
    pub min: f64,
    pub max: f64,
}

impl StatRange {
    pub fn new(min: f64, max: f64) -> Self {
        StatRange { min, max }
    }

    /// Integral ranges roll whole numbers
    pub fn is_integral(&self) -> bool {
        self.min.fract() == 0.0 && self.max.fract() == 0.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Sample a value within the range
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.min >= self.max {
            return self.max;
        }
        if self.is_integral() {
            rng.gen_range(self.min as i64..=self.max as i64) as f64
        } else {
            let value = rng.gen_range(self.min..=self.max);
            (value * 100.0).round() / 100.0
        }
    }
}

/// An immutable modifier definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemModifier {
    pub name: String,
    pub affix_type: AffixType,
    /// Lower is stronger
    pub tier: u32,
    /// Stat template shared by every tier of the same stat; one line per range
    pub stat_text: String,
    pub ranges: Vec<StatRange>,
    pub required_item_level: u32,
    pub mod_group: String,
    pub applicable_items: Vec<String>,
    pub tags: Vec<Tag>,
    pub is_exclusive: bool,
    pub weight: u32,
    pub defence_types: Vec<DefenseType>,
}

impl ItemModifier {
    fn from_config(config: ModifierConfig, path: &Path) -> Result<Self, ConfigError> {
        let label = format!("modifier '{}' tier {}", config.name, config.tier);
        if config.name.trim().is_empty() {
            return Err(ConfigError::validation(path, "modifier with empty name"));
        }
        if config.stat_text.trim().is_empty() {
            return Err(ConfigError::validation(path, format!("{} has no stat_text", label)));
        }
        if config.tier == 0 {
            return Err(ConfigError::validation(path, format!("{} has tier 0", label)));
        }
        if config.applicable_items.is_empty() {
            return Err(ConfigError::validation(
                path,
                format!("{} has no applicable_items", label),
            ));
        }

        let ranges = config.ranges();
        if ranges.is_empty() {
            return Err(ConfigError::validation(path, format!("{} has no stat ranges", label)));
        }
        if let Some((min, max)) = ranges.iter().find(|(min, max)| !min.is_finite() || !max.is_finite()) {
            return Err(ConfigError::validation(
                path,
                format!("{} has non-finite range {}..{}", label, min, max),
            ));
        }
        if let Some((min, max)) = ranges.iter().find(|(min, max)| min > max) {
            return Err(ConfigError::validation(
                path,
                format!("{} has inverted range {}..{}", label, min, max),
            ));
        }

        Ok(ItemModifier {
            name: config.name,
            affix_type: config.affix_type,
            tier: config.tier,
            stat_text: config.stat_text,
            ranges: ranges.into_iter().map(|(min, max)| StatRange::new(min, max)).collect(),
            required_item_level: config.required_item_level,
            mod_group: config.mod_group,
            applicable_items: config.applicable_items,
            tags: config.tags,
            is_exclusive: config.is_exclusive,
            weight: config.weight,
            defence_types: config.defence_types,
        })
    }

    /// Exclusion-group key of this modifier
    pub fn group_key(&self) -> String {
        exclusion_group_id(self)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_essence_only(&self) -> bool {
        self.has_tag(ESSENCE_ONLY)
    }

    pub fn is_desecrated_only(&self) -> bool {
        self.has_tag(DESECRATED_ONLY)
    }

    /// Whether ordinary rolls may produce this modifier
    pub fn is_restricted(&self) -> bool {
        self.is_essence_only() || self.is_desecrated_only()
    }
}

/// The full, immutable set of modifier definitions
#[derive(Debug, Clone, Default)]
pub struct ModifierCatalog {
    modifiers: Vec<ItemModifier>,
    hidden_tags: HashSet<String>,
}

impl ModifierCatalog {
    /// Build and validate a catalog. `origin` names the source in errors.
    pub fn from_configs(
        configs: Vec<ModifierConfig>,
        hidden_tags: &[String],
        origin: &Path,
    ) -> Result<Self, ConfigError> {
        let modifiers: Vec<ItemModifier> = configs
            .into_iter()
            .map(|c| ItemModifier::from_config(c, origin))
            .collect::<Result<_, _>>()?;

        // Tiers of one stat must form a strict progression
        let mut seen: HashMap<(&str, u32), &str> = HashMap::new();
        for m in &modifiers {
            if let Some(other) = seen.insert((m.stat_text.as_str(), m.tier), m.name.as_str()) {
                return Err(ConfigError::validation(
                    origin,
                    format!(
                        "modifiers '{}' and '{}' share stat '{}' and tier {}",
                        other, m.name, m.stat_text, m.tier
                    ),
                ));
            }
        }

        Ok(ModifierCatalog {
            modifiers,
            hidden_tags: hidden_tags.iter().cloned().collect(),
        })
    }

    pub fn all(&self) -> &[ItemModifier] {
        &self.modifiers
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Every tier of the named modifier, in catalog order
    pub fn named<'a: 'n, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a ItemModifier> + 'n {
        self.modifiers.iter().filter(move |m| m.name == name)
    }

    /// Look up one tier of a modifier by name
    pub fn find(&self, name: &str, tier: u32) -> Option<&ItemModifier> {
        self.named(name).find(|m| m.tier == tier)
    }

    /// Hidden tags are internal and never participate in matching
    pub fn is_hidden_tag(&self, tag: &str) -> bool {
        tag.starts_with('_') || SYSTEM_TAGS.contains(&tag) || self.hidden_tags.contains(tag)
    }

    /// Tags of a modifier that may participate in matching
    pub fn visible_tags<'a>(&'a self, modifier: &'a ItemModifier) -> impl Iterator<Item = &'a str> + 'a {
        modifier
            .tags
            .iter()
            .map(|t| t.as_str())
            .filter(move |t| !self.is_hidden_tag(t))
    }
}
