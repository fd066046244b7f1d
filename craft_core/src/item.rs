use crate::catalog::{ItemModifier, StatRange};
use crate::exclusion::group_id_for_stat;
use crate::types::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// An item being crafted.
///
/// Mechanics never mutate the caller's item; they clone it, change the
/// clone and hand it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftableItem {
    /// Base type display name (e.g. "Silk Robe")
    pub base_name: String,
    /// Base category used for modifier eligibility (e.g. "int_armour")
    pub base_category: String,
    /// Specific equipment slot
    #[serde(default)]
    pub class: Option<ItemClass>,
    #[serde(default)]
    pub rarity: Rarity,
    pub item_level: u32,
    #[serde(default)]
    pub quality: u32,
    #[serde(default)]
    pub prefix_mods: Vec<Modifier>,
    #[serde(default)]
    pub suffix_mods: Vec<Modifier>,
    /// Desecrated slots awaiting a reveal
    #[serde(default)]
    pub unrevealed_mods: Vec<UnrevealedModifier>,
    #[serde(default)]
    pub corrupted: bool,
    /// Set when the item became a named unique
    #[serde(default)]
    pub unique_name: Option<String>,
    /// Base defences keyed by stat (`armour`, `evasion`, `energy_shield`)
    #[serde(default)]
    pub base_stats: BTreeMap<String, f64>,
    /// Base stats after modifiers and quality
    #[serde(default)]
    pub calculated_stats: BTreeMap<String, f64>,
}

impl CraftableItem {
    /// Create a normal item with no modifiers
    pub fn new(base_name: impl Into<String>, base_category: impl Into<String>, item_level: u32) -> Self {
        CraftableItem {
            base_name: base_name.into(),
            base_category: base_category.into(),
            class: None,
            rarity: Rarity::Normal,
            item_level,
            quality: 0,
            prefix_mods: Vec::new(),
            suffix_mods: Vec::new(),
            unrevealed_mods: Vec::new(),
            corrupted: false,
            unique_name: None,
            base_stats: BTreeMap::new(),
            calculated_stats: BTreeMap::new(),
        }
    }

    pub fn with_class(mut self, class: ItemClass) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = quality;
        self.recalculate_stats();
        self
    }

    pub fn with_base_stat(mut self, stat: impl Into<String>, value: f64) -> Self {
        self.base_stats.insert(stat.into(), value);
        self.recalculate_stats();
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.push_modifier(modifier);
        self.recalculate_stats();
        self
    }

    /// Slot label used for eligibility, if the class is known
    pub fn slot_label(&self) -> Option<&'static str> {
        self.class.map(|c| c.label())
    }

    pub fn mods(&self, affix_type: AffixType) -> &[Modifier] {
        match affix_type {
            AffixType::Prefix => &self.prefix_mods,
            AffixType::Suffix => &self.suffix_mods,
        }
    }

    pub(crate) fn mods_mut(&mut self, affix_type: AffixType) -> &mut Vec<Modifier> {
        match affix_type {
            AffixType::Prefix => &mut self.prefix_mods,
            AffixType::Suffix => &mut self.suffix_mods,
        }
    }

    /// All explicit modifiers, prefixes first
    pub fn all_mods(&self) -> impl Iterator<Item = &Modifier> {
        self.prefix_mods.iter().chain(self.suffix_mods.iter())
    }

    /// Count revealed modifiers
    pub fn affix_count(&self) -> usize {
        self.prefix_mods.len() + self.suffix_mods.len()
    }

    pub fn has_mods(&self) -> bool {
        self.affix_count() > 0
    }

    /// Occupied slots of a type, counting unrevealed desecrated slots
    pub fn slots_used(&self, affix_type: AffixType) -> usize {
        self.mods(affix_type).len()
            + self
                .unrevealed_mods
                .iter()
                .filter(|u| u.affix_type == affix_type)
                .count()
    }

    pub fn has_open_slot(&self, affix_type: AffixType) -> bool {
        self.slots_used(affix_type) < self.rarity.max_affixes(affix_type)
    }

    /// Affix types with at least one open slot
    pub fn open_affix_types(&self) -> Vec<AffixType> {
        [AffixType::Prefix, AffixType::Suffix]
            .into_iter()
            .filter(|t| self.has_open_slot(*t))
            .collect()
    }

    /// Exclusion-group keys of every modifier present
    pub fn group_keys(&self) -> HashSet<String> {
        self.all_mods().map(|m| m.group_key()).collect()
    }

    /// Whether the item has (or is waiting to reveal) a desecrated modifier
    pub fn has_desecrated(&self) -> bool {
        !self.unrevealed_mods.is_empty() || self.all_mods().any(|m| m.desecrated)
    }

    pub(crate) fn push_modifier(&mut self, modifier: Modifier) {
        self.mods_mut(modifier.affix_type).push(modifier);
    }

    /// Remove every modifier, including pending desecrations
    pub(crate) fn clear_mods(&mut self) {
        self.prefix_mods.clear();
        self.suffix_mods.clear();
        self.unrevealed_mods.clear();
    }

    /// Recompute `calculated_stats` from base stats, modifiers and quality
    pub fn recalculate_stats(&mut self) {
        self.calculated_stats = crate::stats::calculate(self);
    }
}

/// A rolled modifier on an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    pub affix_type: AffixType,
    pub tier: u32,
    pub stat_text: String,
    pub ranges: Vec<StatRange>,
    /// Current value of each range, in order
    pub values: Vec<f64>,
    #[serde(default)]
    pub mod_group: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub desecrated: bool,
}

impl Modifier {
    /// Roll a fresh instance of a definition, sampling each range independently
    pub fn roll<R: Rng + ?Sized>(definition: &ItemModifier, rng: &mut R) -> Self {
        Modifier {
            name: definition.name.clone(),
            affix_type: definition.affix_type,
            tier: definition.tier,
            stat_text: definition.stat_text.clone(),
            ranges: definition.ranges.clone(),
            values: definition.ranges.iter().map(|r| r.roll(rng)).collect(),
            mod_group: definition.mod_group.clone(),
            tags: definition.tags.clone(),
            desecrated: definition.is_desecrated_only(),
        }
    }

    /// Re-roll every current value within its range
    pub fn reroll_values<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.values = self.ranges.iter().map(|r| r.roll(rng)).collect();
    }

    pub fn group_key(&self) -> String {
        group_id_for_stat(&self.stat_text)
    }

    /// Stat lines paired with the values they consume
    pub fn value_lines(&self) -> Vec<(&str, &[f64])> {
        let mut lines = Vec::new();
        let mut offset = 0;
        for line in self.stat_text.lines() {
            let needed = line.matches('#').count();
            let end = (offset + needed).min(self.values.len());
            lines.push((line, &self.values[offset..end]));
            offset = end;
        }
        lines
    }

    /// Display the modifier as a human-readable string
    pub fn display(&self) -> String {
        let mut values = self.values.iter();
        let mut out = String::with_capacity(self.stat_text.len());
        for c in self.stat_text.chars() {
            if c != '#' {
                out.push(c);
                continue;
            }
            match values.next() {
                Some(v) => out.push_str(&format_value(*v)),
                None => out.push('#'),
            }
        }
        out.replace('\n', " / ")
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// A desecrated slot whose modifier has not been revealed yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnrevealedModifier {
    pub affix_type: AffixType,
    /// Name of the bone that created the slot
    pub bone: String,
    /// Bone part tag the revealed modifier must carry
    pub part: String,
    /// Boss tags; when non-empty the revealed modifier must carry one
    #[serde(default)]
    pub boss_tags: Vec<String>,
}

impl fmt::Display for CraftableItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Header
        match self.unique_name {
            Some(ref name) => writeln!(f, "══ {} ══", name)?,
            None => writeln!(f, "══ {} ══", self.base_name)?,
        }
        write!(f, "{} ({}), item level {}", self.base_name, self.rarity, self.item_level)?;
        if self.quality > 0 {
            write!(f, ", quality {}%", self.quality)?;
        }
        writeln!(f)?;

        // Defences
        if !self.calculated_stats.is_empty() {
            writeln!(f)?;
            writeln!(f, "Defences")?;
            for (stat, value) in &self.calculated_stats {
                writeln!(f, "  {}: {}", stat, format_value(*value))?;
            }
        }

        // Explicit mods
        if self.has_mods() || !self.unrevealed_mods.is_empty() {
            writeln!(f)?;
            writeln!(f, "Modifiers")?;
            for modifier in self.all_mods() {
                writeln!(
                    f,
                    "  {} (T{} {})",
                    modifier,
                    modifier.tier,
                    modifier.affix_type.marker()
                )?;
            }
            for pending in &self.unrevealed_mods {
                writeln!(
                    f,
                    "  <unrevealed {} from {}> ({})",
                    pending.part,
                    pending.bone,
                    pending.affix_type.marker()
                )?;
            }
        }

        if self.corrupted {
            writeln!(f)?;
            write!(f, "Corrupted")?;
        }

        Ok(())
    }
}
