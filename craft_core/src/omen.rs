//! Omens wrap a mechanic and narrow how it selects modifiers.
//!
//! Decorators nest. Each one merges its rule into the selection it receives
//! from outside, and the selection from outside wins where both force an
//! affix type, so the omen listed last takes precedence.

use crate::config::OmenConfig;
use crate::item::CraftableItem;
use crate::mechanics::{CraftOutcome, Mechanic, MechanicKind};
use crate::pool::{ModifierPool, Selection};
use crate::types::AffixType;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// How an omen changes selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OmenRule {
    /// Only modifiers sharing a tag with one already present
    Homogenising,
    /// Only the best `top_tiers` tiers of each group
    TierBias,
    /// Prefixes only
    Sinistral,
    /// Suffixes only
    Dextral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OmenInfo {
    pub name: String,
    /// Currency name or mechanic kind this omen applies to
    pub affects: String,
    pub rule: OmenRule,
    pub top_tiers: Option<u32>,
    pub stack_size: u32,
}

impl From<&OmenConfig> for OmenInfo {
    fn from(config: &OmenConfig) -> Self {
        OmenInfo {
            name: config.name.clone(),
            affects: config.affects.clone(),
            rule: config.rule,
            top_tiers: config.top_tiers,
            stack_size: config.stack_size,
        }
    }
}

impl OmenInfo {
    /// Whether this omen applies to a currency
    pub fn targets(&self, currency: &str, kind: MechanicKind) -> bool {
        self.affects == currency || self.affects == kind.as_str()
    }

    pub fn selection(&self) -> Selection {
        match self.rule {
            OmenRule::Homogenising => Selection {
                homogenise: true,
                ..Selection::default()
            },
            OmenRule::TierBias => Selection {
                top_tiers: Some(self.top_tiers.unwrap_or(1)),
                ..Selection::default()
            },
            OmenRule::Sinistral => Selection {
                affix_type: Some(AffixType::Prefix),
                ..Selection::default()
            },
            OmenRule::Dextral => Selection {
                affix_type: Some(AffixType::Suffix),
                ..Selection::default()
            },
        }
    }
}

/// A mechanic with an omen's selection rule applied
#[derive(Debug)]
pub struct OmenDecorator {
    inner: Box<dyn Mechanic>,
    omen: OmenInfo,
}

impl OmenDecorator {
    pub fn new(inner: Box<dyn Mechanic>, omen: OmenInfo) -> Self {
        OmenDecorator { inner, omen }
    }

    pub fn omen(&self) -> &OmenInfo {
        &self.omen
    }
}

impl Mechanic for OmenDecorator {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn kind(&self) -> MechanicKind {
        self.inner.kind()
    }

    fn apply_with(
        &self,
        item: &CraftableItem,
        pool: &ModifierPool,
        selection: &Selection,
        rng: &mut dyn RngCore,
    ) -> CraftOutcome {
        let merged = self.omen.selection().merged(selection);
        tracing::trace!(omen = %self.omen.name, ?merged, "omen selection");
        self.inner.apply_with(item, pool, &merged, rng)
    }
}
