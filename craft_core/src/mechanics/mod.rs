//! Currency mechanics
//!
//! Every currency resolves to a [`CurrencyMechanic`]: a name, its content
//! parameters and one variant of the closed [`MechanicVariant`] set. Omens
//! wrap mechanics through the same [`Mechanic`] trait.

mod basic;
mod corruption;
mod desecration;
mod essence;
mod removal;

pub use corruption::OutcomeSource;
pub use desecration::{reveal, BoneInfo};
pub use essence::EssenceInfo;

use crate::error::{CraftFailure, SlotRequirement};
use crate::item::{CraftableItem, Modifier};
use crate::pool::{ModifierPool, PoolQuery, Selection};
use crate::types::{AffixType, Rarity};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The crafting contract shared by every mechanic and omen wrapper
pub trait Mechanic: fmt::Debug + Send + Sync {
    /// Currency name this mechanic was created for
    fn name(&self) -> &str;

    fn kind(&self) -> MechanicKind;

    /// Apply under a selection policy supplied by an enclosing omen
    fn apply_with(
        &self,
        item: &CraftableItem,
        pool: &ModifierPool,
        selection: &Selection,
        rng: &mut dyn RngCore,
    ) -> CraftOutcome;

    fn apply(&self, item: &CraftableItem, pool: &ModifierPool, rng: &mut dyn RngCore) -> CraftOutcome {
        self.apply_with(item, pool, &Selection::default(), rng)
    }
}

/// Mechanic family a currency belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanicKind {
    Transmutation,
    Augmentation,
    Alchemy,
    Regal,
    Exalted,
    Chaos,
    Divine,
    Vaal,
    Chance,
    Annulment,
    Scouring,
    Essence,
    Desecration,
}

impl MechanicKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MechanicKind::Transmutation => "transmutation",
            MechanicKind::Augmentation => "augmentation",
            MechanicKind::Alchemy => "alchemy",
            MechanicKind::Regal => "regal",
            MechanicKind::Exalted => "exalted",
            MechanicKind::Chaos => "chaos",
            MechanicKind::Divine => "divine",
            MechanicKind::Vaal => "vaal",
            MechanicKind::Chance => "chance",
            MechanicKind::Annulment => "annulment",
            MechanicKind::Scouring => "scouring",
            MechanicKind::Essence => "essence",
            MechanicKind::Desecration => "desecration",
        }
    }

    /// Whether currencies of this kind need an outcome table
    pub fn needs_outcome_table(&self) -> bool {
        matches!(self, MechanicKind::Vaal | MechanicKind::Chance)
    }
}

impl fmt::Display for MechanicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of applying a mechanic. On failure `item` is the unchanged input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftOutcome {
    pub success: bool,
    pub message: String,
    pub item: CraftableItem,
}

impl CraftOutcome {
    pub(crate) fn from_result(result: Result<Crafted, CraftFailure>, original: &CraftableItem) -> Self {
        match result {
            Ok(Crafted { mut item, message }) => {
                item.recalculate_stats();
                CraftOutcome {
                    success: true,
                    message,
                    item,
                }
            }
            Err(failure) => CraftOutcome {
                success: false,
                message: failure.to_string(),
                item: original.clone(),
            },
        }
    }
}

/// A successfully transformed item
#[derive(Debug)]
pub(crate) struct Crafted {
    pub item: CraftableItem,
    pub message: String,
}

impl Crafted {
    pub fn new(item: CraftableItem, message: impl Into<String>) -> Self {
        Crafted {
            item,
            message: message.into(),
        }
    }
}

/// Static parameters a currency carries from content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyParams {
    /// Modifiers rolled when filling a rare item
    pub mod_count: Option<(u32, u32)>,
    pub min_modifier_level: Option<u32>,
}

impl CurrencyParams {
    fn selection(&self) -> Selection {
        Selection {
            min_modifier_level: self.min_modifier_level,
            ..Selection::default()
        }
    }
}

/// The closed set of currency behaviours
#[derive(Debug, Clone)]
pub enum MechanicVariant {
    Transmutation,
    Augmentation,
    Alchemy,
    Regal,
    Exalted,
    Chaos,
    Divine,
    Vaal(OutcomeSource),
    Chance(OutcomeSource),
    Annulment,
    Scouring,
    Essence(EssenceInfo),
    Desecration(BoneInfo),
}

impl MechanicVariant {
    pub fn kind(&self) -> MechanicKind {
        match self {
            MechanicVariant::Transmutation => MechanicKind::Transmutation,
            MechanicVariant::Augmentation => MechanicKind::Augmentation,
            MechanicVariant::Alchemy => MechanicKind::Alchemy,
            MechanicVariant::Regal => MechanicKind::Regal,
            MechanicVariant::Exalted => MechanicKind::Exalted,
            MechanicVariant::Chaos => MechanicKind::Chaos,
            MechanicVariant::Divine => MechanicKind::Divine,
            MechanicVariant::Vaal(_) => MechanicKind::Vaal,
            MechanicVariant::Chance(_) => MechanicKind::Chance,
            MechanicVariant::Annulment => MechanicKind::Annulment,
            MechanicVariant::Scouring => MechanicKind::Scouring,
            MechanicVariant::Essence(_) => MechanicKind::Essence,
            MechanicVariant::Desecration(_) => MechanicKind::Desecration,
        }
    }
}

/// A named currency bound to its mechanic and parameters
#[derive(Debug, Clone)]
pub struct CurrencyMechanic {
    name: String,
    variant: MechanicVariant,
    params: CurrencyParams,
}

impl CurrencyMechanic {
    pub fn new(name: impl Into<String>, variant: MechanicVariant, params: CurrencyParams) -> Self {
        CurrencyMechanic {
            name: name.into(),
            variant,
            params,
        }
    }

    pub fn variant(&self) -> &MechanicVariant {
        &self.variant
    }

    pub fn params(&self) -> &CurrencyParams {
        &self.params
    }
}

impl Mechanic for CurrencyMechanic {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> MechanicKind {
        self.variant.kind()
    }

    fn apply_with(
        &self,
        item: &CraftableItem,
        pool: &ModifierPool,
        selection: &Selection,
        rng: &mut dyn RngCore,
    ) -> CraftOutcome {
        let selection = self.params.selection().merged(selection);
        let ctx = Ctx {
            name: &self.name,
            params: &self.params,
            pool,
            selection: &selection,
        };

        let result = if item.corrupted {
            Err(CraftFailure::Corrupted)
        } else {
            match &self.variant {
                MechanicVariant::Transmutation => basic::transmutation(&ctx, item, rng),
                MechanicVariant::Augmentation => basic::augmentation(&ctx, item, rng),
                MechanicVariant::Alchemy => basic::alchemy(&ctx, item, rng),
                MechanicVariant::Regal => basic::regal(&ctx, item, rng),
                MechanicVariant::Exalted => basic::exalted(&ctx, item, rng),
                MechanicVariant::Chaos => basic::chaos(&ctx, item, rng),
                MechanicVariant::Divine => removal::divine(item, rng),
                MechanicVariant::Annulment => removal::annulment(&ctx, item, rng),
                MechanicVariant::Scouring => removal::scouring(item),
                MechanicVariant::Vaal(source) => corruption::vaal(&ctx, source, item, rng),
                MechanicVariant::Chance(source) => corruption::chance(&ctx, source, item, rng),
                MechanicVariant::Essence(essence) => essence::apply(&ctx, essence, item, rng),
                MechanicVariant::Desecration(bone) => desecration::apply(&ctx, bone, item, rng),
            }
        };

        let outcome = CraftOutcome::from_result(result, item);
        tracing::debug!(
            currency = %self.name,
            success = outcome.success,
            message = %outcome.message,
            "applied mechanic"
        );
        outcome
    }
}

/// Everything a variant needs besides the item and the randomness source
pub(crate) struct Ctx<'a> {
    pub name: &'a str,
    pub params: &'a CurrencyParams,
    pub pool: &'a ModifierPool,
    pub selection: &'a Selection,
}

impl Ctx<'_> {
    /// Fail unless the item has one of the allowed rarities
    pub fn require_rarity(
        &self,
        item: &CraftableItem,
        allowed: &[Rarity],
        expected: &'static str,
    ) -> Result<(), CraftFailure> {
        if allowed.contains(&item.rarity) {
            Ok(())
        } else {
            Err(CraftFailure::RarityMismatch {
                currency: self.name.to_string(),
                expected,
                found: item.rarity,
            })
        }
    }

    /// Add one random modifier to an open slot, honouring a forced slot type
    pub fn add_random(&self, item: &mut CraftableItem, rng: &mut dyn RngCore) -> Result<String, CraftFailure> {
        let slot = choose_slot(item, self.selection.affix_type)?;
        let rolled = {
            let query = PoolQuery::for_item(item, slot).with_selection(self.selection);
            self.pool.roll(&query, item, rng)
        };
        let modifier = rolled.ok_or(CraftFailure::PoolExhausted(slot.into()))?;
        let described = describe(&modifier);
        item.push_modifier(modifier);
        Ok(described)
    }

    /// Add random modifiers until the item holds `target` affixes or nothing
    /// more can be added. Returns the descriptions of the added modifiers.
    pub fn fill(&self, item: &mut CraftableItem, target: usize, rng: &mut dyn RngCore) -> Vec<String> {
        let mut added = Vec::new();
        while item.affix_count() + item.unrevealed_mods.len() < target {
            match self.add_random(item, rng) {
                Ok(described) => added.push(described),
                Err(_) => break,
            }
        }
        added
    }

    /// Number of affixes a rare fill aims for
    pub fn fill_target(&self, mod_count: Option<(u32, u32)>, rng: &mut dyn RngCore) -> usize {
        let cap = Rarity::Rare.max_total();
        match mod_count.or(self.params.mod_count) {
            Some((min, max)) if min < max => (rng.gen_range(min..=max) as usize).min(cap),
            Some((min, _)) => (min as usize).min(cap),
            None => cap,
        }
    }
}

/// Which affix type to roll: forced when an omen says so, otherwise the only
/// open type, or `None` when both are open
pub(crate) fn choose_slot(
    item: &CraftableItem,
    forced: Option<AffixType>,
) -> Result<Option<AffixType>, CraftFailure> {
    let open = item.open_affix_types();
    match forced {
        Some(affix_type) if open.contains(&affix_type) => Ok(Some(affix_type)),
        Some(affix_type) => Err(CraftFailure::NoSlotAvailable(SlotRequirement::Only(affix_type))),
        None => match open.as_slice() {
            [] => Err(CraftFailure::NoSlotAvailable(SlotRequirement::Any)),
            [only] => Ok(Some(*only)),
            _ => Ok(None),
        },
    }
}

pub(crate) fn describe(modifier: &Modifier) -> String {
    format!("{} ({})", modifier.name, modifier.display())
}

pub(crate) fn join(descriptions: &[String]) -> String {
    descriptions.join(", ")
}
