//! Outcome-table driven mechanics: Vaal corruption and Chance

use super::{describe, Crafted, Ctx};
use crate::error::CraftFailure;
use crate::item::CraftableItem;
use crate::types::Rarity;
use rand::{Rng, RngCore};
use std::sync::Arc;
use tables_core::{Outcome, OutcomeTableRegistry};

/// The outcome table a currency rolls, shared with the content snapshot
#[derive(Debug, Clone)]
pub struct OutcomeSource {
    tables: Arc<OutcomeTableRegistry>,
    table_id: String,
}

impl OutcomeSource {
    pub fn new(tables: Arc<OutcomeTableRegistry>, table_id: impl Into<String>) -> Self {
        OutcomeSource {
            tables,
            table_id: table_id.into(),
        }
    }

    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    fn roll(&self, item: &CraftableItem, rng: &mut dyn RngCore) -> Result<Option<Outcome>, CraftFailure> {
        self.tables
            .roll(&self.table_id, item.item_level, &item.base_name, rng)
            .map_err(|e| CraftFailure::NotApplicable(e.to_string()))
    }

    fn has_unique_for(&self, base: &str) -> bool {
        self.tables
            .get(&self.table_id)
            .is_some_and(|t| t.has_unique_for(base))
    }
}

pub(crate) fn vaal(
    ctx: &Ctx<'_>,
    source: &OutcomeSource,
    item: &CraftableItem,
    rng: &mut dyn RngCore,
) -> Result<Crafted, CraftFailure> {
    let mut crafted = item.clone();
    crafted.corrupted = true;

    let outcome = source.roll(item, rng)?.unwrap_or(Outcome::NoChange);
    tracing::trace!(?outcome, "vaal outcome");

    let message = match outcome {
        Outcome::NoChange => "Corrupted with no further effect".to_string(),
        Outcome::AddModifier => {
            if crafted.open_affix_types().is_empty() {
                "Corrupted; no slot was open for a new modifier".to_string()
            } else {
                match ctx.add_random(&mut crafted, rng) {
                    Ok(added) => format!("Corrupted and added {}", added),
                    Err(_) => "Corrupted; no modifier could be added".to_string(),
                }
            }
        }
        Outcome::RemoveModifier => {
            let count = crafted.affix_count();
            if count == 0 {
                "Corrupted; there was no modifier to remove".to_string()
            } else {
                let index = rng.gen_range(0..count);
                let prefixes = crafted.prefix_mods.len();
                let removed = if index < prefixes {
                    crafted.prefix_mods.remove(index)
                } else {
                    crafted.suffix_mods.remove(index - prefixes)
                };
                format!("Corrupted and removed {}", describe(&removed))
            }
        }
        Outcome::RerollValues => {
            crafted.prefix_mods.iter_mut().for_each(|m| m.reroll_values(rng));
            crafted.suffix_mods.iter_mut().for_each(|m| m.reroll_values(rng));
            "Corrupted and rerolled modifier values".to_string()
        }
        Outcome::UpgradeUnique => {
            crafted.rarity = Rarity::Unique;
            "Corrupted and upgraded to Unique".to_string()
        }
        Outcome::Unique { id, .. } => {
            crafted.clear_mods();
            crafted.rarity = Rarity::Unique;
            let message = format!("Corrupted into {}", id);
            crafted.unique_name = Some(id);
            message
        }
    };

    Ok(Crafted::new(crafted, message))
}

pub(crate) fn chance(
    ctx: &Ctx<'_>,
    source: &OutcomeSource,
    item: &CraftableItem,
    rng: &mut dyn RngCore,
) -> Result<Crafted, CraftFailure> {
    ctx.require_rarity(item, &[Rarity::Normal], "a Normal")?;
    if !source.has_unique_for(&item.base_name) {
        return Err(CraftFailure::NotApplicable(format!(
            "No unique exists for base {}",
            item.base_name
        )));
    }

    match source.roll(item, rng)? {
        Some(Outcome::Unique { id, .. }) => {
            let mut crafted = item.clone();
            crafted.rarity = Rarity::Unique;
            let message = format!("Became {}", id);
            crafted.unique_name = Some(id);
            Ok(Crafted::new(crafted, message))
        }
        _ => Err(CraftFailure::ChanceFailed),
    }
}
