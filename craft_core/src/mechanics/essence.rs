use super::{describe, join, Crafted, Ctx};
use crate::config::EssenceConfig;
use crate::error::CraftFailure;
use crate::item::{CraftableItem, Modifier};
use crate::pool::TagFilter;
use crate::types::Rarity;
use rand::RngCore;
use serde::Serialize;

/// Essence tier that may start from a Normal item
pub const LESSER_TIER: &str = "lesser";

/// An essence: one guaranteed modifier, optionally from the essence-only pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EssenceInfo {
    pub name: String,
    pub tier: String,
    pub essence_type: String,
    /// Name of the guaranteed modifier
    pub modifier: String,
    pub modifier_tier: Option<u32>,
    pub mod_count: Option<(u32, u32)>,
    pub stack_size: u32,
}

impl EssenceInfo {
    /// Only lesser essences take a Normal item to Magic; every other tier
    /// needs a Magic item to work on
    pub fn upgrades_normal(&self) -> bool {
        self.tier == LESSER_TIER
    }
}

impl From<&EssenceConfig> for EssenceInfo {
    fn from(config: &EssenceConfig) -> Self {
        EssenceInfo {
            name: config.name.clone(),
            tier: config.tier.clone(),
            essence_type: config.essence_type.clone(),
            modifier: config.modifier.clone(),
            modifier_tier: config.modifier_tier,
            mod_count: config.mod_count.map(|[min, max]| (min, max)),
            stack_size: config.stack_size,
        }
    }
}

/// Normal items (lesser essences only) become Magic with the guaranteed
/// modifier. Magic items become Rare: existing modifiers are replaced by the
/// guaranteed one plus a random fill.
pub(crate) fn apply(
    ctx: &Ctx<'_>,
    essence: &EssenceInfo,
    item: &CraftableItem,
    rng: &mut dyn RngCore,
) -> Result<Crafted, CraftFailure> {
    if essence.upgrades_normal() {
        ctx.require_rarity(item, &[Rarity::Normal, Rarity::Magic], "a Normal or Magic")?;
    } else {
        ctx.require_rarity(item, &[Rarity::Magic], "a Magic")?;
    }

    let definition = ctx
        .pool
        .resolve_named(item, &essence.modifier, essence.modifier_tier, &TagFilter::Essence)
        .ok_or_else(|| {
            CraftFailure::NotApplicable(format!(
                "{} cannot be applied to {}",
                essence.name, item.base_name
            ))
        })?;

    let guaranteed = Modifier::roll(definition, rng);
    let guaranteed_text = describe(&guaranteed);
    let mut crafted = item.clone();

    if item.rarity == Rarity::Normal {
        crafted.rarity = Rarity::Magic;
        crafted.push_modifier(guaranteed);
        return Ok(Crafted::new(
            crafted,
            format!("Upgraded to Magic with {}", guaranteed_text),
        ));
    }

    crafted.clear_mods();
    crafted.rarity = Rarity::Rare;
    crafted.push_modifier(guaranteed);
    let target = ctx.fill_target(essence.mod_count, rng);
    let added = ctx.fill(&mut crafted, target, rng);

    let message = if added.is_empty() {
        format!("Upgraded to Rare with {}", guaranteed_text)
    } else {
        format!("Upgraded to Rare with {}, {}", guaranteed_text, join(&added))
    };
    Ok(Crafted::new(crafted, message))
}
