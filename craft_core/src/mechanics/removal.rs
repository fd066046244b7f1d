//! Mechanics that reroll or remove existing modifiers

use super::{describe, Crafted, Ctx};
use crate::error::CraftFailure;
use crate::item::CraftableItem;
use crate::types::{AffixType, Rarity};
use rand::{Rng, RngCore};

pub(crate) fn divine(item: &CraftableItem, rng: &mut dyn RngCore) -> Result<Crafted, CraftFailure> {
    if !item.has_mods() {
        return Err(CraftFailure::NoModifiers);
    }

    let mut crafted = item.clone();
    for affix_type in [AffixType::Prefix, AffixType::Suffix] {
        for modifier in crafted.mods_mut(affix_type) {
            modifier.reroll_values(rng);
        }
    }
    Ok(Crafted::new(crafted, "Rerolled modifier values"))
}

pub(crate) fn annulment(
    ctx: &Ctx<'_>,
    item: &CraftableItem,
    rng: &mut dyn RngCore,
) -> Result<Crafted, CraftFailure> {
    if !item.has_mods() {
        return Err(CraftFailure::NoModifiers);
    }

    let targets: Vec<(AffixType, usize)> = [AffixType::Prefix, AffixType::Suffix]
        .into_iter()
        .filter(|t| ctx.selection.affix_type.map_or(true, |forced| forced == *t))
        .flat_map(|t| (0..item.mods(t).len()).map(move |i| (t, i)))
        .collect();

    if targets.is_empty() {
        let forced = ctx.selection.affix_type.unwrap_or(AffixType::Prefix);
        return Err(CraftFailure::NotApplicable(format!("Item has no {} to remove", forced)));
    }

    let (affix_type, index) = targets[rng.gen_range(0..targets.len())];
    let mut crafted = item.clone();
    let removed = crafted.mods_mut(affix_type).remove(index);
    Ok(Crafted::new(crafted, format!("Removed {}", describe(&removed))))
}

pub(crate) fn scouring(item: &CraftableItem) -> Result<Crafted, CraftFailure> {
    let mut crafted = item.clone();
    crafted.clear_mods();
    crafted.rarity = Rarity::Normal;
    crafted.unique_name = None;
    Ok(Crafted::new(crafted, "Removed all modifiers"))
}
