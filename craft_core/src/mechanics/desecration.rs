//! Desecration: bones reserve a hidden slot that a later reveal fills from
//! the desecrated-only pool

use super::{choose_slot, describe, join, CraftOutcome, Crafted, Ctx};
use crate::config::BoneConfig;
use crate::error::{CraftFailure, SlotRequirement};
use crate::item::{CraftableItem, UnrevealedModifier};
use crate::pool::{ModifierPool, PoolQuery, TagFilter};
use crate::types::{is_armour_category, AffixType, Rarity, GENERIC_ARMOUR};
use rand::{Rng, RngCore};
use serde::Serialize;

/// A desecration bone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoneInfo {
    pub name: String,
    pub part: String,
    pub tier: String,
    pub boss_tags: Vec<String>,
    pub min_item_level: u32,
    pub max_item_level: u32,
    /// Categories or slots the bone works on; empty means any
    pub applicable_items: Vec<String>,
    pub stack_size: u32,
}

impl From<&BoneConfig> for BoneInfo {
    fn from(config: &BoneConfig) -> Self {
        BoneInfo {
            name: config.name.clone(),
            part: config.part.clone(),
            tier: config.tier.clone(),
            boss_tags: config.boss_tags.clone(),
            min_item_level: config.min_item_level,
            max_item_level: config.max_item_level,
            applicable_items: config.applicable_items.clone(),
            stack_size: config.stack_size,
        }
    }
}

impl BoneInfo {
    pub fn fits(&self, item: &CraftableItem) -> bool {
        if self.applicable_items.is_empty() {
            return true;
        }
        let listed = |label: &str| self.applicable_items.iter().any(|a| a == label);
        listed(&item.base_category)
            || item.slot_label().is_some_and(listed)
            || (is_armour_category(&item.base_category) && listed(GENERIC_ARMOUR))
    }
}

pub(crate) fn apply(
    ctx: &Ctx<'_>,
    bone: &BoneInfo,
    item: &CraftableItem,
    rng: &mut dyn RngCore,
) -> Result<Crafted, CraftFailure> {
    ctx.require_rarity(item, &[Rarity::Magic, Rarity::Rare, Rarity::Unique], "a Magic or Rare")?;

    if item.item_level < bone.min_item_level || item.item_level > bone.max_item_level {
        return Err(CraftFailure::LevelOutOfRange {
            level: item.item_level,
            min: bone.min_item_level,
            max: bone.max_item_level,
        });
    }
    if !bone.fits(item) {
        return Err(CraftFailure::NotApplicable(format!(
            "{} cannot be used on {}",
            bone.name, item.base_name
        )));
    }
    if item.has_desecrated() {
        return Err(CraftFailure::AlreadyDesecrated);
    }

    let affix_type = match choose_slot(item, ctx.selection.affix_type)? {
        Some(affix_type) => affix_type,
        None if rng.gen_bool(0.5) => AffixType::Prefix,
        None => AffixType::Suffix,
    };

    let mut crafted = item.clone();
    crafted.unrevealed_mods.push(UnrevealedModifier {
        affix_type,
        bone: bone.name.clone(),
        part: bone.part.clone(),
        boss_tags: bone.boss_tags.clone(),
    });
    Ok(Crafted::new(
        crafted,
        format!("Desecrated a {} slot with {}", affix_type, bone.name),
    ))
}

/// Turn every unrevealed slot into a concrete desecrated modifier
pub fn reveal(item: &CraftableItem, pool: &ModifierPool, rng: &mut dyn RngCore) -> CraftOutcome {
    let result = reveal_inner(item, pool, rng);
    CraftOutcome::from_result(result, item)
}

fn reveal_inner(item: &CraftableItem, pool: &ModifierPool, rng: &mut dyn RngCore) -> Result<Crafted, CraftFailure> {
    if item.unrevealed_mods.is_empty() {
        return Err(CraftFailure::NothingToReveal);
    }

    let mut crafted = item.clone();
    let pending = std::mem::take(&mut crafted.unrevealed_mods);
    let mut revealed = Vec::with_capacity(pending.len());

    for slot in pending {
        let rolled = {
            let filter = TagFilter::Desecrated {
                part: slot.part.clone(),
                boss_tags: slot.boss_tags.clone(),
            };
            let query = PoolQuery::for_item(&crafted, Some(slot.affix_type)).with_filter(filter);
            pool.roll(&query, &crafted, rng)
        };
        let modifier = rolled.ok_or(CraftFailure::PoolExhausted(SlotRequirement::Only(slot.affix_type)))?;
        revealed.push(describe(&modifier));
        crafted.push_modifier(modifier);
    }

    Ok(Crafted::new(crafted, format!("Revealed {}", join(&revealed))))
}
