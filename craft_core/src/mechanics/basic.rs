//! Mechanics that add modifiers: transmutation through chaos

use super::{join, Crafted, Ctx};
use crate::error::{CraftFailure, SlotRequirement};
use crate::item::CraftableItem;
use crate::types::Rarity;
use rand::RngCore;

pub(crate) fn transmutation(
    ctx: &Ctx<'_>,
    item: &CraftableItem,
    rng: &mut dyn RngCore,
) -> Result<Crafted, CraftFailure> {
    ctx.require_rarity(item, &[Rarity::Normal], "a Normal")?;

    let mut crafted = item.clone();
    crafted.rarity = Rarity::Magic;
    let added = ctx.add_random(&mut crafted, rng)?;
    Ok(Crafted::new(crafted, format!("Upgraded to Magic with {}", added)))
}

pub(crate) fn augmentation(
    ctx: &Ctx<'_>,
    item: &CraftableItem,
    rng: &mut dyn RngCore,
) -> Result<Crafted, CraftFailure> {
    ctx.require_rarity(item, &[Rarity::Magic], "a Magic")?;
    match item.affix_count() {
        0 => {
            return Err(CraftFailure::NotApplicable(format!(
                "{} requires a Magic item with one modifier",
                ctx.name
            )))
        }
        1 => {}
        _ => return Err(CraftFailure::NoSlotAvailable(SlotRequirement::Any)),
    }

    let mut crafted = item.clone();
    let added = ctx.add_random(&mut crafted, rng)?;
    Ok(Crafted::new(crafted, format!("Added {}", added)))
}

pub(crate) fn alchemy(
    ctx: &Ctx<'_>,
    item: &CraftableItem,
    rng: &mut dyn RngCore,
) -> Result<Crafted, CraftFailure> {
    ctx.require_rarity(item, &[Rarity::Normal], "a Normal")?;

    let mut crafted = item.clone();
    crafted.rarity = Rarity::Rare;
    let target = ctx.fill_target(None, rng);
    let added = ctx.fill(&mut crafted, target, rng);
    if added.is_empty() {
        return Err(CraftFailure::PoolExhausted(SlotRequirement::Any));
    }
    Ok(Crafted::new(
        crafted,
        format!("Upgraded to Rare with {} modifiers: {}", added.len(), join(&added)),
    ))
}

pub(crate) fn regal(ctx: &Ctx<'_>, item: &CraftableItem, rng: &mut dyn RngCore) -> Result<Crafted, CraftFailure> {
    ctx.require_rarity(item, &[Rarity::Magic], "a Magic")?;

    let mut crafted = item.clone();
    crafted.rarity = Rarity::Rare;
    let added = ctx.add_random(&mut crafted, rng)?;
    Ok(Crafted::new(crafted, format!("Upgraded to Rare with {}", added)))
}

pub(crate) fn exalted(
    ctx: &Ctx<'_>,
    item: &CraftableItem,
    rng: &mut dyn RngCore,
) -> Result<Crafted, CraftFailure> {
    ctx.require_rarity(item, &[Rarity::Rare], "a Rare")?;

    let mut crafted = item.clone();
    let added = ctx.add_random(&mut crafted, rng)?;
    Ok(Crafted::new(crafted, format!("Added {}", added)))
}

pub(crate) fn chaos(ctx: &Ctx<'_>, item: &CraftableItem, rng: &mut dyn RngCore) -> Result<Crafted, CraftFailure> {
    ctx.require_rarity(item, &[Rarity::Rare], "a Rare")?;

    let mut crafted = item.clone();
    crafted.clear_mods();
    let target = ctx.fill_target(None, rng);
    let added = ctx.fill(&mut crafted, target, rng);
    if added.is_empty() {
        return Err(CraftFailure::PoolExhausted(SlotRequirement::Any));
    }
    Ok(Crafted::new(
        crafted,
        format!("Rerolled into {} modifiers: {}", added.len(), join(&added)),
    ))
}

#[cfg(test)]
mod tests {
    use crate::mechanics::{CurrencyMechanic, CurrencyParams, Mechanic, MechanicVariant};
    use crate::pool::Selection;
    use crate::testing::fixtures;
    use crate::types::{AffixType, Rarity};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn mechanic(name: &str, variant: MechanicVariant) -> CurrencyMechanic {
        CurrencyMechanic::new(name, variant, CurrencyParams::default())
    }

    #[test]
    fn test_transmutation_makes_magic_with_one_mod() {
        let pool = fixtures::pool();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let transmute = mechanic("Orb of Transmutation", MechanicVariant::Transmutation);

        let outcome = transmute.apply(&fixtures::robe(80), &pool, &mut rng);
        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(outcome.item.rarity, Rarity::Magic);
        assert_eq!(outcome.item.affix_count(), 1);
    }

    #[test]
    fn test_transmutation_rejects_magic() {
        let pool = fixtures::pool();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let transmute = mechanic("Orb of Transmutation", MechanicVariant::Transmutation);
        let magic = fixtures::robe(80).with_rarity(Rarity::Magic);

        let outcome = transmute.apply(&magic, &pool, &mut rng);
        assert!(!outcome.success);
        assert_eq!(outcome.item, magic);
        assert_eq!(
            outcome.message,
            "Orb of Transmutation requires a Normal item, but the item is Magic"
        );
    }

    #[test]
    fn test_augmentation_fills_other_slot() {
        let pool = fixtures::pool();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let transmute = mechanic("Orb of Transmutation", MechanicVariant::Transmutation);
        let augment = mechanic("Orb of Augmentation", MechanicVariant::Augmentation);

        let magic = transmute.apply(&fixtures::robe(80), &pool, &mut rng).item;
        let outcome = augment.apply(&magic, &pool, &mut rng);
        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(outcome.item.prefix_mods.len(), 1);
        assert_eq!(outcome.item.suffix_mods.len(), 1);

        let again = augment.apply(&outcome.item, &pool, &mut rng);
        assert!(!again.success);
        assert_eq!(again.item, outcome.item);
    }

    #[test]
    fn test_alchemy_fills_to_cap() {
        let pool = fixtures::pool();
        let alchemy = mechanic("Orb of Alchemy", MechanicVariant::Alchemy);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let outcome = alchemy.apply(&fixtures::robe(80), &pool, &mut rng);
            assert!(outcome.success);
            assert_eq!(outcome.item.rarity, Rarity::Rare);
            assert!(outcome.item.prefix_mods.len() <= 3);
            assert!(outcome.item.suffix_mods.len() <= 3);
            assert!(outcome.item.affix_count() >= 4);
        }
    }

    #[test]
    fn test_alchemy_mod_count_param() {
        let pool = fixtures::pool();
        let alchemy = CurrencyMechanic::new(
            "Orb of Alchemy",
            MechanicVariant::Alchemy,
            CurrencyParams {
                mod_count: Some((4, 4)),
                min_modifier_level: None,
            },
        );
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let outcome = alchemy.apply(&fixtures::robe(80), &pool, &mut rng);
        assert_eq!(outcome.item.affix_count(), 4);
    }

    #[test]
    fn test_exalted_respects_forced_type() {
        let pool = fixtures::pool();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let exalt = mechanic("Exalted Orb", MechanicVariant::Exalted);
        let rare = fixtures::robe(80).with_rarity(Rarity::Rare);

        let selection = Selection {
            affix_type: Some(AffixType::Suffix),
            ..Selection::default()
        };
        let outcome = exalt.apply_with(&rare, &pool, &selection, &mut rng);
        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(outcome.item.suffix_mods.len(), 1);
        assert!(outcome.item.prefix_mods.is_empty());
    }

    #[test]
    fn test_exalted_fails_on_full_item() {
        let pool = fixtures::pool();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let alchemy = mechanic("Orb of Alchemy", MechanicVariant::Alchemy);
        let exalt = mechanic("Exalted Orb", MechanicVariant::Exalted);

        let mut item = alchemy.apply(&fixtures::robe(80), &pool, &mut rng).item;
        while item.affix_count() < 6 {
            let outcome = exalt.apply(&item, &pool, &mut rng);
            if !outcome.success {
                break;
            }
            item = outcome.item;
        }
        if item.affix_count() == 6 {
            let outcome = exalt.apply(&item, &pool, &mut rng);
            assert!(!outcome.success);
            assert_eq!(outcome.message, "No affix slot available");
        }
    }

    #[test]
    fn test_chaos_replaces_all_mods() {
        let pool = fixtures::pool();
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let alchemy = mechanic("Orb of Alchemy", MechanicVariant::Alchemy);
        let chaos = mechanic("Chaos Orb", MechanicVariant::Chaos);

        let rare = alchemy.apply(&fixtures::robe(80), &pool, &mut rng).item;
        let outcome = chaos.apply(&rare, &pool, &mut rng);
        assert!(outcome.success);
        assert_eq!(outcome.item.rarity, Rarity::Rare);
        assert!(outcome.item.has_mods());
    }

    #[test]
    fn test_corrupted_items_refused() {
        let pool = fixtures::pool();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut item = fixtures::robe(80).with_rarity(Rarity::Rare);
        item.corrupted = true;

        let outcome = mechanic("Exalted Orb", MechanicVariant::Exalted).apply(&item, &pool, &mut rng);
        assert!(!outcome.success);
        assert_eq!(outcome.item, item);
    }

    #[test]
    fn test_no_candidates_fails_cleanly() {
        let pool = fixtures::pool();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let quiver = fixtures::quiver(80);
        let outcome = mechanic("Orb of Transmutation", MechanicVariant::Transmutation)
            .apply(&quiver, &pool, &mut rng);
        assert!(!outcome.success);
        assert_eq!(outcome.message, "No suitable modifier found for affix");
        assert_eq!(outcome.item, quiver);
    }
}
