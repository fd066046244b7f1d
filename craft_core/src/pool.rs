//! Candidate filtering and weighted modifier selection
//!
//! Eligibility of a modifier for an item is decided in priority order:
//!
//! 1. **Direct**: the item's base category is listed in `applicable_items`.
//! 2. **Slot**: the item's slot label (`body_armour`, `boots`, ...) is listed.
//! 3. **Generic**: the category is in the armour family and `armour` is listed,
//!    unless the modifier also names specific armour slots (it is
//!    slot-restricted and step 2 already had its chance), or it carries
//!    defence-type restrictions the base category does not provide.
//! 4. Otherwise the modifier is excluded.

use crate::catalog::{ItemModifier, ModifierCatalog};
use crate::item::{CraftableItem, Modifier};
use crate::types::{category_defences, is_armour_category, AffixType, ItemClass, GENERIC_ARMOUR};
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// How a modifier qualifies for an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Direct,
    Slot,
    Generic,
    Excluded,
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        !matches!(self, Eligibility::Excluded)
    }
}

/// Which restricted modifier pools take part in a roll
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    /// Essence-only and desecrated-only modifiers are excluded
    #[default]
    Ordinary,
    /// Ordinary plus essence-only modifiers
    Essence,
    /// Only desecrated-only modifiers carrying the part tag and, if any are
    /// given, one of the boss tags
    Desecrated { part: String, boss_tags: Vec<String> },
}

impl TagFilter {
    fn admits(&self, modifier: &ItemModifier) -> bool {
        match self {
            TagFilter::Ordinary => !modifier.is_restricted(),
            TagFilter::Essence => !modifier.is_desecrated_only(),
            TagFilter::Desecrated { part, boss_tags } => {
                modifier.is_desecrated_only()
                    && modifier.has_tag(part)
                    && (boss_tags.is_empty() || boss_tags.iter().any(|b| modifier.has_tag(b)))
            }
        }
    }
}

/// Modifier-selection policy. Mechanics carry a base selection from their
/// content parameters; omens narrow it further.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Force prefix or suffix
    pub affix_type: Option<AffixType>,
    /// Only candidates sharing a visible tag with a modifier already present
    pub homogenise: bool,
    /// Only the best N eligible tiers of each group
    pub top_tiers: Option<u32>,
    /// Only modifiers whose required item level is at least this
    pub min_modifier_level: Option<u32>,
}

impl Selection {
    /// Combine two policies; `other` wins where both constrain the same thing
    pub fn merged(&self, other: &Selection) -> Selection {
        Selection {
            affix_type: other.affix_type.or(self.affix_type),
            homogenise: self.homogenise || other.homogenise,
            top_tiers: match (self.top_tiers, other.top_tiers) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            },
            min_modifier_level: match (self.min_modifier_level, other.min_modifier_level) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            },
        }
    }
}

/// Every eligible tier of one exclusion group
#[derive(Debug, Clone)]
pub struct CandidateGroup<'a> {
    pub key: String,
    /// Ordered best tier first
    pub tiers: Vec<&'a ItemModifier>,
}

impl CandidateGroup<'_> {
    pub fn weight(&self) -> u32 {
        self.tiers.iter().map(|m| m.weight).sum()
    }
}

/// A roll request against the pool
#[derive(Debug, Clone)]
pub struct PoolQuery<'q> {
    pub category: &'q str,
    pub class: Option<ItemClass>,
    pub item_level: u32,
    pub affix_type: Option<AffixType>,
    pub filter: TagFilter,
    pub selection: Selection,
}

impl<'q> PoolQuery<'q> {
    /// Ordinary query using the item's own category, slot and level
    pub fn for_item(item: &'q CraftableItem, affix_type: Option<AffixType>) -> Self {
        PoolQuery {
            category: &item.base_category,
            class: item.class,
            item_level: item.item_level,
            affix_type,
            filter: TagFilter::Ordinary,
            selection: Selection::default(),
        }
    }

    pub fn with_filter(mut self, filter: TagFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_selection(mut self, selection: &Selection) -> Self {
        self.selection = selection.clone();
        self
    }
}

/// Filters the catalog to legal candidates and performs weighted selection
#[derive(Debug, Clone, Default)]
pub struct ModifierPool {
    catalog: ModifierCatalog,
}

impl ModifierPool {
    pub fn new(catalog: ModifierCatalog) -> Self {
        ModifierPool { catalog }
    }

    pub fn catalog(&self) -> &ModifierCatalog {
        &self.catalog
    }

    /// The single canonical eligibility decision for a (modifier, item) pair
    pub fn eligibility(
        &self,
        modifier: &ItemModifier,
        category: &str,
        class: Option<ItemClass>,
    ) -> Eligibility {
        let listed = |label: &str| modifier.applicable_items.iter().any(|a| a == label);

        if listed(category) {
            return Eligibility::Direct;
        }
        if class.is_some_and(|c| listed(c.label())) {
            return Eligibility::Slot;
        }
        if is_armour_category(category) && listed(GENERIC_ARMOUR) {
            let slot_restricted = modifier
                .applicable_items
                .iter()
                .any(|a| ItemClass::from_label(a).is_some_and(|c| c.is_armour()));
            if slot_restricted {
                return Eligibility::Excluded;
            }
            if !modifier.defence_types.is_empty() {
                let provided = category_defences(category).unwrap_or_default();
                if !modifier.defence_types.iter().any(|d| provided.contains(d)) {
                    return Eligibility::Excluded;
                }
            }
            return Eligibility::Generic;
        }
        Eligibility::Excluded
    }

    /// Every ordinary modifier of the given type eligible for the item, in
    /// catalog order, minus those sharing an exclusion group with a modifier
    /// the item already carries
    pub fn candidates_for(
        &self,
        category: &str,
        affix_type: AffixType,
        item_level: u32,
        item: &CraftableItem,
    ) -> Vec<&ItemModifier> {
        let query = PoolQuery {
            category,
            class: item.class,
            item_level,
            affix_type: Some(affix_type),
            filter: TagFilter::Ordinary,
            selection: Selection::default(),
        };
        self.candidates(&query, item)
    }

    /// Candidates for an arbitrary query, exclusion-filtered against `item`
    pub fn candidates(&self, query: &PoolQuery<'_>, item: &CraftableItem) -> Vec<&ItemModifier> {
        let present = item.group_keys();
        let affix_type = query.affix_type.or(query.selection.affix_type);
        let theme = if query.selection.homogenise {
            self.item_theme(item)
        } else {
            None
        };

        self.catalog
            .all()
            .iter()
            .filter(|m| affix_type.map_or(true, |t| m.affix_type == t))
            .filter(|m| query.item_level >= m.required_item_level)
            .filter(|m| {
                query
                    .selection
                    .min_modifier_level
                    .map_or(true, |min| m.required_item_level >= min)
            })
            .filter(|m| query.filter.admits(m))
            .filter(|m| self.eligibility(m, query.category, query.class).is_eligible())
            .filter(|m| !present.contains(&m.group_key()))
            .filter(|m| match &theme {
                Some(tags) => self.catalog.visible_tags(m).any(|t| tags.contains(t)),
                None => true,
            })
            .collect()
    }

    /// Visible tags of the modifiers on an item; `None` when there is nothing to match
    fn item_theme(&self, item: &CraftableItem) -> Option<HashSet<String>> {
        if !item.has_mods() {
            return None;
        }
        Some(
            item.all_mods()
                .flat_map(|m| m.tags.iter())
                .filter(|t| !self.catalog.is_hidden_tag(t))
                .cloned()
                .collect(),
        )
    }

    /// Candidates collapsed to one entry per exclusion group, with the
    /// selection's tier bias applied to each group
    pub fn candidate_groups(&self, query: &PoolQuery<'_>, item: &CraftableItem) -> Vec<CandidateGroup<'_>> {
        let mut groups: Vec<CandidateGroup<'_>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for modifier in self.candidates(query, item) {
            let key = modifier.group_key();
            match index.get(&key).copied() {
                Some(i) => groups[i].tiers.push(modifier),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push(CandidateGroup {
                        key,
                        tiers: vec![modifier],
                    });
                }
            }
        }

        for group in &mut groups {
            group.tiers.sort_by_key(|m| m.tier);
            if let Some(top) = query.selection.top_tiers {
                group.tiers.truncate(top.max(1) as usize);
            }
        }
        groups.retain(|g| g.weight() > 0);
        groups
    }

    /// Pick a group by summed weight, then a tier within it by weight, and
    /// roll its values. `None` when nothing is eligible.
    pub fn roll<R: Rng + ?Sized>(
        &self,
        query: &PoolQuery<'_>,
        item: &CraftableItem,
        rng: &mut R,
    ) -> Option<Modifier> {
        let groups = self.candidate_groups(query, item);
        let group = weighted_pick(&groups, |g| g.weight(), rng)?;
        let tier = weighted_pick(&group.tiers, |m| m.weight, rng)?;
        Some(Modifier::roll(tier, rng))
    }

    /// Ordinary roll for a category and level
    pub fn roll_random<R: Rng + ?Sized>(
        &self,
        mod_type: AffixType,
        category: &str,
        item_level: u32,
        item: &CraftableItem,
        rng: &mut R,
    ) -> Option<Modifier> {
        let query = PoolQuery {
            category,
            class: item.class,
            item_level,
            affix_type: Some(mod_type),
            filter: TagFilter::Ordinary,
            selection: Selection::default(),
        };
        self.roll(&query, item, rng)
    }

    /// Resolve a named modifier for an item: the exact tier when given,
    /// otherwise the best tier the item level allows
    pub fn resolve_named(
        &self,
        item: &CraftableItem,
        name: &str,
        tier: Option<u32>,
        filter: &TagFilter,
    ) -> Option<&ItemModifier> {
        self.catalog
            .named(name)
            .filter(|m| tier.map_or(true, |t| m.tier == t))
            .filter(|m| item.item_level >= m.required_item_level)
            .filter(|m| filter.admits(m))
            .filter(|m| {
                self.eligibility(m, &item.base_category, item.class)
                    .is_eligible()
            })
            .min_by_key(|m| m.tier)
    }
}

/// Weighted random selection; `None` when the total weight is zero
pub(crate) fn weighted_pick<'a, T, R: Rng + ?Sized>(
    items: &'a [T],
    weight: impl Fn(&T) -> u32,
    rng: &mut R,
) -> Option<&'a T> {
    let total_weight: u64 = items.iter().map(|i| weight(i) as u64).sum();
    if total_weight == 0 {
        return None;
    }

    let mut roll = rng.gen_range(0..total_weight);
    for item in items {
        let w = weight(item) as u64;
        if roll < w {
            return Some(item);
        }
        roll -= w;
    }
    items.last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use crate::types::Rarity;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn names<'a>(mods: &[&'a ItemModifier]) -> Vec<&'a str> {
        mods.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_candidates_respect_item_level() {
        let pool = fixtures::pool();
        let item = fixtures::robe(10);
        let cands = pool.candidates_for("int_armour", AffixType::Prefix, 10, &item);
        let names = names(&cands);
        assert!(names.contains(&"Hale"));
        assert!(!names.contains(&"Sanguine"), "Sanguine requires level 44");

        let cands = pool.candidates_for("int_armour", AffixType::Prefix, 80, &item);
        assert!(names_contains(&cands, "Sanguine"));
    }

    fn names_contains(mods: &[&ItemModifier], name: &str) -> bool {
        mods.iter().any(|m| m.name == name)
    }

    #[test]
    fn test_candidates_in_catalog_order() {
        let pool = fixtures::pool();
        let item = fixtures::robe(80);
        let cands = pool.candidates_for("int_armour", AffixType::Prefix, 80, &item);
        let positions: Vec<usize> = cands
            .iter()
            .map(|c| pool.catalog().all().iter().position(|m| m == *c).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_restricted_mods_excluded_from_ordinary_rolls() {
        let pool = fixtures::pool();
        let item = fixtures::robe(100);
        for affix_type in [AffixType::Prefix, AffixType::Suffix] {
            for m in pool.candidates_for("int_armour", affix_type, 100, &item) {
                assert!(!m.is_essence_only(), "{} is essence-only", m.name);
                assert!(!m.is_desecrated_only(), "{} is desecrated-only", m.name);
            }
        }
    }

    #[test]
    fn test_essence_filter_admits_essence_only() {
        let pool = fixtures::pool();
        let item = fixtures::robe(100);
        let query = PoolQuery::for_item(&item, Some(AffixType::Prefix)).with_filter(TagFilter::Essence);
        let cands = pool.candidates(&query, &item);
        assert!(cands.iter().any(|m| m.is_essence_only()));
        assert!(cands.iter().all(|m| !m.is_desecrated_only()));
    }

    #[test]
    fn test_desecrated_filter_matches_part_and_boss() {
        let pool = fixtures::pool();
        let item = fixtures::robe(100);
        let filter = TagFilter::Desecrated {
            part: "rib".to_string(),
            boss_tags: vec!["ulaman".to_string()],
        };
        let query = PoolQuery::for_item(&item, None).with_filter(filter);
        let cands = pool.candidates(&query, &item);
        assert!(!cands.is_empty());
        for m in cands {
            assert!(m.is_desecrated_only());
            assert!(m.has_tag("rib"));
            assert!(m.has_tag("ulaman"));
        }
    }

    #[test]
    fn test_slot_restricted_modifier() {
        let pool = fixtures::pool();
        let body = fixtures::robe(80);
        let boots = fixtures::boots(80);

        let body_cands = pool.candidates_for("int_armour", AffixType::Prefix, 80, &body);
        let boots_cands = pool.candidates_for("int_armour", AffixType::Prefix, 80, &boots);
        assert!(names_contains(&body_cands, "Vivid"));
        assert!(!names_contains(&boots_cands, "Vivid"));
        assert!(names_contains(&boots_cands, "Runner's"));
        assert!(!names_contains(&body_cands, "Runner's"));
    }

    #[test]
    fn test_generic_armour_with_defence_restriction() {
        let pool = fixtures::pool();
        let protective = pool.catalog().find("Protective", 1).unwrap();

        assert_eq!(
            pool.eligibility(protective, "int_armour", Some(ItemClass::Helmet)),
            Eligibility::Generic
        );
        assert_eq!(
            pool.eligibility(protective, "dex_int_armour", Some(ItemClass::Helmet)),
            Eligibility::Generic
        );
        assert_eq!(
            pool.eligibility(protective, "str_armour", Some(ItemClass::Helmet)),
            Eligibility::Excluded
        );
        assert_eq!(
            pool.eligibility(protective, "amulet", Some(ItemClass::Amulet)),
            Eligibility::Excluded
        );
    }

    #[test]
    fn test_eligibility_priority() {
        let pool = fixtures::pool();
        let shining = pool.catalog().find("Shining", 2).unwrap();
        assert_eq!(
            pool.eligibility(shining, "int_armour", Some(ItemClass::BodyArmour)),
            Eligibility::Direct
        );
        let vivid = pool.catalog().find("Vivid", 1).unwrap();
        assert_eq!(
            pool.eligibility(vivid, "int_armour", Some(ItemClass::BodyArmour)),
            Eligibility::Slot
        );
        assert_eq!(
            pool.eligibility(vivid, "int_armour", None),
            Eligibility::Excluded
        );
    }

    #[test]
    fn test_existing_group_excluded() {
        let pool = fixtures::pool();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let hale = Modifier::roll(pool.catalog().find("Hale", 3).unwrap(), &mut rng);
        let item = fixtures::robe(80).with_rarity(Rarity::Rare).with_modifier(hale);

        let cands = pool.candidates_for("int_armour", AffixType::Prefix, 80, &item);
        assert!(cands.iter().all(|m| m.stat_text != "+# to maximum Life"));
    }

    #[test]
    fn test_groups_collapse_tiers() {
        let pool = fixtures::pool();
        let item = fixtures::robe(80);
        let query = PoolQuery::for_item(&item, Some(AffixType::Prefix));
        let groups = pool.candidate_groups(&query, &item);

        let keys: HashSet<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys.len(), groups.len());

        let life = groups
            .iter()
            .find(|g| g.key == "stat_text:+# to maximum Life")
            .unwrap();
        let tiers: Vec<u32> = life.tiers.iter().map(|m| m.tier).collect();
        assert_eq!(tiers, vec![1, 2, 3]);

        let biased = query.with_selection(&Selection {
            top_tiers: Some(1),
            ..Selection::default()
        });
        for group in pool.candidate_groups(&biased, &item) {
            assert_eq!(group.tiers.len(), 1);
        }
    }

    #[test]
    fn test_homogenise_narrows_to_shared_tags() {
        let pool = fixtures::pool();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let spell = Modifier::roll(pool.catalog().find("Magister's", 1).unwrap(), &mut rng);
        let item = fixtures::amulet(80).with_rarity(Rarity::Magic).with_modifier(spell);

        let query = PoolQuery::for_item(&item, None).with_selection(&Selection {
            homogenise: true,
            ..Selection::default()
        });
        let cands = pool.candidates(&query, &item);
        assert!(!cands.is_empty());
        for m in cands {
            assert!(m.has_tag("caster"), "{} does not share a tag", m.name);
        }
    }

    #[test]
    fn test_min_modifier_level() {
        let pool = fixtures::pool();
        let item = fixtures::robe(80);
        let query = PoolQuery::for_item(&item, Some(AffixType::Prefix)).with_selection(&Selection {
            min_modifier_level: Some(40),
            ..Selection::default()
        });
        for m in pool.candidates(&query, &item) {
            assert!(m.required_item_level >= 40);
        }
    }

    #[test]
    fn test_roll_random_none_when_exhausted() {
        let pool = fixtures::pool();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // No modifier in the fixture applies to quivers
        let item = CraftableItem::new("Quiver", "quiver", 80).with_class(ItemClass::Quiver);
        assert!(pool
            .roll_random(AffixType::Prefix, "quiver", 80, &item, &mut rng)
            .is_none());
    }

    #[test]
    fn test_roll_samples_hybrid_ranges() {
        let pool = fixtures::pool();
        let seraphim = pool.catalog().find("Seraphim's", 1).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..50 {
            let rolled = Modifier::roll(seraphim, &mut rng);
            assert_eq!(rolled.values.len(), 2);
            for (value, range) in rolled.values.iter().zip(&rolled.ranges) {
                assert!(range.contains(*value));
            }
        }
    }

    #[test]
    fn test_weighted_pick_proportional() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let items = [("common", 90u32), ("rare", 10u32), ("never", 0u32)];
        let mut rare = 0;
        for _ in 0..10000 {
            let picked = weighted_pick(&items, |i| i.1, &mut rng).unwrap();
            assert_ne!(picked.0, "never");
            if picked.0 == "rare" {
                rare += 1;
            }
        }
        let pct = rare as f64 / 10000.0;
        assert!(pct > 0.08 && pct < 0.12, "Rare percentage was {}", pct);

        let empty: [(&str, u32); 1] = [("zero", 0)];
        assert!(weighted_pick(&empty, |i| i.1, &mut rng).is_none());
    }

    proptest! {
        #[test]
        fn prop_rolls_never_repeat_present_groups(seed in any::<u64>(), level in 1u32..=100) {
            let pool = fixtures::pool();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut item = fixtures::robe(level).with_rarity(Rarity::Rare);

            for _ in 0..6 {
                let open = item.open_affix_types();
                let Some(&affix_type) = open.first() else { break };
                let query = PoolQuery::for_item(&item, Some(affix_type));
                match pool.roll(&query, &item, &mut rng) {
                    Some(rolled) => {
                        prop_assert!(!item.group_keys().contains(&rolled.group_key()));
                        item.push_modifier(rolled);
                    }
                    None => break,
                }
            }
        }

        #[test]
        fn prop_eligibility_is_canonical(
            index in 0usize..64,
            category in prop::sample::select(vec!["int_armour", "str_armour", "dex_int_armour", "amulet", "quiver"]),
            class in prop::sample::select(ItemClass::all().to_vec()),
        ) {
            let pool = fixtures::pool();
            let all = pool.catalog().all();
            let modifier = &all[index % all.len()];
            let first = pool.eligibility(modifier, category, Some(class));
            prop_assert_eq!(first, pool.eligibility(modifier, category, Some(class)));

            let listed = |l: &str| modifier.applicable_items.iter().any(|a| a == l);
            match first {
                Eligibility::Direct => prop_assert!(listed(category)),
                Eligibility::Slot => prop_assert!(!listed(category) && listed(class.label())),
                Eligibility::Generic => {
                    prop_assert!(!listed(category) && !listed(class.label()));
                    prop_assert!(is_armour_category(category) && listed(GENERIC_ARMOUR));
                }
                Eligibility::Excluded => prop_assert!(!listed(category) && !listed(class.label())),
            }

            // A modifier restricted to armour slots is never offered to another slot
            let slot_labels: Vec<&String> = modifier
                .applicable_items
                .iter()
                .filter(|a| ItemClass::from_label(a).is_some_and(|c| c.is_armour()))
                .collect();
            if !slot_labels.is_empty() && !listed(category) && !listed(class.label()) {
                prop_assert_eq!(first, Eligibility::Excluded);
            }
        }
    }
}
