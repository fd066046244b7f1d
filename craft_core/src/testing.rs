//! Shared content for unit tests

pub(crate) mod fixtures {
    use crate::config::{ContentFile, ContentSource};
    use crate::factory::Content;
    use crate::item::CraftableItem;
    use crate::pool::ModifierPool;
    use crate::types::ItemClass;

    const MODIFIERS: &str = r##"
# Life, three tiers
[[modifiers]]
name = "Hale"
affix_type = "prefix"
tier = 3
stat_text = "+# to maximum Life"
stat_min = 10
stat_max = 19
required_item_level = 1
mod_group = "IncreasedLife"
applicable_items = ["armour", "amulet", "ring"]
tags = ["life"]
weight = 1000

[[modifiers]]
name = "Healthy"
affix_type = "prefix"
tier = 2
stat_text = "+# to maximum Life"
stat_min = 20
stat_max = 29
required_item_level = 11
mod_group = "IncreasedLife"
applicable_items = ["armour", "amulet", "ring"]
tags = ["life"]
weight = 1000

[[modifiers]]
name = "Sanguine"
affix_type = "prefix"
tier = 1
stat_text = "+# to maximum Life"
stat_min = 30
stat_max = 39
required_item_level = 44
mod_group = "IncreasedLife"
applicable_items = ["armour", "amulet", "ring"]
tags = ["life"]
weight = 500

[[modifiers]]
name = "Shining"
affix_type = "prefix"
tier = 2
stat_text = "#% increased Energy Shield"
stat_min = 15
stat_max = 26
mod_group = "DefencesPercent"
applicable_items = ["int_armour", "dex_int_armour", "str_int_armour"]
tags = ["defences", "energy_shield"]
weight = 1000

[[modifiers]]
name = "Glimmering"
affix_type = "prefix"
tier = 1
stat_text = "#% increased Energy Shield"
stat_min = 27
stat_max = 42
required_item_level = 33
mod_group = "DefencesPercent"
applicable_items = ["int_armour", "dex_int_armour", "str_int_armour"]
tags = ["defences", "energy_shield"]
weight = 500

[[modifiers]]
name = "Protective"
affix_type = "prefix"
tier = 1
stat_text = "+# to maximum Energy Shield"
stat_min = 10
stat_max = 20
mod_group = "DefencesFlat"
applicable_items = ["armour"]
defence_types = ["energy_shield"]
tags = ["defences", "energy_shield"]
weight = 1000

[[modifiers]]
name = "Seraphim's"
affix_type = "prefix"
tier = 1
stat_text = "#% increased Energy Shield\n+# to maximum Life"
stat_ranges = [[6, 13], [8, 14]]
required_item_level = 20
mod_group = "DefencesAndLife"
applicable_items = ["int_armour"]
tags = ["defences", "energy_shield", "life"]
weight = 600

[[modifiers]]
name = "Vivid"
affix_type = "prefix"
tier = 1
stat_text = "+# to Spirit"
stat_min = 30
stat_max = 40
mod_group = "Spirit"
applicable_items = ["body_armour"]
tags = ["spirit"]
weight = 400

[[modifiers]]
name = "Runner's"
affix_type = "prefix"
tier = 1
stat_text = "#% increased Movement Speed"
stat_min = 10
stat_max = 15
mod_group = "MovementSpeed"
applicable_items = ["boots"]
tags = ["speed"]
weight = 800

[[modifiers]]
name = "Essential"
affix_type = "prefix"
tier = 1
stat_text = "#% increased maximum Life"
stat_min = 8
stat_max = 12
mod_group = "LifePercent"
applicable_items = ["armour"]
tags = ["essence_only", "life"]

[[modifiers]]
name = "Ulaman's"
affix_type = "prefix"
tier = 1
stat_text = "#% increased Armour, Evasion and Energy Shield"
stat_min = 20
stat_max = 30
applicable_items = ["armour"]
tags = ["desecrated_only", "rib", "ulaman", "defences"]

[[modifiers]]
name = "Amanamu's"
affix_type = "prefix"
tier = 1
stat_text = "#% of Damage taken Recouped as Life"
stat_min = 5
stat_max = 10
applicable_items = ["armour"]
tags = ["desecrated_only", "rib", "amanamu", "life"]

# Amulet skill levels share a group but not a stat
[[modifiers]]
name = "Magister's"
affix_type = "prefix"
tier = 1
stat_text = "+# to Level of all Spell Skills"
stat_min = 1
stat_max = 3
mod_group = "SkillLevels"
applicable_items = ["amulet"]
tags = ["caster", "gem"]

[[modifiers]]
name = "Warlord's"
affix_type = "prefix"
tier = 1
stat_text = "+# to Level of all Melee Skills"
stat_min = 1
stat_max = 3
mod_group = "SkillLevels"
applicable_items = ["amulet"]
tags = ["attack", "gem"]

[[modifiers]]
name = "Summoner's"
affix_type = "prefix"
tier = 1
stat_text = "+# to Level of all Minion Skills"
stat_min = 1
stat_max = 3
mod_group = "SkillLevels"
applicable_items = ["amulet"]
tags = ["minion", "gem"]

[[modifiers]]
name = "Marksman's"
affix_type = "prefix"
tier = 1
stat_text = "+# to Level of all Projectile Skills"
stat_min = 1
stat_max = 3
mod_group = "SkillLevels"
applicable_items = ["amulet"]
tags = ["attack", "gem"]

[[modifiers]]
name = "Sorcerer's"
affix_type = "prefix"
tier = 1
stat_text = "#% increased Spell Damage"
stat_min = 20
stat_max = 35
mod_group = "SpellDamage"
applicable_items = ["amulet"]
tags = ["caster", "damage"]

[[modifiers]]
name = "of the Salamander"
affix_type = "suffix"
tier = 1
stat_text = "+#% to Fire Resistance"
stat_min = 20
stat_max = 30
mod_group = "FireResistance"
applicable_items = ["armour", "amulet", "ring"]
tags = ["elemental", "fire", "resistance"]

[[modifiers]]
name = "of the Seal"
affix_type = "suffix"
tier = 1
stat_text = "+#% to Cold Resistance"
stat_min = 20
stat_max = 30
mod_group = "ColdResistance"
applicable_items = ["armour", "amulet", "ring"]
tags = ["elemental", "cold", "resistance"]

[[modifiers]]
name = "of the Lizard"
affix_type = "suffix"
tier = 1
stat_text = "+#% to Lightning Resistance"
stat_min = 20
stat_max = 30
mod_group = "LightningResistance"
applicable_items = ["armour", "amulet", "ring"]
tags = ["elemental", "lightning", "resistance"]

[[modifiers]]
name = "of Intelligence"
affix_type = "suffix"
tier = 1
stat_text = "+# to Intelligence"
stat_min = 5
stat_max = 15
mod_group = "Intelligence"
applicable_items = ["armour", "amulet"]
tags = ["attribute"]

[[modifiers]]
name = "of Expertise"
affix_type = "suffix"
tier = 1
stat_text = "#% increased Cast Speed"
stat_min = 9
stat_max = 12
mod_group = "CastSpeed"
applicable_items = ["amulet"]
tags = ["caster", "speed"]

[[modifiers]]
name = "of Ulaman"
affix_type = "suffix"
tier = 1
stat_text = "+#% to all Elemental Resistances"
stat_min = 8
stat_max = 12
applicable_items = ["armour"]
tags = ["desecrated_only", "rib", "ulaman", "resistance"]

[[modifiers]]
name = "of Amanamu"
affix_type = "suffix"
tier = 1
stat_text = "#% increased Stun Threshold"
stat_min = 15
stat_max = 25
applicable_items = ["armour"]
tags = ["desecrated_only", "rib", "amanamu"]
"##;

    const CURRENCIES: &str = r#"
[[currencies]]
name = "Orb of Transmutation"
mechanic = "transmutation"

[[currencies]]
name = "Orb of Augmentation"
mechanic = "augmentation"

[[currencies]]
name = "Orb of Alchemy"
mechanic = "alchemy"

[[currencies]]
name = "Regal Orb"
mechanic = "regal"

[[currencies]]
name = "Exalted Orb"
mechanic = "exalted"

[[currencies]]
name = "Perfect Exalted Orb"
mechanic = "exalted"
min_modifier_level = 44

[[currencies]]
name = "Chaos Orb"
mechanic = "chaos"

[[currencies]]
name = "Divine Orb"
mechanic = "divine"

[[currencies]]
name = "Vaal Orb"
mechanic = "vaal"
outcome_table = "vaal_outcomes"

[[currencies]]
name = "Orb of Chance"
mechanic = "chance"
outcome_table = "chance_outcomes"

[[currencies]]
name = "Orb of Annulment"
mechanic = "annulment"

[[currencies]]
name = "Orb of Scouring"
mechanic = "scouring"
"#;

    const ESSENCES: &str = r#"
[[essences]]
name = "Lesser Essence of the Body"
tier = "lesser"
essence_type = "body"
modifier = "Hale"

[[essences]]
name = "Essence of the Body"
tier = "greater"
essence_type = "body"
modifier = "Healthy"

[[essences]]
name = "Essence of Insulation"
tier = "greater"
essence_type = "insulation"
modifier = "of the Salamander"

[[essences]]
name = "Essence of Hysteria"
tier = "perfect"
essence_type = "hysteria"
modifier = "Essential"
"#;

    const OMENS: &str = r#"
[[omens]]
name = "Omen of Sinistral Exaltation"
affects = "exalted"
rule = "sinistral"

[[omens]]
name = "Omen of Dextral Exaltation"
affects = "exalted"
rule = "dextral"

[[omens]]
name = "Omen of Greater Exaltation"
affects = "exalted"
rule = "tier_bias"
top_tiers = 1

[[omens]]
name = "Omen of Homogenising Exaltation"
affects = "exalted"
rule = "homogenising"

[[omens]]
name = "Omen of Homogenising Coronation"
affects = "regal"
rule = "homogenising"

[[omens]]
name = "Omen of Sinistral Annulment"
affects = "annulment"
rule = "sinistral"

[[omens]]
name = "Omen of Sinistral Necromancy"
affects = "desecration"
rule = "sinistral"
"#;

    const BONES: &str = r#"
[[bones]]
name = "Gnawed Rib"
part = "rib"
tier = "gnawed"
min_item_level = 40
applicable_items = ["armour"]

[[bones]]
name = "Ulaman's Gnawed Rib"
part = "rib"
tier = "gnawed"
boss_tags = ["ulaman"]
min_item_level = 40
applicable_items = ["armour"]
"#;

    const SETTINGS: &str = r#"
hidden_tags = ["gem"]
"#;

    const VAAL_TABLE: &str = r#"
[table]
id = "vaal_outcomes"

[[entries]]
type = "no_change"
weight = 40

[[entries]]
type = "add_modifier"
weight = 20

[[entries]]
type = "remove_modifier"
weight = 15

[[entries]]
type = "reroll_values"
weight = 20

[[entries]]
type = "upgrade_unique"
weight = 5
"#;

    const CHANCE_TABLE: &str = r#"
[table]
id = "chance_outcomes"

[[entries]]
type = "unique"
id = "Cloak of Defiance"
base = "Silk Robe"
weight = 1

[[entries]]
type = "no_change"
weight = 4
"#;

    /// Raw content covering every record kind
    pub fn content() -> ContentSource {
        let mut source = ContentSource::new();
        source.parse(ContentFile::Modifiers, MODIFIERS).unwrap();
        source.parse(ContentFile::Currencies, CURRENCIES).unwrap();
        source.parse(ContentFile::Essences, ESSENCES).unwrap();
        source.parse(ContentFile::Omens, OMENS).unwrap();
        source.parse(ContentFile::Bones, BONES).unwrap();
        source.parse(ContentFile::Settings, SETTINGS).unwrap();
        source.add_table("vaal.toml", VAAL_TABLE).unwrap();
        source.add_table("chance.toml", CHANCE_TABLE).unwrap();
        source
    }

    pub fn pool() -> ModifierPool {
        Content::from_source(content()).unwrap().pool().clone()
    }

    pub fn robe(item_level: u32) -> CraftableItem {
        CraftableItem::new("Silk Robe", "int_armour", item_level)
            .with_class(ItemClass::BodyArmour)
            .with_base_stat("energy_shield", 60.0)
    }

    pub fn boots(item_level: u32) -> CraftableItem {
        CraftableItem::new("Wrapped Sandals", "int_armour", item_level).with_class(ItemClass::Boots)
    }

    pub fn amulet(item_level: u32) -> CraftableItem {
        CraftableItem::new("Jade Amulet", "amulet", item_level).with_class(ItemClass::Amulet)
    }

    pub fn quiver(item_level: u32) -> CraftableItem {
        CraftableItem::new("Fire Quiver", "quiver", item_level).with_class(ItemClass::Quiver)
    }
}
