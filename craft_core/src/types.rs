use serde::{Deserialize, Serialize};
use std::fmt;

/// Item rarity, which bounds how many affixes an item may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Normal,
    Magic,
    Rare,
    Unique,
}

impl Rarity {
    /// Maximum number of prefixes an item of this rarity may hold
    pub fn max_prefixes(&self) -> usize {
        match self {
            Rarity::Normal => 0,
            Rarity::Magic => 1,
            Rarity::Rare | Rarity::Unique => 3,
        }
    }

    /// Maximum number of suffixes an item of this rarity may hold
    pub fn max_suffixes(&self) -> usize {
        self.max_prefixes()
    }

    /// Maximum number of affixes of the given type
    pub fn max_affixes(&self, affix_type: AffixType) -> usize {
        match affix_type {
            AffixType::Prefix => self.max_prefixes(),
            AffixType::Suffix => self.max_suffixes(),
        }
    }

    /// Total affix cap
    pub fn max_total(&self) -> usize {
        self.max_prefixes() + self.max_suffixes()
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rarity::Normal => write!(f, "Normal"),
            Rarity::Magic => write!(f, "Magic"),
            Rarity::Rare => write!(f, "Rare"),
            Rarity::Unique => write!(f, "Unique"),
        }
    }
}

/// Affix type: prefix or suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffixType {
    Prefix,
    Suffix,
}

impl AffixType {
    /// Short marker used when rendering items
    pub fn marker(&self) -> &'static str {
        match self {
            AffixType::Prefix => "P",
            AffixType::Suffix => "S",
        }
    }
}

impl fmt::Display for AffixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AffixType::Prefix => write!(f, "prefix"),
            AffixType::Suffix => write!(f, "suffix"),
        }
    }
}

/// Defense types provided by armour bases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseType {
    Armour,
    Evasion,
    EnergyShield,
}

impl DefenseType {
    /// Attribute prefix used in base category names (`str_armour`, `int_armour`, ...)
    fn from_attribute(attr: &str) -> Option<DefenseType> {
        match attr {
            "str" => Some(DefenseType::Armour),
            "dex" => Some(DefenseType::Evasion),
            "int" => Some(DefenseType::EnergyShield),
            _ => None,
        }
    }

    /// Key used for this defence in an item's base stats
    pub fn stat_key(&self) -> &'static str {
        match self {
            DefenseType::Armour => "armour",
            DefenseType::Evasion => "evasion",
            DefenseType::EnergyShield => "energy_shield",
        }
    }

    /// Label used in modifier stat text
    pub fn stat_label(&self) -> &'static str {
        match self {
            DefenseType::Armour => "Armour",
            DefenseType::Evasion => "Evasion Rating",
            DefenseType::EnergyShield => "Energy Shield",
        }
    }

    pub fn all() -> &'static [DefenseType] {
        &[
            DefenseType::Armour,
            DefenseType::Evasion,
            DefenseType::EnergyShield,
        ]
    }
}

/// Supercategory label that matches every armour-family category
pub const GENERIC_ARMOUR: &str = "armour";

/// Whether a base category (e.g. `int_armour`, `str_dex_armour`) belongs to the armour family
pub fn is_armour_category(category: &str) -> bool {
    category_defences(category).is_some()
}

/// Defence types an armour-family category provides, or `None` for non-armour categories
pub fn category_defences(category: &str) -> Option<Vec<DefenseType>> {
    let attrs = category.strip_suffix("_armour")?;
    let defences: Option<Vec<DefenseType>> =
        attrs.split('_').map(DefenseType::from_attribute).collect();
    defences.filter(|d| !d.is_empty())
}

/// Specific equipment slot of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemClass {
    // Armour
    Helmet,
    BodyArmour,
    Gloves,
    Boots,
    Shield,
    Buckler,
    Focus,
    // Jewellery
    Amulet,
    Ring,
    Belt,
    // Caster weapons
    Wand,
    Staff,
    Sceptre,
    // Martial weapons
    OneHandSword,
    OneHandAxe,
    OneHandMace,
    TwoHandSword,
    TwoHandAxe,
    TwoHandMace,
    Spear,
    Dagger,
    Claw,
    Quarterstaff,
    Bow,
    Crossbow,
    Quiver,
}

impl ItemClass {
    /// Slot label as it appears in a modifier's `applicable_items`
    pub fn label(&self) -> &'static str {
        match self {
            ItemClass::Helmet => "helmet",
            ItemClass::BodyArmour => "body_armour",
            ItemClass::Gloves => "gloves",
            ItemClass::Boots => "boots",
            ItemClass::Shield => "shield",
            ItemClass::Buckler => "buckler",
            ItemClass::Focus => "focus",
            ItemClass::Amulet => "amulet",
            ItemClass::Ring => "ring",
            ItemClass::Belt => "belt",
            ItemClass::Wand => "wand",
            ItemClass::Staff => "staff",
            ItemClass::Sceptre => "sceptre",
            ItemClass::OneHandSword => "one_hand_sword",
            ItemClass::OneHandAxe => "one_hand_axe",
            ItemClass::OneHandMace => "one_hand_mace",
            ItemClass::TwoHandSword => "two_hand_sword",
            ItemClass::TwoHandAxe => "two_hand_axe",
            ItemClass::TwoHandMace => "two_hand_mace",
            ItemClass::Spear => "spear",
            ItemClass::Dagger => "dagger",
            ItemClass::Claw => "claw",
            ItemClass::Quarterstaff => "quarterstaff",
            ItemClass::Bow => "bow",
            ItemClass::Crossbow => "crossbow",
            ItemClass::Quiver => "quiver",
        }
    }

    pub fn is_armour(&self) -> bool {
        matches!(
            self,
            ItemClass::Helmet
                | ItemClass::BodyArmour
                | ItemClass::Gloves
                | ItemClass::Boots
                | ItemClass::Shield
                | ItemClass::Buckler
                | ItemClass::Focus
        )
    }

    /// Every slot label, used to tell slot restrictions apart from categories
    pub fn all() -> &'static [ItemClass] {
        &[
            ItemClass::Helmet,
            ItemClass::BodyArmour,
            ItemClass::Gloves,
            ItemClass::Boots,
            ItemClass::Shield,
            ItemClass::Buckler,
            ItemClass::Focus,
            ItemClass::Amulet,
            ItemClass::Ring,
            ItemClass::Belt,
            ItemClass::Wand,
            ItemClass::Staff,
            ItemClass::Sceptre,
            ItemClass::OneHandSword,
            ItemClass::OneHandAxe,
            ItemClass::OneHandMace,
            ItemClass::TwoHandSword,
            ItemClass::TwoHandAxe,
            ItemClass::TwoHandMace,
            ItemClass::Spear,
            ItemClass::Dagger,
            ItemClass::Claw,
            ItemClass::Quarterstaff,
            ItemClass::Bow,
            ItemClass::Crossbow,
            ItemClass::Quiver,
        ]
    }

    pub fn from_label(label: &str) -> Option<ItemClass> {
        Self::all().iter().copied().find(|c| c.label() == label)
    }
}

impl fmt::Display for ItemClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A modifier or content tag
pub type Tag = String;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_caps() {
        assert_eq!(Rarity::Normal.max_total(), 0);
        assert_eq!(Rarity::Magic.max_prefixes(), 1);
        assert_eq!(Rarity::Magic.max_suffixes(), 1);
        assert_eq!(Rarity::Rare.max_affixes(AffixType::Prefix), 3);
        assert_eq!(Rarity::Rare.max_affixes(AffixType::Suffix), 3);
    }

    #[test]
    fn test_category_defences() {
        assert_eq!(
            category_defences("int_armour"),
            Some(vec![DefenseType::EnergyShield])
        );
        assert_eq!(
            category_defences("str_dex_armour"),
            Some(vec![DefenseType::Armour, DefenseType::Evasion])
        );
        assert!(category_defences("wand").is_none());
        assert!(category_defences("armour").is_none());
        assert!(!is_armour_category("amulet"));
    }

    #[test]
    fn test_item_class_labels_round_trip() {
        for class in ItemClass::all() {
            assert_eq!(ItemClass::from_label(class.label()), Some(*class));
        }
        assert!(ItemClass::from_label("int_armour").is_none());
    }
}
