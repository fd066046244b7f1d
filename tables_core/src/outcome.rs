/// Result of rolling an outcome table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing beyond the base effect happens
    NoChange,
    /// Add one random modifier
    AddModifier,
    /// Remove one random modifier
    RemoveModifier,
    /// Re-roll the numeric values of every modifier
    RerollValues,
    /// Promote the item to unique rarity, keeping its modifiers
    UpgradeUnique,
    /// Turn the item into a specific named unique
    Unique { id: String, base: Option<String> },
}

impl Outcome {
    /// Parse a plain (non-referencing) outcome type
    pub(crate) fn from_type(entry_type: &str) -> Option<Self> {
        match entry_type {
            "no_change" => Some(Outcome::NoChange),
            "add_modifier" => Some(Outcome::AddModifier),
            "remove_modifier" => Some(Outcome::RemoveModifier),
            "reroll_values" => Some(Outcome::RerollValues),
            "upgrade_unique" => Some(Outcome::UpgradeUnique),
            _ => None,
        }
    }
}
