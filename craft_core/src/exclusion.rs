//! Mutual exclusion between modifiers.
//!
//! Two modifiers are exclusive exactly when they roll the same underlying
//! stat line: every tier of one `stat_text` forms one exclusion group.

use crate::catalog::ItemModifier;

/// Prefix of every exclusion-group key
const GROUP_PREFIX: &str = "stat_text:";

/// Whether `a` and `b` may not sit on the same item
pub fn are_mutually_exclusive(a: &ItemModifier, b: &ItemModifier) -> bool {
    a.stat_text == b.stat_text
}

/// Deterministic exclusion-group key for a modifier
pub fn exclusion_group_id(modifier: &ItemModifier) -> String {
    group_id_for_stat(&modifier.stat_text)
}

/// Exclusion-group key for a bare stat template
pub fn group_id_for_stat(stat_text: &str) -> String {
    format!("{}{}", GROUP_PREFIX, stat_text)
}
