//! Derived item stats: base defences scaled by local modifiers and quality

use crate::item::CraftableItem;
use crate::types::DefenseType;
use std::collections::BTreeMap;

/// Flat and increased contributions to one base stat
#[derive(Debug, Clone, Copy, Default)]
struct StatAccumulator {
    flat: f64,
    increased: f64,
}

impl StatAccumulator {
    fn apply(&self, base: f64, quality: u32) -> f64 {
        ((base + self.flat) * (1.0 + (self.increased + quality as f64) / 100.0)).round()
    }
}

/// Compute `calculated_stats` for an item
pub fn calculate(item: &CraftableItem) -> BTreeMap<String, f64> {
    let mut out = BTreeMap::new();

    for (key, base) in &item.base_stats {
        let Some(defence) = DefenseType::all().iter().find(|d| d.stat_key() == key.as_str()) else {
            out.insert(key.clone(), *base);
            continue;
        };

        let acc = accumulate(item, *defence);
        out.insert(key.clone(), acc.apply(*base, item.quality));
    }

    out
}

fn accumulate(item: &CraftableItem, defence: DefenseType) -> StatAccumulator {
    let label = defence.stat_label();
    let flat_lines = [format!("+# to {}", label), format!("+# to maximum {}", label)];
    let increased_line = format!("#% increased {}", label);

    let mut acc = StatAccumulator::default();
    for modifier in item.all_mods() {
        for (line, values) in modifier.value_lines() {
            let Some(value) = values.first() else {
                continue;
            };
            if flat_lines.iter().any(|l| l == line) {
                acc.flat += value;
            } else if line == increased_line {
                acc.increased += value;
            }
        }
    }
    acc
}
