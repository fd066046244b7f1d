use crate::config::{EntryConfig, TableFileConfig};
use crate::outcome::Outcome;
use crate::RollError;
use rand::Rng;

const MAX_DEPTH: u32 = 10;

/// A weighted outcome table
#[derive(Debug, Clone)]
pub struct OutcomeTable {
    pub id: String,
    entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    kind: EntryKind,
    weight: u32,
    min_level: Option<u32>,
    max_level: Option<u32>,
    base: Option<String>,
}

#[derive(Debug, Clone)]
enum EntryKind {
    Outcome(Outcome),
    Table { id: String },
}

impl OutcomeTable {
    /// Parse an outcome table from config
    pub fn from_config(config: TableFileConfig) -> Result<Self, RollError> {
        let entries: Vec<Entry> = config
            .entries
            .into_iter()
            .map(Entry::from_config)
            .collect::<Result<_, _>>()?;

        Ok(OutcomeTable {
            id: config.table.id,
            entries,
        })
    }

    /// IDs of tables referenced by this table's entries
    pub fn referenced_tables(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| match &e.kind {
            EntryKind::Table { id } => Some(id.as_str()),
            EntryKind::Outcome(_) => None,
        })
    }

    /// Whether this table directly lists a unique for the given base
    pub fn has_unique_for(&self, base: &str) -> bool {
        self.entries.iter().any(|e| {
            matches!(e.kind, EntryKind::Outcome(Outcome::Unique { .. }))
                && e.base.as_deref() == Some(base)
        })
    }

    /// Roll this table once. Returns `None` when no entry is valid for the
    /// given level and base.
    pub fn roll<R: Rng + ?Sized>(
        &self,
        level: u32,
        base: &str,
        rng: &mut R,
        registry: &crate::OutcomeTableRegistry,
        depth: u32,
    ) -> Result<Option<Outcome>, RollError> {
        if depth > MAX_DEPTH {
            return Err(RollError::CycleDetected(self.id.clone()));
        }

        let valid_entries: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|e| e.level_valid(level) && e.base_valid(base))
            .collect();

        // Summed as u64 so many large u32 weights cannot overflow
        let total_weight: u64 = valid_entries.iter().map(|e| u64::from(e.weight)).sum();
        if total_weight == 0 {
            return Ok(None);
        }

        // Weighted random selection
        let mut roll = rng.gen_range(0..total_weight);
        let mut selected = valid_entries[valid_entries.len() - 1];
        for entry in &valid_entries {
            let weight = u64::from(entry.weight);
            if roll < weight {
                selected = entry;
                break;
            }
            roll -= weight;
        }

        match &selected.kind {
            EntryKind::Outcome(outcome) => Ok(Some(outcome.clone())),
            EntryKind::Table { id } => {
                let nested = registry
                    .get(id)
                    .ok_or_else(|| RollError::UnknownTable(id.clone()))?;
                nested.roll(level, base, rng, registry, depth + 1)
            }
        }
    }
}

impl Entry {
    fn from_config(config: EntryConfig) -> Result<Self, RollError> {
        let kind = match config.entry_type.as_str() {
            "unique" => EntryKind::Outcome(Outcome::Unique {
                id: config.id.unwrap_or_default(),
                base: config.base.clone(),
            }),
            "table" => EntryKind::Table {
                id: config.id.unwrap_or_default(),
            },
            other => match Outcome::from_type(other) {
                Some(outcome) => EntryKind::Outcome(outcome),
                None => return Err(RollError::InvalidEntryType(config.entry_type)),
            },
        };

        Ok(Entry {
            kind,
            weight: config.weight,
            min_level: config.min_level,
            max_level: config.max_level,
            base: config.base,
        })
    }

    fn level_valid(&self, level: u32) -> bool {
        if let Some(min) = self.min_level {
            if level < min {
                return false;
            }
        }
        if let Some(max) = self.max_level {
            if level > max {
                return false;
            }
        }
        true
    }

    fn base_valid(&self, base: &str) -> bool {
        self.base.as_deref().map_or(true, |b| b == base)
    }
}
