use crate::config::TableFileConfig;
use crate::outcome::Outcome;
use crate::table::OutcomeTable;
use crate::{ConfigError, RollError};
use rand::Rng;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Registry of all outcome tables, loaded from TOML files
#[derive(Debug, Clone, Default)]
pub struct OutcomeTableRegistry {
    tables: HashMap<String, OutcomeTable>,
}

impl OutcomeTableRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all outcome tables from a directory (recursively).
    /// A missing directory yields an empty registry.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        registry.load_dir(dir)?;
        tracing::debug!(dir = %dir.display(), tables = registry.tables.len(), "loaded outcome tables");
        Ok(registry)
    }

    /// Load tables from a directory recursively
    fn load_dir(&mut self, dir: &Path) -> Result<(), ConfigError> {
        if !dir.exists() {
            return Ok(());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(dir.to_path_buf()),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::Io {
                error: e,
                path: Some(dir.to_path_buf()),
            })?;
            let path = entry.path();

            if path.is_dir() {
                self.load_dir(&path)?;
            } else if path.extension().is_some_and(|ext| ext == "toml") {
                self.load_file(&path)?;
            }
        }

        Ok(())
    }

    /// Load a single table file
    fn load_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(path.to_path_buf()),
        })?;

        self.load_str(path, &content)
    }

    /// Parse and register a table from TOML source. `origin` names the
    /// source in error messages.
    pub fn load_str(&mut self, origin: impl AsRef<Path>, content: &str) -> Result<(), ConfigError> {
        let origin = origin.as_ref();
        let config: TableFileConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            error: e,
            path: origin.to_path_buf(),
        })?;

        let table = OutcomeTable::from_config(config).map_err(|e| ConfigError::Validation {
            message: e.to_string(),
            path: origin.to_path_buf(),
        })?;

        if self.tables.contains_key(&table.id) {
            return Err(ConfigError::Validation {
                message: format!("duplicate table id '{}'", table.id),
                path: origin.to_path_buf(),
            });
        }

        self.tables.insert(table.id.clone(), table);
        Ok(())
    }

    /// Check that every nested table reference resolves and that no table
    /// reaches itself
    pub fn validate_references(&self) -> Result<(), ConfigError> {
        for table in self.tables.values() {
            for id in table.referenced_tables() {
                if !self.contains(id) {
                    return Err(ConfigError::Validation {
                        message: format!("table '{}' references unknown table '{}'", table.id, id),
                        path: PathBuf::from(&table.id),
                    });
                }
            }
        }

        for id in self.tables.keys() {
            if self.reaches(id, id, &mut Vec::new()) {
                return Err(ConfigError::Validation {
                    message: format!("table '{}' references itself", id),
                    path: PathBuf::from(id),
                });
            }
        }
        Ok(())
    }

    fn reaches<'a>(&'a self, from: &'a str, target: &str, visited: &mut Vec<&'a str>) -> bool {
        let Some(table) = self.get(from) else {
            return false;
        };
        for next in table.referenced_tables() {
            if next == target {
                return true;
            }
            if visited.contains(&next) {
                continue;
            }
            visited.push(next);
            if self.reaches(next, target, visited) {
                return true;
            }
        }
        false
    }

    /// Get a table by ID
    pub fn get(&self, id: &str) -> Option<&OutcomeTable> {
        self.tables.get(id)
    }

    /// Check if a table exists
    pub fn contains(&self, id: &str) -> bool {
        self.tables.contains_key(id)
    }

    /// List all table IDs
    pub fn table_ids(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|s| s.as_str())
    }

    /// Roll a table by ID for an item of the given level and base
    pub fn roll<R: Rng + ?Sized>(
        &self,
        table_id: &str,
        level: u32,
        base: &str,
        rng: &mut R,
    ) -> Result<Option<Outcome>, RollError> {
        let table = self
            .get(table_id)
            .ok_or_else(|| RollError::UnknownTable(table_id.to_string()))?;

        table.roll(level, base, rng, self, 0)
    }
}
