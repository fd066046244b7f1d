use serde::Deserialize;

/// TOML configuration for an outcome table file
#[derive(Debug, Deserialize)]
pub struct TableFileConfig {
    pub table: TableConfig,
    #[serde(default)]
    pub entries: Vec<EntryConfig>,
}

/// Configuration for the table itself
#[derive(Debug, Deserialize)]
pub struct TableConfig {
    pub id: String,
}

/// Configuration for a single weighted entry
#[derive(Debug, Deserialize)]
pub struct EntryConfig {
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub min_level: Option<u32>,
    #[serde(default)]
    pub max_level: Option<u32>,
    /// Restricts the entry to items of this base
    #[serde(default)]
    pub base: Option<String>,

    // Unique / nested table reference
    #[serde(default)]
    pub id: Option<String>,
}

fn default_weight() -> u32 {
    1
}
