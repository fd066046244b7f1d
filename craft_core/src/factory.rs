//! Validated content snapshots and mechanic construction

use crate::catalog::ModifierCatalog;
use crate::config::{ContentFile, ContentSource, CurrencyConfig};
use crate::error::{ConfigError, CraftError};
use crate::mechanics::{
    BoneInfo, CurrencyMechanic, CurrencyParams, EssenceInfo, Mechanic, MechanicKind, MechanicVariant,
    OutcomeSource,
};
use crate::omen::{OmenDecorator, OmenInfo};
use crate::pool::ModifierPool;
use crate::types::Rarity;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tables_core::OutcomeTableRegistry;

/// One immutable, validated view of all content
#[derive(Debug)]
pub struct Content {
    pool: ModifierPool,
    currencies: Vec<CurrencyMechanic>,
    essences: Vec<EssenceInfo>,
    bones: Vec<BoneInfo>,
    omens: Vec<OmenInfo>,
    tables: Arc<OutcomeTableRegistry>,
}

impl Content {
    /// Validate raw records into a snapshot. Nothing is partially applied:
    /// any error rejects the whole source.
    pub fn from_source(source: ContentSource) -> Result<Self, ConfigError> {
        source.tables.validate_references()?;
        let tables = Arc::new(source.tables);

        let catalog = ModifierCatalog::from_configs(
            source.modifiers,
            &source.settings.hidden_tags,
            Path::new(ContentFile::Modifiers.file_name()),
        )?;

        let mut names = HashSet::new();
        let mut claim = |name: &str, file: ContentFile| {
            if names.insert(name.to_string()) {
                Ok(())
            } else {
                Err(ConfigError::validation(
                    file.file_name(),
                    format!("duplicate currency name '{}'", name),
                ))
            }
        };

        let mut currencies = Vec::with_capacity(source.currencies.len());
        for config in &source.currencies {
            claim(&config.name, ContentFile::Currencies)?;
            currencies.push(build_currency(config, &tables)?);
        }

        let mut essences = Vec::with_capacity(source.essences.len());
        for config in &source.essences {
            claim(&config.name, ContentFile::Essences)?;
            let essence = EssenceInfo::from(config);
            validate_mod_count(essence.mod_count, &essence.name, ContentFile::Essences)?;
            let known = catalog
                .named(&essence.modifier)
                .any(|m| essence.modifier_tier.map_or(true, |t| m.tier == t));
            if !known {
                return Err(ConfigError::validation(
                    ContentFile::Essences.file_name(),
                    format!(
                        "essence '{}' guarantees unknown modifier '{}'",
                        essence.name, essence.modifier
                    ),
                ));
            }
            essences.push(essence);
        }

        let mut bones = Vec::with_capacity(source.bones.len());
        for config in &source.bones {
            claim(&config.name, ContentFile::Bones)?;
            let bone = BoneInfo::from(config);
            if bone.min_item_level > bone.max_item_level {
                return Err(ConfigError::validation(
                    ContentFile::Bones.file_name(),
                    format!("bone '{}' has an empty item level range", bone.name),
                ));
            }
            bones.push(bone);
        }

        let mut omens = Vec::with_capacity(source.omens.len());
        let mut omen_names = HashSet::new();
        for config in &source.omens {
            let omen = OmenInfo::from(config);
            if !omen_names.insert(omen.name.clone()) {
                return Err(ConfigError::validation(
                    ContentFile::Omens.file_name(),
                    format!("duplicate omen name '{}'", omen.name),
                ));
            }
            let known_target = names.contains(&omen.affects)
                || currencies.iter().any(|c| c.kind().as_str() == omen.affects)
                || ["essence", "desecration"].contains(&omen.affects.as_str());
            if !known_target {
                return Err(ConfigError::validation(
                    ContentFile::Omens.file_name(),
                    format!("omen '{}' affects unknown currency '{}'", omen.name, omen.affects),
                ));
            }
            if omen.top_tiers == Some(0) {
                return Err(ConfigError::validation(
                    ContentFile::Omens.file_name(),
                    format!("omen '{}' must keep at least one tier", omen.name),
                ));
            }
            omens.push(omen);
        }

        Ok(Content {
            pool: ModifierPool::new(catalog),
            currencies,
            essences,
            bones,
            omens,
            tables,
        })
    }

    pub fn pool(&self) -> &ModifierPool {
        &self.pool
    }

    pub fn tables(&self) -> &OutcomeTableRegistry {
        &self.tables
    }

    /// Resolve any currency, essence or bone by name
    fn mechanic(&self, name: &str) -> Option<CurrencyMechanic> {
        if let Some(currency) = self.currencies.iter().find(|c| c.name() == name) {
            return Some(currency.clone());
        }
        if let Some(essence) = self.essences.iter().find(|e| e.name == name) {
            return Some(CurrencyMechanic::new(
                name,
                MechanicVariant::Essence(essence.clone()),
                CurrencyParams::default(),
            ));
        }
        self.bones.iter().find(|b| b.name == name).map(|bone| {
            CurrencyMechanic::new(
                name,
                MechanicVariant::Desecration(bone.clone()),
                CurrencyParams::default(),
            )
        })
    }
}

fn build_currency(config: &CurrencyConfig, tables: &Arc<OutcomeTableRegistry>) -> Result<CurrencyMechanic, ConfigError> {
    let file = ContentFile::Currencies.file_name();
    let mod_count = config.mod_count.map(|[min, max]| (min, max));
    validate_mod_count(mod_count, &config.name, ContentFile::Currencies)?;

    let source = if config.mechanic.needs_outcome_table() {
        let table_id = config.outcome_table.as_deref().ok_or_else(|| {
            ConfigError::validation(file, format!("currency '{}' needs an outcome_table", config.name))
        })?;
        if !tables.contains(table_id) {
            return Err(ConfigError::validation(
                file,
                format!("currency '{}' uses unknown outcome table '{}'", config.name, table_id),
            ));
        }
        Some(OutcomeSource::new(Arc::clone(tables), table_id))
    } else {
        None
    };

    let variant = match (config.mechanic, source) {
        (MechanicKind::Transmutation, _) => MechanicVariant::Transmutation,
        (MechanicKind::Augmentation, _) => MechanicVariant::Augmentation,
        (MechanicKind::Alchemy, _) => MechanicVariant::Alchemy,
        (MechanicKind::Regal, _) => MechanicVariant::Regal,
        (MechanicKind::Exalted, _) => MechanicVariant::Exalted,
        (MechanicKind::Chaos, _) => MechanicVariant::Chaos,
        (MechanicKind::Divine, _) => MechanicVariant::Divine,
        (MechanicKind::Annulment, _) => MechanicVariant::Annulment,
        (MechanicKind::Scouring, _) => MechanicVariant::Scouring,
        (MechanicKind::Vaal, Some(source)) => MechanicVariant::Vaal(source),
        (MechanicKind::Chance, Some(source)) => MechanicVariant::Chance(source),
        (kind, _) => {
            return Err(ConfigError::validation(
                file,
                format!(
                    "currency '{}' cannot use the {} mechanic; declare it in its own file",
                    config.name, kind
                ),
            ))
        }
    };

    Ok(CurrencyMechanic::new(
        &config.name,
        variant,
        CurrencyParams {
            mod_count,
            min_modifier_level: config.min_modifier_level,
        },
    ))
}

fn validate_mod_count(mod_count: Option<(u32, u32)>, name: &str, file: ContentFile) -> Result<(), ConfigError> {
    match mod_count {
        Some((min, max)) if min > max || min == 0 || max as usize > Rarity::Rare.max_total() => {
            Err(ConfigError::validation(
                file.file_name(),
                format!("'{}' has an invalid mod_count [{}, {}]", name, min, max),
            ))
        }
        _ => Ok(()),
    }
}

/// Builds mechanics from the current content snapshot.
///
/// The snapshot sits behind a lock and is replaced wholesale on reload;
/// readers clone the `Arc` and never observe a half-loaded state.
#[derive(Debug)]
pub struct CraftingFactory {
    content: RwLock<Arc<Content>>,
}

impl CraftingFactory {
    pub fn new(source: ContentSource) -> Result<Self, ConfigError> {
        let content = Content::from_source(source)?;
        log_loaded(&content);
        Ok(CraftingFactory {
            content: RwLock::new(Arc::new(content)),
        })
    }

    pub fn from_dir(dir: &Path) -> Result<Self, ConfigError> {
        Self::new(ContentSource::load_from_dir(dir)?)
    }

    /// The current content snapshot
    pub fn snapshot(&self) -> Arc<Content> {
        Arc::clone(&self.content.read())
    }

    /// Validate new content and swap it in. On error the previous snapshot stays.
    pub fn reload(&self, source: ContentSource) -> Result<(), ConfigError> {
        let content = Content::from_source(source)?;
        log_loaded(&content);
        *self.content.write() = Arc::new(content);
        Ok(())
    }

    pub fn reload_from_dir(&self, dir: &Path) -> Result<(), ConfigError> {
        self.reload(ContentSource::load_from_dir(dir)?)
    }

    /// Build the mechanic for a currency, wrapped in the active omens that
    /// target it. Omens aimed at other currencies are ignored.
    pub fn create_mechanic(&self, currency: &str, active_omens: &[String]) -> Result<Box<dyn Mechanic>, CraftError> {
        let content = self.snapshot();
        Self::create_from(&content, currency, active_omens)
    }

    pub(crate) fn create_from(
        content: &Content,
        currency: &str,
        active_omens: &[String],
    ) -> Result<Box<dyn Mechanic>, CraftError> {
        let base = content
            .mechanic(currency)
            .ok_or_else(|| CraftError::UnknownCurrency(currency.to_string()))?;
        let kind = base.kind();
        let mut mechanic: Box<dyn Mechanic> = Box::new(base);

        for name in active_omens {
            let omen = content
                .omens
                .iter()
                .find(|o| &o.name == name)
                .ok_or_else(|| CraftError::UnknownOmen(name.clone()))?;
            if !omen.targets(currency, kind) {
                tracing::warn!(omen = %omen.name, currency, "omen does not affect this currency; ignoring");
                continue;
            }
            mechanic = Box::new(OmenDecorator::new(mechanic, omen.clone()));
        }

        Ok(mechanic)
    }

    /// Plain currency names, in content order
    pub fn list_currencies(&self) -> Vec<String> {
        self.snapshot()
            .currencies
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    pub fn list_essences(&self) -> Vec<EssenceInfo> {
        self.snapshot().essences.clone()
    }

    pub fn list_bones(&self) -> Vec<BoneInfo> {
        self.snapshot().bones.clone()
    }

    pub fn list_omens(&self) -> Vec<OmenInfo> {
        self.snapshot().omens.clone()
    }

    /// Omens that would affect the named currency
    pub fn omens_for(&self, currency: &str) -> Result<Vec<OmenInfo>, CraftError> {
        let content = self.snapshot();
        let kind = content
            .mechanic(currency)
            .map(|m| m.kind())
            .ok_or_else(|| CraftError::UnknownCurrency(currency.to_string()))?;
        Ok(content
            .omens
            .iter()
            .filter(|o| o.targets(currency, kind))
            .cloned()
            .collect())
    }
}

fn log_loaded(content: &Content) {
    tracing::info!(
        modifiers = content.pool.catalog().len(),
        currencies = content.currencies.len(),
        essences = content.essences.len(),
        bones = content.bones.len(),
        omens = content.omens.len(),
        tables = content.tables.table_ids().count(),
        "loaded crafting content"
    );
}
