use crate::config::ContentSource;
use crate::error::{ConfigError, CraftError};
use crate::factory::{Content, CraftingFactory};
use crate::item::CraftableItem;
use crate::mechanics::{self, CraftOutcome};
use crate::omen::OmenInfo;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use std::sync::Arc;

/// Per-call options
#[derive(Debug, Clone, Default)]
pub struct SimulateOptions {
    /// Omen names active for this application
    pub omens: Vec<String>,
    /// Seed for a reproducible roll; thread-local randomness when absent
    pub seed: Option<u64>,
}

impl SimulateOptions {
    pub fn with_omens(mut self, omens: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.omens = omens.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Entry point: apply currencies to items
#[derive(Debug)]
pub struct CraftingSimulator {
    factory: CraftingFactory,
}

impl CraftingSimulator {
    pub fn new(source: ContentSource) -> Result<Self, ConfigError> {
        Ok(CraftingSimulator {
            factory: CraftingFactory::new(source)?,
        })
    }

    pub fn from_dir(dir: &Path) -> Result<Self, ConfigError> {
        Ok(CraftingSimulator {
            factory: CraftingFactory::from_dir(dir)?,
        })
    }

    pub fn factory(&self) -> &CraftingFactory {
        &self.factory
    }

    pub fn content(&self) -> Arc<Content> {
        self.factory.snapshot()
    }

    pub fn reload(&self, source: ContentSource) -> Result<(), ConfigError> {
        self.factory.reload(source)
    }

    pub fn reload_from_dir(&self, dir: &Path) -> Result<(), ConfigError> {
        self.factory.reload_from_dir(dir)
    }

    /// Apply one currency to an item
    pub fn simulate(
        &self,
        item: &CraftableItem,
        currency: &str,
        options: &SimulateOptions,
    ) -> Result<CraftOutcome, CraftError> {
        let mut rng = rng_for(options.seed);
        self.simulate_with_rng(item, currency, &options.omens, rng.as_mut())
    }

    /// Apply one currency with a caller-supplied randomness source
    pub fn simulate_with_rng(
        &self,
        item: &CraftableItem,
        currency: &str,
        omens: &[String],
        rng: &mut dyn RngCore,
    ) -> Result<CraftOutcome, CraftError> {
        let content = self.factory.snapshot();
        let mechanic = CraftingFactory::create_from(&content, currency, omens)?;
        let outcome = mechanic.apply(item, content.pool(), rng);
        tracing::debug!(
            currency,
            success = outcome.success,
            message = %outcome.message,
            rarity = %outcome.item.rarity,
            affixes = outcome.item.affix_count(),
            "simulated"
        );
        Ok(outcome)
    }

    /// Apply currencies in order, feeding each result into the next. Stops
    /// after the first failed step; its outcome is the last one returned.
    pub fn simulate_sequence(
        &self,
        item: &CraftableItem,
        currencies: &[&str],
        options: &SimulateOptions,
    ) -> Result<Vec<CraftOutcome>, CraftError> {
        let mut rng = rng_for(options.seed);
        let mut current = item.clone();
        let mut outcomes = Vec::with_capacity(currencies.len());
        for currency in currencies {
            let outcome = self.simulate_with_rng(&current, currency, &options.omens, rng.as_mut())?;
            let failed = !outcome.success;
            current = outcome.item.clone();
            outcomes.push(outcome);
            if failed {
                break;
            }
        }
        Ok(outcomes)
    }

    /// Reveal every pending desecrated modifier
    pub fn reveal(&self, item: &CraftableItem, seed: Option<u64>) -> CraftOutcome {
        let content = self.factory.snapshot();
        let mut rng = rng_for(seed);
        mechanics::reveal(item, content.pool(), rng.as_mut())
    }

    pub fn currencies(&self) -> Vec<String> {
        self.factory.list_currencies()
    }

    pub fn omens_for(&self, currency: &str) -> Result<Vec<OmenInfo>, CraftError> {
        self.factory.omens_for(currency)
    }
}

fn rng_for(seed: Option<u64>) -> Box<dyn RngCore> {
    match seed {
        Some(seed) => Box::new(ChaCha8Rng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    }
}
