//! craft_core - Item crafting simulation engine
//!
//! This library provides:
//! - ModifierCatalog: validated modifier definitions loaded from TOML
//! - ModifierPool: eligibility, exclusion and weighted selection
//! - Currency mechanics and omen decorators
//! - CraftingSimulator: apply currencies to items
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use craft_core::{CraftableItem, CraftingSimulator, ItemClass, SimulateOptions};
//!
//! let sim = CraftingSimulator::from_dir(Path::new("content/")).unwrap();
//! let robe = CraftableItem::new("Silk Robe", "int_armour", 82).with_class(ItemClass::BodyArmour);
//!
//! let options = SimulateOptions::default().with_seed(7);
//! let outcome = sim.simulate(&robe, "Orb of Alchemy", &options).unwrap();
//! println!("{}", outcome.item);
//!
//! let options = options.with_omens(["Omen of Sinistral Exaltation"]);
//! let outcome = sim.simulate(&outcome.item, "Exalted Orb", &options).unwrap();
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod factory;
pub mod item;
pub mod mechanics;
pub mod omen;
pub mod pool;
pub mod simulator;
pub mod stats;
pub mod types;

#[cfg(test)]
mod testing;

// Core API
pub use item::{CraftableItem, Modifier, UnrevealedModifier};
pub use mechanics::{CraftOutcome, Mechanic, MechanicKind};
pub use simulator::{CraftingSimulator, SimulateOptions};
pub use types::{AffixType, ItemClass, Rarity};

// Content
pub use catalog::{ItemModifier, ModifierCatalog};
pub use config::ContentSource;
pub use factory::{Content, CraftingFactory};
pub use omen::{OmenDecorator, OmenInfo, OmenRule};
pub use pool::{ModifierPool, Selection};

pub use error::{ConfigError, CraftError, CraftFailure};
