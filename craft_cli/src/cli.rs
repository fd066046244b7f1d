//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use craft_core::{ItemClass, Rarity};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "craftsim")]
#[command(about = "Item crafting simulator", long_about = None)]
pub struct Cli {
    /// Content directory (modifiers.toml, currencies.toml, outcomes/, ...)
    #[arg(short, long, global = true, default_value = "content")]
    pub content: PathBuf,

    /// Log engine decisions at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply one or more currencies to an item
    #[command(visible_alias = "s")]
    Simulate {
        #[command(flatten)]
        item: ItemArgs,

        /// Currency to apply; repeat to apply several in order
        #[arg(short = 'x', long = "currency", required = true)]
        currencies: Vec<String>,

        /// Active omen; repeat for several
        #[arg(long = "omen")]
        omens: Vec<String>,

        /// Seed for reproducible results
        #[arg(long)]
        seed: Option<u64>,

        /// Apply the currency list this many times
        #[arg(long, default_value_t = 1)]
        repeat: usize,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Reveal desecrated modifiers on an item
    #[command(visible_alias = "r")]
    Reveal {
        /// Item JSON file
        #[arg(short, long, value_name = "FILE")]
        item: PathBuf,

        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List content
    #[command(visible_alias = "l")]
    List {
        #[arg(value_enum)]
        what: ListKind,
    },

    /// Show the omens that affect a currency
    OmensFor {
        currency: String,
    },
}

/// Where the starting item comes from: a JSON file or a fresh base
#[derive(Args)]
pub struct ItemArgs {
    /// Item JSON file (overrides the base options)
    #[arg(short = 'i', long = "item", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Base name for a fresh item
    #[arg(long, default_value = "Silk Robe")]
    pub base: String,

    /// Base category used for eligibility
    #[arg(long, default_value = "int_armour")]
    pub category: String,

    /// Equipment slot (e.g. body_armour, boots, amulet)
    #[arg(long, value_parser = parse_class)]
    pub class: Option<ItemClass>,

    #[arg(long, default_value_t = 82)]
    pub level: u32,

    #[arg(long, value_enum, default_value_t = RarityArg::Normal)]
    pub rarity: RarityArg,
}

#[derive(Args)]
pub struct OutputArgs {
    /// Print the resulting item as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the resulting item to a JSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RarityArg {
    Normal,
    Magic,
    Rare,
    Unique,
}

impl From<RarityArg> for Rarity {
    fn from(value: RarityArg) -> Self {
        match value {
            RarityArg::Normal => Rarity::Normal,
            RarityArg::Magic => Rarity::Magic,
            RarityArg::Rare => Rarity::Rare,
            RarityArg::Unique => Rarity::Unique,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ListKind {
    Currencies,
    Essences,
    Omens,
    Bones,
}

fn parse_class(label: &str) -> Result<ItemClass, String> {
    ItemClass::from_label(label).ok_or_else(|| format!("unknown item class '{}'", label))
}
