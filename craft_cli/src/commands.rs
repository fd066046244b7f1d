//! Command handlers

use crate::cli::{ItemArgs, ListKind, OutputArgs};
use anyhow::{bail, Context, Result};
use craft_core::{CraftOutcome, CraftableItem, CraftingSimulator, SimulateOptions};
use std::path::Path;

pub fn load_simulator(content: &Path) -> Result<CraftingSimulator> {
    CraftingSimulator::from_dir(content)
        .with_context(|| format!("Failed to load content from {:?}", content))
}

/// Load an item from JSON
pub fn read_item(path: &Path) -> Result<CraftableItem> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read item: {:?}", path))?;
    let mut item: CraftableItem = serde_json::from_str(&text).context("Failed to parse item JSON")?;
    item.recalculate_stats();
    Ok(item)
}

fn starting_item(args: &ItemArgs) -> Result<CraftableItem> {
    if let Some(path) = &args.file {
        return read_item(path);
    }
    let mut item = CraftableItem::new(&args.base, &args.category, args.level).with_rarity(args.rarity.into());
    item.class = args.class;
    Ok(item)
}

pub fn simulate(
    sim: &CraftingSimulator,
    item: &ItemArgs,
    currencies: &[String],
    omens: Vec<String>,
    seed: Option<u64>,
    repeat: usize,
    output: &OutputArgs,
) -> Result<()> {
    let start = starting_item(item)?;
    let options = SimulateOptions { omens, seed };
    let names: Vec<&str> = std::iter::repeat(currencies)
        .take(repeat.max(1))
        .flatten()
        .map(String::as_str)
        .collect();
    let outcomes = sim.simulate_sequence(&start, &names, &options)?;

    for (name, outcome) in names.iter().zip(&outcomes) {
        let status = if outcome.success { "ok" } else { "failed" };
        eprintln!("[{}] {}: {}", status, name, outcome.message);
    }

    let Some(last) = outcomes.last() else {
        bail!("No currency was applied");
    };
    emit(last, output)
}

pub fn reveal(sim: &CraftingSimulator, input: &Path, seed: Option<u64>, output: &OutputArgs) -> Result<()> {
    let item = read_item(input)?;
    let outcome = sim.reveal(&item, seed);
    let status = if outcome.success { "ok" } else { "failed" };
    eprintln!("[{}] reveal: {}", status, outcome.message);
    emit(&outcome, output)
}

fn emit(outcome: &CraftOutcome, output: &OutputArgs) -> Result<()> {
    if let Some(path) = &output.output {
        let json = serde_json::to_string_pretty(&outcome.item)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write item: {:?}", path))?;
    }

    if output.json {
        println!("{}", serde_json::to_string_pretty(&outcome.item)?);
    } else {
        println!("{}", outcome.item);
    }
    Ok(())
}

pub fn list(sim: &CraftingSimulator, what: ListKind) -> Result<()> {
    let factory = sim.factory();
    match what {
        ListKind::Currencies => {
            for name in factory.list_currencies() {
                println!("{}", name);
            }
        }
        ListKind::Essences => {
            for essence in factory.list_essences() {
                println!("{} ({}) -> {}", essence.name, essence.tier, essence.modifier);
            }
        }
        ListKind::Omens => {
            for omen in factory.list_omens() {
                println!("{} [{:?}] affects {}", omen.name, omen.rule, omen.affects);
            }
        }
        ListKind::Bones => {
            for bone in factory.list_bones() {
                println!(
                    "{} ({}, item level {}-{})",
                    bone.name, bone.part, bone.min_item_level, bone.max_item_level
                );
            }
        }
    }
    Ok(())
}

pub fn omens_for(sim: &CraftingSimulator, currency: &str) -> Result<()> {
    let omens = sim.omens_for(currency)?;
    if omens.is_empty() {
        println!("No omens affect {}", currency);
    }
    for omen in omens {
        println!("{} [{:?}]", omen.name, omen.rule);
    }
    Ok(())
}
