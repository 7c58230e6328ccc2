//! Save file validation.

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use runtime::{SaveData, load_from_json};

use crate::dirs;

/// Load a save, validate it and print a summary
#[derive(Parser, Debug)]
pub struct ValidateSave {
    /// Path to a save file, or a slot name in the save directory
    pub file: String,

    /// Print the normalized save as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

impl ValidateSave {
    pub fn execute(self) -> Result<()> {
        let path = dirs::resolve_save(&self.file, &dirs::save_dir());
        let json = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;

        let data = load_from_json(&json).with_context(|| format!("{} was rejected", path.display()))?;

        if self.json {
            println!("{}", data.to_json()?);
        } else {
            print_summary(&data);
        }
        Ok(())
    }
}

fn print_summary(data: &SaveData) {
    let c = &data.character;
    let stats = &data.battle_stats;
    println!("{} Save is valid (version {})", style("✓").green().bold(), data.version);
    println!();
    println!(
        "  {} {} level {} ({} XP)",
        style(&c.name).bold(),
        style(c.class).cyan(),
        c.level,
        c.experience
    );
    println!(
        "  HP {}/{}  MP {}/{}  ATK {}  DEF {}  SPD {}",
        c.stats.health, c.stats.max_health, c.stats.mana, c.stats.max_mana, c.stats.attack, c.stats.defense, c.stats.speed
    );
    println!("  Spells: {}", c.spells.len());
    println!(
        "  Inventory: {}/{} slots",
        data.inventory.items.len(),
        data.inventory.max_slots
    );
    println!(
        "  Quests: {} completed of {}",
        data.completed_quest_ids.len(),
        data.quests.len()
    );
    println!(
        "  Battles: {} ({} won, {} lost)",
        stats.total_battles, stats.victories, stats.defeats
    );
    println!("  Knowledge: {}", data.knowledge.len());
    println!("  Playtime: {}s", data.playtime_ms / 1000);
    println!("  Saved at: {}", style(data.timestamp.to_rfc3339()).dim());
}
