//! Flags shared by the simulation commands.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use game_content::{ConfigLoader, ContentBundle};
use game_core::{BugType, CharacterClass, Preset};
use serde::Serialize;
use simulation::{MatchupResult, SimConfig, Strategy, format_csv};

/// Harness and balance settings. Unset flags fall back to `SIM_*`
/// environment variables, then to the built-in defaults.
#[derive(Args, Debug, Clone)]
pub struct SimArgs {
    /// Trials per matchup
    #[arg(long)]
    pub trials: Option<u32>,

    /// Player actions before a battle is scored as a draw
    #[arg(long)]
    pub max_turns: Option<u32>,

    /// Seed of the first trial
    #[arg(long)]
    pub seed: Option<u32>,

    /// Player script: attack-only, spell-first or mixed
    #[arg(long, value_parser = parse_strategy)]
    pub strategy: Option<Strategy>,

    /// Balance preset: easy, normal or hard
    #[arg(long, value_parser = parse_preset, default_value = "normal")]
    pub preset: Preset,

    /// TOML balance overrides layered on the preset
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl SimArgs {
    pub fn sim_config(&self) -> Result<SimConfig> {
        let mut config = SimConfig::from_env().context("invalid SIM_* environment")?;
        if let Some(trials) = self.trials {
            config = config.with_trials(trials);
        }
        if let Some(max_turns) = self.max_turns {
            config = config.with_max_turns(max_turns);
        }
        if let Some(seed) = self.seed {
            config = config.with_base_seed(seed);
        }
        if let Some(strategy) = self.strategy {
            config = config.with_strategy(strategy);
        }
        config.validate().context("invalid simulation settings")?;
        Ok(config)
    }

    pub fn content(&self) -> Result<ContentBundle> {
        let balance = ConfigLoader::resolve(self.preset, self.config.as_deref())?;
        tracing::debug!(preset = %self.preset, overrides = ?self.config, "balance resolved");
        Ok(ContentBundle::with_balance(balance))
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Table,
    Csv,
    Json,
}

/// Where and how results are written.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Write to a file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl OutputArgs {
    /// Renders matchup rows. `table` is used for the text format.
    pub fn render_rows<T: Serialize>(&self, rows: &[MatchupResult], table: String, json: &T) -> Result<String> {
        Ok(match self.format {
            Format::Table => table,
            Format::Csv => format_csv(rows),
            Format::Json => serde_json::to_string_pretty(json)?,
        })
    }

    pub fn emit(&self, rendered: &str) -> Result<()> {
        match &self.output {
            Some(path) => {
                fs::write(path, rendered).with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("{} Wrote {}", style("✓").green(), style(path.display()).cyan());
            }
            None => println!("{rendered}"),
        }
        Ok(())
    }
}

pub fn parse_class(s: &str) -> Result<CharacterClass, String> {
    s.parse().map_err(|_| format!("unknown class '{s}' (expected tank, healer or dps)"))
}

pub fn parse_bug_type(s: &str) -> Result<BugType, String> {
    s.parse()
        .map_err(|_| format!("unknown bug type '{s}' (expected null-pointer, memory-leak, race-condition or off-by-one)"))
}

fn parse_preset(s: &str) -> Result<Preset, String> {
    s.parse().map_err(|_| format!("unknown preset '{s}' (expected easy, normal or hard)"))
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    s.parse()
        .map_err(|_| format!("unknown strategy '{s}' (expected attack-only, spell-first or mixed)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_flags_parse_kebab_case() {
        assert_eq!(parse_class("dps"), Ok(CharacterClass::Dps));
        assert_eq!(parse_bug_type("race-condition"), Ok(BugType::RaceCondition));
        assert_eq!(parse_preset("hard"), Ok(Preset::Hard));
        assert!(parse_class("bard").is_err());
    }
}
