//! Single matchup summary.

use anyhow::Result;
use clap::Parser;
use console::style;
use game_core::{BugType, CharacterClass};
use simulation::{Harness, Matchup, format_table};

use super::args::{OutputArgs, SimArgs, parse_bug_type, parse_class};

/// One class and level against one monster
#[derive(Parser, Debug)]
pub struct MatchupCmd {
    #[arg(long, value_parser = parse_class)]
    pub class: CharacterClass,

    #[arg(long, value_parser = parse_bug_type)]
    pub bug_type: BugType,

    #[arg(long, default_value_t = 5)]
    pub level: u32,

    #[arg(long, default_value_t = 2)]
    pub severity: u8,

    #[arg(long, default_value_t = 0)]
    pub complexity: u32,

    #[command(flatten)]
    pub sim: SimArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl MatchupCmd {
    pub fn execute(self) -> Result<()> {
        let content = self.sim.content()?;
        let harness = Harness::new(&content, self.sim.sim_config()?)?;
        let matchup = Matchup::new(self.class, self.level, self.bug_type, self.severity, self.complexity);

        let result = harness.simulate_matchup(matchup)?;
        let rows = std::slice::from_ref(&result);

        let mut table = format_table(rows);
        table.push_str(&format!(
            "\n  {} wins / {} losses / {} draws, median {} turns, player HP left {:.1}, monster HP left {:.1}",
            style(result.victories).green(),
            style(result.defeats).red(),
            style(result.draws).yellow(),
            result.median_turns,
            result.avg_player_hp_remaining,
            result.avg_monster_hp_remaining,
        ));

        let rendered = self.output.render_rows(rows, table, &result)?;
        self.output.emit(&rendered)
    }
}
