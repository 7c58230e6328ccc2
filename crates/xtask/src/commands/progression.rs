//! Level and severity sweep for one class against one bug type.

use anyhow::Result;
use clap::Parser;
use game_core::{BugType, CharacterClass};
use simulation::{Harness, PROGRESSION_LEVELS, PROGRESSION_SEVERITIES, format_table};

use super::args::{OutputArgs, SimArgs, parse_bug_type, parse_class};

/// Progression sweep
#[derive(Parser, Debug)]
pub struct Progression {
    #[arg(long, value_parser = parse_class)]
    pub class: CharacterClass,

    #[arg(long, value_parser = parse_bug_type)]
    pub bug_type: BugType,

    /// Comma-separated levels (default 1,5,10,15,20,25,30)
    #[arg(long, value_delimiter = ',')]
    pub levels: Vec<u32>,

    /// Comma-separated severities (default 1-5)
    #[arg(long, value_delimiter = ',')]
    pub severities: Vec<u8>,

    #[command(flatten)]
    pub sim: SimArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl Progression {
    pub fn execute(self) -> Result<()> {
        let levels = if self.levels.is_empty() {
            PROGRESSION_LEVELS.to_vec()
        } else {
            self.levels.clone()
        };
        let severities = if self.severities.is_empty() {
            PROGRESSION_SEVERITIES.to_vec()
        } else {
            self.severities.clone()
        };

        let content = self.sim.content()?;
        let harness = Harness::new(&content, self.sim.sim_config()?)?;
        let results = harness.run_progression_simulation(self.class, self.bug_type, &levels, &severities)?;

        let rendered = self.output.render_rows(&results, format_table(&results), &results)?;
        self.output.emit(&rendered)
    }
}
