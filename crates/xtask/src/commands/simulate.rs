//! Full balance suite.

use anyhow::Result;
use clap::Parser;
use simulation::{Harness, format_report};

use super::args::{OutputArgs, SimArgs};

/// Every class against every bug type at one level and severity
#[derive(Parser, Debug)]
pub struct Simulate {
    /// Character level
    #[arg(long, default_value_t = 5)]
    pub level: u32,

    /// Monster severity (1-5)
    #[arg(long, default_value_t = 2)]
    pub severity: u8,

    /// Source complexity fed to the monster factory
    #[arg(long, default_value_t = 0)]
    pub complexity: u32,

    #[command(flatten)]
    pub sim: SimArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let content = self.sim.content()?;
        let harness = Harness::new(&content, self.sim.sim_config()?)?;

        let report = harness.run_full_simulation(self.level, self.severity, self.complexity)?;
        tracing::info!(
            matchups = report.matchups.len(),
            flagged = report.flagged.len(),
            elapsed_ms = report.elapsed_ms,
            "simulation finished"
        );

        let rendered = self
            .output
            .render_rows(&report.matchups, format_report(&report), &report)?;
        self.output.emit(&rendered)
    }
}
