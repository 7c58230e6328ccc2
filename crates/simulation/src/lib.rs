//! Monte Carlo balance harness.
//!
//! Drives the battle engine thousands of times per matchup with scripted
//! player policies, aggregates the outcomes and flags pairings whose win
//! rate falls outside a target band. Every trial derives its seed from the
//! run's base seed, so a whole report is reproducible.
//!
//! - [`battle`] runs one battle to completion
//! - [`matchup`] aggregates trials and sweeps class and bug type grids
//! - [`report`] renders results as text or CSV

pub mod battle;
pub mod config;
pub mod error;
pub mod matchup;
pub mod report;
pub mod strategy;

pub use battle::{BattleOutcome, BattleResult, simulate_battle};
pub use config::SimConfig;
pub use error::{Result, SimulationError};
pub use matchup::{
    BalanceFlag, Harness, Matchup, MatchupResult, PROGRESSION_LEVELS, PROGRESSION_SEVERITIES, SimulationReport,
};
pub use report::{CSV_HEADER, format_csv, format_report, format_table};
pub use strategy::Strategy;
