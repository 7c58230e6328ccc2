//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod args;
mod matchup;
mod progression;
mod simulate;
mod validate_save;

pub use matchup::MatchupCmd;
pub use progression::Progression;
pub use simulate::Simulate;
pub use validate_save::ValidateSave;
