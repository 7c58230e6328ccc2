//! Harness configuration.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::strategy::Strategy;

/// Trials, turn cap, flag thresholds and seed for a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimConfig {
    /// Trials per matchup.
    pub trials: u32,
    /// Player actions before a battle is scored as a draw.
    pub max_turns: u32,
    /// Win rate below this is flagged too hard.
    pub low_win_threshold: f64,
    /// Win rate above this is flagged too easy.
    pub high_win_threshold: f64,
    /// Trial `i` runs with seed `base_seed + i`.
    pub base_seed: u32,
    /// Player script used by matchups.
    pub strategy: Strategy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            trials: 1000,
            max_turns: 100,
            low_win_threshold: 0.3,
            high_win_threshold: 0.8,
            base_seed: 12345,
            strategy: Strategy::Mixed,
        }
    }
}

impl SimConfig {
    pub const MAX_TRIALS: u32 = 1_000_000;
    pub const MAX_TURN_CAP: u32 = 10_000;

    pub fn with_trials(mut self, trials: u32) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_base_seed(mut self, base_seed: u32) -> Self {
        self.base_seed = base_seed;
        self
    }

    pub fn with_thresholds(mut self, low: f64, high: f64) -> Self {
        self.low_win_threshold = low;
        self.high_win_threshold = high;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Seed of trial `index`.
    pub fn trial_seed(&self, index: u32) -> u32 {
        self.base_seed.wrapping_add(index)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=Self::MAX_TRIALS).contains(&self.trials) {
            return Err(SimulationError::InvalidTrials {
                trials: self.trials,
                max: Self::MAX_TRIALS,
            });
        }
        if !(1..=Self::MAX_TURN_CAP).contains(&self.max_turns) {
            return Err(SimulationError::InvalidMaxTurns {
                max_turns: self.max_turns,
                max: Self::MAX_TURN_CAP,
            });
        }
        check_rate("low_win_threshold", self.low_win_threshold)?;
        check_rate("high_win_threshold", self.high_win_threshold)?;
        if self.low_win_threshold > self.high_win_threshold {
            return Err(SimulationError::ThresholdOrder {
                low: self.low_win_threshold,
                high: self.high_win_threshold,
            });
        }
        Ok(())
    }

    /// Construct configuration from process environment variables, then
    /// validate it.
    ///
    /// Environment variables:
    /// - `SIM_TRIALS` - Trials per matchup (default: 1000)
    /// - `SIM_MAX_TURNS` - Turn cap per battle (default: 100)
    /// - `SIM_BASE_SEED` - Seed of the first trial (default: 12345)
    /// - `SIM_LOW_WIN_RATE` - Too-hard threshold (default: 0.3)
    /// - `SIM_HIGH_WIN_RATE` - Too-easy threshold (default: 0.8)
    /// - `SIM_STRATEGY` - `attack-only`, `spell-first` or `mixed` (default: mixed)
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(trials) = read_env("SIM_TRIALS")? {
            config.trials = trials;
        }
        if let Some(max_turns) = read_env("SIM_MAX_TURNS")? {
            config.max_turns = max_turns;
        }
        if let Some(seed) = read_env("SIM_BASE_SEED")? {
            config.base_seed = seed;
        }
        if let Some(low) = read_env("SIM_LOW_WIN_RATE")? {
            config.low_win_threshold = low;
        }
        if let Some(high) = read_env("SIM_HIGH_WIN_RATE")? {
            config.high_win_threshold = high;
        }
        if let Some(strategy) = read_env("SIM_STRATEGY")? {
            config.strategy = strategy;
        }

        config.validate()?;
        Ok(config)
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimulationError::InvalidThreshold { name, value })
    }
}

fn read_env<T: FromStr>(var: &'static str) -> Result<Option<T>> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SimulationError::InvalidEnv { var, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(matches!(
            SimConfig::default().with_trials(0).validate(),
            Err(SimulationError::InvalidTrials { trials: 0, .. })
        ));
        assert!(matches!(
            SimConfig::default().with_max_turns(0).validate(),
            Err(SimulationError::InvalidMaxTurns { .. })
        ));
        assert!(matches!(
            SimConfig::default().with_thresholds(-0.1, 0.8).validate(),
            Err(SimulationError::InvalidThreshold { name: "low_win_threshold", .. })
        ));
        assert!(matches!(
            SimConfig::default().with_thresholds(0.9, 0.2).validate(),
            Err(SimulationError::ThresholdOrder { .. })
        ));
        assert!(matches!(
            SimConfig::default().with_thresholds(0.3, f64::NAN).validate(),
            Err(SimulationError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn trial_seeds_step_by_one() {
        let config = SimConfig::default().with_base_seed(u32::MAX);
        assert_eq!(config.trial_seed(0), u32::MAX);
        assert_eq!(config.trial_seed(1), 0);
    }
}
