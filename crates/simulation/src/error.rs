//! Harness entry validation errors.

use game_core::{ErrorSeverity, GameError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimulationError>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum SimulationError {
    #[error("trial count must be between 1 and {max}, got {trials}")]
    InvalidTrials { trials: u32, max: u32 },

    #[error("turn cap must be between 1 and {max}, got {max_turns}")]
    InvalidMaxTurns { max_turns: u32, max: u32 },

    #[error("{name} must be a win rate in [0, 1], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("low win threshold {low} is above high win threshold {high}")]
    ThresholdOrder { low: f64, high: f64 },

    #[error("monster severity must be between 1 and 5, got {severity}")]
    InvalidSeverity { severity: u8 },

    #[error("player level must be between 1 and {max}, got {level}")]
    InvalidLevel { level: u32, max: u32 },

    #[error("environment variable {var} has invalid value {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

impl GameError for SimulationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTrials { .. } => "SIM_INVALID_TRIALS",
            Self::InvalidMaxTurns { .. } => "SIM_INVALID_MAX_TURNS",
            Self::InvalidThreshold { .. } => "SIM_INVALID_THRESHOLD",
            Self::ThresholdOrder { .. } => "SIM_THRESHOLD_ORDER",
            Self::InvalidSeverity { .. } => "SIM_INVALID_SEVERITY",
            Self::InvalidLevel { .. } => "SIM_INVALID_LEVEL",
            Self::InvalidEnv { .. } => "SIM_INVALID_ENV",
        }
    }
}
