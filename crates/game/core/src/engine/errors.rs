//! Reasons the engine refuses an action.
//!
//! A rejection leaves the battle untouched; the caller may retry with a
//! different action.

use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionRejection {
    /// The battle already reached victory or defeat.
    #[error("battle is over ({phase})")]
    BattleOver { phase: &'static str },

    /// The action is not legal in the current phase.
    #[error("{action} is not allowed during {phase}")]
    WrongPhase {
        action: &'static str,
        phase: &'static str,
    },

    /// ENEMY_ACT named an enemy other than the one whose turn it is.
    #[error("it is enemy {expected}'s turn, not enemy {requested}'s")]
    WrongEnemy { expected: usize, requested: usize },

    #[error("unknown spell '{spell_id}'")]
    UnknownSpell { spell_id: String },

    #[error("spell '{spell_id}' has not been learned")]
    SpellNotLearned { spell_id: String },

    #[error("not enough mana for '{spell_id}': need {required}, have {available}")]
    InsufficientMana {
        spell_id: String,
        required: u32,
        available: u32,
    },

    #[error("'{spell_id}' is on cooldown for {remaining} more turn(s)")]
    OnCooldown { spell_id: String, remaining: u32 },

    #[error("unknown item '{item_id}'")]
    UnknownItem { item_id: String },
}

impl GameError for ActionRejection {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientMana { .. } | Self::OnCooldown { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BattleOver { .. } => "BATTLE_OVER",
            Self::WrongPhase { .. } => "WRONG_PHASE",
            Self::WrongEnemy { .. } => "WRONG_ENEMY",
            Self::UnknownSpell { .. } => "UNKNOWN_SPELL",
            Self::SpellNotLearned { .. } => "SPELL_NOT_LEARNED",
            Self::InsufficientMana { .. } => "INSUFFICIENT_MANA",
            Self::OnCooldown { .. } => "ON_COOLDOWN",
            Self::UnknownItem { .. } => "UNKNOWN_ITEM",
        }
    }
}
