//! Battle actions.
//!
//! [`BattleAction`] is the closed set of inputs accepted by
//! [`BattleEngine::execute_turn`](crate::engine::BattleEngine::execute_turn).
//! [`available_actions`] answers which of them the player may choose right
//! now without touching the state.

mod available;

pub use available::{ActionMask, AvailableActions, available_actions};
pub(crate) use available::cooldown_after_tick;

use strum::{AsRefStr, Display};

/// A request to advance a battle by one step.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum BattleAction {
    /// Basic attack on an enemy. Falls back to the first living enemy when
    /// the index is out of range or already down.
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    Attack { target_index: usize },

    /// Cast a known spell.
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    CastSpell {
        spell_id: String,
        target_index: Option<usize>,
    },

    /// Raise defense until the next player turn.
    Defend,

    /// Consume an item from outside the battle.
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    UseItem { item_id: String },

    /// Let the enemy at `enemy_index` act. Only legal in stepwise enemy mode.
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    EnemyAct { enemy_index: usize },
}

impl BattleAction {
    pub fn attack(target_index: usize) -> Self {
        Self::Attack { target_index }
    }

    pub fn cast(spell_id: impl Into<String>, target_index: Option<usize>) -> Self {
        Self::CastSpell {
            spell_id: spell_id.into(),
            target_index,
        }
    }

    pub fn use_item(item_id: impl Into<String>) -> Self {
        Self::UseItem {
            item_id: item_id.into(),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Attack { .. } => "ATTACK",
            Self::CastSpell { .. } => "CAST_SPELL",
            Self::Defend => "DEFEND",
            Self::UseItem { .. } => "USE_ITEM",
            Self::EnemyAct { .. } => "ENEMY_ACT",
        }
    }

    /// Actions the player issues, as opposed to enemy steps.
    pub const fn is_player_action(&self) -> bool {
        !matches!(self, Self::EnemyAct { .. })
    }
}
