//! Which actions the player may choose in the current state.

use bitflags::bitflags;

use crate::env::SpellOracle;
use crate::state::{BattlePhase, BattleState, Combatant};

bitflags! {
    /// Action categories that are currently legal.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActionMask: u8 {
        const ATTACK = 1 << 0;
        const CAST_SPELL = 1 << 1;
        const DEFEND = 1 << 2;
        const USE_ITEM = 1 << 3;
    }
}

/// Legal choices for the player, for graying out UI options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AvailableActions {
    pub mask: ActionMask,
    /// Spells that are known, affordable and off cooldown, in spellbook order.
    pub spells: Vec<String>,
}

impl AvailableActions {
    pub fn can_attack(&self) -> bool {
        self.mask.contains(ActionMask::ATTACK)
    }

    pub fn can_cast(&self, spell_id: &str) -> bool {
        self.spells.iter().any(|s| s == spell_id)
    }

    pub fn can_defend(&self) -> bool {
        self.mask.contains(ActionMask::DEFEND)
    }

    pub fn can_use_item(&self) -> bool {
        self.mask.contains(ActionMask::USE_ITEM)
    }
}

/// Cooldown left after the start-of-turn decrement.
///
/// The player's cooldowns tick before the action resolves, so a stored value
/// of 1 is castable this turn.
pub(crate) fn cooldown_after_tick(stored: u32) -> u32 {
    stored.saturating_sub(1)
}

/// Computes the player's legal choices. Pure query.
///
/// Nothing is offered outside the player's turn or while the player is
/// stunned. A stunned player still has to submit some action to move the
/// battle on; [`BattleEngine::execute_turn`](crate::BattleEngine::execute_turn)
/// accepts any phase-valid one and forfeits it.
pub fn available_actions(state: &BattleState, spells: &dyn SpellOracle) -> AvailableActions {
    if state.phase != BattlePhase::PlayerTurn || state.player.status_effects().is_stunned() {
        return AvailableActions::default();
    }

    let player = &state.player;
    let castable: Vec<String> = player
        .spells
        .iter()
        .filter(|id| {
            spells.spell(id).is_some_and(|spell| {
                player.stats.mana >= spell.mana_cost && cooldown_after_tick(player.cooldown(id)) == 0
            })
        })
        .cloned()
        .collect();

    let mut mask = ActionMask::ATTACK | ActionMask::DEFEND | ActionMask::USE_ITEM;
    if !castable.is_empty() {
        mask |= ActionMask::CAST_SPELL;
    }

    AvailableActions {
        mask,
        spells: castable,
    }
}
