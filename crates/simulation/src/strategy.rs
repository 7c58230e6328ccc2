//! Scripted player policies used by the harness.

use game_core::{BattleAction, BattleEngine, BattleState};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Mana the mixed script keeps before it considers a spell.
const MIXED_MANA_FLOOR: u32 = 20;
/// Health fraction under which the mixed script may defend.
const MIXED_DEFEND_BELOW: f64 = 0.3;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Attack the first enemy every turn.
    AttackOnly,
    /// Cast the first castable spell, attack otherwise.
    SpellFirst,
    /// Spell every third action, defend every fifth when low, attack
    /// otherwise.
    #[default]
    Mixed,
}

impl Strategy {
    /// Picks the player's action. `step` counts actions issued so far.
    pub fn choose(self, engine: &BattleEngine<'_>, state: &BattleState, step: u32) -> BattleAction {
        match self {
            Self::AttackOnly => BattleAction::attack(0),
            Self::SpellFirst => first_castable(engine, state).unwrap_or_else(|| BattleAction::attack(0)),
            Self::Mixed => {
                let stats = &state.player.stats;
                if step % 3 == 0 && stats.mana >= MIXED_MANA_FLOOR {
                    if let Some(cast) = first_castable(engine, state) {
                        return cast;
                    }
                }
                if step % 5 == 0 && f64::from(stats.health) < f64::from(stats.max_health) * MIXED_DEFEND_BELOW {
                    return BattleAction::Defend;
                }
                BattleAction::attack(0)
            }
        }
    }
}

fn first_castable(engine: &BattleEngine<'_>, state: &BattleState) -> Option<BattleAction> {
    state
        .player
        .spells
        .iter()
        .map(|id| BattleAction::cast(id.as_str(), Some(0)))
        .find(|cast| engine.validate(state, cast).is_ok())
}
