//! Single-battle runner.

use game_core::{BattleEngine, BattlePhase, Character, Monster, init_battle};
use serde::Serialize;
use strum::{AsRefStr, Display};

use crate::strategy::Strategy;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum BattleResult {
    Victory,
    Defeat,
    /// Turn cap reached with both sides standing.
    Draw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleOutcome {
    pub result: BattleResult,
    /// Battle rounds completed.
    pub turns: u32,
    pub player_hp_remaining: u32,
    pub monster_hp_remaining: u32,
}

/// Runs one battle to a terminal phase or until `max_turns` player actions
/// have been issued.
pub fn simulate_battle(
    engine: &BattleEngine<'_>,
    player: Character,
    monster: Monster,
    seed: u32,
    max_turns: u32,
    strategy: Strategy,
) -> BattleOutcome {
    let mut state = init_battle(player, vec![monster], seed);
    let mut step = 0;
    while !state.is_over() && step < max_turns {
        let action = strategy.choose(engine, &state, step);
        state = engine.execute_turn(&state, &action).state;
        step += 1;
    }

    let monster_hp = state.enemies.first().map_or(0, |m| m.stats.health);
    let (result, player_hp, monster_hp) = match state.phase {
        BattlePhase::Victory { .. } => (BattleResult::Victory, state.player.stats.health, 0),
        BattlePhase::Defeat { .. } => (BattleResult::Defeat, 0, monster_hp),
        _ => (BattleResult::Draw, state.player.stats.health, monster_hp),
    };
    BattleOutcome {
        result,
        turns: state.turn,
        player_hp_remaining: player_hp,
        monster_hp_remaining: monster_hp,
    }
}
