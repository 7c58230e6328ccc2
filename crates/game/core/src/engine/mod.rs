//! Battle state machine.
//!
//! [`BattleEngine::execute_turn`] is the single transition function. It takes
//! the current [`BattleState`] by reference and returns the next one; an
//! illegal action comes back as the unchanged state plus an
//! [`ActionRejection`], so a driving loop can retry with something else.
//!
//! ```text
//! PlayerTurn -> EnemyTurn(0..n) -> Resolution -> PlayerTurn
//!            \-> Victory / Defeat (terminal)
//! ```

mod enemy;
mod errors;
mod player;
mod reducer;

#[cfg(feature = "serde")]
mod digest;

pub use errors::ActionRejection;
pub use reducer::{BattleReducer, Strike, TurnStart};

#[cfg(feature = "serde")]
pub use digest::{StateDigest, state_digest};

use crate::action::{AvailableActions, BattleAction, available_actions, cooldown_after_tick};
use crate::ai::{DefaultEnemyPolicy, EnemyPolicy};
use crate::env::{GameEnv, RngState};
use crate::state::{BattlePhase, BattleState, Character, Monster};

static DEFAULT_POLICY: DefaultEnemyPolicy = DefaultEnemyPolicy;

/// How the enemy half of a round is driven.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EnemyPhaseMode {
    /// Every living enemy acts right after the player's action.
    #[default]
    Auto,
    /// The phase rests on each enemy in turn and waits for an ENEMY_ACT.
    Stepwise,
}

/// Result of [`BattleEngine::execute_turn`].
#[derive(Clone, Debug, PartialEq)]
pub struct TurnOutcome {
    pub state: BattleState,
    /// Set when the action was refused; `state` is then the input unchanged.
    pub rejection: Option<ActionRejection>,
}

impl TurnOutcome {
    fn accepted(state: BattleState) -> Self {
        Self {
            state,
            rejection: None,
        }
    }

    fn rejected(state: &BattleState, rejection: ActionRejection) -> Self {
        Self {
            state: state.clone(),
            rejection: Some(rejection),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Builds the opening state: turn 0, player to act, statuses and cooldowns
/// cleared on every combatant.
pub fn init_battle(mut player: Character, mut enemies: Vec<Monster>, seed: u32) -> BattleState {
    player.status_effects.clear();
    player.cooldowns.clear();
    for enemy in &mut enemies {
        enemy.status_effects.clear();
        enemy.cooldowns.clear();
    }
    BattleState {
        turn: 0,
        phase: BattlePhase::PlayerTurn,
        player,
        enemies,
        log: Vec::new(),
        rng: RngState::from_seed(seed),
        events: Vec::new(),
    }
}

/// Pure battle reducer over a [`GameEnv`].
#[derive(Clone, Copy)]
pub struct BattleEngine<'a> {
    env: GameEnv<'a>,
    policy: &'a dyn EnemyPolicy,
    mode: EnemyPhaseMode,
}

impl<'a> BattleEngine<'a> {
    pub fn new(env: GameEnv<'a>) -> Self {
        Self {
            env,
            policy: &DEFAULT_POLICY,
            mode: EnemyPhaseMode::Auto,
        }
    }

    pub fn with_policy(mut self, policy: &'a dyn EnemyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_enemy_phase(mut self, mode: EnemyPhaseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn env(&self) -> &GameEnv<'a> {
        &self.env
    }

    pub fn mode(&self) -> EnemyPhaseMode {
        self.mode
    }

    /// Advances the battle by one action.
    ///
    /// The per-turn event list is cleared before the action resolves.
    /// Terminal states reject every action and stay as they are. While the
    /// player is stunned, [`available_actions`](Self::available_actions) is
    /// empty but any action that passes [`validate`](Self::validate) is
    /// accepted and forfeit, so the round can still advance.
    pub fn execute_turn(&self, state: &BattleState, action: &BattleAction) -> TurnOutcome {
        if let Err(rejection) = self.validate(state, action) {
            return TurnOutcome::rejected(state, rejection);
        }

        let mut next = state.clone();
        next.events.clear();
        let mut reducer = BattleReducer::new(&mut next);

        match action {
            BattleAction::EnemyAct { enemy_index } => {
                enemy::run_enemy_turn(&mut reducer, &self.env, self.policy, *enemy_index);
                if !reducer.state().is_over() {
                    self.advance_enemy_step(&mut reducer, *enemy_index);
                }
            }
            _ => {
                player::run_player_turn(&mut reducer, &self.env, action);
                if !reducer.state().is_over() {
                    self.enter_enemy_phase(&mut reducer);
                }
            }
        }

        TurnOutcome::accepted(next)
    }

    /// Runs `actions` from a fresh battle. Rejected actions are skipped.
    pub fn replay(
        &self,
        player: Character,
        enemies: Vec<Monster>,
        seed: u32,
        actions: &[BattleAction],
    ) -> BattleState {
        let initial = init_battle(player, enemies, seed);
        actions.iter().fold(initial, |state, action| {
            if state.is_over() {
                state
            } else {
                self.execute_turn(&state, action).state
            }
        })
    }

    /// Legal player choices in `state`. Never mutates.
    pub fn available_actions(&self, state: &BattleState) -> AvailableActions {
        available_actions(state, self.env.spells)
    }

    /// Checks `action` against the phase and the player's resources.
    pub fn validate(&self, state: &BattleState, action: &BattleAction) -> Result<(), ActionRejection> {
        let phase = &state.phase;
        if phase.is_terminal() {
            return Err(ActionRejection::BattleOver {
                phase: phase.as_str(),
            });
        }

        let wrong_phase = || ActionRejection::WrongPhase {
            action: action.name(),
            phase: phase.as_str(),
        };

        match action {
            BattleAction::EnemyAct { enemy_index } => {
                if self.mode != EnemyPhaseMode::Stepwise {
                    return Err(wrong_phase());
                }
                match *phase {
                    BattlePhase::EnemyTurn { index } if index == *enemy_index => Ok(()),
                    BattlePhase::EnemyTurn { index } => Err(ActionRejection::WrongEnemy {
                        expected: index,
                        requested: *enemy_index,
                    }),
                    _ => Err(wrong_phase()),
                }
            }
            _ if *phase != BattlePhase::PlayerTurn => Err(wrong_phase()),
            BattleAction::CastSpell { spell_id, .. } => self.validate_spell(state, spell_id),
            BattleAction::UseItem { item_id } => match self.env.item(item_id) {
                Some(_) => Ok(()),
                None => Err(ActionRejection::UnknownItem {
                    item_id: item_id.clone(),
                }),
            },
            BattleAction::Attack { .. } | BattleAction::Defend => Ok(()),
        }
    }

    fn validate_spell(&self, state: &BattleState, spell_id: &str) -> Result<(), ActionRejection> {
        let Some(spell) = self.env.spell(spell_id) else {
            return Err(ActionRejection::UnknownSpell {
                spell_id: spell_id.to_owned(),
            });
        };
        let player = &state.player;
        if !player.knows_spell(spell_id) {
            return Err(ActionRejection::SpellNotLearned {
                spell_id: spell_id.to_owned(),
            });
        }
        if player.stats.mana < spell.mana_cost {
            return Err(ActionRejection::InsufficientMana {
                spell_id: spell_id.to_owned(),
                required: spell.mana_cost,
                available: player.stats.mana,
            });
        }
        let remaining = cooldown_after_tick(player.cooldown(spell_id));
        if remaining > 0 {
            return Err(ActionRejection::OnCooldown {
                spell_id: spell_id.to_owned(),
                remaining,
            });
        }
        Ok(())
    }

    fn enter_enemy_phase(&self, reducer: &mut BattleReducer<'_>) {
        match self.mode {
            EnemyPhaseMode::Auto => {
                for index in 0..reducer.state().enemies.len() {
                    enemy::run_enemy_turn(reducer, &self.env, self.policy, index);
                    if reducer.state().is_over() {
                        return;
                    }
                }
                close_round(reducer);
            }
            EnemyPhaseMode::Stepwise => match reducer.state().first_living_enemy() {
                Some(index) => reducer.set_phase(BattlePhase::EnemyTurn { index }),
                None => reducer.declare_victory(),
            },
        }
    }

    fn advance_enemy_step(&self, reducer: &mut BattleReducer<'_>, acted: usize) {
        let next = reducer
            .state()
            .living_enemies()
            .map(|(i, _)| i)
            .find(|i| *i > acted);
        match next {
            Some(index) => reducer.set_phase(BattlePhase::EnemyTurn { index }),
            None => close_round(reducer),
        }
    }
}

impl core::fmt::Debug for BattleEngine<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleEngine")
            .field("env", &self.env)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Ends the round once every enemy has had its turn. Enemies can fall to
/// their own damage-over-time, so victory is checked here too.
fn close_round(reducer: &mut BattleReducer<'_>) {
    reducer.set_phase(BattlePhase::Resolution);
    if reducer.state().all_enemies_defeated() {
        reducer.declare_victory();
        return;
    }
    reducer.state_mut().turn += 1;
    reducer.set_phase(BattlePhase::PlayerTurn);
}

#[cfg(test)]
mod tests;
