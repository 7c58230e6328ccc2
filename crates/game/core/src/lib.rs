//! Deterministic turn-based combat rules.
//!
//! `game-core` defines the canonical rules (RNG, combat math, status
//! effects, enemy AI, battle reducer and progression) and exposes pure APIs
//! that are shared by the runtime and offline tools. Every battle advances
//! through [`engine::BattleEngine::execute_turn`]; catalogues plug in
//! through the oracle traits in [`env`].
pub mod action;
pub mod ai;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod progression;
pub mod state;

#[cfg(test)]
pub(crate) mod testkit;

pub use action::{ActionMask, AvailableActions, BattleAction, available_actions};
pub use ai::{DefaultEnemyPolicy, EnemyChoice, EnemyContext, EnemyDecision, EnemyPolicy};
pub use combat::{DamageInput, DamageRoll, calculate_damage, calculate_healing, calculate_shield};
pub use config::{BalanceConfig, BalanceConfigError, BalanceOverrides, Preset};
pub use engine::{ActionRejection, BattleEngine, EnemyPhaseMode, TurnOutcome, init_battle};
pub use env::{
    ClassOracle, GameEnv, ItemDefinition, ItemEffect, ItemOracle, RngState, SeededRandom,
    SpellDefinition, SpellEffect, SpellEffectKind, SpellOracle,
};
pub use error::{ErrorSeverity, GameError};
pub use progression::{
    BattleRewards, BattleStatistics, LevelUp, apply_battle_rewards, gain_experience,
    resolve_battle_rewards, resolve_loot, stats_at_level,
};
pub use state::{
    BattlePhase, BattleState, BugType, Character, CharacterClass, CombatEvent, Combatant,
    CombatantRef, Element, Inventory, InventorySlot, LogEntry, LogKind, LootEntry, Monster,
    MonsterRank, Stats, StatusEffect, StatusEffectKind, StatusEffects,
};
