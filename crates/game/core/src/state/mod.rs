//! Battle state representation.
//!
//! This module owns the data structures that describe combatants, status
//! effects, inventory and the battle itself. Hosts clone or query this state
//! but advance battles exclusively through the engine.
pub mod delta;
pub mod types;

pub use delta::{BattleDelta, ResourceChange, ResourceKind};
pub use types::{
    Absorption, ApplyOutcome, BattlePhase, BattleState, BugType, Character, CharacterClass,
    CombatEvent, Combatant, CombatantRef, Cooldowns, Element, Inventory, InventorySlot, LogEntry,
    LogKind, LootEntry, Monster, MonsterRank, StackingRule, Stats, StatusEffect, StatusEffectKind,
    StatusEffects, TickEffect, TickReport,
};
