pub mod battle;
pub mod combatant;
pub mod common;
pub mod inventory;
pub mod stats;
pub mod status;

pub use battle::{BattlePhase, BattleState, CombatEvent, LogEntry, LogKind};
pub use combatant::{Character, Combatant, Cooldowns, LootEntry, Monster};
pub use common::{BugType, CharacterClass, CombatantRef, Element, MonsterRank};
pub use inventory::{Inventory, InventorySlot};
pub use stats::Stats;
pub use status::{
    Absorption, ApplyOutcome, StackingRule, StatusEffect, StatusEffectKind, StatusEffects,
    TickEffect, TickReport,
};
