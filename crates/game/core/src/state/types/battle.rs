//! Battle state: phase machine, combatants, audit log and per-turn events.

use strum::{AsRefStr, Display};

use super::combatant::{Character, Combatant, Monster};
use super::common::{CombatantRef, Element};
use super::status::StatusEffectKind;
use crate::env::{RngState, SpellEffectKind};

/// Current step of the battle state machine.
///
/// Payloads live on the variants that own them, so a victory without XP or
/// a defeat without a cause cannot be built.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "kebab-case"))]
pub enum BattlePhase {
    /// Waiting for the player's action.
    PlayerTurn,
    /// Waiting for the enemy at `index` to act. Only rests here in stepwise
    /// enemy mode.
    EnemyTurn { index: usize },
    /// Every enemy has acted; the round is being closed.
    Resolution,
    /// All enemies are at zero health.
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    Victory { xp_gained: u32, loot: Vec<String> },
    /// The player is at zero health.
    Defeat { cause: String },
}

impl BattlePhase {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Victory { .. } | Self::Defeat { .. })
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PlayerTurn => "player-turn",
            Self::EnemyTurn { .. } => "enemy-turn",
            Self::Resolution => "resolution",
            Self::Victory { .. } => "victory",
            Self::Defeat { .. } => "defeat",
        }
    }
}

/// What a log line records, for consumers that aggregate without parsing
/// the message text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "kebab-case"))]
pub enum LogKind {
    /// Narration with no numeric payload.
    Info,
    /// The actor dealt damage.
    Damage {
        target: CombatantRef,
        amount: u32,
        critical: bool,
        absorbed: u32,
    },
    /// The actor restored health.
    Heal { target: CombatantRef, amount: u32 },
    /// The actor spent mana on a spell.
    SpellCast { spell_id: String },
    /// Poison or regen resolved on the actor.
    StatusTick { health_delta: i64 },
    /// The actor consumed an item.
    ItemUsed { item_id: String },
}

/// One line of the append-only battle log.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub turn: u32,
    pub actor: CombatantRef,
    pub message: String,
    pub kind: LogKind,
}

/// Typed notification produced by a single transition.
///
/// The list is cleared at the start of every transition; hosts forward it
/// to their presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "kebab-case"))]
pub enum CombatEvent {
    TurnStarted {
        turn: u32,
        actor: CombatantRef,
    },
    TurnEnded {
        turn: u32,
        actor: CombatantRef,
    },
    Damage {
        source: CombatantRef,
        target: CombatantRef,
        amount: u32,
        critical: bool,
        element: Element,
        absorbed: u32,
    },
    Healed {
        target: CombatantRef,
        amount: u32,
    },
    SpellResolved {
        caster: CombatantRef,
        spell_id: String,
        target: CombatantRef,
        effect: SpellEffectKind,
        /// Damage dealt, health restored, shield granted or modifier size.
        value: u32,
    },
    StatusApplied {
        target: CombatantRef,
        kind: StatusEffectKind,
        name: String,
        remaining_turns: u32,
    },
    StatusExpired {
        target: CombatantRef,
        kind: StatusEffectKind,
        name: String,
    },
    ItemUsed {
        item_id: String,
    },
}

/// Full state of one battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BattleState {
    /// Completed rounds. Starts at 0.
    pub turn: u32,
    pub phase: BattlePhase,
    pub player: Character,
    pub enemies: Vec<Monster>,
    pub log: Vec<LogEntry>,
    pub rng: RngState,
    /// Events of the most recent transition only.
    #[cfg_attr(feature = "serde", serde(default))]
    pub events: Vec<CombatEvent>,
}

impl BattleState {
    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn enemy(&self, index: usize) -> Option<&Monster> {
        self.enemies.get(index)
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = (usize, &Monster)> {
        self.enemies.iter().enumerate().filter(|(_, e)| e.is_alive())
    }

    pub fn first_living_enemy(&self) -> Option<usize> {
        self.living_enemies().map(|(i, _)| i).next()
    }

    pub fn all_enemies_defeated(&self) -> bool {
        self.enemies.iter().all(|e| !e.is_alive())
    }

    /// Resolves a requested target index, falling back to the first living
    /// enemy when it is out of range or already down.
    pub fn resolve_target(&self, requested: usize) -> Option<usize> {
        match self.enemies.get(requested) {
            Some(enemy) if enemy.is_alive() => Some(requested),
            _ => self.first_living_enemy(),
        }
    }

    pub fn combatant(&self, who: CombatantRef) -> Option<&dyn Combatant> {
        match who {
            CombatantRef::Player => Some(&self.player),
            CombatantRef::Enemy(i) => self.enemies.get(i).map(|e| e as &dyn Combatant),
        }
    }

    pub fn combatant_mut(&mut self, who: CombatantRef) -> Option<&mut dyn Combatant> {
        match who {
            CombatantRef::Player => Some(&mut self.player),
            CombatantRef::Enemy(i) => self.enemies.get_mut(i).map(|e| e as &mut dyn Combatant),
        }
    }

    pub fn name_of(&self, who: CombatantRef) -> &str {
        self.combatant(who).map_or("unknown", |c| c.name())
    }
}
