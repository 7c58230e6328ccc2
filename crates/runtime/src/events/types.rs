//! Typed payloads carried on the event bus.

use std::collections::BTreeMap;

use game_core::{BattleAction, BugType, CombatantRef, Element, SpellEffectKind, StatusEffectKind};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::encounter::EncounterKind;

/// Channel names. Each [`GameEvent`] belongs to exactly one topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, AsRefStr, EnumString, EnumIter)]
pub enum Topic {
    // Inbound from the host.
    #[strum(serialize = "player:moved")]
    PlayerMoved,
    #[strum(serialize = "node:clicked")]
    NodeClicked,
    #[strum(serialize = "branch:entered")]
    BranchEntered,
    #[strum(serialize = "spell:cast")]
    SpellCast,
    #[strum(serialize = "item:used")]
    ItemUsed,
    #[strum(serialize = "combat:action")]
    CombatAction,

    // Outbound to presentation.
    #[strum(serialize = "encounter:triggered")]
    EncounterTriggered,
    #[strum(serialize = "combat:started")]
    CombatStarted,
    #[strum(serialize = "combat:turn:start")]
    CombatTurnStart,
    #[strum(serialize = "combat:turn:end")]
    CombatTurnEnd,
    #[strum(serialize = "damage:dealt")]
    DamageDealt,
    #[strum(serialize = "health:changed")]
    HealthChanged,
    #[strum(serialize = "mana:changed")]
    ManaChanged,
    #[strum(serialize = "spell:resolved")]
    SpellResolved,
    #[strum(serialize = "status:applied")]
    StatusApplied,
    #[strum(serialize = "status:expired")]
    StatusExpired,
    #[strum(serialize = "combat:ended")]
    CombatEnded,
    #[strum(serialize = "experience:gained")]
    ExperienceGained,
    #[strum(serialize = "level:up")]
    LevelUp,
    #[strum(serialize = "loot:dropped")]
    LootDropped,
    #[strum(serialize = "system:status:changed")]
    SystemStatusChanged,
}

impl Serialize for Topic {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_ref())
    }
}

impl<'de> Deserialize<'de> for Topic {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse()
            .map_err(|_| serde::de::Error::custom(format!("unknown topic `{name}`")))
    }
}

/// Point in the host's world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CombatOutcome {
    Victory,
    Defeat,
}

/// Stat deltas reported with a level up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatChanges {
    pub health: i64,
    pub mana: i64,
    pub attack: i64,
    pub defense: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GameEvent {
    #[serde(rename_all = "camelCase")]
    PlayerMoved {
        position: Position,
        file_path: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    NodeClicked { file_path: String, position: Position },
    #[serde(rename_all = "camelCase")]
    BranchEntered { branch_path: String, file_path: String },
    #[serde(rename_all = "camelCase")]
    SpellCast {
        spell_id: String,
        target_index: Option<usize>,
    },
    #[serde(rename_all = "camelCase")]
    ItemUsed { item_id: String },
    CombatAction { action: BattleAction },

    EncounterTriggered {
        kind: EncounterKind,
        severity: u8,
        position: Option<Position>,
    },
    #[serde(rename_all = "camelCase")]
    CombatStarted {
        monster_id: String,
        monster_name: String,
        bug_type: BugType,
        severity: u8,
        monster_health: u32,
        monster_max_health: u32,
    },
    CombatTurnStart { turn: u32, actor: CombatantRef },
    CombatTurnEnd { turn: u32, actor: CombatantRef },
    DamageDealt {
        source: CombatantRef,
        target: CombatantRef,
        amount: u32,
        critical: bool,
        element: Element,
    },
    HealthChanged {
        who: CombatantRef,
        before: u32,
        after: u32,
        max: u32,
    },
    ManaChanged {
        who: CombatantRef,
        before: u32,
        after: u32,
        max: u32,
    },
    #[serde(rename_all = "camelCase")]
    SpellResolved {
        caster: CombatantRef,
        spell_id: String,
        target: CombatantRef,
        effect: SpellEffectKind,
        value: u32,
    },
    #[serde(rename_all = "camelCase")]
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
    #[serde(rename_all = "camelCase")]
    CombatEnded {
        outcome: CombatOutcome,
        turns: u32,
        xp_gained: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    ExperienceGained {
        character_id: String,
        amount: u32,
        total_experience: u64,
    },
    #[serde(rename_all = "camelCase")]
    LevelUp {
        character_id: String,
        new_level: u32,
        stat_changes: StatChanges,
    },
    #[serde(rename_all = "camelCase")]
    LootDropped { monster_id: String, items: Vec<String> },
    /// Carries the effective state of every subsystem after a toggle.
    #[serde(rename_all = "camelCase")]
    SystemStatusChanged {
        system: String,
        enabled: bool,
        effective_states: BTreeMap<String, bool>,
    },
}

impl GameEvent {
    pub fn topic(&self) -> Topic {
        match self {
            Self::PlayerMoved { .. } => Topic::PlayerMoved,
            Self::NodeClicked { .. } => Topic::NodeClicked,
            Self::BranchEntered { .. } => Topic::BranchEntered,
            Self::SpellCast { .. } => Topic::SpellCast,
            Self::ItemUsed { .. } => Topic::ItemUsed,
            Self::CombatAction { .. } => Topic::CombatAction,
            Self::EncounterTriggered { .. } => Topic::EncounterTriggered,
            Self::CombatStarted { .. } => Topic::CombatStarted,
            Self::CombatTurnStart { .. } => Topic::CombatTurnStart,
            Self::CombatTurnEnd { .. } => Topic::CombatTurnEnd,
            Self::DamageDealt { .. } => Topic::DamageDealt,
            Self::HealthChanged { .. } => Topic::HealthChanged,
            Self::ManaChanged { .. } => Topic::ManaChanged,
            Self::SpellResolved { .. } => Topic::SpellResolved,
            Self::StatusApplied { .. } => Topic::StatusApplied,
            Self::StatusExpired { .. } => Topic::StatusExpired,
            Self::CombatEnded { .. } => Topic::CombatEnded,
            Self::ExperienceGained { .. } => Topic::ExperienceGained,
            Self::LevelUp { .. } => Topic::LevelUp,
            Self::LootDropped { .. } => Topic::LootDropped,
            Self::SystemStatusChanged { .. } => Topic::SystemStatusChanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_names_use_colon_paths() {
        assert_eq!(Topic::CombatTurnStart.to_string(), "combat:turn:start");
        assert_eq!(Topic::SystemStatusChanged.as_ref(), "system:status:changed");
        let event = GameEvent::ItemUsed {
            item_id: "item-debug-log".into(),
        };
        assert_eq!(event.topic(), Topic::ItemUsed);
    }

    #[test]
    fn topics_serialize_as_names() {
        let json = serde_json::to_string(&Topic::DamageDealt).expect("serialize");
        assert_eq!(json, "\"damage:dealt\"");
        let back: Topic = serde_json::from_str("\"level:up\"").expect("deserialize");
        assert_eq!(back, Topic::LevelUp);
    }

    #[test]
    fn unknown_topic_names_are_rejected() {
        let err = serde_json::from_str::<Topic>("\"combat:nope\"").unwrap_err();
        assert!(err.to_string().contains("unknown topic `combat:nope`"));
    }
}
