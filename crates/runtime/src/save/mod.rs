//! Versioned save snapshots.
//!
//! A save captures the character, inventory, quests, exploration progress,
//! battle statistics, knowledge and flags of a session as JSON. Loading is
//! strict about structure and version but fills every optional field that
//! is missing with its empty default. The active battle, status effects
//! and cooldowns are never saved.

mod error;
mod repository;

pub use error::SaveError;
pub use repository::{FileSaveRepository, InMemorySaveRepository, SaveRepository};

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use game_content::ContentBundle;
use game_core::{BattleStatistics, Character, CharacterClass, Inventory, Stats};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::encounter::EncounterState;
use crate::flags::GameFlags;
use crate::quests::{Quest, QuestLog, QuestStatus};
use crate::session::GameSession;
use crate::world::CodeWorld;

pub const SAVE_VERSION: u64 = 1;

/// Character as saved. Status effects and cooldowns are battle-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCharacter {
    #[serde(default = "default_character_id")]
    pub id: String,
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    #[serde(default)]
    pub experience: u64,
    #[serde(default = "default_stats")]
    pub stats: Stats,
    #[serde(default)]
    pub spells: Vec<String>,
}

fn default_character_id() -> String {
    "char-saved".to_owned()
}

fn default_stats() -> Stats {
    Stats {
        health: 100,
        max_health: 100,
        mana: 50,
        max_mana: 50,
        attack: 10,
        defense: 5,
        speed: 5,
    }
}

impl From<&Character> for SavedCharacter {
    fn from(c: &Character) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            class: c.class,
            level: c.level,
            experience: c.experience,
            stats: c.stats,
            spells: c.spells.clone(),
        }
    }
}

impl From<SavedCharacter> for Character {
    fn from(c: SavedCharacter) -> Self {
        Self {
            id: c.id,
            name: c.name,
            class: c.class,
            level: c.level,
            experience: c.experience,
            stats: c.stats,
            spells: c.spells,
            status_effects: Default::default(),
            cooldowns: Default::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    pub version: u64,
    #[serde(default = "Utc::now", with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub character: SavedCharacter,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub quests: Vec<Quest>,
    #[serde(default)]
    pub completed_quest_ids: Vec<String>,
    #[serde(default)]
    pub encounter_state: EncounterState,
    #[serde(default)]
    pub battle_stats: BattleStatistics,
    #[serde(default)]
    pub knowledge: Vec<String>,
    #[serde(default)]
    pub game_flags: GameFlags,
    #[serde(default)]
    pub playtime_ms: u64,
}

impl SaveData {
    /// Snapshots a session.
    pub fn capture(session: &GameSession) -> Self {
        let quests = session.quests.quests.clone();
        let completed_quest_ids = quests
            .iter()
            .filter(|q| q.status == QuestStatus::Completed)
            .map(|q| q.id.clone())
            .collect();
        Self {
            version: SAVE_VERSION,
            timestamp: Utc::now(),
            character: SavedCharacter::from(&session.character),
            inventory: session.inventory.clone(),
            quests,
            completed_quest_ids,
            encounter_state: session.encounters.clone(),
            battle_stats: session.stats.clone(),
            knowledge: session.knowledge.iter().cloned().collect(),
            game_flags: session.flags.clone(),
            playtime_ms: session.playtime_ms,
        }
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        serde_json::to_string_pretty(self).map_err(|e| SaveError::Parse(e.to_string()))
    }

    /// Builds a fresh session from the snapshot.
    pub fn restore(self, world: CodeWorld, content: Arc<ContentBundle>, seed: u32) -> GameSession {
        let mut quests = QuestLog::new(self.quests);
        quests.completed.extend(self.completed_quest_ids);
        let mut session = GameSession::new(self.character.into(), world, content, seed)
            .with_inventory(self.inventory)
            .with_quests(quests);
        session.encounters = self.encounter_state;
        session.stats = self.battle_stats;
        session.knowledge = self.knowledge.into_iter().collect::<BTreeSet<_>>();
        session.flags = self.game_flags;
        session.playtime_ms = self.playtime_ms;
        session
    }
}

/// Snapshots a session at the current time.
pub fn serialize(session: &GameSession) -> SaveData {
    SaveData::capture(session)
}

/// Snapshots `session` and renders it as JSON.
pub fn save_to_json(session: &GameSession) -> Result<String, SaveError> {
    serialize(session).to_json()
}

/// Parses and validates a save.
///
/// Rejects input that is not a JSON object, has no numeric version, has a
/// version newer than [`SAVE_VERSION`] or lacks a usable character.
pub fn load_from_json(json: &str) -> Result<SaveData, SaveError> {
    let raw: Value = serde_json::from_str(json).map_err(|e| SaveError::Parse(e.to_string()))?;
    let result = parse_save(raw);
    if let Err(err) = &result {
        warn!(%err, "save rejected");
    }
    result
}

fn parse_save(raw: Value) -> Result<SaveData, SaveError> {
    let Some(object) = raw.as_object() else {
        return Err(SaveError::NotAnObject);
    };
    let version = object
        .get("version")
        .and_then(Value::as_u64)
        .ok_or(SaveError::MissingVersion)?;
    if version > SAVE_VERSION {
        return Err(SaveError::NewerVersion { found: version });
    }

    let character = object
        .get("character")
        .and_then(Value::as_object)
        .ok_or_else(|| SaveError::InvalidCharacter("missing".to_owned()))?;
    if !character.get("name").is_some_and(Value::is_string) {
        return Err(SaveError::InvalidCharacter("name must be a string".to_owned()));
    }
    if !character.get("level").is_some_and(Value::is_u64) {
        return Err(SaveError::InvalidCharacter("level must be a number".to_owned()));
    }
    serde_json::from_value::<SavedCharacter>(Value::Object(character.clone()))
        .map_err(|e| SaveError::InvalidCharacter(e.to_string()))?;

    let data: SaveData = serde_json::from_value(raw).map_err(|e| SaveError::Invalid(e.to_string()))?;
    validate_save(&data)?;
    Ok(data)
}

/// Semantic checks on an already parsed save.
pub fn validate_save(data: &SaveData) -> Result<(), SaveError> {
    if data.version > SAVE_VERSION {
        return Err(SaveError::NewerVersion { found: data.version });
    }
    let c = &data.character;
    if c.name.trim().is_empty() {
        return Err(SaveError::InvalidCharacter("name is empty".to_owned()));
    }
    if c.level == 0 {
        return Err(SaveError::InvalidCharacter("level must be at least 1".to_owned()));
    }
    if c.stats.health > c.stats.max_health || c.stats.mana > c.stats.max_mana {
        return Err(SaveError::InvalidCharacter("current resources exceed their maximum".to_owned()));
    }
    if data.inventory.items.len() > data.inventory.max_slots {
        return Err(SaveError::Invalid(format!(
            "inventory holds {} stacks but has {} slots",
            data.inventory.items.len(),
            data.inventory.max_slots
        )));
    }
    let mut ids = BTreeSet::new();
    if let Some(dup) = data.quests.iter().find(|q| !ids.insert(q.id.as_str())) {
        return Err(SaveError::Invalid(format!("duplicate quest id '{}'", dup.id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{"version":1,"character":{"name":"Ada","class":"dps","level":3}}"#;

    #[test]
    fn missing_optional_fields_get_defaults() {
        let data = load_from_json(MINIMAL).expect("minimal save loads");
        assert!(data.inventory.items.is_empty());
        assert_eq!(data.inventory.max_slots, 20);
        assert!(data.quests.is_empty());
        assert_eq!(data.encounter_state, EncounterState::default());
        assert_eq!(data.character.id, "char-saved");
        assert_eq!(data.character.stats.max_health, 100);
    }

    #[test]
    fn newer_version_is_rejected() {
        let json = r#"{"version":2,"character":{"name":"Ada","class":"dps","level":3}}"#;
        let err = load_from_json(json).expect_err("newer save");
        assert!(err.to_string().contains("newer"));
        assert!(err.is_rejection());
    }

    #[test]
    fn structural_failures_are_reported() {
        assert!(matches!(load_from_json("[1,2]"), Err(SaveError::NotAnObject)));
        assert!(matches!(load_from_json("{}"), Err(SaveError::MissingVersion)));
        assert!(matches!(load_from_json("{not json"), Err(SaveError::Parse(_))));
        assert!(matches!(
            load_from_json(r#"{"version":1,"character":{"name":7,"level":1}}"#),
            Err(SaveError::InvalidCharacter(_))
        ));
        assert!(matches!(
            load_from_json(r#"{"version":1,"character":{"name":"A","class":"bard","level":1}}"#),
            Err(SaveError::InvalidCharacter(_))
        ));
    }

    #[test]
    fn overfull_inventory_fails_validation() {
        let json = r#"{"version":1,"character":{"name":"A","class":"tank","level":1},
            "inventory":{"items":[{"itemId":"a","quantity":1},{"itemId":"b","quantity":1}],"maxSlots":1}}"#;
        assert!(matches!(load_from_json(json), Err(SaveError::Invalid(_))));
    }
}
