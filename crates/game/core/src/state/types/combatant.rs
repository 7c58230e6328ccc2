//! Player characters, monsters and the trait the battle engine uses to
//! treat them uniformly.

use std::collections::BTreeMap;

use super::common::{BugType, CharacterClass, Element, MonsterRank};
use super::stats::Stats;
use super::status::StatusEffects;

/// Remaining cooldown turns per ability id.
pub type Cooldowns = BTreeMap<String, u32>;

/// Uniform access to the parts of a combatant the engine touches.
pub trait Combatant {
    fn name(&self) -> &str;
    fn stats(&self) -> &Stats;
    fn stats_mut(&mut self) -> &mut Stats;
    fn status_effects(&self) -> &StatusEffects;
    fn status_effects_mut(&mut self) -> &mut StatusEffects;
    fn element(&self) -> Element;

    fn is_alive(&self) -> bool {
        self.stats().is_alive()
    }

    /// Attack after modifiers, never below 1.
    fn effective_attack(&self) -> u32 {
        crate::combat::effective_attack(self.stats().attack, self.status_effects().attack_modifier())
    }

    /// Defense after modifiers, never below 0.
    fn effective_defense(&self) -> u32 {
        crate::combat::effective_defense(self.stats().defense, self.status_effects().defense_modifier())
    }
}

/// A player character.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Character {
    pub id: String,
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    /// Total experience accumulated, not experience into the level.
    pub experience: u64,
    pub stats: Stats,
    /// Known spell ids, in unlock order.
    pub spells: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status_effects: StatusEffects,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldowns: Cooldowns,
}

impl Character {
    pub fn knows_spell(&self, spell_id: &str) -> bool {
        self.spells.iter().any(|s| s == spell_id)
    }

    pub fn cooldown(&self, spell_id: &str) -> u32 {
        self.cooldowns.get(spell_id).copied().unwrap_or(0)
    }
}

impl Combatant for Character {
    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut Stats {
        &mut self.stats
    }

    fn status_effects(&self) -> &StatusEffects {
        &self.status_effects
    }

    fn status_effects_mut(&mut self) -> &mut StatusEffects {
        &mut self.status_effects
    }

    fn element(&self) -> Element {
        Element::None
    }
}

/// One entry of a monster's drop table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LootEntry {
    pub item_id: String,
    /// Drop probability in `[0, 1]`.
    pub chance: f64,
}

impl LootEntry {
    pub fn new(item_id: impl Into<String>, chance: f64) -> Self {
        Self {
            item_id: item_id.into(),
            chance,
        }
    }
}

/// A monster spawned from a bug.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Monster {
    pub id: String,
    pub name: String,
    pub bug_type: BugType,
    pub rank: MonsterRank,
    /// 1 to 5.
    pub severity: u8,
    pub complexity: u32,
    pub element: Element,
    pub stats: Stats,
    pub spells: Vec<String>,
    pub status_effects: StatusEffects,
    pub cooldowns: Cooldowns,
    pub xp_reward: u32,
    pub loot_table: Vec<LootEntry>,
}

impl Combatant for Monster {
    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut Stats {
        &mut self.stats
    }

    fn status_effects(&self) -> &StatusEffects {
        &self.status_effects
    }

    fn status_effects_mut(&mut self) -> &mut StatusEffects {
        &mut self.status_effects
    }

    fn element(&self) -> Element {
        self.element
    }
}
