//! Post-battle progression: loot, experience, level-ups and statistics.
//!
//! Every function here is pure. The runtime decides when to call them and
//! publishes the results.

mod rewards;
mod statistics;

pub use rewards::{BattleRewards, ProgressionResult, apply_battle_rewards, resolve_battle_rewards};
pub use statistics::BattleStatistics;

use crate::combat::{stat_at_level, total_xp_for_level};
use crate::config::BalanceConfig;
use crate::env::{ClassOracle, RngState};
use crate::state::{Character, CharacterClass, LootEntry, Stats};

/// Rolls every loot entry once, in table order.
pub fn resolve_loot(table: &[LootEntry], rng: RngState) -> (Vec<String>, RngState) {
    let mut drops = Vec::new();
    let mut rng = rng;
    for entry in table {
        let (hit, next) = rng.chance(entry.chance);
        rng = next;
        if hit {
            drops.push(entry.item_id.clone());
        }
    }
    (drops, rng)
}

/// Class stats at `level`, with health and mana full.
pub fn stats_at_level(class: CharacterClass, level: u32, config: &BalanceConfig) -> Stats {
    let base = config.characters.base_stats.get(class);
    let growth = config.characters.growth.get(class);
    let max_health = stat_at_level(base.health, growth.health, level);
    let max_mana = stat_at_level(base.mana, growth.mana, level);
    Stats {
        health: max_health,
        max_health,
        mana: max_mana,
        max_mana,
        attack: stat_at_level(base.attack, growth.attack, level),
        defense: stat_at_level(base.defense, growth.defense, level),
        speed: stat_at_level(base.speed, growth.speed, level),
    }
}

/// Experience between `level` and `level + 1`.
pub fn xp_to_next_level(level: u32, config: &BalanceConfig) -> u64 {
    total_xp_for_level(level + 1, config).saturating_sub(total_xp_for_level(level, config))
}

/// What [`gain_experience`] changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LevelUp {
    pub level_before: u32,
    pub level_after: u32,
    pub new_spells: Vec<String>,
}

impl LevelUp {
    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }

    pub fn levels_gained(&self) -> u32 {
        self.level_after - self.level_before
    }
}

/// Adds experience and applies every level-up it earns.
///
/// Several levels may be gained at once. Each reached level can unlock a
/// spell. On any level-up the stats are recomputed for the new level and
/// health and mana are restored in full. Experience keeps accumulating past
/// the level cap.
pub fn gain_experience(
    character: &mut Character,
    xp: u64,
    classes: &dyn ClassOracle,
    config: &BalanceConfig,
) -> LevelUp {
    let level_before = character.level;
    character.experience = character.experience.saturating_add(xp);

    let mut new_spells = Vec::new();
    while character.level < config.characters.max_level
        && character.experience >= total_xp_for_level(character.level + 1, config)
    {
        character.level += 1;
        let unlock = classes
            .unlock_at(character.class, character.level)
            .filter(|spell| !character.knows_spell(spell));
        if let Some(spell) = unlock {
            new_spells.push(spell.to_owned());
        }
    }

    if character.level > level_before {
        character.stats = stats_at_level(character.class, character.level, config);
        character.spells.extend(new_spells.iter().cloned());
    }

    LevelUp {
        level_before,
        level_after: character.level,
        new_spells,
    }
}
