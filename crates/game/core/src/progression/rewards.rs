use super::{LevelUp, gain_experience};
use crate::config::BalanceConfig;
use crate::env::ClassOracle;
use crate::state::{BattlePhase, BattleState, Character, Combatant, Inventory, MonsterRank};

/// What a won battle pays out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BattleRewards {
    pub xp: u32,
    pub loot: Vec<String>,
    pub monsters_defeated: u32,
    pub boss_defeated: bool,
    pub turns_elapsed: u32,
}

/// Reads the rewards of a victory. `None` for any other phase.
pub fn resolve_battle_rewards(state: &BattleState) -> Option<BattleRewards> {
    let BattlePhase::Victory { xp_gained, loot } = &state.phase else {
        return None;
    };
    let defeated = state.enemies.iter().filter(|e| !e.is_alive());
    let (mut monsters_defeated, mut boss_defeated) = (0, false);
    for enemy in defeated {
        monsters_defeated += 1;
        boss_defeated |= enemy.rank == MonsterRank::Boss;
    }
    Some(BattleRewards {
        xp: *xp_gained,
        loot: loot.clone(),
        monsters_defeated,
        boss_defeated,
        turns_elapsed: state.turn,
    })
}

/// Outcome of [`apply_battle_rewards`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressionResult {
    pub level_up: LevelUp,
    /// Loot that did not fit in the inventory.
    pub overflow: Vec<String>,
    /// Human-readable summary lines for a victory screen.
    pub log: Vec<String>,
}

/// Grants XP, then adds loot to the inventory.
pub fn apply_battle_rewards(
    character: &mut Character,
    inventory: &mut Inventory,
    rewards: &BattleRewards,
    classes: &dyn ClassOracle,
    config: &BalanceConfig,
) -> ProgressionResult {
    let mut log = vec![format!("Gained {} XP", rewards.xp)];
    let level_up = gain_experience(character, u64::from(rewards.xp), classes, config);
    if level_up.leveled_up() {
        log.push(format!(
            "LEVEL UP! Now level {} (+{})",
            level_up.level_after,
            level_up.levels_gained()
        ));
        for spell in &level_up.new_spells {
            log.push(format!("New spell unlocked: {spell}"));
        }
    }

    let mut overflow = Vec::new();
    for item in &rewards.loot {
        if inventory.add(item, 1) {
            log.push(format!("Obtained: {item}"));
        } else {
            overflow.push(item.clone());
        }
    }

    let plural = if rewards.monsters_defeated == 1 { "" } else { "s" };
    log.push(format!(
        "Defeated {} monster{plural} in {} turns",
        rewards.monsters_defeated, rewards.turns_elapsed
    ));
    if rewards.boss_defeated {
        log.push("BOSS DEFEATED!".to_owned());
    }

    ProgressionResult {
        level_up,
        overflow,
        log,
    }
}
