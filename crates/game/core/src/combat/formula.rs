//! Healing, shields, scaling and experience formulas.

use crate::config::BalanceConfig;

/// `floor(power + attack * heal_attack_ratio)`.
pub fn calculate_healing(power: u32, attack: u32, config: &BalanceConfig) -> u32 {
    (f64::from(power) + f64::from(attack) * config.combat.heal_attack_ratio).floor() as u32
}

/// `floor(power + defense * shield_defense_ratio)`.
pub fn calculate_shield(power: u32, defense: u32, config: &BalanceConfig) -> u32 {
    (f64::from(power) + f64::from(defense) * config.combat.shield_defense_ratio).floor() as u32
}

/// Scales a template stat by severity and complexity.
///
/// # Formula
///
/// ```text
/// floor(base * (1 + severity_step * (severity - 1)) * (1 + complexity_step * complexity))
/// ```
pub fn scale_monster_stat(base: u32, severity: u8, complexity: u32, config: &BalanceConfig) -> u32 {
    let m = &config.monsters;
    let severity_factor = 1.0 + m.severity_step * f64::from(severity.saturating_sub(1));
    let complexity_factor = 1.0 + m.complexity_step * f64::from(complexity);
    (f64::from(base) * severity_factor * complexity_factor).floor() as u32
}

/// `floor(monster_xp_base * severity^severity_exponent * (1 + complexity_bonus * complexity))`.
pub fn monster_xp_reward(severity: u8, complexity: u32, config: &BalanceConfig) -> u32 {
    let xp = &config.xp;
    (xp.monster_xp_base
        * f64::from(severity).powf(xp.severity_exponent)
        * (1.0 + xp.complexity_bonus * f64::from(complexity)))
    .floor() as u32
}

/// Total experience needed to reach `level`: `floor(base * level^exponent)`.
pub fn total_xp_for_level(level: u32, config: &BalanceConfig) -> u64 {
    let xp = &config.xp;
    (xp.base_xp_per_level * f64::from(level).powf(xp.level_exponent)).floor() as u64
}

/// `floor(base + growth * (level - 1))`.
pub fn stat_at_level(base: f64, growth: f64, level: u32) -> u32 {
    (base + growth * f64::from(level.saturating_sub(1))).floor().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healing_and_shield_use_half_the_stat() {
        let config = BalanceConfig::default();
        assert_eq!(calculate_healing(20, 15, &config), 27);
        assert_eq!(calculate_shield(25, 9, &config), 29);
    }

    #[test]
    fn severity_one_without_complexity_is_identity() {
        let config = BalanceConfig::default();
        assert_eq!(scale_monster_stat(40, 1, 0, &config), 40);
        assert_eq!(scale_monster_stat(40, 3, 0, &config), 68);
        assert_eq!(scale_monster_stat(40, 3, 5, &config), 102);
    }

    #[test]
    fn xp_rewards_grow_quadratically() {
        let config = BalanceConfig::default();
        assert_eq!(monster_xp_reward(1, 0, &config), 25);
        assert_eq!(monster_xp_reward(2, 0, &config), 100);
        assert_eq!(monster_xp_reward(2, 2, &config), 110);
    }

    #[test]
    fn level_curve() {
        let config = BalanceConfig::default();
        assert_eq!(total_xp_for_level(1, &config), 50);
        assert_eq!(total_xp_for_level(10, &config), 5000);
        assert_eq!(stat_at_level(80.0, 3.0, 30), 167);
        assert_eq!(stat_at_level(3.0, 0.5, 2), 3);
    }
}
