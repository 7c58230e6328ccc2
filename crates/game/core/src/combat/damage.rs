//! Damage calculation.

use crate::config::BalanceConfig;
use crate::env::RngState;
use crate::state::Element;

/// Inputs of a single damage roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageInput {
    /// Spell power; 0 for a basic attack.
    pub power: u32,
    pub attack: u32,
    pub speed: u32,
    pub defense: u32,
    pub attack_element: Element,
    pub defense_element: Element,
}

/// Outcome of a damage roll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageRoll {
    pub damage: u32,
    pub critical: bool,
    pub element_multiplier: f64,
}

impl DamageRoll {
    pub fn is_super_effective(&self) -> bool {
        self.element_multiplier > 1.0
    }

    pub fn is_resisted(&self) -> bool {
        self.element_multiplier < 1.0
    }

    /// Short description such as `"12 damage (critical, super effective)"`.
    pub fn describe(&self) -> String {
        let mut tags = Vec::new();
        if self.critical {
            tags.push("critical");
        }
        if self.is_super_effective() {
            tags.push("super effective");
        } else if self.is_resisted() {
            tags.push("not very effective");
        }
        if tags.is_empty() {
            format!("{} damage", self.damage)
        } else {
            format!("{} damage ({})", self.damage, tags.join(", "))
        }
    }
}

/// Crit chance for a given speed, capped by `damage.max_crit_chance`.
pub fn crit_chance(speed: u32, config: &BalanceConfig) -> f64 {
    let d = &config.damage;
    (d.base_crit_chance + f64::from(speed) * d.crit_per_speed).min(d.max_crit_chance)
}

/// Calculate damage from an attack.
///
/// # Formula
///
/// ```text
/// base       = (power + atk) * C / (C + def)
/// crit       = roll < min(base_crit + spd * crit_per_speed, max_crit) ? crit_mult : 1
/// element    = table[atk_element][def_element]
/// variance   = variance_min + roll * variance_range
/// damage     = max(min_damage, floor(base * crit * element * variance))
/// ```
///
/// Two values are drawn, crit first and variance second.
pub fn calculate_damage(input: &DamageInput, config: &BalanceConfig, rng: RngState) -> (DamageRoll, RngState) {
    let d = &config.damage;

    let c = d.defense_constant;
    let base = f64::from(input.power + input.attack) * (c / (c + f64::from(input.defense)));

    let (critical, rng) = rng.chance(crit_chance(input.speed, config));
    let crit_multiplier = if critical { d.crit_multiplier } else { 1.0 };

    let element_multiplier = config
        .elements
        .multiplier(input.attack_element, input.defense_element);

    let (roll, rng) = rng.next();
    let variance = d.variance_min + roll * d.variance_range;

    let raw = (base * crit_multiplier * element_multiplier * variance).floor();
    let damage = (raw.max(0.0) as u32).max(d.min_damage);

    (
        DamageRoll {
            damage,
            critical,
            element_multiplier,
        },
        rng,
    )
}

/// Basic attack: no spell power and no elemental interaction.
pub fn calculate_basic_attack(
    attack: u32,
    speed: u32,
    defense: u32,
    config: &BalanceConfig,
    rng: RngState,
) -> (DamageRoll, RngState) {
    calculate_damage(
        &DamageInput {
            power: 0,
            attack,
            speed,
            defense,
            attack_element: Element::None,
            defense_element: Element::None,
        },
        config,
        rng,
    )
}

/// Attack after status modifiers, never below 1.
pub fn effective_attack(base: u32, modifier: i64) -> u32 {
    (i64::from(base) + modifier).max(1) as u32
}

/// Defense after status modifiers, never below 0.
pub fn effective_defense(base: u32, modifier: i64) -> u32 {
    (i64::from(base) + modifier).max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(attack: u32, defense: u32) -> DamageInput {
        DamageInput {
            power: 0,
            attack,
            speed: 0,
            defense,
            attack_element: Element::None,
            defense_element: Element::None,
        }
    }

    #[test]
    fn damage_is_deterministic_for_a_state() {
        let config = BalanceConfig::default();
        let rng = RngState::from_seed(42);
        let first = calculate_damage(&input(20, 10), &config, rng);
        let second = calculate_damage(&input(20, 10), &config, rng);
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
        assert_ne!(first.1, rng);
    }

    #[test]
    fn damage_stays_within_variance_band() {
        let config = BalanceConfig::default();
        let mut rng = RngState::from_seed(1);
        // base = 20 * 20 / (20 + 20) = 10
        for _ in 0..500 {
            let (roll, next) = calculate_damage(&input(20, 20), &config, rng);
            rng = next;
            let upper = if roll.critical { 15 } else { 10 };
            assert!(roll.damage >= 8 && roll.damage <= upper, "{roll:?}");
        }
    }

    #[test]
    fn minimum_damage_is_one() {
        let config = BalanceConfig::default();
        let (roll, _) = calculate_damage(&input(1, 10_000), &config, RngState::from_seed(3));
        assert_eq!(roll.damage, 1);
    }

    #[test]
    fn elemental_multiplier_is_reported() {
        let config = BalanceConfig::default();
        let mut strong = input(30, 0);
        strong.attack_element = Element::Water;
        strong.defense_element = Element::Fire;
        let (roll, _) = calculate_damage(&strong, &config, RngState::from_seed(9));
        assert_eq!(roll.element_multiplier, 1.5);
        assert!(roll.describe().contains("super effective"));
    }

    #[test]
    fn crit_chance_is_capped() {
        let config = BalanceConfig::default();
        assert_eq!(crit_chance(0, &config), 0.05);
        assert!((crit_chance(10, &config) - 0.10).abs() < 1e-12);
        assert_eq!(crit_chance(1_000, &config), 0.25);
    }

    #[test]
    fn modifiers_clamp() {
        assert_eq!(effective_attack(3, -10), 1);
        assert_eq!(effective_defense(3, -10), 0);
        assert_eq!(effective_defense(3, 5), 8);
    }
}
