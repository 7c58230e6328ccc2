//! Balance configuration.
//!
//! [`BalanceConfig`] is an immutable value holding every tunable number the
//! combat rules read. Variants are produced by merging a
//! [`BalanceOverrides`] onto a baseline, which returns a new value and
//! leaves the baseline untouched. [`Preset`] names the shipped variants.

mod overrides;
mod presets;

pub use overrides::{
    BalanceOverrides, CharacterOverrides, CombatOverrides, DamageOverrides, EncounterOverrides,
    MonsterOverrides, XpOverrides,
};
pub use presets::Preset;

use crate::state::CharacterClass;

/// Every tunable used by combat, progression and encounters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BalanceConfig {
    pub damage: DamageConfig,
    pub elements: ElementTable,
    pub characters: CharacterConfig,
    pub xp: XpConfig,
    pub monsters: MonsterConfig,
    pub combat: CombatConfig,
    pub encounters: EncounterConfig,
}

impl BalanceConfig {
    // ===== compile-time constants used as type parameters =====
    /// One slot per status effect kind.
    pub const MAX_STATUS_EFFECTS: usize = 8;
    pub const MAX_INVENTORY_SLOTS: usize = 20;
    pub const MAX_SEVERITY: u8 = 5;

    pub fn new() -> Self {
        Self {
            damage: DamageConfig::default(),
            elements: ElementTable::default(),
            characters: CharacterConfig::default(),
            xp: XpConfig::default(),
            monsters: MonsterConfig::default(),
            combat: CombatConfig::default(),
            encounters: EncounterConfig::default(),
        }
    }

    /// Returns a copy of `self` with every field present in `overrides`
    /// replaced.
    #[must_use]
    pub fn with_overrides(&self, overrides: &BalanceOverrides) -> Self {
        overrides.apply_to(self)
    }

    pub fn preset(preset: Preset) -> Self {
        Self::new().with_overrides(&preset.overrides())
    }

    /// Checks that every probability and ratio is in range.
    pub fn validate(&self) -> Result<(), BalanceConfigError> {
        let d = &self.damage;
        check_positive("damage.defenseConstant", d.defense_constant)?;
        check_unit("damage.baseCritChance", d.base_crit_chance)?;
        check_unit("damage.maxCritChance", d.max_crit_chance)?;
        check_non_negative("damage.critPerSpeed", d.crit_per_speed)?;
        check_positive("damage.critMultiplier", d.crit_multiplier)?;
        check_non_negative("damage.varianceMin", d.variance_min)?;
        check_non_negative("damage.varianceRange", d.variance_range)?;

        check_non_negative("monsters.severityStep", self.monsters.severity_step)?;
        check_non_negative("monsters.complexityStep", self.monsters.complexity_step)?;

        check_non_negative("combat.healAttackRatio", self.combat.heal_attack_ratio)?;
        check_non_negative("combat.shieldDefenseRatio", self.combat.shield_defense_ratio)?;

        check_unit("encounters.randomEncounterChance", self.encounters.random_encounter_chance)?;

        if self.characters.max_level == 0 {
            return Err(BalanceConfigError::OutOfRange {
                field: "characters.maxLevel",
                value: 0.0,
                expected: "at least 1",
            });
        }
        Ok(())
    }
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Rejected balance value.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BalanceConfigError {
    #[error("{field} = {value} is out of range (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

impl crate::error::GameError for BalanceConfigError {
    fn severity(&self) -> crate::error::ErrorSeverity {
        crate::error::ErrorSeverity::Validation
    }
}

fn check_unit(field: &'static str, value: f64) -> Result<(), BalanceConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(BalanceConfigError::OutOfRange {
            field,
            value,
            expected: "0.0 ..= 1.0",
        })
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), BalanceConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(BalanceConfigError::OutOfRange {
            field,
            value,
            expected: "> 0",
        })
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), BalanceConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(BalanceConfigError::OutOfRange {
            field,
            value,
            expected: ">= 0",
        })
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Damage formula parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DamageConfig {
    /// `C` in `C / (C + def)`.
    pub defense_constant: f64,
    pub base_crit_chance: f64,
    pub crit_multiplier: f64,
    /// Global ceiling on crit chance, whatever the speed.
    pub max_crit_chance: f64,
    pub crit_per_speed: f64,
    pub variance_min: f64,
    pub variance_range: f64,
    pub min_damage: u32,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            defense_constant: 20.0,
            base_crit_chance: 0.05,
            crit_multiplier: 1.5,
            max_crit_chance: 0.25,
            crit_per_speed: 0.005,
            variance_min: 0.85,
            variance_range: 0.15,
            min_damage: 1,
        }
    }
}

/// Attacker-by-defender elemental multipliers, indexed by
/// [`Element::index`](crate::state::Element::index).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementTable {
    pub multipliers: [[f64; 5]; 5],
}

impl ElementTable {
    pub const SUPER_EFFECTIVE: f64 = 1.5;
    pub const RESISTED: f64 = 0.5;
    pub const NEUTRAL: f64 = 1.0;

    pub fn multiplier(&self, attacker: crate::state::Element, defender: crate::state::Element) -> f64 {
        self.multipliers[attacker.index()][defender.index()]
    }
}

impl Default for ElementTable {
    fn default() -> Self {
        const S: f64 = ElementTable::SUPER_EFFECTIVE;
        const R: f64 = ElementTable::RESISTED;
        const N: f64 = ElementTable::NEUTRAL;
        Self {
            //             fire water earth air none
            multipliers: [
                /* fire  */ [R, R, S, N, N],
                /* water */ [S, R, N, R, N],
                /* earth */ [N, S, R, S, N],
                /* air   */ [N, S, R, R, N],
                /* none  */ [N, N, N, N, N],
            ],
        }
    }
}

/// One value per character class.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassTable<T> {
    pub tank: T,
    pub healer: T,
    pub dps: T,
}

impl<T> ClassTable<T> {
    pub fn get(&self, class: CharacterClass) -> &T {
        match class {
            CharacterClass::Tank => &self.tank,
            CharacterClass::Healer => &self.healer,
            CharacterClass::Dps => &self.dps,
        }
    }
}

/// Level-1 stats of a class.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassStats {
    pub health: f64,
    pub mana: f64,
    pub attack: f64,
    pub defense: f64,
    pub speed: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CharacterConfig {
    pub base_stats: ClassTable<ClassStats>,
    /// Stat gained per level above 1.
    pub growth: ClassTable<ClassStats>,
    pub max_level: u32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        let stats = |health, mana, attack, defense, speed| ClassStats {
            health,
            mana,
            attack,
            defense,
            speed,
        };
        Self {
            base_stats: ClassTable {
                tank: stats(150.0, 50.0, 5.0, 15.0, 6.0),
                healer: stats(100.0, 100.0, 3.0, 8.0, 8.0),
                dps: stats(80.0, 75.0, 15.0, 5.0, 7.0),
            },
            growth: ClassTable {
                tank: stats(8.0, 2.0, 1.0, 2.0, 1.0),
                healer: stats(5.0, 5.0, 0.5, 1.0, 1.5),
                dps: stats(3.0, 3.0, 2.0, 0.5, 1.0),
            },
            max_level: 30,
        }
    }
}

/// Experience curve and monster rewards.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct XpConfig {
    pub base_xp_per_level: f64,
    pub level_exponent: f64,
    pub monster_xp_base: f64,
    pub severity_exponent: f64,
    pub complexity_bonus: f64,
}

impl Default for XpConfig {
    fn default() -> Self {
        Self {
            base_xp_per_level: 50.0,
            level_exponent: 2.0,
            monster_xp_base: 25.0,
            severity_exponent: 2.0,
            complexity_bonus: 0.05,
        }
    }
}

/// Monster stat scaling.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MonsterConfig {
    pub severity_step: f64,
    pub complexity_step: f64,
    pub boss_xp_multiplier: u32,
    pub miniboss_xp_multiplier: u32,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            severity_step: 0.35,
            complexity_step: 0.1,
            boss_xp_multiplier: 3,
            miniboss_xp_multiplier: 2,
        }
    }
}

/// In-battle action tuning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CombatConfig {
    pub defend_defense_bonus: u32,
    pub defend_duration: u32,
    pub heal_attack_ratio: f64,
    pub shield_defense_ratio: f64,
    pub shield_duration: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            defend_defense_bonus: 5,
            defend_duration: 1,
            heal_attack_ratio: 0.5,
            shield_defense_ratio: 0.5,
            shield_duration: 3,
        }
    }
}

/// Exploration encounter triggers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EncounterConfig {
    pub boss_complexity_threshold: u32,
    pub miniboss_risk_threshold: f64,
    pub random_encounter_chance: f64,
    /// Steps that must pass before another encounter can trigger.
    pub encounter_cooldown: u32,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            boss_complexity_threshold: 20,
            miniboss_risk_threshold: 6.0,
            random_encounter_chance: 0.15,
            encounter_cooldown: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Element;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(BalanceConfig::default().validate(), Ok(()));
    }

    #[test]
    fn element_table_matches_affinities() {
        let table = ElementTable::default();
        assert_eq!(table.multiplier(Element::Water, Element::Fire), 1.5);
        assert_eq!(table.multiplier(Element::Fire, Element::Water), 0.5);
        assert_eq!(table.multiplier(Element::Earth, Element::Air), 1.5);
        assert_eq!(table.multiplier(Element::None, Element::Fire), 1.0);
        assert_eq!(table.multiplier(Element::Air, Element::None), 1.0);
    }

    #[test]
    fn out_of_range_crit_is_rejected() {
        let mut config = BalanceConfig::default();
        config.damage.max_crit_chance = 1.5;
        assert!(matches!(
            config.validate(),
            Err(BalanceConfigError::OutOfRange { field: "damage.maxCritChance", .. })
        ));
    }
}
