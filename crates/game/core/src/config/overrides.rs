//! Partial balance overrides merged onto a baseline.

use super::{BalanceConfig, ElementTable};

/// Copies every `Some` field of `$src` onto `$dst`.
macro_rules! merge_fields {
    ($dst:expr, $src:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $src.$field.clone() {
                $dst.$field = value;
            }
        )+
    };
}

/// Copies every `Some` field of `$src` onto `$dst`, keeping the `Option`.
macro_rules! layer_fields {
    ($dst:expr, $src:expr; $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field.clone();
            }
        )+
    };
}

/// A sparse set of balance changes.
///
/// Only fields that are `Some` replace the baseline when merged with
/// [`BalanceConfig::with_overrides`]. Deserializes from TOML tables named
/// after the config sections:
///
/// ```toml
/// [damage]
/// defense_constant = 15.0
///
/// [encounters]
/// encounter_cooldown = 5
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct BalanceOverrides {
    pub damage: DamageOverrides,
    pub elements: Option<ElementTable>,
    pub characters: CharacterOverrides,
    pub xp: XpOverrides,
    pub monsters: MonsterOverrides,
    pub combat: CombatOverrides,
    pub encounters: EncounterOverrides,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct DamageOverrides {
    pub defense_constant: Option<f64>,
    pub base_crit_chance: Option<f64>,
    pub crit_multiplier: Option<f64>,
    pub max_crit_chance: Option<f64>,
    pub crit_per_speed: Option<f64>,
    pub variance_min: Option<f64>,
    pub variance_range: Option<f64>,
    pub min_damage: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct CharacterOverrides {
    pub max_level: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct XpOverrides {
    pub base_xp_per_level: Option<f64>,
    pub level_exponent: Option<f64>,
    pub monster_xp_base: Option<f64>,
    pub severity_exponent: Option<f64>,
    pub complexity_bonus: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct MonsterOverrides {
    pub severity_step: Option<f64>,
    pub complexity_step: Option<f64>,
    pub boss_xp_multiplier: Option<u32>,
    pub miniboss_xp_multiplier: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct CombatOverrides {
    pub defend_defense_bonus: Option<u32>,
    pub defend_duration: Option<u32>,
    pub heal_attack_ratio: Option<f64>,
    pub shield_defense_ratio: Option<f64>,
    pub shield_duration: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct EncounterOverrides {
    pub boss_complexity_threshold: Option<u32>,
    pub miniboss_risk_threshold: Option<f64>,
    pub random_encounter_chance: Option<f64>,
    pub encounter_cooldown: Option<u32>,
}

impl BalanceOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn damage(mut self, damage: DamageOverrides) -> Self {
        self.damage = damage;
        self
    }

    pub fn elements(mut self, elements: ElementTable) -> Self {
        self.elements = Some(elements);
        self
    }

    pub fn characters(mut self, characters: CharacterOverrides) -> Self {
        self.characters = characters;
        self
    }

    pub fn xp(mut self, xp: XpOverrides) -> Self {
        self.xp = xp;
        self
    }

    pub fn monsters(mut self, monsters: MonsterOverrides) -> Self {
        self.monsters = monsters;
        self
    }

    pub fn combat(mut self, combat: CombatOverrides) -> Self {
        self.combat = combat;
        self
    }

    pub fn encounters(mut self, encounters: EncounterOverrides) -> Self {
        self.encounters = encounters;
        self
    }

    /// Builds a new config from `base` with the present fields replaced.
    pub fn apply_to(&self, base: &BalanceConfig) -> BalanceConfig {
        let mut merged = base.clone();

        merge_fields!(merged.damage, self.damage;
            defense_constant, base_crit_chance, crit_multiplier, max_crit_chance,
            crit_per_speed, variance_min, variance_range, min_damage);
        if let Some(elements) = &self.elements {
            merged.elements = elements.clone();
        }
        merge_fields!(merged.characters, self.characters; max_level);
        merge_fields!(merged.xp, self.xp;
            base_xp_per_level, level_exponent, monster_xp_base, severity_exponent, complexity_bonus);
        merge_fields!(merged.monsters, self.monsters;
            severity_step, complexity_step, boss_xp_multiplier, miniboss_xp_multiplier);
        merge_fields!(merged.combat, self.combat;
            defend_defense_bonus, defend_duration, heal_attack_ratio, shield_defense_ratio, shield_duration);
        merge_fields!(merged.encounters, self.encounters;
            boss_complexity_threshold, miniboss_risk_threshold, random_encounter_chance, encounter_cooldown);

        merged
    }

    /// Layers `other` on top of `self`; fields present in `other` win.
    #[must_use]
    pub fn layered(&self, other: &BalanceOverrides) -> BalanceOverrides {
        let mut out = self.clone();
        layer_fields!(out.damage, other.damage;
            defense_constant, base_crit_chance, crit_multiplier, max_crit_chance,
            crit_per_speed, variance_min, variance_range, min_damage);
        if other.elements.is_some() {
            out.elements = other.elements.clone();
        }
        layer_fields!(out.characters, other.characters; max_level);
        layer_fields!(out.xp, other.xp;
            base_xp_per_level, level_exponent, monster_xp_base, severity_exponent, complexity_bonus);
        layer_fields!(out.monsters, other.monsters;
            severity_step, complexity_step, boss_xp_multiplier, miniboss_xp_multiplier);
        layer_fields!(out.combat, other.combat;
            defend_defense_bonus, defend_duration, heal_attack_ratio, shield_defense_ratio, shield_duration);
        layer_fields!(out.encounters, other.encounters;
            boss_complexity_threshold, miniboss_risk_threshold, random_encounter_chance, encounter_cooldown);
        out
    }
}
