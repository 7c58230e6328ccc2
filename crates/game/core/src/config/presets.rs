//! Named balance presets.

use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::{
    BalanceOverrides, CombatOverrides, DamageOverrides, EncounterOverrides, MonsterOverrides,
};

/// Shipped difficulty presets, each expressed as overrides on the default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Preset {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Preset {
    pub fn overrides(self) -> BalanceOverrides {
        match self {
            Self::Normal => BalanceOverrides::new(),
            Self::Easy => BalanceOverrides::new()
                .damage(DamageOverrides {
                    defense_constant: Some(15.0),
                    base_crit_chance: Some(0.08),
                    ..DamageOverrides::default()
                })
                .combat(CombatOverrides {
                    defend_defense_bonus: Some(8),
                    heal_attack_ratio: Some(0.7),
                    ..CombatOverrides::default()
                })
                .encounters(EncounterOverrides {
                    random_encounter_chance: Some(0.10),
                    encounter_cooldown: Some(5),
                    ..EncounterOverrides::default()
                }),
            Self::Hard => BalanceOverrides::new()
                .damage(DamageOverrides {
                    defense_constant: Some(25.0),
                    base_crit_chance: Some(0.03),
                    ..DamageOverrides::default()
                })
                .monsters(MonsterOverrides {
                    severity_step: Some(0.45),
                    ..MonsterOverrides::default()
                })
                .combat(CombatOverrides {
                    heal_attack_ratio: Some(0.3),
                    shield_defense_ratio: Some(0.3),
                    ..CombatOverrides::default()
                })
                .encounters(EncounterOverrides {
                    random_encounter_chance: Some(0.25),
                    encounter_cooldown: Some(2),
                    ..EncounterOverrides::default()
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BalanceConfig;

    #[test]
    fn presets_differ_only_where_overridden() {
        let normal = BalanceConfig::preset(Preset::Normal);
        let easy = BalanceConfig::preset(Preset::Easy);
        let hard = BalanceConfig::preset(Preset::Hard);

        assert_eq!(normal, BalanceConfig::default());
        assert_eq!(easy.damage.defense_constant, 15.0);
        assert_eq!(easy.combat.defend_defense_bonus, 8);
        assert_eq!(easy.xp, normal.xp);
        assert_eq!(hard.monsters.severity_step, 0.45);
        assert_eq!(hard.encounters.encounter_cooldown, 2);
        assert_eq!(hard.characters, normal.characters);
    }

    #[test]
    fn presets_validate() {
        use strum::IntoEnumIterator;
        for preset in Preset::iter() {
            assert_eq!(BalanceConfig::preset(preset).validate(), Ok(()));
        }
    }
}
