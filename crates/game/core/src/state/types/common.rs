//! Small tag types shared by combatants, spells and content tables.

use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Elemental affinity of an attack or a combatant.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
    #[default]
    None,
}

impl Element {
    /// Row/column index into the elemental multiplier table.
    pub const fn index(self) -> usize {
        match self {
            Self::Fire => 0,
            Self::Water => 1,
            Self::Earth => 2,
            Self::Air => 3,
            Self::None => 4,
        }
    }
}

/// Playable character class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CharacterClass {
    Tank,
    Healer,
    Dps,
}

/// Monster archetype. Drives base stats, spells and AI behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum BugType {
    NullPointer,
    MemoryLeak,
    RaceCondition,
    OffByOne,
}

/// How a monster was spawned. Bosses and minibosses use the boss AI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum MonsterRank {
    #[default]
    Regular,
    Miniboss,
    Boss,
}

impl MonsterRank {
    pub const fn is_boss_like(self) -> bool {
        matches!(self, Self::Miniboss | Self::Boss)
    }
}

/// Reference to a combatant inside a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CombatantRef {
    Player,
    /// Index into the battle's enemy list.
    Enemy(usize),
}

impl CombatantRef {
    pub const fn is_player(self) -> bool {
        matches!(self, Self::Player)
    }
}

impl core::fmt::Display for CombatantRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Player => f.write_str("player"),
            Self::Enemy(index) => write!(f, "enemy#{index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    #[test]
    fn kebab_case_names_round_trip() {
        assert_eq!(BugType::NullPointer.to_string(), "null-pointer");
        assert_eq!(BugType::from_str("off-by-one"), Ok(BugType::OffByOne));
        assert_eq!(CharacterClass::from_str("dps"), Ok(CharacterClass::Dps));
        assert!(Element::from_str("lightning").is_err());
    }

    #[test]
    fn element_indices_are_distinct() {
        use strum::IntoEnumIterator;
        let indices: Vec<usize> = Element::iter().map(Element::index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }
}
