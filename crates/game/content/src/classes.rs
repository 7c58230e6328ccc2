//! Class spell progression and the character factory.

use std::collections::BTreeMap;

use game_core::combat::total_xp_for_level;
use game_core::state::StatusEffects;
use game_core::{BalanceConfig, Character, CharacterClass, ClassOracle, stats_at_level};

/// Starter spells and level unlocks of one class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ClassProgression {
    pub starter_spells: Vec<String>,
    /// Level reached -> spell unlocked.
    pub unlocks: BTreeMap<u32, String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassCatalog {
    classes: BTreeMap<CharacterClass, ClassProgression>,
}

impl ClassCatalog {
    pub fn builtin() -> Self {
        let table = |starters: [&str; 4], unlocks: [&str; 6]| ClassProgression {
            starter_spells: starters.map(String::from).to_vec(),
            unlocks: [5, 10, 15, 20, 25, 30]
                .into_iter()
                .zip(unlocks.map(String::from))
                .collect(),
        };

        let mut classes = BTreeMap::new();
        classes.insert(
            CharacterClass::Tank,
            table(
                ["spell-mutex-lock", "spell-load-balancer", "spell-firewall", "spell-deadlock"],
                [
                    "spell-docker-compose",
                    "spell-kubernetes",
                    "spell-terraform",
                    "spell-circuit-breaker",
                    "spell-chaos-monkey",
                    "spell-immutable-infra",
                ],
            ),
        );
        classes.insert(
            CharacterClass::Healer,
            table(
                ["spell-try-catch", "spell-rollback", "spell-garbage-collect", "spell-patch"],
                [
                    "spell-lint-fix",
                    "spell-bisect",
                    "spell-hot-reload",
                    "spell-snapshot-restore",
                    "spell-time-travel-debug",
                    "spell-formal-verification",
                ],
            ),
        );
        classes.insert(
            CharacterClass::Dps,
            table(
                [
                    "spell-sql-injection",
                    "spell-fork-bomb",
                    "spell-buffer-overflow",
                    "spell-regex-nuke",
                ],
                [
                    "spell-zero-day",
                    "spell-privilege-escalation",
                    "spell-ddos",
                    "spell-cryptominer",
                    "spell-rootkit",
                    "spell-quantum-crack",
                ],
            ),
        );
        Self { classes }
    }

    pub fn insert(&mut self, class: CharacterClass, progression: ClassProgression) {
        self.classes.insert(class, progression);
    }

    pub fn progression(&self, class: CharacterClass) -> Option<&ClassProgression> {
        self.classes.get(&class)
    }
}

impl ClassOracle for ClassCatalog {
    fn starter_spells(&self, class: CharacterClass) -> &[String] {
        self.classes
            .get(&class)
            .map(|p| p.starter_spells.as_slice())
            .unwrap_or(&[])
    }

    fn unlock_at(&self, class: CharacterClass, level: u32) -> Option<&str> {
        self.classes
            .get(&class)
            .and_then(|p| p.unlocks.get(&level))
            .map(String::as_str)
    }
}

/// Creates a character at `level` with full health and mana.
///
/// Experience is set to the total needed for the level, and the spellbook
/// holds the starter spells plus every unlock up to the level.
pub fn create_character(
    class: CharacterClass,
    name: &str,
    level: u32,
    classes: &dyn ClassOracle,
    config: &BalanceConfig,
) -> Character {
    let level = level.clamp(1, config.characters.max_level);
    Character {
        id: format!("char-{class}-{}", slug(name)),
        name: name.to_owned(),
        class,
        level,
        experience: total_xp_for_level(level, config),
        stats: stats_at_level(class, level, config),
        spells: classes.spells_at_level(class, level),
        status_effects: StatusEffects::empty(),
        cooldowns: Default::default(),
    }
}

fn slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tank_starts_with_four_spells() {
        let classes = ClassCatalog::builtin();
        let config = BalanceConfig::default();
        let tank = create_character(CharacterClass::Tank, "Ada Lovelace", 1, &classes, &config);

        assert_eq!(tank.id, "char-tank-ada-lovelace");
        assert_eq!(tank.stats.max_health, 150);
        assert_eq!(tank.stats.defense, 15);
        assert_eq!(tank.experience, 50);
        assert_eq!(tank.spells.len(), 4);
    }

    #[test]
    fn higher_levels_include_unlocks() {
        let classes = ClassCatalog::builtin();
        let config = BalanceConfig::default();
        let dps = create_character(CharacterClass::Dps, "Grace", 30, &classes, &config);

        assert_eq!(dps.spells.len(), 10);
        assert_eq!(dps.spells.last().map(String::as_str), Some("spell-quantum-crack"));
        assert_eq!(dps.stats.attack, 15 + 2 * 29);
    }

    #[test]
    fn level_is_clamped_to_the_cap() {
        let classes = ClassCatalog::builtin();
        let config = BalanceConfig::default();
        let healer = create_character(CharacterClass::Healer, "Linus", 99, &classes, &config);
        assert_eq!(healer.level, 30);
    }
}
