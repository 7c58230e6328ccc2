//! Step-based encounter checks.
//!
//! Every node the player visits counts as a step. Once the cooldown has
//! elapsed the visited file is checked, in priority order, for an undefeated
//! boss, an undefeated miniboss, an undefeated bug-fix commit and finally a
//! random encounter. All draws go through the session RNG.

use std::collections::BTreeSet;

use game_content::{generate_boss, generate_bug_monster, generate_miniboss};
use game_core::{BalanceConfig, Monster, RngState};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::world::{CodeWorld, SourceFile};

/// Exploration progress persisted in saves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncounterState {
    pub steps_since_last_encounter: u32,
    /// File paths whose boss is down.
    pub defeated_bosses: BTreeSet<String>,
    /// Hotspot paths whose miniboss is down.
    pub defeated_minibosses: BTreeSet<String>,
    /// Commit hashes whose bug is down.
    pub defeated_bugs: BTreeSet<String>,
}

impl EncounterState {
    pub fn mark_boss_defeated(&mut self, path: &str) {
        self.defeated_bosses.insert(path.to_owned());
    }

    pub fn mark_miniboss_defeated(&mut self, path: &str) {
        self.defeated_minibosses.insert(path.to_owned());
    }

    pub fn mark_bug_defeated(&mut self, hash: &str) {
        self.defeated_bugs.insert(hash.to_owned());
    }

    /// Records the defeat of whatever an encounter came from.
    pub fn mark_defeated(&mut self, origin: &EncounterOrigin) {
        match origin {
            EncounterOrigin::Boss { path } => self.mark_boss_defeated(path),
            EncounterOrigin::Miniboss { path } => self.mark_miniboss_defeated(path),
            EncounterOrigin::Bug { hash } => self.mark_bug_defeated(hash),
            EncounterOrigin::Random | EncounterOrigin::Scripted => {}
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum EncounterKind {
    Boss,
    Miniboss,
    Bug,
}

/// What spawned a battle, so a victory can be remembered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EncounterOrigin {
    Boss { path: String },
    Miniboss { path: String },
    Bug { hash: String },
    /// Random encounter; nothing to remember.
    Random,
    /// Battle started directly by the host.
    Scripted,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Encounter {
    pub kind: EncounterKind,
    pub monster: Monster,
    pub origin: EncounterOrigin,
}

/// Checks the visited `file` for an encounter. Increments the step counter;
/// a triggered encounter resets it to zero.
pub fn check_encounter(
    file: &SourceFile,
    world: &CodeWorld,
    state: &mut EncounterState,
    rng: RngState,
    config: &BalanceConfig,
) -> (Option<Encounter>, RngState) {
    let rules = &config.encounters;
    state.steps_since_last_encounter += 1;
    if state.steps_since_last_encounter < rules.encounter_cooldown {
        return (None, rng);
    }

    let (encounter, rng) = match guarded_encounter(file, world, state, rng, config) {
        (Some(found), rng) => (Some(found), rng),
        (None, rng) => random_encounter(world, rng, config),
    };
    if encounter.is_some() {
        state.steps_since_last_encounter = 0;
    }
    (encounter, rng)
}

/// The encounter a file holds regardless of chance, skipping defeated ones.
fn guarded_encounter(
    file: &SourceFile,
    world: &CodeWorld,
    state: &EncounterState,
    rng: RngState,
    config: &BalanceConfig,
) -> (Option<Encounter>, RngState) {
    let rules = &config.encounters;

    if file.complexity > rules.boss_complexity_threshold && !state.defeated_bosses.contains(&file.path) {
        let (monster, rng) = generate_boss(&file.language, file.complexity, rng, config);
        let encounter = Encounter {
            kind: EncounterKind::Boss,
            monster,
            origin: EncounterOrigin::Boss {
                path: file.path.clone(),
            },
        };
        return (Some(encounter), rng);
    }

    let hotspot = world.hotspots.iter().find(|h| {
        h.path == file.path
            && h.risk_score >= rules.miniboss_risk_threshold
            && !state.defeated_minibosses.contains(&h.path)
    });
    if let Some(hotspot) = hotspot {
        let (monster, rng) = generate_miniboss(hotspot.risk_score, hotspot.complexity, rng, config);
        let encounter = Encounter {
            kind: EncounterKind::Miniboss,
            monster,
            origin: EncounterOrigin::Miniboss {
                path: hotspot.path.clone(),
            },
        };
        return (Some(encounter), rng);
    }

    let commit = world
        .commits
        .iter()
        .find(|c| c.is_bug_fix && c.touches(&file.path) && !state.defeated_bugs.contains(&c.hash));
    if let Some(commit) = commit {
        let (monster, rng) = generate_bug_monster(
            &commit.message,
            commit.lines_changed(),
            commit.files_changed.len(),
            None,
            rng,
            config,
        );
        let encounter = Encounter {
            kind: EncounterKind::Bug,
            monster,
            origin: EncounterOrigin::Bug {
                hash: commit.hash.clone(),
            },
        };
        return (Some(encounter), rng);
    }

    (None, rng)
}

/// Severity 1 bug built from the most recent commit, on a chance roll.
fn random_encounter(world: &CodeWorld, rng: RngState, config: &BalanceConfig) -> (Option<Encounter>, RngState) {
    let (hit, rng) = rng.chance(config.encounters.random_encounter_chance);
    let Some(commit) = world.commits.first().filter(|_| hit) else {
        return (None, rng);
    };
    let (monster, rng) = generate_bug_monster(
        &commit.message,
        commit.lines_changed(),
        commit.files_changed.len(),
        Some(1),
        rng,
        config,
    );
    let encounter = Encounter {
        kind: EncounterKind::Bug,
        monster,
        origin: EncounterOrigin::Random,
    };
    (Some(encounter), rng)
}

/// Every encounter the world holds, ignoring cooldowns, chance and defeats.
/// Used to pre-compute an encounter map.
pub fn scan_all_encounters(
    world: &CodeWorld,
    rng: RngState,
    config: &BalanceConfig,
) -> (Vec<(String, Encounter)>, RngState) {
    let fresh = EncounterState::default();
    let mut rng = rng;
    let mut found = Vec::new();
    for file in &world.files {
        let (encounter, next) = guarded_encounter(file, world, &fresh, rng, config);
        rng = next;
        if let Some(encounter) = encounter {
            found.push((file.path.clone(), encounter));
        }
    }
    (found, rng)
}

/// Share of files that hold a guaranteed encounter.
pub fn encounter_density(world: &CodeWorld, config: &BalanceConfig) -> f64 {
    if world.files.is_empty() {
        return 0.0;
    }
    let rules = &config.encounters;
    let guarded = world
        .files
        .iter()
        .filter(|file| {
            file.complexity > rules.boss_complexity_threshold
                || world
                    .hotspot(&file.path)
                    .is_some_and(|h| h.risk_score >= rules.miniboss_risk_threshold)
                || world.commits.iter().any(|c| c.is_bug_fix && c.touches(&file.path))
        })
        .count();
    guarded as f64 / world.files.len() as f64
}

#[cfg(test)]
mod tests {
    use game_core::MonsterRank;

    use super::*;
    use crate::world::{Commit, Hotspot};

    fn file(path: &str, complexity: u32) -> SourceFile {
        SourceFile {
            path: path.into(),
            language: "rust".into(),
            complexity,
        }
    }

    fn world() -> CodeWorld {
        CodeWorld {
            files: vec![file("src/big.rs", 40), file("src/hot.rs", 5), file("src/fix.rs", 3), file("src/calm.rs", 1)],
            commits: vec![Commit {
                hash: "abc123".into(),
                message: "fix null deref in parser".into(),
                files_changed: vec!["src/fix.rs".into()],
                insertions: 10,
                deletions: 2,
                is_bug_fix: true,
            }],
            hotspots: vec![Hotspot {
                path: "src/hot.rs".into(),
                risk_score: 8.0,
                complexity: 12,
            }],
        }
    }

    fn ready() -> EncounterState {
        EncounterState {
            steps_since_last_encounter: 10,
            ..EncounterState::default()
        }
    }

    #[test]
    fn cooldown_blocks_encounters() {
        let config = BalanceConfig::default();
        let world = world();
        let mut state = EncounterState::default();

        let (encounter, _) = check_encounter(&world.files[0], &world, &mut state, RngState::from_seed(1), &config);

        assert!(encounter.is_none());
        assert_eq!(state.steps_since_last_encounter, 1);
    }

    #[test]
    fn complex_file_spawns_boss_and_resets_steps() {
        let config = BalanceConfig::default();
        let world = world();
        let mut state = ready();

        let (encounter, _) = check_encounter(&world.files[0], &world, &mut state, RngState::from_seed(1), &config);
        let encounter = encounter.expect("boss encounter");

        assert_eq!(encounter.kind, EncounterKind::Boss);
        assert_eq!(encounter.monster.rank, MonsterRank::Boss);
        assert_eq!(state.steps_since_last_encounter, 0);
    }

    #[test]
    fn defeated_boss_does_not_return() {
        let config = BalanceConfig {
            encounters: game_core::config::EncounterConfig {
                random_encounter_chance: 0.0,
                ..Default::default()
            },
            ..BalanceConfig::default()
        };
        let world = world();
        let mut state = ready();
        state.mark_defeated(&EncounterOrigin::Boss {
            path: "src/big.rs".into(),
        });

        let (encounter, _) = check_encounter(&world.files[0], &world, &mut state, RngState::from_seed(1), &config);

        assert!(encounter.is_none());
    }

    #[test]
    fn hotspot_and_bug_fix_encounters() {
        let config = BalanceConfig::default();
        let world = world();

        let (hot, _) = check_encounter(&world.files[1], &world, &mut ready(), RngState::from_seed(2), &config);
        let hot = hot.expect("miniboss");
        assert_eq!(hot.kind, EncounterKind::Miniboss);
        assert_eq!(hot.monster.bug_type, game_core::BugType::MemoryLeak);

        let (bug, _) = check_encounter(&world.files[2], &world, &mut ready(), RngState::from_seed(2), &config);
        let bug = bug.expect("bug");
        assert_eq!(
            bug.origin,
            EncounterOrigin::Bug {
                hash: "abc123".into()
            }
        );
    }

    #[test]
    fn certain_random_encounter_uses_latest_commit_at_severity_one() {
        let config = BalanceConfig {
            encounters: game_core::config::EncounterConfig {
                random_encounter_chance: 1.0,
                ..Default::default()
            },
            ..BalanceConfig::default()
        };
        let world = world();

        let (encounter, _) = check_encounter(&world.files[3], &world, &mut ready(), RngState::from_seed(3), &config);
        let encounter = encounter.expect("random encounter");

        assert_eq!(encounter.origin, EncounterOrigin::Random);
        assert_eq!(encounter.monster.severity, 1);
    }

    #[test]
    fn scan_and_density() {
        let config = BalanceConfig::default();
        let world = world();

        let (found, _) = scan_all_encounters(&world, RngState::from_seed(4), &config);

        assert_eq!(found.len(), 3);
        assert!((encounter_density(&world, &config) - 0.75).abs() < 1e-9);
    }
}
