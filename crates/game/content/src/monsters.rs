//! Bug monster templates and factories.
//!
//! Every factory threads an [`RngState`] and returns the advanced state, so
//! the same seed always spawns the same monster.

use game_core::combat::{monster_xp_reward, scale_monster_stat};
use game_core::state::StatusEffects;
use game_core::{BalanceConfig, BugType, Element, LootEntry, Monster, MonsterRank, RngState, Stats};

/// Base numbers a monster is scaled from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonsterTemplate {
    pub bug_type: BugType,
    pub base_name: &'static str,
    pub element: Element,
    pub health: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub spells: &'static [&'static str],
    pub boss_spells: &'static [&'static str],
}

const TEMPLATES: [MonsterTemplate; 4] = [
    MonsterTemplate {
        bug_type: BugType::NullPointer,
        base_name: "NullPointerException",
        element: Element::None,
        health: 40,
        attack: 8,
        defense: 3,
        speed: 6,
        spells: &["spell-null-deref"],
        boss_spells: &["spell-null-deref", "spell-segfault", "spell-deadlock-boss"],
    },
    MonsterTemplate {
        bug_type: BugType::MemoryLeak,
        base_name: "MemoryLeak",
        element: Element::Earth,
        health: 60,
        attack: 5,
        defense: 6,
        speed: 3,
        spells: &["spell-heap-grow"],
        boss_spells: &["spell-heap-grow", "spell-oom-kill", "spell-stack-smash"],
    },
    MonsterTemplate {
        bug_type: BugType::RaceCondition,
        base_name: "RaceCondition",
        element: Element::Air,
        health: 35,
        attack: 10,
        defense: 2,
        speed: 12,
        spells: &["spell-thread-swap"],
        boss_spells: &["spell-thread-swap", "spell-deadlock-boss"],
    },
    MonsterTemplate {
        bug_type: BugType::OffByOne,
        base_name: "OffByOneError",
        element: Element::None,
        health: 25,
        attack: 6,
        defense: 4,
        speed: 8,
        spells: &["spell-fence-post"],
        boss_spells: &["spell-fence-post", "spell-stack-smash"],
    },
];

const ADJECTIVES: [&str; 15] = [
    "Recursive",
    "Polymorphic",
    "Async",
    "Deprecated",
    "Volatile",
    "Orphaned",
    "Dangling",
    "Corrupted",
    "Uninitialized",
    "Phantom",
    "Legacy",
    "Stale",
    "Circular",
    "Transient",
    "Persistent",
];

const BOSS_PREFIXES: [&str; 5] = ["Catastrophic", "Critical", "Fatal", "Systemic", "Cascading"];

/// Complexity above which factories stop scaling.
const MAX_COMPLEXITY: u32 = 10;

pub fn template(bug_type: BugType) -> &'static MonsterTemplate {
    match bug_type {
        BugType::NullPointer => &TEMPLATES[0],
        BugType::MemoryLeak => &TEMPLATES[1],
        BugType::RaceCondition => &TEMPLATES[2],
        BugType::OffByOne => &TEMPLATES[3],
    }
}

/// Drop table: a debug log always, rarer items from severity 2 upwards.
pub fn loot_table(severity: u8) -> Vec<LootEntry> {
    [
        (1, "item-debug-log", 0.5),
        (2, "item-stack-trace", 0.3),
        (3, "item-core-dump", 0.2),
        (4, "item-memory-snapshot", 0.15),
        (5, "item-root-cause", 0.1),
    ]
    .into_iter()
    .filter(|(min, _, _)| severity >= *min)
    .map(|(_, id, chance)| LootEntry::new(id, chance))
    .collect()
}

fn monster_name(template: &MonsterTemplate, severity: u8, rng: RngState) -> (String, RngState) {
    let pool: &[&str] = match severity {
        4.. => &BOSS_PREFIXES,
        2..=3 => &ADJECTIVES,
        _ => return (template.base_name.to_owned(), rng),
    };
    let (word, rng) = rng.pick(pool);
    let name = match word {
        Some(word) => format!("{word} {}", template.base_name),
        None => template.base_name.to_owned(),
    };
    (name, rng)
}

fn scaled_stats(template: &MonsterTemplate, severity: u8, complexity: u32, config: &BalanceConfig) -> Stats {
    let scale = |base| scale_monster_stat(base, severity, complexity, config);
    let max_health = scale(template.health);
    Stats {
        health: max_health,
        max_health,
        mana: 0,
        max_mana: 0,
        attack: scale(template.attack),
        defense: scale(template.defense),
        speed: scale(template.speed),
    }
}

struct Spawn {
    bug_type: BugType,
    rank: MonsterRank,
    severity: u8,
    complexity: u32,
    boss_spells: bool,
}

fn spawn(request: Spawn, rng: RngState, config: &BalanceConfig) -> (Monster, RngState) {
    let template = template(request.bug_type);
    let severity = request.severity.clamp(1, BalanceConfig::MAX_SEVERITY);
    let complexity = request.complexity.min(MAX_COMPLEXITY);
    let (name, rng) = monster_name(template, severity, rng);
    let (serial, rng) = rng.range(0, 999_999);

    let (name, multiplier) = match request.rank {
        MonsterRank::Boss => (format!("{name} [BOSS]"), config.monsters.boss_xp_multiplier),
        MonsterRank::Miniboss => (format!("{name} [MINIBOSS]"), config.monsters.miniboss_xp_multiplier),
        MonsterRank::Regular => (name, 1),
    };
    let spells = if request.boss_spells {
        template.boss_spells
    } else {
        template.spells
    };

    let monster = Monster {
        id: format!("monster-{}-{serial:06}", request.bug_type),
        name,
        bug_type: request.bug_type,
        rank: request.rank,
        severity,
        complexity,
        element: template.element,
        stats: scaled_stats(template, severity, complexity, config),
        spells: spells.iter().map(|s| (*s).to_owned()).collect(),
        status_effects: StatusEffects::empty(),
        cooldowns: Default::default(),
        xp_reward: monster_xp_reward(severity, complexity, config) * multiplier,
        loot_table: loot_table(severity),
    };
    (monster, rng)
}

/// A regular monster. Severity 4 and above brings the boss spell list.
pub fn create_monster(
    bug_type: BugType,
    severity: u8,
    complexity: u32,
    rng: RngState,
    config: &BalanceConfig,
) -> (Monster, RngState) {
    spawn(
        Spawn {
            bug_type,
            rank: MonsterRank::Regular,
            severity,
            complexity,
            boss_spells: severity >= 4,
        },
        rng,
        config,
    )
}

/// A severity 5 boss guarding a complex file. The language picks the bug
/// type.
pub fn generate_boss(
    language: &str,
    file_complexity: u32,
    rng: RngState,
    config: &BalanceConfig,
) -> (Monster, RngState) {
    spawn(
        Spawn {
            bug_type: bug_type_for_language(language),
            rank: MonsterRank::Boss,
            severity: BalanceConfig::MAX_SEVERITY,
            complexity: file_complexity / 5,
            boss_spells: true,
        },
        rng,
        config,
    )
}

/// A miniboss on a risky hotspot. Risk above 7 spawns a memory leak,
/// anything else a null pointer.
pub fn generate_miniboss(
    risk_score: f64,
    hotspot_complexity: u32,
    rng: RngState,
    config: &BalanceConfig,
) -> (Monster, RngState) {
    let bug_type = if risk_score > 7.0 {
        BugType::MemoryLeak
    } else {
        BugType::NullPointer
    };
    spawn(
        Spawn {
            bug_type,
            rank: MonsterRank::Miniboss,
            severity: (risk_score / 2.0).floor().clamp(1.0, 5.0) as u8,
            complexity: hotspot_complexity / 3,
            boss_spells: true,
        },
        rng,
        config,
    )
}

/// A bug spawned from a bug-fix commit.
///
/// The message picks the bug type, the size of the change picks severity
/// unless overridden, and the number of touched files drives complexity.
pub fn generate_bug_monster(
    message: &str,
    lines_changed: u32,
    files_changed: usize,
    severity_override: Option<u8>,
    rng: RngState,
    config: &BalanceConfig,
) -> (Monster, RngState) {
    let complexity = (files_changed as f64 * 1.5).floor() as u32;
    spawn(
        Spawn {
            bug_type: bug_type_for_message(message),
            rank: MonsterRank::Regular,
            severity: severity_override.unwrap_or_else(|| severity_for_change(lines_changed)),
            complexity,
            boss_spells: false,
        },
        rng,
        config,
    )
}

pub fn bug_type_for_message(message: &str) -> BugType {
    let msg = message.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| msg.contains(w));
    if mentions(&["null", "undefined", "typeerror"]) {
        BugType::NullPointer
    } else if mentions(&["memory", "leak", "gc"]) {
        BugType::MemoryLeak
    } else if mentions(&["race", "concurrent", "async", "deadlock"]) {
        BugType::RaceCondition
    } else if mentions(&["off-by", "index", "bound", "fence"]) {
        BugType::OffByOne
    } else {
        BugType::NullPointer
    }
}

pub fn severity_for_change(lines_changed: u32) -> u8 {
    match lines_changed {
        201.. => 5,
        101..=200 => 4,
        51..=100 => 3,
        21..=50 => 2,
        _ => 1,
    }
}

pub fn bug_type_for_language(language: &str) -> BugType {
    match language.to_lowercase().as_str() {
        "c" | "c++" | "rust" => BugType::MemoryLeak,
        "go" | "java" => BugType::RaceCondition,
        "python" | "javascript" | "typescript" => BugType::NullPointer,
        _ => BugType::OffByOne,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_one_keeps_the_base_name() {
        let config = BalanceConfig::default();
        let (monster, _) = create_monster(BugType::OffByOne, 1, 0, RngState::from_seed(1), &config);
        assert_eq!(monster.name, "OffByOneError");
        assert_eq!(monster.stats.max_health, 25);
        assert_eq!(monster.xp_reward, 25);
        assert_eq!(monster.spells, vec!["spell-fence-post"]);
        assert_eq!(monster.loot_table.len(), 1);
    }

    #[test]
    fn high_severity_gets_a_prefix_and_boss_spells() {
        let config = BalanceConfig::default();
        let (monster, _) = create_monster(BugType::MemoryLeak, 4, 2, RngState::from_seed(1), &config);
        let prefix = monster.name.split(' ').next().unwrap_or_default();
        assert!(BOSS_PREFIXES.contains(&prefix));
        assert_eq!(monster.spells.len(), 3);
        assert_eq!(monster.loot_table.len(), 4);
    }

    #[test]
    fn same_seed_same_monster() {
        let config = BalanceConfig::default();
        let a = create_monster(BugType::RaceCondition, 3, 4, RngState::from_seed(99), &config);
        let b = create_monster(BugType::RaceCondition, 3, 4, RngState::from_seed(99), &config);
        assert_eq!(a, b);
    }

    #[test]
    fn bosses_multiply_xp() {
        let config = BalanceConfig::default();
        let (boss, _) = generate_boss("Rust", 25, RngState::from_seed(3), &config);
        assert_eq!(boss.rank, MonsterRank::Boss);
        assert_eq!(boss.bug_type, BugType::MemoryLeak);
        assert!(boss.name.ends_with("[BOSS]"));
        assert_eq!(boss.xp_reward, monster_xp_reward(5, 5, &config) * 3);
    }

    #[test]
    fn miniboss_type_follows_risk() {
        let config = BalanceConfig::default();
        let (calm, _) = generate_miniboss(6.5, 9, RngState::from_seed(3), &config);
        let (hot, _) = generate_miniboss(8.0, 9, RngState::from_seed(3), &config);
        assert_eq!(calm.bug_type, BugType::NullPointer);
        assert_eq!(calm.severity, 3);
        assert_eq!(hot.bug_type, BugType::MemoryLeak);
        assert_eq!(hot.rank, MonsterRank::Miniboss);
    }

    #[test]
    fn commit_heuristics() {
        assert_eq!(bug_type_for_message("Fix race in scheduler"), BugType::RaceCondition);
        assert_eq!(bug_type_for_message("fix index bound"), BugType::OffByOne);
        assert_eq!(bug_type_for_message("cleanup"), BugType::NullPointer);
        assert_eq!(severity_for_change(20), 1);
        assert_eq!(severity_for_change(150), 4);
    }
}
