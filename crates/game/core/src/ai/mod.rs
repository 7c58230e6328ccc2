//! Enemy decision making.
//!
//! The engine asks an [`EnemyPolicy`] what each living enemy does on its
//! turn. Policies are pure: they read the battle and one RNG state and hand
//! back the advanced state. [`DefaultEnemyPolicy`] keys its behaviour on the
//! monster's rank first and its bug type second.

use crate::env::RngState;
use crate::state::{BugType, Character, Combatant, Monster};

/// Health restored to the player by an off-by-one miscalculation.
pub const OFF_BY_ONE_HEAL: u32 = 5;
/// Damage an off-by-one monster deals to itself.
pub const OFF_BY_ONE_SELF_HIT: u32 = 5;

/// What an enemy does this turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EnemyDecision {
    /// Basic attack on the player.
    Attack,
    /// Resolve the named spell.
    Special { spell_id: String },
    /// Lose the turn.
    Skip,
    /// Heal the player by `amount`.
    HealPlayer { amount: u32 },
    /// Damage itself by `amount`.
    HitSelf { amount: u32 },
}

/// A decision plus the line narrated in the battle log.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnemyChoice {
    pub decision: EnemyDecision,
    pub narration: String,
}

impl EnemyChoice {
    fn new(decision: EnemyDecision, narration: String) -> Self {
        Self { decision, narration }
    }
}

/// Read-only view handed to a policy.
#[derive(Clone, Copy, Debug)]
pub struct EnemyContext<'a> {
    pub monster: &'a Monster,
    pub player: &'a Character,
    /// Current battle turn.
    pub turn: u32,
}

/// Chooses enemy actions.
pub trait EnemyPolicy: Send + Sync {
    fn decide(&self, ctx: &EnemyContext<'_>, rng: RngState) -> (EnemyChoice, RngState);
}

/// Rank- and bug-type-driven behaviour. Draws exactly one value per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultEnemyPolicy;

impl EnemyPolicy for DefaultEnemyPolicy {
    fn decide(&self, ctx: &EnemyContext<'_>, rng: RngState) -> (EnemyChoice, RngState) {
        let (roll, rng) = rng.next();
        let monster = ctx.monster;
        let choice = if monster.rank.is_boss_like() {
            boss_behaviour(monster, roll)
        } else {
            match monster.bug_type {
                BugType::NullPointer => null_pointer_behaviour(monster, roll),
                BugType::MemoryLeak => memory_leak_behaviour(monster, ctx.turn),
                BugType::RaceCondition => race_condition_behaviour(monster, ctx.turn, roll),
                BugType::OffByOne => off_by_one_behaviour(monster, roll),
            }
        };
        (choice, rng)
    }
}

/// Spell used for a generic special attack: the last one when badly hurt,
/// the first one otherwise.
pub fn signature_spell(monster: &Monster) -> Option<&str> {
    let spells = &monster.spells;
    if monster.stats.health_fraction() <= 0.25 && spells.len() > 1 {
        spells.last().map(String::as_str)
    } else {
        spells.first().map(String::as_str)
    }
}

fn attack(monster: &Monster) -> EnemyChoice {
    EnemyChoice::new(EnemyDecision::Attack, format!("{} attacks!", monster.name()))
}

fn special(spell_id: &str, narration: String) -> EnemyChoice {
    EnemyChoice::new(
        EnemyDecision::Special {
            spell_id: spell_id.to_owned(),
        },
        narration,
    )
}

fn has_spell(monster: &Monster, spell_id: &str) -> bool {
    monster.spells.iter().any(|s| s == spell_id)
}

fn boss_behaviour(monster: &Monster, roll: f64) -> EnemyChoice {
    let hp = monster.stats.health_fraction();
    let name = monster.name();
    let Some(spell) = signature_spell(monster) else {
        return attack(monster);
    };

    if hp <= 0.25 {
        special(spell, format!("{name} unleashes its ultimate attack!"))
    } else if hp <= 0.5 && roll < 0.6 && monster.spells.len() > 1 {
        special(spell, format!("{name} channels a powerful ability!"))
    } else if roll < 0.3 {
        special(spell, format!("{name} uses a special attack!"))
    } else {
        attack(monster)
    }
}

fn null_pointer_behaviour(monster: &Monster, roll: f64) -> EnemyChoice {
    let name = monster.name();
    if roll < 0.15 {
        return EnemyChoice::new(
            EnemyDecision::Skip,
            format!("{name} dereferences null and crashes! (skips turn)"),
        );
    }
    match signature_spell(monster) {
        Some(spell) if roll < 0.35 => special(spell, format!("{name} throws a NullPointerException!")),
        _ => attack(monster),
    }
}

const HEAP_GROW: &str = "spell-heap-grow";
const OOM_KILL: &str = "spell-oom-kill";
const THREAD_SWAP: &str = "spell-thread-swap";

fn memory_leak_behaviour(monster: &Monster, turn: u32) -> EnemyChoice {
    let name = monster.name();
    if turn % 3 == 0 && has_spell(monster, HEAP_GROW) {
        special(HEAP_GROW, format!("{name} allocates more memory... (heap grows)"))
    } else if monster.stats.health_fraction() < 0.3 && has_spell(monster, OOM_KILL) {
        special(OOM_KILL, format!("{name} triggers the OOM killer!"))
    } else {
        attack(monster)
    }
}

fn race_condition_behaviour(monster: &Monster, turn: u32, roll: f64) -> EnemyChoice {
    let name = monster.name();
    if turn % 2 == 0 && has_spell(monster, THREAD_SWAP) {
        special(THREAD_SWAP, format!("{name} swaps threads unpredictably!"))
    } else if turn % 2 == 1 && roll < 0.3 {
        EnemyChoice::new(
            EnemyDecision::Skip,
            format!("{name} is stuck waiting on a lock (skips turn)"),
        )
    } else {
        attack(monster)
    }
}

fn off_by_one_behaviour(monster: &Monster, roll: f64) -> EnemyChoice {
    let name = monster.name();
    if roll < 0.1 {
        EnemyChoice::new(
            EnemyDecision::HealPlayer {
                amount: OFF_BY_ONE_HEAL,
            },
            format!("{name} miscalculates and heals you for {OFF_BY_ONE_HEAL} HP!"),
        )
    } else if roll < 0.25 {
        EnemyChoice::new(
            EnemyDecision::HitSelf {
                amount: OFF_BY_ONE_SELF_HIT,
            },
            format!("{name} hits itself due to an off-by-one error!"),
        )
    } else {
        attack(monster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CharacterClass, Element, MonsterRank, Stats, StatusEffects};

    fn monster(bug_type: BugType, rank: MonsterRank, spells: &[&str], health: u32) -> Monster {
        Monster {
            id: "m-1".into(),
            name: "Bug".into(),
            bug_type,
            rank,
            severity: 1,
            complexity: 0,
            element: Element::None,
            stats: Stats {
                health,
                max_health: 100,
                mana: 0,
                max_mana: 0,
                attack: 5,
                defense: 5,
                speed: 5,
            },
            spells: spells.iter().map(|s| s.to_string()).collect(),
            status_effects: StatusEffects::empty(),
            cooldowns: Default::default(),
            xp_reward: 10,
            loot_table: Vec::new(),
        }
    }

    fn player() -> Character {
        Character {
            id: "p".into(),
            name: "Hero".into(),
            class: CharacterClass::Tank,
            level: 1,
            experience: 0,
            stats: Stats::default(),
            spells: Vec::new(),
            status_effects: StatusEffects::empty(),
            cooldowns: Default::default(),
        }
    }

    #[test]
    fn policy_draws_exactly_one_value() {
        let m = monster(BugType::NullPointer, MonsterRank::Regular, &["null-deref"], 100);
        let p = player();
        let rng = RngState::from_seed(5);
        let (_, after) = DefaultEnemyPolicy.decide(&EnemyContext { monster: &m, player: &p, turn: 1 }, rng);
        assert_eq!(after, rng.next().1);
    }

    #[test]
    fn badly_hurt_boss_uses_its_last_spell() {
        let m = monster(
            BugType::MemoryLeak,
            MonsterRank::Boss,
            &["spell-heap-grow", "spell-oom-kill", "spell-stack-smash"],
            20,
        );
        let p = player();
        let (choice, _) =
            DefaultEnemyPolicy.decide(&EnemyContext { monster: &m, player: &p, turn: 1 }, RngState::from_seed(1));
        assert_eq!(
            choice.decision,
            EnemyDecision::Special {
                spell_id: "spell-stack-smash".into()
            }
        );
    }

    #[test]
    fn memory_leak_grows_heap_every_third_turn() {
        let m = monster(BugType::MemoryLeak, MonsterRank::Regular, &["spell-heap-grow"], 100);
        let p = player();
        let ctx = EnemyContext { monster: &m, player: &p, turn: 3 };
        let (choice, _) = DefaultEnemyPolicy.decide(&ctx, RngState::from_seed(9));
        assert_eq!(
            choice.decision,
            EnemyDecision::Special {
                spell_id: "spell-heap-grow".into()
            }
        );

        let ctx = EnemyContext { turn: 4, ..ctx };
        let (choice, _) = DefaultEnemyPolicy.decide(&ctx, RngState::from_seed(9));
        assert_eq!(choice.decision, EnemyDecision::Attack);
    }

    #[test]
    fn race_condition_swaps_threads_on_even_turns() {
        let m = monster(BugType::RaceCondition, MonsterRank::Regular, &["spell-thread-swap"], 100);
        let p = player();
        let (choice, _) = DefaultEnemyPolicy
            .decide(&EnemyContext { monster: &m, player: &p, turn: 2 }, RngState::from_seed(4));
        assert!(matches!(choice.decision, EnemyDecision::Special { .. }));
    }

    #[test]
    fn off_by_one_outcomes_follow_roll_bands() {
        let m = monster(BugType::OffByOne, MonsterRank::Regular, &["fence-post"], 100);
        assert!(matches!(off_by_one_behaviour(&m, 0.05).decision, EnemyDecision::HealPlayer { amount: 5 }));
        assert!(matches!(off_by_one_behaviour(&m, 0.2).decision, EnemyDecision::HitSelf { amount: 5 }));
        assert_eq!(off_by_one_behaviour(&m, 0.9).decision, EnemyDecision::Attack);
    }

    #[test]
    fn spell_less_boss_falls_back_to_attack() {
        let m = monster(BugType::NullPointer, MonsterRank::Boss, &[], 10);
        assert_eq!(boss_behaviour(&m, 0.0).decision, EnemyDecision::Attack);
    }
}
