//! Live game session.
//!
//! A [`GameSession`] owns everything one player's run mutates: the
//! character, the inventory, the active battle, exploration and quest
//! progress, statistics and flags. Each `on_*` handler applies one inbound
//! event and returns a [`Reaction`] listing the outbound events to publish.
//! Handlers never publish themselves; the wiring layer does that after
//! releasing the session lock.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use game_content::ContentBundle;
use game_core::{
    ActionRejection, BattleAction, BattleEngine, BattleRewards, BattleState, BattleStatistics, Character,
    EnemyPhaseMode, Inventory, ItemOracle, Monster, RngState, Stats, apply_battle_rewards, gain_experience,
    init_battle, resolve_battle_rewards,
};
use tracing::{debug, info};

use crate::encounter::{Encounter, EncounterOrigin, EncounterState, check_encounter};
use crate::error::{Result, RuntimeError};
use crate::events::{CombatOutcome, GameEvent, Position, StatChanges, battle_events};
use crate::flags::GameFlags;
use crate::quests::QuestLog;
use crate::world::CodeWorld;

pub type SharedSession = Arc<Mutex<GameSession>>;

/// Which reward systems may act when a battle is won.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardGate {
    pub progression: bool,
    pub quests: bool,
}

impl RewardGate {
    pub const OPEN: Self = Self {
        progression: true,
        quests: true,
    };
}

impl Default for RewardGate {
    fn default() -> Self {
        Self::OPEN
    }
}

/// What a handler did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reaction {
    /// Outbound events, in publish order.
    pub events: Vec<GameEvent>,
    /// Set when the engine refused a combat action.
    pub rejection: Option<ActionRejection>,
    /// Victory rewards held back because progression was gated.
    pub withheld_rewards: Option<BattleRewards>,
    /// Quest ids a victory would have completed while quests were gated.
    pub withheld_quests: Option<Vec<String>>,
}

impl Reaction {
    fn events(events: Vec<GameEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveBattle {
    pub state: BattleState,
    pub origin: EncounterOrigin,
}

#[derive(Debug)]
pub struct GameSession {
    pub character: Character,
    pub inventory: Inventory,
    pub battle: Option<ActiveBattle>,
    pub encounters: EncounterState,
    pub stats: BattleStatistics,
    pub quests: QuestLog,
    pub knowledge: BTreeSet<String>,
    pub flags: GameFlags,
    pub rng: RngState,
    pub world: CodeWorld,
    pub playtime_ms: u64,
    content: Arc<ContentBundle>,
    mode: EnemyPhaseMode,
}

impl GameSession {
    pub fn new(character: Character, world: CodeWorld, content: Arc<ContentBundle>, seed: u32) -> Self {
        Self {
            character,
            inventory: Inventory::default(),
            battle: None,
            encounters: EncounterState::default(),
            stats: BattleStatistics::default(),
            quests: QuestLog::default(),
            knowledge: BTreeSet::new(),
            flags: GameFlags::new(),
            rng: RngState::from_seed(seed),
            world,
            playtime_ms: 0,
            content,
            mode: EnemyPhaseMode::Auto,
        }
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn with_quests(mut self, quests: QuestLog) -> Self {
        self.quests = quests;
        self
    }

    pub fn with_enemy_phase(mut self, mode: EnemyPhaseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn content(&self) -> &Arc<ContentBundle> {
        &self.content
    }

    pub fn in_battle(&self) -> bool {
        self.battle.is_some()
    }

    pub fn add_playtime(&mut self, ms: u64) {
        self.playtime_ms = self.playtime_ms.saturating_add(ms);
    }

    // ===== exploration =====

    /// Movement only advances the encounter cooldown.
    pub fn on_player_moved(&mut self) -> Reaction {
        self.encounters.steps_since_last_encounter += 1;
        Reaction::default()
    }

    pub fn on_node_clicked(&mut self, file_path: &str, position: Option<Position>) -> Reaction {
        self.explore(file_path, position)
    }

    pub fn on_branch_entered(&mut self, file_path: &str) -> Reaction {
        self.explore(file_path, None)
    }

    /// Encounter the visit at `file_path` would trigger, without touching
    /// the session.
    pub fn preview_encounter(&self, file_path: &str) -> Option<Encounter> {
        if self.in_battle() {
            return None;
        }
        let file = self.world.file(file_path)?;
        let mut encounters = self.encounters.clone();
        check_encounter(file, &self.world, &mut encounters, self.rng, &self.content.balance).0
    }

    fn explore(&mut self, file_path: &str, position: Option<Position>) -> Reaction {
        if self.in_battle() {
            debug!(file_path, "ignoring exploration during battle");
            return Reaction::default();
        }
        let Some(file) = self.world.file(file_path).cloned() else {
            debug!(file_path, "unknown file");
            return Reaction::default();
        };

        let (encounter, rng) = check_encounter(&file, &self.world, &mut self.encounters, self.rng, &self.content.balance);
        self.rng = rng;
        let Some(encounter) = encounter else {
            return Reaction::default();
        };

        info!(kind = %encounter.kind, monster = %encounter.monster.name, "encounter triggered");
        let mut events = vec![GameEvent::EncounterTriggered {
            kind: encounter.kind,
            severity: encounter.monster.severity,
            position,
        }];
        let seed = self.next_battle_seed();
        events.extend(self.begin_battle(vec![encounter.monster], seed, encounter.origin));
        Reaction::events(events)
    }

    // ===== combat =====

    /// Starts a battle directly, outside the encounter system. The seed
    /// defaults to a fresh draw from the session RNG.
    pub fn start_battle(&mut self, enemies: Vec<Monster>, seed: Option<u32>) -> Result<Reaction> {
        if self.in_battle() {
            return Err(RuntimeError::BattleInProgress);
        }
        if enemies.is_empty() {
            return Err(RuntimeError::NoEnemies);
        }
        let seed = match seed {
            Some(seed) => seed,
            None => self.next_battle_seed(),
        };
        Ok(Reaction::events(self.begin_battle(enemies, seed, EncounterOrigin::Scripted)))
    }

    /// Advances the session RNG and turns the draw into a battle seed.
    fn next_battle_seed(&mut self) -> u32 {
        let (value, next) = self.rng.next();
        self.rng = next;
        (value * f64::from(u32::MAX)) as u32
    }

    fn begin_battle(&mut self, enemies: Vec<Monster>, seed: u32, origin: EncounterOrigin) -> Vec<GameEvent> {
        let state = init_battle(self.character.clone(), enemies, seed);
        let started = state.enemies.first().map(|lead| GameEvent::CombatStarted {
            monster_id: lead.id.clone(),
            monster_name: lead.name.clone(),
            bug_type: lead.bug_type,
            severity: lead.severity,
            monster_health: lead.stats.health,
            monster_max_health: lead.stats.max_health,
        });
        debug!(seed, enemies = state.enemies.len(), "battle started");
        self.battle = Some(ActiveBattle { state, origin });
        started.into_iter().collect()
    }

    /// Casts at `target_index`, defaulting to the first enemy.
    pub fn on_spell_cast(&mut self, spell_id: &str, target_index: Option<usize>, gate: RewardGate) -> Reaction {
        let action = BattleAction::cast(spell_id, Some(target_index.unwrap_or(0)));
        self.dispatch_combat_action(&action, gate)
    }

    /// Runs one action through the engine. Without a battle nothing happens.
    pub fn dispatch_combat_action(&mut self, action: &BattleAction, gate: RewardGate) -> Reaction {
        let Some(active) = self.battle.as_ref() else {
            debug!(action = action.name(), "no battle in progress");
            return Reaction::default();
        };

        let content = Arc::clone(&self.content);
        let engine = BattleEngine::new(content.env()).with_enemy_phase(self.mode);
        let outcome = engine.execute_turn(&active.state, action);
        if let Some(rejection) = outcome.rejection {
            debug!(action = action.name(), %rejection, "action rejected");
            return Reaction {
                rejection: Some(rejection),
                ..Reaction::default()
            };
        }

        let events = battle_events(&active.state, &outcome.state);
        let over = outcome.state.is_over();
        if let Some(active) = self.battle.as_mut() {
            active.state = outcome.state;
        }
        let mut reaction = Reaction::events(events);
        if over {
            self.finish_battle(gate, &mut reaction);
        }
        reaction
    }

    fn finish_battle(&mut self, gate: RewardGate, reaction: &mut Reaction) {
        let Some(ActiveBattle { state, origin }) = self.battle.take() else {
            return;
        };
        let rewards = resolve_battle_rewards(&state);
        self.stats.record(&state, rewards.as_ref());

        let Some(rewards) = rewards else {
            info!(turns = state.turn, "battle lost");
            reaction.events.push(GameEvent::CombatEnded {
                outcome: CombatOutcome::Defeat,
                turns: state.turn,
                xp_gained: None,
            });
            return;
        };

        info!(turns = state.turn, xp = rewards.xp, "battle won");
        self.encounters.mark_defeated(&origin);

        if gate.progression {
            self.grant_rewards(&state, &rewards, &mut reaction.events);
        } else {
            reaction.withheld_rewards = Some(rewards.clone());
        }

        let quest_ids: Vec<String> = match &origin {
            EncounterOrigin::Bug { hash } => self.quests.active_for_commit(hash).map(|q| q.id.clone()).collect(),
            _ => Vec::new(),
        };
        if gate.quests {
            for id in quest_ids {
                self.complete_quest(&id, &mut reaction.events);
            }
        } else {
            reaction.withheld_quests = Some(quest_ids);
        }

        reaction.events.push(GameEvent::CombatEnded {
            outcome: CombatOutcome::Victory,
            turns: state.turn,
            xp_gained: Some(rewards.xp),
        });
    }

    fn grant_rewards(&mut self, state: &BattleState, rewards: &BattleRewards, events: &mut Vec<GameEvent>) {
        let before = self.character.stats;
        let content = Arc::clone(&self.content);
        let result = apply_battle_rewards(
            &mut self.character,
            &mut self.inventory,
            rewards,
            &content.classes,
            &content.balance,
        );
        if !result.overflow.is_empty() {
            debug!(items = ?result.overflow, "inventory full, loot discarded");
        }

        events.push(GameEvent::ExperienceGained {
            character_id: self.character.id.clone(),
            amount: rewards.xp,
            total_experience: self.character.experience,
        });
        if result.level_up.leveled_up() {
            events.push(self.level_up_event(before));
        }
        if !rewards.loot.is_empty()
            && let Some(lead) = state.enemies.first()
        {
            events.push(GameEvent::LootDropped {
                monster_id: lead.id.clone(),
                items: rewards.loot.clone(),
            });
        }
    }

    fn level_up_event(&self, before: Stats) -> GameEvent {
        let after = self.character.stats;
        GameEvent::LevelUp {
            character_id: self.character.id.clone(),
            new_level: self.character.level,
            stat_changes: StatChanges {
                health: i64::from(after.max_health) - i64::from(before.max_health),
                mana: i64::from(after.max_mana) - i64::from(before.max_mana),
                attack: i64::from(after.attack) - i64::from(before.attack),
                defense: i64::from(after.defense) - i64::from(before.defense),
            },
        }
    }

    // ===== quests =====

    /// Completes an active quest and pays its rewards.
    pub fn complete_quest(&mut self, quest_id: &str, events: &mut Vec<GameEvent>) -> bool {
        let Some(quest) = self.quests.complete(quest_id) else {
            return false;
        };
        let totals = quest.reward_totals();
        info!(quest = %quest.id, xp = totals.xp, "quest completed");

        if totals.xp > 0 {
            let before = self.character.stats;
            let content = Arc::clone(&self.content);
            let level_up = gain_experience(
                &mut self.character,
                u64::from(totals.xp),
                &content.classes,
                &content.balance,
            );
            events.push(GameEvent::ExperienceGained {
                character_id: self.character.id.clone(),
                amount: totals.xp,
                total_experience: self.character.experience,
            });
            if level_up.leveled_up() {
                events.push(self.level_up_event(before));
            }
        }
        for item in &totals.items {
            if !self.inventory.add(item, 1) {
                debug!(item, "inventory full, quest item discarded");
            }
        }
        self.knowledge.extend(totals.knowledge);
        true
    }

    // ===== inventory =====

    /// Uses an item from the inventory.
    ///
    /// During a battle the item is taken out of the inventory and resolved
    /// as a USE_ITEM turn; it is put back if the engine refuses the action
    /// or the turn is forfeit to a stun.
    /// Outside battle it is applied to the character directly.
    pub fn on_item_used(&mut self, item_id: &str, gate: RewardGate) -> Reaction {
        if !self.inventory.has(item_id) {
            debug!(item_id, "item not in inventory");
            return Reaction::default();
        }

        if let Some(active) = self.battle.as_ref() {
            let forfeit = active.state.player.status_effects.is_stunned();
            self.inventory.remove(item_id, 1);
            let reaction = self.dispatch_combat_action(&BattleAction::use_item(item_id), gate);
            if forfeit || reaction.rejection.is_some() {
                self.inventory.add(item_id, 1);
            }
            return reaction;
        }

        let content = Arc::clone(&self.content);
        let Some(item) = content.items.item(item_id) else {
            debug!(item_id, "unknown item");
            return Reaction::default();
        };
        self.inventory.remove(item_id, 1);
        let outcome = item.effect.apply_to(&mut self.character, &item.name);
        debug!(item_id, healed = outcome.healed, mana = outcome.mana_restored, "item used");
        Reaction::default()
    }
}

#[cfg(test)]
mod tests {
    use game_content::{create_character, create_monster};
    use game_core::{BattlePhase, BugType, CharacterClass, StatusEffect, StatusEffectKind};

    use super::*;
    use crate::events::Topic;
    use crate::world::SourceFile;

    fn session() -> GameSession {
        let content = Arc::new(ContentBundle::builtin());
        let character = create_character(CharacterClass::Dps, "Ada", 30, &content.classes, &content.balance);
        let world = CodeWorld {
            files: vec![SourceFile {
                path: "src/engine.rs".into(),
                language: "rust".into(),
                complexity: 45,
            }],
            ..CodeWorld::default()
        };
        GameSession::new(character, world, content, 7)
    }

    fn weak_monster(content: &ContentBundle) -> Monster {
        create_monster(BugType::OffByOne, 1, 0, RngState::from_seed(1), &content.balance).0
    }

    fn fight_to_end(session: &mut GameSession, gate: RewardGate) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..100 {
            if !session.in_battle() {
                break;
            }
            events.extend(session.dispatch_combat_action(&BattleAction::attack(0), gate).events);
        }
        events
    }

    #[test]
    fn boss_file_triggers_battle_after_cooldown() {
        let mut s = session();
        for _ in 0..3 {
            s.on_player_moved();
        }
        assert!(s.preview_encounter("src/engine.rs").is_some());

        let reaction = s.on_node_clicked("src/engine.rs", None);
        let topics: Vec<Topic> = reaction.events.iter().map(GameEvent::topic).collect();

        assert_eq!(topics, vec![Topic::EncounterTriggered, Topic::CombatStarted]);
        assert!(s.in_battle());
        assert!(s.on_node_clicked("src/engine.rs", None).events.is_empty());
    }

    #[test]
    fn victory_grants_xp_and_ends_battle() {
        let mut s = session();
        let monster = weak_monster(&s.content().clone());
        s.start_battle(vec![monster], Some(11)).expect("start");
        let xp_before = s.character.experience;

        let events = fight_to_end(&mut s, RewardGate::OPEN);

        assert!(!s.in_battle());
        assert!(s.character.experience > xp_before);
        assert!(events.iter().any(|e| e.topic() == Topic::ExperienceGained));
        assert!(matches!(
            events.last(),
            Some(GameEvent::CombatEnded {
                outcome: CombatOutcome::Victory,
                ..
            })
        ));
        assert_eq!(s.stats.victories, 1);
    }

    #[test]
    fn gated_progression_withholds_rewards() {
        let mut s = session();
        let monster = weak_monster(&s.content().clone());
        s.start_battle(vec![monster], Some(11)).expect("start");
        let xp_before = s.character.experience;
        let gate = RewardGate {
            progression: false,
            quests: true,
        };

        let mut withheld = None;
        for _ in 0..100 {
            if !s.in_battle() {
                break;
            }
            let reaction = s.dispatch_combat_action(&BattleAction::attack(0), gate);
            withheld = withheld.or(reaction.withheld_rewards);
        }

        assert_eq!(s.character.experience, xp_before);
        assert!(withheld.is_some_and(|r| r.xp > 0));
    }

    #[test]
    fn second_battle_is_refused_while_one_runs() {
        let mut s = session();
        let monster = weak_monster(&s.content().clone());
        s.start_battle(vec![monster.clone()], None).expect("start");
        assert!(matches!(s.start_battle(vec![monster], None), Err(RuntimeError::BattleInProgress)));
        assert!(matches!(session().start_battle(Vec::new(), None), Err(RuntimeError::NoEnemies)));
    }

    #[test]
    fn item_outside_battle_heals_character() {
        let mut s = session();
        s.character.stats.health = 1;
        s.inventory.add("item-debug-log", 1);

        s.on_item_used("item-debug-log", RewardGate::OPEN);

        assert!(s.character.stats.health > 1);
        assert!(!s.inventory.has("item-debug-log"));
    }

    #[test]
    fn rejected_item_in_battle_is_returned() {
        let mut s = session().with_enemy_phase(EnemyPhaseMode::Stepwise);
        let monster = weak_monster(&s.content().clone());
        s.start_battle(vec![monster], Some(3)).expect("start");
        s.dispatch_combat_action(&BattleAction::Defend, RewardGate::OPEN);
        assert!(matches!(
            s.battle.as_ref().map(|b| &b.state.phase),
            Some(BattlePhase::EnemyTurn { .. })
        ));
        s.inventory.add("item-debug-log", 1);

        let reaction = s.on_item_used("item-debug-log", RewardGate::OPEN);

        assert!(reaction.rejection.is_some());
        assert_eq!(s.inventory.count("item-debug-log"), 1);
    }

    #[test]
    fn unseeded_battles_draw_fresh_seeds() {
        let mut s = session();
        let monster = weak_monster(&s.content().clone());
        let rng_before = s.rng;

        s.start_battle(vec![monster.clone()], None).expect("start");
        let first = s.battle.as_ref().map(|b| b.state.rng).expect("battle");
        assert_ne!(s.rng, rng_before);

        s.battle = None;
        s.start_battle(vec![monster], None).expect("restart");
        let second = s.battle.as_ref().map(|b| b.state.rng).expect("battle");

        assert_ne!(first, second);
    }

    #[test]
    fn item_used_while_stunned_is_returned() {
        let mut s = session();
        let monster = weak_monster(&s.content().clone());
        s.start_battle(vec![monster], Some(3)).expect("start");
        if let Some(active) = s.battle.as_mut() {
            active
                .state
                .player
                .status_effects
                .apply(StatusEffect::new(StatusEffectKind::Stun, "Stunned", 0, 1));
        }
        s.inventory.add("item-debug-log", 1);

        let reaction = s.on_item_used("item-debug-log", RewardGate::OPEN);

        assert!(reaction.rejection.is_none());
        assert_eq!(s.inventory.count("item-debug-log"), 1);
        let log = &s.battle.as_ref().expect("battle").state.log;
        assert!(log.iter().any(|e| e.message.ends_with("is stunned and cannot act!")));
    }
}
