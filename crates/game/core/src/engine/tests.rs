use super::*;
use crate::progression::resolve_battle_rewards;
use crate::state::{BugType, CombatEvent, Combatant, LogKind, MonsterRank, StatusEffect, StatusEffectKind};
use crate::{CombatantRef, SpellEffectKind};
use crate::testkit::{TestKit, bug, hero};

fn attacker(id: &str) -> Monster {
    // Memory leaks without their signature spells always use a basic attack.
    bug(id, BugType::MemoryLeak, 200, 4)
}

#[test]
fn battle_opens_on_player_turn_zero() {
    let mut player = hero(100, 10);
    player.cooldowns.insert("spell-ward".into(), 2);
    player
        .status_effects
        .apply(StatusEffect::new(StatusEffectKind::Poison, "old", 3, 3));

    let state = init_battle(player, vec![attacker("a")], 7);

    assert_eq!(state.turn, 0);
    assert_eq!(state.phase, BattlePhase::PlayerTurn);
    assert!(state.player.cooldowns.is_empty());
    assert!(state.player.status_effects.is_empty());
    assert!(state.log.is_empty());
}

#[test]
fn attack_runs_the_enemy_phase_and_closes_the_round() {
    let kit = TestKit::new();
    let state = init_battle(hero(500, 10), vec![attacker("a")], 42);

    let outcome = kit.engine().execute_turn(&state, &BattleAction::attack(0));

    assert!(outcome.is_accepted());
    let next = outcome.state;
    assert_eq!(next.turn, 1);
    assert_eq!(next.phase, BattlePhase::PlayerTurn);
    assert!(next.enemies[0].stats.health < 200);
    assert!(next.player.stats.health < 500);
    assert_eq!(
        next.events.first(),
        Some(&CombatEvent::TurnStarted {
            turn: 0,
            actor: CombatantRef::Player
        })
    );
}

#[test]
fn events_are_cleared_between_turns() {
    let kit = TestKit::new();
    let engine = kit.engine();
    let state = init_battle(hero(500, 10), vec![attacker("a")], 42);

    let first = engine.execute_turn(&state, &BattleAction::Defend).state;
    let second = engine.execute_turn(&first, &BattleAction::Defend).state;

    assert!(second.events.iter().all(|e| match e {
        CombatEvent::TurnStarted { turn, .. } | CombatEvent::TurnEnded { turn, .. } => *turn == 1,
        _ => true,
    }));
}

#[test]
fn terminal_state_is_stable() {
    let kit = TestKit::new();
    let mut state = init_battle(hero(500, 10), vec![attacker("a")], 1);
    state.phase = BattlePhase::Defeat {
        cause: "test".into(),
    };

    let outcome = kit.engine().execute_turn(&state, &BattleAction::attack(0));

    assert_eq!(outcome.state, state);
    assert_eq!(
        outcome.rejection,
        Some(ActionRejection::BattleOver { phase: "defeat" })
    );
}

#[test]
fn insufficient_mana_leaves_state_unchanged() {
    let kit = TestKit::new();
    let mut player = hero(500, 10);
    player.stats.mana = 3;
    let state = init_battle(player, vec![attacker("a")], 1);

    let outcome = kit
        .engine()
        .execute_turn(&state, &BattleAction::cast("spell-strike", Some(0)));

    assert_eq!(outcome.state, state);
    assert!(matches!(
        outcome.rejection,
        Some(ActionRejection::InsufficientMana {
            required: 10,
            available: 3,
            ..
        })
    ));
}

#[test]
fn cooldown_blocks_recast_until_it_runs_down() {
    let kit = TestKit::new();
    let engine = kit.engine();
    let state = init_battle(hero(500, 10), vec![attacker("a")], 3);
    let ward = BattleAction::cast("spell-ward", None);

    let state = engine.execute_turn(&state, &ward).state;
    let blocked = engine.execute_turn(&state, &ward);
    assert_eq!(
        blocked.rejection,
        Some(ActionRejection::OnCooldown {
            spell_id: "spell-ward".into(),
            remaining: 2
        })
    );
    assert!(!engine.available_actions(&state).can_cast("spell-ward"));

    let state = engine.execute_turn(&state, &BattleAction::Defend).state;
    let state = engine.execute_turn(&state, &BattleAction::Defend).state;
    assert!(engine.available_actions(&state).can_cast("spell-ward"));
    assert!(engine.execute_turn(&state, &ward).is_accepted());
}

#[test]
fn unknown_and_unlearned_spells_are_rejected() {
    let kit = TestKit::new();
    let engine = kit.engine();
    let mut player = hero(500, 10);
    player.spells.retain(|s| s != "spell-venom");
    let state = init_battle(player, vec![attacker("a")], 3);

    let unknown = engine.execute_turn(&state, &BattleAction::cast("spell-nope", None));
    assert!(matches!(unknown.rejection, Some(ActionRejection::UnknownSpell { .. })));

    let unlearned = engine.execute_turn(&state, &BattleAction::cast("spell-venom", None));
    assert!(matches!(unlearned.rejection, Some(ActionRejection::SpellNotLearned { .. })));

    let item = engine.execute_turn(&state, &BattleAction::use_item("elixir"));
    assert!(matches!(item.rejection, Some(ActionRejection::UnknownItem { .. })));
}

#[test]
fn killing_the_last_enemy_is_a_victory_with_loot() {
    let kit = TestKit::new();
    let state = init_battle(hero(500, 500), vec![bug("a", BugType::MemoryLeak, 10, 4)], 9);

    let next = kit.engine().execute_turn(&state, &BattleAction::attack(0)).state;

    assert_eq!(
        next.phase,
        BattlePhase::Victory {
            xp_gained: 25,
            loot: vec!["potion".into()]
        }
    );
    assert_eq!(next.turn, 0);
    let rewards = resolve_battle_rewards(&next).expect("victory has rewards");
    assert_eq!(rewards.monsters_defeated, 1);
    assert!(!rewards.boss_defeated);
    assert!(next.log.iter().any(|e| e.message == "Victory! Gained 25 XP"));
}

#[test]
fn enemy_kill_is_a_defeat_naming_the_killer() {
    let kit = TestKit::new();
    let mut boss = bug("a", BugType::NullPointer, 500, 300);
    boss.rank = MonsterRank::Boss;
    let state = init_battle(hero(1, 1), vec![boss], 9);

    let next = kit.engine().execute_turn(&state, &BattleAction::Defend).state;

    assert_eq!(
        next.phase,
        BattlePhase::Defeat {
            cause: "Killed by Bug a".into()
        }
    );
    assert_eq!(next.player.stats.health, 0);
}

#[test]
fn poison_can_kill_the_player_before_acting() {
    let kit = TestKit::new();
    let mut state = init_battle(hero(5, 10), vec![attacker("a")], 9);
    state
        .player
        .status_effects
        .apply(StatusEffect::new(StatusEffectKind::Poison, "venom", 50, 3));

    let next = kit.engine().execute_turn(&state, &BattleAction::attack(0)).state;

    assert_eq!(
        next.phase,
        BattlePhase::Defeat {
            cause: "Killed by status effect".into()
        }
    );
    assert_eq!(next.enemies[0].stats.health, 200);
}

#[test]
fn one_turn_stun_costs_the_enemy_one_turn() {
    let kit = TestKit::new();
    let engine = kit.engine();
    let state = init_battle(hero(500, 10), vec![attacker("a")], 5);

    let stunned = engine
        .execute_turn(&state, &BattleAction::cast("spell-freeze", Some(0)))
        .state;
    assert_eq!(stunned.player.stats.health, 500);
    assert!(stunned.log.iter().any(|e| e.message == "Bug a is stunned and cannot act!"));

    let recovered = engine.execute_turn(&stunned, &BattleAction::Defend).state;
    assert!(recovered.player.stats.health < 500);
}

#[test]
fn stunned_player_forfeits_any_submitted_action() {
    let kit = TestKit::new();
    let engine = kit.engine();
    let mut state = init_battle(hero(500, 10), vec![attacker("a")], 5);
    state
        .player
        .status_effects
        .apply(StatusEffect::new(StatusEffectKind::Stun, "Frozen", 0, 1));

    assert!(engine.available_actions(&state).mask.is_empty());

    let outcome = engine.execute_turn(&state, &BattleAction::attack(0));
    assert!(outcome.is_accepted());
    let next = outcome.state;
    assert_eq!(next.enemies[0].stats.health, 200);
    assert!(next.log.iter().any(|e| e.message.ends_with("is stunned and cannot act!")));
    assert_eq!(next.phase, BattlePhase::PlayerTurn);
    assert!(engine.available_actions(&next).can_attack());
}

#[test]
fn spells_log_typed_entries() {
    let kit = TestKit::new();
    let state = init_battle(hero(500, 10), vec![attacker("a")], 5);

    let next = kit
        .engine()
        .execute_turn(&state, &BattleAction::cast("spell-strike", Some(0)))
        .state;

    assert_eq!(next.player.stats.mana, 90);
    assert!(next.log.iter().any(|e| matches!(
        &e.kind,
        LogKind::SpellCast { spell_id } if spell_id == "spell-strike"
    )));
    assert!(next.events.iter().any(|e| matches!(
        e,
        CombatEvent::SpellResolved { effect: SpellEffectKind::Damage, .. }
    )));
}

#[test]
fn aoe_hits_every_living_enemy() {
    let kit = TestKit::new();
    let state = init_battle(hero(500, 10), vec![attacker("a"), attacker("b")], 5);

    let next = kit
        .engine()
        .execute_turn(&state, &BattleAction::cast("spell-nova", None))
        .state;

    assert!(next.enemies.iter().all(|e| e.stats.health < 200));
}

#[test]
fn heal_spell_adds_regen_over_time() {
    let kit = TestKit::new();
    let mut player = hero(500, 10);
    player.stats.health = 100;
    let state = init_battle(player, vec![attacker("a")], 5);

    let next = kit
        .engine()
        .execute_turn(&state, &BattleAction::cast("spell-mend", None))
        .state;

    let regen = next
        .player
        .status_effects
        .get(StatusEffectKind::Regen)
        .expect("heal over time applied");
    assert_eq!(regen.name, "MEND HoT");
    assert_eq!(regen.magnitude, 10);
}

#[test]
fn potion_heals_inside_battle() {
    let kit = TestKit::new();
    let mut player = hero(500, 10);
    player.stats.health = 50;
    let mut dummy = attacker("a");
    dummy.stats.attack = 0;
    let state = init_battle(player, vec![dummy], 5);

    let next = kit
        .engine()
        .execute_turn(&state, &BattleAction::use_item("potion"))
        .state;

    assert!(next.events.contains(&CombatEvent::ItemUsed {
        item_id: "potion".into()
    }));
    assert!(next.events.contains(&CombatEvent::Healed {
        target: CombatantRef::Player,
        amount: 30
    }));
}

#[test]
fn dead_target_falls_back_to_first_living_enemy() {
    let kit = TestKit::new();
    let mut state = init_battle(hero(500, 10), vec![attacker("a"), attacker("b")], 5);
    state.enemies[0].stats.health = 0;

    let next = kit.engine().execute_turn(&state, &BattleAction::attack(0)).state;

    assert_eq!(next.enemies[0].stats.health, 0);
    assert!(next.enemies[1].stats.health < 200);
}

#[test]
fn stepwise_mode_waits_for_each_enemy() {
    let kit = TestKit::new();
    let engine = kit.engine().with_enemy_phase(EnemyPhaseMode::Stepwise);
    let state = init_battle(hero(500, 10), vec![attacker("a"), attacker("b")], 5);

    let state = engine.execute_turn(&state, &BattleAction::Defend).state;
    assert_eq!(state.phase, BattlePhase::EnemyTurn { index: 0 });

    let wrong = engine.execute_turn(&state, &BattleAction::EnemyAct { enemy_index: 1 });
    assert_eq!(
        wrong.rejection,
        Some(ActionRejection::WrongEnemy {
            expected: 0,
            requested: 1
        })
    );
    let early = engine.execute_turn(&state, &BattleAction::attack(0));
    assert!(matches!(early.rejection, Some(ActionRejection::WrongPhase { .. })));

    let state = engine
        .execute_turn(&state, &BattleAction::EnemyAct { enemy_index: 0 })
        .state;
    assert_eq!(state.phase, BattlePhase::EnemyTurn { index: 1 });

    let state = engine
        .execute_turn(&state, &BattleAction::EnemyAct { enemy_index: 1 })
        .state;
    assert_eq!(state.phase, BattlePhase::PlayerTurn);
    assert_eq!(state.turn, 1);
}

#[test]
fn enemy_step_is_rejected_in_auto_mode() {
    let kit = TestKit::new();
    let state = init_battle(hero(500, 10), vec![attacker("a")], 5);

    let outcome = kit
        .engine()
        .execute_turn(&state, &BattleAction::EnemyAct { enemy_index: 0 });

    assert!(matches!(
        outcome.rejection,
        Some(ActionRejection::WrongPhase {
            action: "ENEMY_ACT",
            ..
        })
    ));
}

#[test]
fn replay_is_deterministic() {
    let kit = TestKit::new();
    let engine = kit.engine();
    let actions: Vec<_> = (0..30)
        .map(|i| match i % 4 {
            0 => BattleAction::cast("spell-venom", Some(0)),
            1 => BattleAction::Defend,
            _ => BattleAction::attack(0),
        })
        .collect();
    let run = || {
        engine.replay(
            hero(300, 12),
            vec![bug("a", BugType::OffByOne, 150, 9), bug("b", BugType::RaceCondition, 120, 8)],
            2024,
            &actions,
        )
    };

    let (a, b) = (run(), run());
    assert_eq!(a, b);
    assert_eq!(a.log.len(), b.log.len());
}

#[test]
fn health_never_exceeds_bounds_over_a_long_battle() {
    let kit = TestKit::new();
    let engine = kit.engine();
    let mut state = init_battle(hero(400, 8), vec![bug("a", BugType::NullPointer, 300, 10)], 77);
    for _ in 0..60 {
        if state.is_over() {
            break;
        }
        state = engine.execute_turn(&state, &BattleAction::attack(0)).state;
        assert!(state.player.stats.health <= state.player.stats.max_health);
        assert!(state.enemies.iter().all(|e| e.stats.health <= e.stats.max_health));
        if !state.player.is_alive() {
            assert!(matches!(state.phase, BattlePhase::Defeat { .. }));
        }
    }
}

#[cfg(feature = "serde")]
#[test]
fn digest_tracks_state_identity() {
    let kit = TestKit::new();
    let engine = kit.engine();
    let actions = vec![BattleAction::attack(0); 5];
    let a = engine.replay(hero(300, 12), vec![attacker("a")], 11, &actions);
    let b = engine.replay(hero(300, 12), vec![attacker("a")], 11, &actions);
    let c = engine.replay(hero(300, 12), vec![attacker("a")], 12, &actions);

    let da = state_digest(&a).expect("digest");
    assert_eq!(da, state_digest(&b).expect("digest"));
    assert_ne!(da, state_digest(&c).expect("digest"));
    assert_eq!(da.to_string(), hex::encode(da.as_bytes()));
}
