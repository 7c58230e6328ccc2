use game_content::{ContentBundle, create_character, create_monster};
use game_core::{BattleEngine, BugType, CharacterClass, RngState};
use simulation::{
    BattleResult, CSV_HEADER, Harness, Matchup, SimConfig, Strategy, format_csv, simulate_battle,
};
use strum::IntoEnumIterator;

fn config(trials: u32) -> SimConfig {
    SimConfig::default().with_trials(trials).with_base_seed(4242)
}

#[test]
fn veteran_dps_beats_a_minor_off_by_one() {
    let content = ContentBundle::builtin();
    let harness = Harness::new(&content, config(100)).unwrap();
    let result = harness
        .simulate_matchup(Matchup::new(CharacterClass::Dps, 30, BugType::OffByOne, 1, 0))
        .unwrap();
    assert!(result.win_rate > 0.7, "win rate {}", result.win_rate);
}

#[test]
fn outcome_counts_cover_every_trial() {
    let content = ContentBundle::builtin();
    let harness = Harness::new(&content, config(25)).unwrap();
    for class in CharacterClass::iter() {
        let result = harness
            .simulate_matchup(Matchup::new(class, 3, BugType::MemoryLeak, 3, 2))
            .unwrap();
        assert_eq!(result.victories + result.defeats + result.draws, 25);
        assert!((0.0..=1.0).contains(&result.win_rate));
    }
}

#[test]
fn matchups_are_reproducible() {
    let content = ContentBundle::builtin();
    let harness = Harness::new(&content, config(20)).unwrap();
    let matchup = Matchup::new(CharacterClass::Healer, 5, BugType::RaceCondition, 2, 1);
    assert_eq!(harness.simulate_matchup(matchup), harness.simulate_matchup(matchup));
}

#[test]
fn tiny_turn_cap_produces_draws() {
    let content = ContentBundle::builtin();
    let engine = BattleEngine::new(content.env());
    let hero = create_character(CharacterClass::Tank, "Wall", 1, &content.classes, &content.balance);
    let (bug, _) = create_monster(BugType::MemoryLeak, 5, 10, RngState::from_seed(1), &content.balance);

    let outcome = simulate_battle(&engine, hero, bug, 1, 1, Strategy::AttackOnly);
    assert_eq!(outcome.result, BattleResult::Draw);
    assert!(outcome.monster_hp_remaining > 0);
}

#[test]
fn full_suite_covers_every_pairing() {
    let content = ContentBundle::builtin();
    let harness = Harness::new(&content, config(5)).unwrap();
    let report = harness.run_full_simulation(5, 2, 0).unwrap();

    assert_eq!(report.matchups.len(), 12);
    assert_eq!(report.total_trials, 60);
    assert!(report.flagged.iter().all(|m| !m.is_balanced()));

    let csv = format_csv(&report.matchups);
    assert_eq!(csv.lines().next(), Some(CSV_HEADER));
    assert_eq!(csv.lines().count(), 13);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["matchups"][0]["class"], "tank");
    assert!(json["matchups"][0]["winRate"].is_number());
}

#[test]
fn progression_sweep_is_level_major() {
    let content = ContentBundle::builtin();
    let harness = Harness::new(&content, config(3)).unwrap();
    let results = harness
        .run_progression_simulation(CharacterClass::Dps, BugType::NullPointer, &[1, 10], &[1, 5])
        .unwrap();
    let grid: Vec<_> = results.iter().map(|r| (r.matchup.level, r.matchup.severity)).collect();
    assert_eq!(grid, vec![(1, 1), (1, 5), (10, 1), (10, 5)]);
}
