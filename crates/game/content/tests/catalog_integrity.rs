use game_content::{ContentBundle, create_character, create_monster, generate_boss};
use game_core::{
    BattleAction, BattleEngine, BugType, CharacterClass, ClassOracle, ItemOracle, RngState, SpellOracle,
};
use strum::IntoEnumIterator;

#[test]
fn every_class_spell_is_in_the_catalogue() {
    let content = ContentBundle::builtin();
    for class in CharacterClass::iter() {
        for spell in content.classes.spells_at_level(class, 30) {
            assert!(content.spells.spell(&spell).is_some(), "{class}: missing {spell}");
        }
    }
}

#[test]
fn every_monster_spell_and_drop_resolves() {
    let content = ContentBundle::builtin();
    let mut rng = RngState::from_seed(7);
    for bug_type in BugType::iter() {
        for severity in 1..=5 {
            let (monster, next) = create_monster(bug_type, severity, 3, rng, &content.balance);
            rng = next;
            for spell in &monster.spells {
                assert!(content.spells.spell(spell).is_some(), "{bug_type}: missing {spell}");
            }
            for entry in &monster.loot_table {
                assert!(content.items.item(&entry.item_id).is_some(), "missing {}", entry.item_id);
            }
        }
    }
}

#[test]
fn level_thirty_characters_know_ten_spells() {
    let content = ContentBundle::builtin();
    for class in CharacterClass::iter() {
        let hero = create_character(class, "Ada", 30, &content.classes, &content.balance);
        assert_eq!(hero.spells.len(), 10);
        assert_eq!(hero.stats.health, hero.stats.max_health);
    }
}

#[test]
fn full_content_battle_replays_identically() {
    let content = ContentBundle::builtin();
    let engine = BattleEngine::new(content.env());
    let hero = create_character(CharacterClass::Dps, "Ada", 10, &content.classes, &content.balance);
    let (boss, _) = generate_boss("rust", 40, RngState::from_seed(11), &content.balance);

    let actions: Vec<BattleAction> = (0..30)
        .map(|i| match i % 3 {
            0 => BattleAction::CastSpell {
                spell_id: "spell-sql-injection".into(),
                target_index: Some(0),
            },
            1 => BattleAction::Attack { target_index: 0 },
            _ => BattleAction::Defend,
        })
        .collect();

    let a = engine.replay(hero.clone(), vec![boss.clone()], 2024, &actions);
    let b = engine.replay(hero, vec![boss], 2024, &actions);
    assert_eq!(a, b);
    assert!(a.turn > 0);
}
