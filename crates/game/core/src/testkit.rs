//! Small in-memory catalogue and combatant builders for unit tests.

use crate::config::BalanceConfig;
use crate::engine::BattleEngine;
use crate::env::{
    ClassOracle, GameEnv, ItemDefinition, ItemEffect, ItemOracle, SpellDefinition, SpellEffect,
    SpellEffectKind, SpellOracle,
};
use crate::state::{
    BugType, Character, CharacterClass, Element, LootEntry, Monster, MonsterRank, Stats,
    StatusEffects,
};

pub struct TestKit {
    spells: Vec<SpellDefinition>,
    items: Vec<ItemDefinition>,
    starters: Vec<String>,
    pub config: BalanceConfig,
}

fn spell(id: &str, mana_cost: u32, cooldown: u32, element: Element, effect: SpellEffect) -> SpellDefinition {
    SpellDefinition {
        id: id.into(),
        name: id.trim_start_matches("spell-").to_uppercase(),
        description: String::new(),
        mana_cost,
        cooldown,
        element,
        effect,
    }
}

fn item(id: &str, effect: ItemEffect) -> ItemDefinition {
    ItemDefinition {
        id: id.into(),
        name: id.into(),
        description: String::new(),
        effect,
    }
}

impl TestKit {
    pub fn new() -> Self {
        use SpellEffectKind::*;
        let spells = vec![
            spell("spell-strike", 10, 0, Element::Fire, SpellEffect::new(Damage, 20)),
            spell("spell-nova", 15, 2, Element::None, SpellEffect::new(AoeDamage, 10)),
            spell("spell-mend", 10, 0, Element::None, SpellEffect::lasting(Heal, 20, 3)),
            spell("spell-ward", 10, 3, Element::None, SpellEffect::new(Shield, 15)),
            spell("spell-rage", 5, 3, Element::None, SpellEffect::new(Buff, 5)),
            spell("spell-freeze", 10, 2, Element::None, SpellEffect::lasting(Debuff, 0, 1)),
            spell("spell-venom", 8, 0, Element::None, SpellEffect::new(Dot, 4)),
            spell("spell-purge", 5, 0, Element::None, SpellEffect::new(Cleanse, 0)),
            spell("spell-heap-growth", 0, 0, Element::Earth, SpellEffect::new(Buff, 3)),
            spell("spell-segfault", 0, 0, Element::Fire, SpellEffect::new(Damage, 15)),
        ];
        let items = vec![
            item("potion", ItemEffect::HealHp(30)),
            item("ether", ItemEffect::HealMana(20)),
            item("antidote", ItemEffect::Cleanse),
        ];
        Self {
            starters: ["spell-strike", "spell-mend", "spell-ward", "spell-freeze"]
                .map(String::from)
                .to_vec(),
            spells,
            items,
            config: BalanceConfig::default(),
        }
    }

    pub fn env(&self) -> GameEnv<'_> {
        GameEnv::new(self, self, self, &self.config)
    }

    pub fn engine(&self) -> BattleEngine<'_> {
        BattleEngine::new(self.env())
    }
}

impl SpellOracle for TestKit {
    fn spell(&self, id: &str) -> Option<&SpellDefinition> {
        self.spells.iter().find(|s| s.id == id)
    }

    fn spell_ids(&self) -> Vec<&str> {
        self.spells.iter().map(|s| s.id.as_str()).collect()
    }
}

impl ItemOracle for TestKit {
    fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.iter().find(|i| i.id == id)
    }

    fn item_ids(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.id.as_str()).collect()
    }
}

impl ClassOracle for TestKit {
    fn starter_spells(&self, _class: CharacterClass) -> &[String] {
        &self.starters
    }

    fn unlock_at(&self, _class: CharacterClass, level: u32) -> Option<&str> {
        (level == 5).then_some("spell-nova")
    }
}

pub fn hero(health: u32, attack: u32) -> Character {
    Character {
        id: "char-1".into(),
        name: "Hero".into(),
        class: CharacterClass::Dps,
        level: 1,
        experience: 50,
        stats: Stats {
            health,
            max_health: health,
            mana: 100,
            max_mana: 100,
            attack,
            defense: 5,
            speed: 7,
        },
        spells: [
            "spell-strike",
            "spell-nova",
            "spell-mend",
            "spell-ward",
            "spell-rage",
            "spell-freeze",
            "spell-venom",
            "spell-purge",
        ]
        .map(String::from)
        .to_vec(),
        status_effects: StatusEffects::empty(),
        cooldowns: Default::default(),
    }
}

pub fn bug(id: &str, bug_type: BugType, health: u32, attack: u32) -> Monster {
    Monster {
        id: id.into(),
        name: format!("Bug {id}"),
        bug_type,
        rank: MonsterRank::Regular,
        severity: 1,
        complexity: 0,
        element: Element::None,
        stats: Stats {
            health,
            max_health: health,
            mana: 0,
            max_mana: 0,
            attack,
            defense: 2,
            speed: 4,
        },
        spells: vec!["spell-segfault".into()],
        status_effects: StatusEffects::empty(),
        cooldowns: Default::default(),
        xp_reward: 25,
        loot_table: vec![LootEntry::new("potion", 1.0)],
    }
}
