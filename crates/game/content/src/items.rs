//! Built-in item catalogue.

use std::collections::BTreeMap;

use game_core::{ItemDefinition, ItemEffect, ItemOracle};

/// Consumables keyed by id.
#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
    items: BTreeMap<String, ItemDefinition>,
}

impl ItemCatalog {
    pub fn from_definitions(definitions: impl IntoIterator<Item = ItemDefinition>) -> Self {
        Self {
            items: definitions.into_iter().map(|i| (i.id.clone(), i)).collect(),
        }
    }

    pub fn builtin() -> Self {
        Self::from_definitions(builtin_items())
    }

    pub fn insert(&mut self, item: ItemDefinition) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }
}

impl ItemOracle for ItemCatalog {
    fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    fn item_ids(&self) -> Vec<&str> {
        self.items.keys().map(String::as_str).collect()
    }
}

fn item(id: &str, name: &str, description: &str, effect: ItemEffect) -> ItemDefinition {
    ItemDefinition {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        effect,
    }
}

fn builtin_items() -> Vec<ItemDefinition> {
    use ItemEffect::*;
    vec![
        item("item-debug-log", "Debug Log", "A fragment of console output. Restores a small amount of HP.", HealHp(20)),
        item("item-stack-trace", "Stack Trace", "A detailed error trace. Restores mana to dig deeper.", HealMana(25)),
        item("item-core-dump", "Core Dump", "A memory snapshot at crash time. Significant HP restoration.", HealHp(50)),
        item("item-memory-snapshot", "Memory Snapshot", "Complete heap state. Restores both HP and mana.", HealHp(35)),
        item(
            "item-root-cause",
            "Root Cause Analysis",
            "The actual source of the bug. Temporarily boosts attack power.",
            BuffAttack { amount: 5, duration: 5 },
        ),
        item(
            "item-caffeine",
            "Caffeine Boost",
            "A strong coffee. Temporarily increases all stats.",
            BuffAttack { amount: 3, duration: 3 },
        ),
        item("item-rubber-duck", "Rubber Duck", "Explain the problem to the duck. Removes all debuffs.", Cleanse),
        item("item-energy-drink", "Energy Drink", "Maximum caffeine. Restores a large amount of mana.", HealMana(50)),
        item(
            "item-code-review",
            "Code Review",
            "Peer review strengthens your defenses temporarily.",
            BuffDefense { amount: 5, duration: 3 },
        ),
        item(
            "item-pair-programming",
            "Pair Programming Session",
            "Two minds are better than one. Full HP and mana restore.",
            HealHp(100),
        ),
    ]
}
