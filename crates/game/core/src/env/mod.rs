//! Traits describing read-only game data.
//!
//! Oracles expose spell, item and class tables. The [`GameEnv`] aggregate
//! bundles them with the [`BalanceConfig`] so the engine can access
//! everything it needs without hard coupling to concrete catalogues.
mod classes;
mod items;
mod rng;
mod spells;

pub use classes::ClassOracle;
pub use items::{ItemDefinition, ItemEffect, ItemOracle, ItemOutcome};
pub use rng::{RngState, SeededRandom};
pub use spells::{SpellDefinition, SpellEffect, SpellEffectKind, SpellOracle};

use crate::config::BalanceConfig;

/// Aggregates read-only oracles required by the reducer and progression.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    pub spells: &'a dyn SpellOracle,
    pub items: &'a dyn ItemOracle,
    pub classes: &'a dyn ClassOracle,
    pub balance: &'a BalanceConfig,
}

impl<'a> GameEnv<'a> {
    pub fn new(
        spells: &'a dyn SpellOracle,
        items: &'a dyn ItemOracle,
        classes: &'a dyn ClassOracle,
        balance: &'a BalanceConfig,
    ) -> Self {
        Self {
            spells,
            items,
            classes,
            balance,
        }
    }

    pub fn spell(&self, id: &str) -> Option<&'a SpellDefinition> {
        self.spells.spell(id)
    }

    pub fn item(&self, id: &str) -> Option<&'a ItemDefinition> {
        self.items.item(id)
    }
}

impl core::fmt::Debug for GameEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameEnv")
            .field("balance", self.balance)
            .finish_non_exhaustive()
    }
}
