//! Owned content set handed to engines and sessions.

use game_core::{BalanceConfig, GameEnv};

use crate::{ClassCatalog, ItemCatalog, SpellCatalog};

/// Every catalogue plus the balance config, owned in one place.
///
/// Borrow it as a [`GameEnv`] to drive the engine.
#[derive(Clone, Debug, Default)]
pub struct ContentBundle {
    pub spells: SpellCatalog,
    pub items: ItemCatalog,
    pub classes: ClassCatalog,
    pub balance: BalanceConfig,
}

impl ContentBundle {
    /// Built-in catalogues with the default balance.
    pub fn builtin() -> Self {
        Self::with_balance(BalanceConfig::default())
    }

    /// Built-in catalogues with a custom balance.
    pub fn with_balance(balance: BalanceConfig) -> Self {
        Self {
            spells: SpellCatalog::builtin(),
            items: ItemCatalog::builtin(),
            classes: ClassCatalog::builtin(),
            balance,
        }
    }

    pub fn env(&self) -> GameEnv<'_> {
        GameEnv::new(&self.spells, &self.items, &self.classes, &self.balance)
    }
}
