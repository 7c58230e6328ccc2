//! Built-in game content and the loaders that extend it.
//!
//! This crate houses the static tables the engine resolves ids against:
//! - Spell catalogue (player class lines and monster spells)
//! - Item catalogue (consumables)
//! - Class progression tables and the character factory
//! - Monster templates and the monster, boss and miniboss factories
//!
//! With the `loaders` feature, balance overrides (TOML) and catalogue
//! files (RON) can be layered over the built-ins. Content is consumed
//! through the `game-core` oracle traits and never appears in battle state.

pub mod bundle;
pub mod classes;
pub mod items;
pub mod monsters;
pub mod spells;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use bundle::ContentBundle;
pub use classes::{ClassCatalog, ClassProgression, create_character};
pub use items::ItemCatalog;
pub use monsters::{
    MonsterTemplate, bug_type_for_language, create_monster, generate_boss, generate_bug_monster,
    generate_miniboss, loot_table,
};
pub use spells::{SpellCatalog, SpellModifier, SpellShape, SpellSymbol, generate_spell};

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ConfigLoader, ContentFactory};
