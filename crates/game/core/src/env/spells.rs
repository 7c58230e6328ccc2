use strum::{AsRefStr, Display, EnumString};

use crate::state::Element;

/// Resolves spell ids to their definitions.
pub trait SpellOracle: Send + Sync {
    fn spell(&self, id: &str) -> Option<&SpellDefinition>;

    /// Every known spell id, in catalogue order.
    fn spell_ids(&self) -> Vec<&str>;
}

/// Static description of a spell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SpellDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub mana_cost: u32,
    /// Turns before the spell can be cast again.
    pub cooldown: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Element,
    pub effect: SpellEffect,
}

/// What a spell does when it resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellEffect {
    pub kind: SpellEffectKind,
    /// Power, heal amount, shield base or modifier size depending on `kind`.
    pub value: u32,
    /// Turns for timed effects; each kind has its own default.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Option<u32>,
}

impl SpellEffect {
    pub const fn new(kind: SpellEffectKind, value: u32) -> Self {
        Self {
            kind,
            value,
            duration: None,
        }
    }

    pub const fn lasting(kind: SpellEffectKind, value: u32, duration: u32) -> Self {
        Self {
            kind,
            value,
            duration: Some(duration),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SpellEffectKind {
    /// Damages one enemy.
    Damage,
    /// Damages every living enemy.
    AoeDamage,
    /// Heals the caster; with a duration above 1 also grants regen.
    Heal,
    /// Grants the caster a damage-absorbing shield.
    Shield,
    /// Raises the caster's attack.
    Buff,
    /// Stuns the target when `value` is 0, lowers its defense otherwise.
    Debuff,
    /// Poisons the target.
    Dot,
    /// Removes harmful effects from the caster.
    Cleanse,
    /// Restores a flat amount of health to the caster.
    Revive,
    /// Draws attention; no mechanical effect.
    Taunt,
}
