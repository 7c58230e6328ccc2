use crate::state::{Combatant, StatusEffect, StatusEffectKind};

/// Resolves item ids to their definitions.
pub trait ItemOracle: Send + Sync {
    fn item(&self, id: &str) -> Option<&ItemDefinition>;

    fn item_ids(&self) -> Vec<&str>;
}

/// Static description of a consumable.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub effect: ItemEffect,
}

/// Consumable effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ItemEffect {
    /// Restore health.
    HealHp(u32),

    /// Restore mana.
    HealMana(u32),

    /// Temporary attack bonus.
    BuffAttack { amount: u32, duration: u32 },

    /// Temporary defense bonus.
    BuffDefense { amount: u32, duration: u32 },

    /// Remove harmful status effects.
    Cleanse,
}

/// What consuming an item changed on its target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemOutcome {
    pub healed: u32,
    pub mana_restored: u32,
    /// Status effect granted, as merged into the target.
    pub applied: Option<StatusEffect>,
    pub cleansed: Vec<StatusEffect>,
}

impl ItemEffect {
    /// Applies the effect to a combatant, inside or outside a battle.
    pub fn apply_to(&self, target: &mut dyn Combatant, item_name: &str) -> ItemOutcome {
        let mut outcome = ItemOutcome::default();
        match *self {
            Self::HealHp(amount) => outcome.healed = target.stats_mut().heal(amount),
            Self::HealMana(amount) => outcome.mana_restored = target.stats_mut().restore_mana(amount),
            Self::BuffAttack { amount, duration } => {
                outcome.applied = Some(grant(target, StatusEffectKind::AttackUp, item_name, amount, duration));
            }
            Self::BuffDefense { amount, duration } => {
                outcome.applied = Some(grant(target, StatusEffectKind::DefenseUp, item_name, amount, duration));
            }
            Self::Cleanse => outcome.cleansed = target.status_effects_mut().cleanse(),
        }
        outcome
    }
}

fn grant(target: &mut dyn Combatant, kind: StatusEffectKind, name: &str, amount: u32, duration: u32) -> StatusEffect {
    let effect = StatusEffect::new(kind, name, amount, duration);
    let effects = target.status_effects_mut();
    effects.apply(effect.clone());
    effects.get(kind).cloned().unwrap_or(effect)
}
