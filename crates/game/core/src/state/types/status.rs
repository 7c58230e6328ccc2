//! Timed status effects and the rules that apply, tick and expire them.
//!
//! A combatant carries at most one effect per [`StatusEffectKind`].
//! Re-applying a kind that is already present never sums magnitudes:
//!
//! | Kind | Magnitude | Remaining turns |
//! |------|-----------|-----------------|
//! | poison, regen, shield | higher of the two | incoming (refresh) |
//! | stun | n/a | longer of the two |
//! | attack/defense up/down | higher of the two | longer of the two |

use arrayvec::ArrayVec;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::config::BalanceConfig;

/// Active status effects on a combatant, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { BalanceConfig::MAX_STATUS_EFFECTS }>,
}

/// A single timed effect.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    /// Display name, e.g. "Defend" or "Patch HoT".
    pub name: String,
    /// Damage/heal per tick, shield pool, or stat modifier size.
    pub magnitude: u32,
    pub remaining_turns: u32,
}

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StatusEffectKind {
    // ========================================================================
    // Over time (resolved on tick)
    // ========================================================================
    /// Loses `magnitude` health each tick.
    Poison,

    /// Recovers `magnitude` health each tick.
    Regen,

    // ========================================================================
    // Defensive
    // ========================================================================
    /// Absorbs up to `magnitude` incoming damage.
    Shield,

    // ========================================================================
    // Crowd control
    // ========================================================================
    /// Forfeits the turn.
    Stun,

    // ========================================================================
    // Stat modifiers
    // ========================================================================
    AttackUp,
    AttackDown,
    DefenseUp,
    DefenseDown,
}

/// How a re-application merges with an existing effect of the same kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackingRule {
    /// Keep the higher magnitude, take the incoming duration.
    RefreshDuration,
    /// Keep the higher magnitude and the longer duration.
    KeepStronger,
}

impl StatusEffectKind {
    pub const fn stacking_rule(self) -> StackingRule {
        match self {
            Self::Poison | Self::Regen | Self::Shield => StackingRule::RefreshDuration,
            Self::Stun | Self::AttackUp | Self::AttackDown | Self::DefenseUp | Self::DefenseDown => {
                StackingRule::KeepStronger
            }
        }
    }

    /// Effects removed by a cleanse.
    pub const fn is_harmful(self) -> bool {
        matches!(
            self,
            Self::Poison | Self::Stun | Self::AttackDown | Self::DefenseDown
        )
    }
}

impl StatusEffect {
    pub fn new(kind: StatusEffectKind, name: impl Into<String>, magnitude: u32, remaining_turns: u32) -> Self {
        Self {
            kind,
            name: name.into(),
            magnitude,
            remaining_turns,
        }
    }

    /// Runs incoming damage through this effect when it is a shield.
    ///
    /// Returns the damage that passes through and the shield left over,
    /// `None` once the pool is used up. Non-shield effects let everything
    /// through and are returned unchanged.
    pub fn absorb(self, incoming: u32) -> (u32, Option<StatusEffect>) {
        if self.kind != StatusEffectKind::Shield {
            return (incoming, Some(self));
        }
        if self.magnitude > incoming {
            let remaining_pool = self.magnitude - incoming;
            return (
                0,
                Some(StatusEffect {
                    magnitude: remaining_pool,
                    ..self
                }),
            );
        }
        (incoming - self.magnitude, None)
    }
}

/// Result of [`StatusEffects::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The kind was not present.
    Added,
    /// Merged into the existing effect of that kind.
    Merged,
    /// No room left. Cannot happen while there is one slot per kind.
    Dropped,
}

/// An instant effect resolved during a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickEffect {
    Poison { name: String, amount: u32 },
    Regen { name: String, amount: u32 },
    Stunned,
}

/// Everything a tick did to one combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Net health change requested by poison/regen, before clamping.
    pub health_delta: i64,
    /// Instant effects in resolution order.
    pub resolved: Vec<TickEffect>,
    /// Effects whose counter reached zero and were removed.
    pub expired: Vec<StatusEffect>,
}

/// Result of running damage through the shields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Absorption {
    /// Damage left after shields.
    pub remaining: u32,
    /// Damage the shields soaked.
    pub absorbed: u32,
    /// Shields used up by this hit.
    pub depleted: Vec<StatusEffect>,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn get(&self, kind: StatusEffectKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.get(kind).is_some_and(|e| e.remaining_turns > 0)
    }

    pub fn is_stunned(&self) -> bool {
        self.has(StatusEffectKind::Stun)
    }

    /// Applies an effect following the non-stacking rules of its kind.
    pub fn apply(&mut self, incoming: StatusEffect) -> ApplyOutcome {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == incoming.kind) {
            existing.magnitude = existing.magnitude.max(incoming.magnitude);
            existing.remaining_turns = match incoming.kind.stacking_rule() {
                StackingRule::RefreshDuration => incoming.remaining_turns,
                StackingRule::KeepStronger => existing.remaining_turns.max(incoming.remaining_turns),
            };
            existing.name = incoming.name;
            return ApplyOutcome::Merged;
        }

        match self.effects.try_push(incoming) {
            Ok(()) => ApplyOutcome::Added,
            Err(_) => ApplyOutcome::Dropped,
        }
    }

    /// Removes the effect of the given kind, returning it.
    pub fn remove(&mut self, kind: StatusEffectKind) -> Option<StatusEffect> {
        let index = self.effects.iter().position(|e| e.kind == kind)?;
        Some(self.effects.remove(index))
    }

    /// Resolves one turn boundary.
    ///
    /// Poison and regen resolve first, in application order, then every
    /// counter decrements and effects that reach zero are removed.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        for effect in &self.effects {
            match effect.kind {
                StatusEffectKind::Poison => {
                    report.health_delta -= i64::from(effect.magnitude);
                    report.resolved.push(TickEffect::Poison {
                        name: effect.name.clone(),
                        amount: effect.magnitude,
                    });
                }
                StatusEffectKind::Regen => {
                    report.health_delta += i64::from(effect.magnitude);
                    report.resolved.push(TickEffect::Regen {
                        name: effect.name.clone(),
                        amount: effect.magnitude,
                    });
                }
                StatusEffectKind::Stun if effect.remaining_turns > 0 => {
                    report.resolved.push(TickEffect::Stunned);
                }
                _ => {}
            }
        }

        let mut kept = ArrayVec::new();
        for mut effect in self.effects.drain(..) {
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
            if effect.remaining_turns == 0 {
                report.expired.push(effect);
            } else {
                kept.push(effect);
            }
        }
        self.effects = kept;

        report
    }

    /// Runs incoming damage through active shields in application order.
    pub fn absorb_damage(&mut self, incoming: u32) -> Absorption {
        let mut remaining = incoming;
        let mut depleted = Vec::new();
        let mut kept = ArrayVec::new();

        for effect in self.effects.drain(..) {
            if effect.kind != StatusEffectKind::Shield || remaining == 0 {
                kept.push(effect);
                continue;
            }
            let (through, left) = effect.clone().absorb(remaining);
            remaining = through;
            match left {
                Some(shield) => kept.push(shield),
                None => depleted.push(effect),
            }
        }
        self.effects = kept;

        Absorption {
            remaining,
            absorbed: incoming - remaining,
            depleted,
        }
    }

    /// Removes every harmful effect, returning what was removed.
    pub fn cleanse(&mut self) -> Vec<StatusEffect> {
        let mut removed = Vec::new();
        self.effects.retain(|e| {
            if e.kind.is_harmful() {
                removed.push(e.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Net attack modifier from attack-up/down effects.
    pub fn attack_modifier(&self) -> i64 {
        self.modifier(StatusEffectKind::AttackUp, StatusEffectKind::AttackDown)
    }

    /// Net defense modifier from defense-up/down effects.
    pub fn defense_modifier(&self) -> i64 {
        self.modifier(StatusEffectKind::DefenseUp, StatusEffectKind::DefenseDown)
    }

    fn modifier(&self, up: StatusEffectKind, down: StatusEffectKind) -> i64 {
        self.effects.iter().fold(0, |acc, e| {
            if e.kind == up {
                acc + i64::from(e.magnitude)
            } else if e.kind == down {
                acc - i64::from(e.magnitude)
            } else {
                acc
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(kind: StatusEffectKind, magnitude: u32, turns: u32) -> StatusEffect {
        StatusEffect::new(kind, kind.to_string(), magnitude, turns)
    }

    #[test]
    fn poison_reapplication_refreshes_instead_of_summing() {
        let mut effects = StatusEffects::empty();
        effects.apply(effect(StatusEffectKind::Poison, 3, 2));
        assert_eq!(effects.apply(effect(StatusEffectKind::Poison, 3, 5)), ApplyOutcome::Merged);

        let poison = effects.get(StatusEffectKind::Poison).cloned();
        assert_eq!(poison.map(|p| (p.magnitude, p.remaining_turns)), Some((3, 5)));
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn defense_up_twice_stays_at_single_magnitude() {
        let mut effects = StatusEffects::empty();
        effects.apply(effect(StatusEffectKind::DefenseUp, 5, 1));
        effects.apply(effect(StatusEffectKind::DefenseUp, 5, 1));
        assert_eq!(effects.defense_modifier(), 5);
    }

    #[test]
    fn stat_modifier_keeps_stronger_and_longer() {
        let mut effects = StatusEffects::empty();
        effects.apply(effect(StatusEffectKind::AttackUp, 8, 1));
        effects.apply(effect(StatusEffectKind::AttackUp, 3, 4));
        let up = effects.get(StatusEffectKind::AttackUp).cloned();
        assert_eq!(up.map(|e| (e.magnitude, e.remaining_turns)), Some((8, 4)));
    }

    #[test]
    fn shield_of_twenty_passes_fifteen_of_thirty_five() {
        let mut effects = StatusEffects::empty();
        effects.apply(effect(StatusEffectKind::Shield, 20, 3));
        let absorption = effects.absorb_damage(35);
        assert_eq!(absorption.remaining, 15);
        assert_eq!(absorption.absorbed, 20);
        assert_eq!(absorption.depleted.len(), 1);
        assert!(!effects.has(StatusEffectKind::Shield));
    }

    #[test]
    fn shield_larger_than_hit_is_reduced() {
        let shield = effect(StatusEffectKind::Shield, 20, 3);
        let (through, left) = shield.absorb(8);
        assert_eq!(through, 0);
        assert_eq!(left.map(|s| s.magnitude), Some(12));
    }

    #[test]
    fn tick_resolves_then_decrements_then_expires() {
        let mut effects = StatusEffects::empty();
        effects.apply(effect(StatusEffectKind::Poison, 4, 1));
        effects.apply(effect(StatusEffectKind::Regen, 6, 2));

        let report = effects.tick();
        assert_eq!(report.health_delta, 2);
        assert_eq!(report.resolved.len(), 2);
        assert_eq!(report.expired.len(), 1);
        assert_eq!(report.expired[0].kind, StatusEffectKind::Poison);
        assert!(effects.has(StatusEffectKind::Regen));
    }

    #[test]
    fn cleanse_removes_only_harmful_effects() {
        let mut effects = StatusEffects::empty();
        effects.apply(effect(StatusEffectKind::Poison, 4, 3));
        effects.apply(effect(StatusEffectKind::Stun, 0, 1));
        effects.apply(effect(StatusEffectKind::Shield, 10, 3));
        effects.apply(effect(StatusEffectKind::DefenseDown, 2, 3));

        let removed = effects.cleanse();
        assert_eq!(removed.len(), 3);
        assert!(effects.has(StatusEffectKind::Shield));
        assert!(!effects.is_stunned());
    }

    #[test]
    fn modifiers_net_up_and_down() {
        let mut effects = StatusEffects::empty();
        effects.apply(effect(StatusEffectKind::AttackUp, 5, 3));
        effects.apply(effect(StatusEffectKind::AttackDown, 7, 3));
        assert_eq!(effects.attack_modifier(), -2);
        assert_eq!(effects.defense_modifier(), 0);
    }
}
