//! Health and mana changes between two battle states.
//!
//! Hosts compare the state before and after a transition to emit
//! `health:changed` / `mana:changed` notifications without the reducer
//! having to know about them.

use super::types::{BattleState, CombatantRef, Combatant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ResourceKind {
    Health,
    Mana,
}

/// A single resource that moved during a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceChange {
    pub who: CombatantRef,
    pub resource: ResourceKind,
    pub before: u32,
    pub after: u32,
    pub max: u32,
}

/// Resource changes of one transition, player first then enemies in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BattleDelta {
    pub changes: Vec<ResourceChange>,
}

impl BattleDelta {
    /// Compares two states of the same battle.
    ///
    /// Enemies are matched by index; enemies present in only one state are
    /// ignored.
    pub fn from_states(before: &BattleState, after: &BattleState) -> Self {
        let mut changes = Vec::new();
        let pairs = core::iter::once((
            CombatantRef::Player,
            &before.player as &dyn Combatant,
            &after.player as &dyn Combatant,
        ))
        .chain(
            before
                .enemies
                .iter()
                .zip(after.enemies.iter())
                .enumerate()
                .map(|(i, (b, a))| (CombatantRef::Enemy(i), b as &dyn Combatant, a as &dyn Combatant)),
        );

        for (who, b, a) in pairs {
            let (bs, as_) = (b.stats(), a.stats());
            if bs.health != as_.health {
                changes.push(ResourceChange {
                    who,
                    resource: ResourceKind::Health,
                    before: bs.health,
                    after: as_.health,
                    max: as_.max_health,
                });
            }
            if bs.mana != as_.mana {
                changes.push(ResourceChange {
                    who,
                    resource: ResourceKind::Mana,
                    before: bs.mana,
                    after: as_.mana,
                    max: as_.max_mana,
                });
            }
        }

        Self { changes }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceChange> {
        self.changes.iter()
    }
}
