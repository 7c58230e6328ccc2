//! Translation of one battle transition into outbound bus events.

use game_core::state::{BattleDelta, ResourceKind};
use game_core::{BattleState, CombatEvent};

use super::types::GameEvent;

/// Events for the transition `before -> after`.
///
/// Reducer events come first in the order they were produced, followed by
/// health and mana changes. Heals and item use surface only through the
/// resource changes; `item:used` is an inbound topic and is never echoed.
pub fn battle_events(before: &BattleState, after: &BattleState) -> Vec<GameEvent> {
    let mut out: Vec<GameEvent> = after.events.iter().filter_map(translate).collect();
    out.extend(BattleDelta::from_states(before, after).iter().map(|change| {
        match change.resource {
            ResourceKind::Health => GameEvent::HealthChanged {
                who: change.who,
                before: change.before,
                after: change.after,
                max: change.max,
            },
            ResourceKind::Mana => GameEvent::ManaChanged {
                who: change.who,
                before: change.before,
                after: change.after,
                max: change.max,
            },
        }
    }));
    out
}

fn translate(event: &CombatEvent) -> Option<GameEvent> {
    let translated = match event {
        CombatEvent::TurnStarted { turn, actor } => GameEvent::CombatTurnStart {
            turn: *turn,
            actor: *actor,
        },
        CombatEvent::TurnEnded { turn, actor } => GameEvent::CombatTurnEnd {
            turn: *turn,
            actor: *actor,
        },
        CombatEvent::Damage {
            source,
            target,
            amount,
            critical,
            element,
            ..
        } => GameEvent::DamageDealt {
            source: *source,
            target: *target,
            amount: *amount,
            critical: *critical,
            element: *element,
        },
        CombatEvent::SpellResolved {
            caster,
            spell_id,
            target,
            effect,
            value,
        } => GameEvent::SpellResolved {
            caster: *caster,
            spell_id: spell_id.clone(),
            target: *target,
            effect: *effect,
            value: *value,
        },
        CombatEvent::StatusApplied {
            target,
            kind,
            name,
            remaining_turns,
        } => GameEvent::StatusApplied {
            target: *target,
            kind: *kind,
            name: name.clone(),
            remaining_turns: *remaining_turns,
        },
        CombatEvent::StatusExpired { target, kind, name } => GameEvent::StatusExpired {
            target: *target,
            kind: *kind,
            name: name.clone(),
        },
        CombatEvent::Healed { .. } | CombatEvent::ItemUsed { .. } => return None,
    };
    Some(translated)
}
