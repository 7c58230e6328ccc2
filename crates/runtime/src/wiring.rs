//! Bus subscriptions that feed inbound events into a session.
//!
//! [`wire_game_events`] subscribes every inbound topic with no gating. The
//! gating controller reuses [`apply_inbound`] behind its own checks.

use std::sync::{Arc, PoisonError};

use tracing::{debug, warn};

use crate::events::{EventBus, GameEvent, SubscriptionId, Topic};
use crate::session::{GameSession, Reaction, RewardGate, SharedSession};

/// Topics the session consumes.
pub const INBOUND_TOPICS: [Topic; 6] = [
    Topic::PlayerMoved,
    Topic::NodeClicked,
    Topic::BranchEntered,
    Topic::SpellCast,
    Topic::ItemUsed,
    Topic::CombatAction,
];

/// Routes one inbound event to its session handler. Outbound events are
/// ignored.
pub fn apply_inbound(session: &mut GameSession, event: &GameEvent, gate: RewardGate) -> Reaction {
    match event {
        GameEvent::PlayerMoved { .. } => session.on_player_moved(),
        GameEvent::NodeClicked { file_path, position } => session.on_node_clicked(file_path, Some(*position)),
        GameEvent::BranchEntered { file_path, .. } => session.on_branch_entered(file_path),
        GameEvent::SpellCast {
            spell_id,
            target_index,
        } => session.on_spell_cast(spell_id, *target_index, gate),
        GameEvent::ItemUsed { item_id } => session.on_item_used(item_id, gate),
        GameEvent::CombatAction { action } => session.dispatch_combat_action(action, gate),
        other => {
            debug!(topic = %other.topic(), "not an inbound event");
            Reaction::default()
        }
    }
}

/// Runs `event` against the shared session and returns what it produced.
/// The session lock is released before returning.
pub(crate) fn react(session: &SharedSession, event: &GameEvent, gate: RewardGate) -> Reaction {
    let mut guard = session.lock().unwrap_or_else(|poisoned| {
        warn!(topic = %event.topic(), "session lock poisoned; recovering");
        poisoned.into_inner()
    });
    apply_inbound(&mut guard, event, gate)
}

/// Live subscriptions. Dropping the handle unwires them.
#[derive(Debug)]
pub struct EventWiring {
    bus: EventBus,
    subscriptions: Vec<SubscriptionId>,
}

impl EventWiring {
    pub fn is_wired(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    pub fn unwire(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.bus.unsubscribe(id);
        }
    }
}

impl Drop for EventWiring {
    fn drop(&mut self) {
        self.unwire();
    }
}

/// Subscribes the session to every inbound topic, ungated.
pub fn wire_game_events(bus: &EventBus, session: SharedSession) -> EventWiring {
    let subscriptions = INBOUND_TOPICS
        .iter()
        .map(|&topic| {
            let session = Arc::clone(&session);
            let publisher = bus.clone();
            bus.subscribe(
                topic,
                Arc::new(move |event: &GameEvent| {
                    let reaction = react(&session, event, RewardGate::OPEN);
                    publisher.publish_all(&reaction.events);
                }),
            )
        })
        .collect();
    EventWiring {
        bus: bus.clone(),
        subscriptions,
    }
}

/// Locks a session for a read, recovering from poisoning.
pub(crate) fn read_session<R>(session: &SharedSession, f: impl FnOnce(&GameSession) -> R) -> R {
    let guard = session.lock().unwrap_or_else(PoisonError::into_inner);
    f(&guard)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use game_content::{ContentBundle, create_character, create_monster};
    use game_core::{BattleAction, BugType, CharacterClass, RngState};

    use super::*;
    use crate::world::CodeWorld;

    fn shared() -> SharedSession {
        let content = Arc::new(ContentBundle::builtin());
        let character = create_character(CharacterClass::Healer, "Bo", 5, &content.classes, &content.balance);
        GameSession::new(character, CodeWorld::default(), content, 1).into_shared()
    }

    #[test]
    fn movement_reaches_session_until_unwired() {
        let bus = EventBus::new();
        let session = shared();
        let mut wiring = wire_game_events(&bus, Arc::clone(&session));
        let moved = GameEvent::PlayerMoved {
            position: Default::default(),
            file_path: None,
        };

        bus.publish(&moved);
        assert_eq!(read_session(&session, |s| s.encounters.steps_since_last_encounter), 1);

        wiring.unwire();
        bus.publish(&moved);
        assert_eq!(read_session(&session, |s| s.encounters.steps_since_last_encounter), 1);
        assert_eq!(bus.total_subscribers(), 0);
    }

    #[test]
    fn spell_cast_publishes_combat_events() {
        let bus = EventBus::new();
        let session = shared();
        let _wiring = wire_game_events(&bus, Arc::clone(&session));
        let damage = Arc::new(Mutex::new(0));
        let seen = Arc::clone(&damage);
        bus.subscribe(
            Topic::DamageDealt,
            Arc::new(move |_| {
                if let Ok(mut n) = seen.lock() {
                    *n += 1;
                }
            }),
        );
        {
            let mut guard = session.lock().expect("lock");
            let content = Arc::clone(guard.content());
            let (monster, _) = create_monster(BugType::NullPointer, 1, 0, RngState::from_seed(2), &content.balance);
            guard.start_battle(vec![monster], Some(5)).expect("start");
        }

        bus.publish(&GameEvent::CombatAction {
            action: BattleAction::attack(0),
        });

        assert!(*damage.lock().expect("lock") >= 1);
    }
}
