//! Topic-keyed synchronous publish/subscribe.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::trace;

use super::types::{GameEvent, Topic};

/// Callback invoked for every event published on a subscribed topic.
pub type EventHandler = Arc<dyn Fn(&GameEvent) + Send + Sync>;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: HashMap<Topic, Vec<(SubscriptionId, EventHandler)>>,
}

/// Topic-based event bus.
///
/// Handlers run on the publishing thread in subscription order. The
/// registry lock is released before any handler runs, so handlers may
/// publish or (un)subscribe themselves.
pub struct EventBus {
    registry: Arc<RwLock<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RwLock::new(Registry::default())),
        }
    }

    pub fn subscribe(&self, topic: Topic, handler: EventHandler) -> SubscriptionId {
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.handlers.entry(topic).or_default().push((id, handler));
        trace!(%topic, ?id, "subscribed");
        id
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        let mut removed = false;
        for handlers in registry.handlers.values_mut() {
            let before = handlers.len();
            handlers.retain(|(sub, _)| *sub != id);
            removed |= handlers.len() != before;
        }
        registry.handlers.retain(|_, handlers| !handlers.is_empty());
        removed
    }

    /// Delivers `event` to every handler of its topic.
    pub fn publish(&self, event: &GameEvent) {
        let topic = event.topic();
        let handlers: Vec<EventHandler> = {
            let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
            match registry.handlers.get(&topic) {
                Some(handlers) => handlers.iter().map(|(_, h)| Arc::clone(h)).collect(),
                None => Vec::new(),
            }
        };

        if handlers.is_empty() {
            trace!("No subscribers for topic {topic}");
            return;
        }
        for handler in handlers {
            handler(event);
        }
    }

    pub fn publish_all(&self, events: &[GameEvent]) {
        for event in events {
            self.publish(event);
        }
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        registry.handlers.get(&topic).map_or(0, Vec::len)
    }

    pub fn total_subscribers(&self) -> usize {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        registry.handlers.values().map(Vec::len).sum()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.total_subscribers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn item_used() -> GameEvent {
        GameEvent::ItemUsed {
            item_id: "item-debug-log".into(),
        }
    }

    fn counter(bus: &EventBus, topic: Topic) -> (Arc<AtomicUsize>, SubscriptionId) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let id = bus.subscribe(
            topic,
            Arc::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (hits, id)
    }

    #[test]
    fn delivers_only_to_matching_topic() {
        let bus = EventBus::new();
        let (items, _) = counter(&bus, Topic::ItemUsed);
        let (spells, _) = counter(&bus, Topic::SpellCast);

        bus.publish(&item_used());

        assert_eq!(items.load(Ordering::SeqCst), 1);
        assert_eq!(spells.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let (hits, id) = counter(&bus, Topic::ItemUsed);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&item_used());

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(bus.total_subscribers(), 0);
    }

    #[test]
    fn clones_share_subscribers() {
        let bus = EventBus::new();
        let (hits, _) = counter(&bus, Topic::ItemUsed);

        bus.clone().publish(&item_used());

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handlers_may_publish_reentrantly() {
        let bus = EventBus::new();
        let (spells, _) = counter(&bus, Topic::SpellCast);
        let inner = bus.clone();
        bus.subscribe(
            Topic::ItemUsed,
            Arc::new(move |_| {
                inner.publish(&GameEvent::SpellCast {
                    spell_id: "spell-refactor".into(),
                    target_index: None,
                });
            }),
        );

        bus.publish(&item_used());

        assert_eq!(spells.load(Ordering::SeqCst), 1);
    }
}
