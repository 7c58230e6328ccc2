//! Event transport between the host, the session and presentation.
//!
//! The bus is an explicitly constructed handle; clones share subscribers.
//! Inbound topics are fed by the host, outbound topics are produced by the
//! session and consumed by the UI.

mod bus;
mod combat;
mod types;

pub use bus::{EventBus, EventHandler, SubscriptionId};
pub use combat::battle_events;
pub use types::{CombatOutcome, GameEvent, Position, StatChanges, Topic};
