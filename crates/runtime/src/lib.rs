//! Game runtime for the code-exploration RPG.
//!
//! This crate turns the pure battle engine into a playable session. A host
//! publishes input events on an [`EventBus`]; the [`GameSession`] reacts by
//! moving through the world, triggering encounters, running battles and
//! granting rewards, and publishes what happened back on the bus.
//!
//! Modules are organized by responsibility:
//! - [`events`] provides the topic-keyed event bus and event payloads
//! - [`session`] owns the mutable game state and its reactions
//! - [`encounter`], [`quests`] and [`world`] hold exploration rules
//! - [`wiring`] connects a session to a bus without gating
//! - [`controller`] gates subsystems behind flags with shadow tracing
//! - [`flags`] and [`save`] persist toggles and sessions
//! - [`workers`] runs balance simulations off the caller's thread
pub mod config;
pub mod controller;
pub mod encounter;
pub mod error;
pub mod events;
pub mod flags;
pub mod quests;
pub mod save;
pub mod session;
pub mod wiring;
pub mod world;

#[cfg(feature = "balance-worker")]
pub mod workers;

pub use config::RuntimeConfig;
pub use controller::{
    ControllerConfig, GameSystem, GameSystemController, RingBuffer, ShadowTraceEntry, SuppressedEffects, SystemStatus,
    governing_system,
};
pub use encounter::{Encounter, EncounterKind, EncounterOrigin, EncounterState, check_encounter};
pub use error::{Result, RuntimeError};
pub use events::{EventBus, GameEvent, SubscriptionId, Topic};
pub use flags::{FlagKeys, FlagStore, GameFlags, InMemoryFlagStore, SessionFlagStore};
pub use quests::{Quest, QuestGenerator, QuestLog, QuestStatus};
pub use save::{
    FileSaveRepository, InMemorySaveRepository, SAVE_VERSION, SaveData, SaveError, SaveRepository, load_from_json,
    validate_save,
};
pub use session::{GameSession, Reaction, RewardGate, SharedSession};
pub use wiring::{EventWiring, wire_game_events};
pub use world::{CodeWorld, Commit, Hotspot, SourceFile};

#[cfg(feature = "balance-worker")]
pub use workers::{BalanceWorker, BalanceWorkerHandle};
