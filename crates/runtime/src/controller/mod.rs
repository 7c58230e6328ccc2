//! Toggleable, inspectable gating over the session's event handlers.
//!
//! The controller subscribes the same handlers as the ungated wiring, but
//! checks the governing subsystem first. A suppressed event bumps a
//! lifetime counter and, in shadow mode, leaves a trace entry describing
//! what would have happened. Movement is never gated.
//!
//! Toggles persist to a [`FlagStore`] on every change and are restored at
//! construction.

mod ring;
mod status;
mod trace;

pub use ring::RingBuffer;
pub use status::{GameSystem, SystemStatus};
pub use trace::{ShadowTraceEntry, SuppressedEffects};

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::Utc;
use game_core::BattleRewards;
use serde_json::json;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::events::{EventBus, GameEvent, SubscriptionId, Topic};
use crate::flags::{FlagKeys, FlagStore, GameFlags, SessionFlagStore};
use crate::session::{GameSession, Reaction, RewardGate, SharedSession};
use crate::wiring::{INBOUND_TOPICS, react, read_session};

pub const DEFAULT_MAX_SHADOW_ENTRIES: usize = 500;

/// Construction options.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    pub max_shadow_entries: usize,
    /// Shadow mode when the flag store has no value.
    pub shadow_enabled: bool,
    pub namespace: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_shadow_entries: DEFAULT_MAX_SHADOW_ENTRIES,
            shadow_enabled: false,
            namespace: crate::flags::DEFAULT_NAMESPACE.to_owned(),
        }
    }
}

/// Subsystem governing an inbound topic. `None` means always delivered.
pub fn governing_system(topic: Topic) -> Option<GameSystem> {
    match topic {
        Topic::NodeClicked | Topic::BranchEntered => Some(GameSystem::Encounters),
        Topic::SpellCast | Topic::CombatAction => Some(GameSystem::Combat),
        Topic::ItemUsed => Some(GameSystem::Inventory),
        _ => None,
    }
}

struct Toggles {
    master: bool,
    shadow: bool,
    systems: BTreeMap<GameSystem, bool>,
}

impl Toggles {
    fn is_system_on(&self, system: GameSystem) -> bool {
        self.systems.get(&system).copied().unwrap_or(true)
    }

    fn is_active(&self, system: GameSystem) -> bool {
        self.master && self.is_system_on(system)
    }

    fn effective(&self) -> BTreeMap<GameSystem, bool> {
        GameSystem::iter().map(|s| (s, self.is_active(s))).collect()
    }
}

struct GateState {
    toggles: Toggles,
    trace: RingBuffer<ShadowTraceEntry>,
    suppressed: u64,
}

struct Inner {
    session: SharedSession,
    bus: EventBus,
    store: Arc<dyn FlagStore>,
    keys: FlagKeys,
    state: Mutex<GateState>,
    subscriptions: Mutex<Vec<SubscriptionId>>,
}

/// Gating controller for one session.
///
/// Dropping the controller unwires it.
pub struct GameSystemController {
    inner: Arc<Inner>,
}

impl GameSystemController {
    /// Restores toggles from `store`; absent keys default to everything
    /// enabled and shadow mode as configured.
    pub fn new(
        session: SharedSession,
        bus: EventBus,
        store: Arc<dyn FlagStore>,
        config: ControllerConfig,
    ) -> Result<Self> {
        let keys = FlagKeys::new(config.namespace);
        let flags = store.load()?;
        let read = |key: String, default: bool| flags.get(&key).copied().unwrap_or(default);
        let toggles = Toggles {
            master: read(keys.master(), true),
            shadow: read(keys.shadow(), config.shadow_enabled),
            systems: GameSystem::iter()
                .map(|s| (s, read(keys.system(s.as_ref()), true)))
                .collect(),
        };
        debug!(master = toggles.master, shadow = toggles.shadow, "controller flags restored");

        let inner = Inner {
            session,
            bus,
            store,
            keys,
            state: Mutex::new(GateState {
                toggles,
                trace: RingBuffer::new(config.max_shadow_entries),
                suppressed: 0,
            }),
            subscriptions: Mutex::new(Vec::new()),
        };
        Ok(Self { inner: Arc::new(inner) })
    }

    /// Controller whose flags live in the session itself.
    pub fn for_session(session: SharedSession, bus: EventBus, config: ControllerConfig) -> Result<Self> {
        let store = Arc::new(SessionFlagStore::new(Arc::clone(&session)));
        Self::new(session, bus, store, config)
    }

    // ===== toggles =====

    pub fn set_system_enabled(&self, system: GameSystem, enabled: bool) {
        self.inner.toggle(system.as_ref(), enabled, |t| {
            t.systems.insert(system, enabled);
        });
    }

    pub fn set_master_enabled(&self, enabled: bool) {
        self.inner.toggle("master", enabled, |t| t.master = enabled);
    }

    pub fn set_shadow_enabled(&self, enabled: bool) {
        self.inner.toggle("shadow", enabled, |t| t.shadow = enabled);
    }

    pub fn is_system_active(&self, system: GameSystem) -> bool {
        self.inner.state().toggles.is_active(system)
    }

    pub fn status(&self) -> SystemStatus {
        let state = self.inner.state();
        let t = &state.toggles;
        SystemStatus {
            master: t.master,
            shadow: t.shadow,
            systems: t.systems.clone(),
            effective: t.effective(),
        }
    }

    // ===== shadow trace =====

    /// Trace entries oldest first, optionally for one system.
    pub fn shadow_trace(&self, system: Option<GameSystem>) -> Vec<ShadowTraceEntry> {
        self.inner
            .state()
            .trace
            .iter()
            .filter(|e| system.is_none_or(|s| e.system == s))
            .cloned()
            .collect()
    }

    pub fn clear_shadow_trace(&self) {
        self.inner.state().trace.clear();
    }

    /// Events suppressed since construction.
    pub fn suppressed_count(&self) -> u64 {
        self.inner.state().suppressed
    }

    // ===== wiring =====

    /// Subscribes every inbound topic. A second call is a no-op.
    pub fn wire(&self) {
        let mut subscriptions = self.inner.subscriptions();
        if !subscriptions.is_empty() {
            return;
        }
        for topic in INBOUND_TOPICS {
            let weak: Weak<Inner> = Arc::downgrade(&self.inner);
            let id = self.inner.bus.subscribe(
                topic,
                Arc::new(move |event: &GameEvent| {
                    if let Some(inner) = weak.upgrade() {
                        inner.handle(event);
                    }
                }),
            );
            subscriptions.push(id);
        }
        info!(topics = subscriptions.len(), "controller wired");
    }

    /// Removes every subscription. The controller stays usable.
    pub fn unwire(&self) {
        let mut subscriptions = self.inner.subscriptions();
        for id in subscriptions.drain(..) {
            self.inner.bus.unsubscribe(id);
        }
    }

    pub fn is_wired(&self) -> bool {
        !self.inner.subscriptions().is_empty()
    }
}

impl Drop for GameSystemController {
    fn drop(&mut self) {
        self.unwire();
    }
}

impl std::fmt::Debug for GameSystemController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSystemController")
            .field("namespace", &self.inner.keys.namespace())
            .field("wired", &self.is_wired())
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscriptions(&self) -> MutexGuard<'_, Vec<SubscriptionId>> {
        self.subscriptions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies one toggle, persists the full flag set, then announces the
    /// new effective states.
    fn toggle(&self, name: &str, enabled: bool, apply: impl FnOnce(&mut Toggles)) {
        let (flags, effective) = {
            let mut state = self.state();
            apply(&mut state.toggles);
            (self.flag_set(&state.toggles), state.toggles.effective())
        };
        if let Err(err) = self.store.store(&flags) {
            warn!(%err, "failed to persist controller flags");
        }
        debug!(system = name, enabled, "toggle changed");

        self.bus.publish(&GameEvent::SystemStatusChanged {
            system: name.to_owned(),
            enabled,
            effective_states: effective.into_iter().map(|(s, on)| (s.to_string(), on)).collect(),
        });
    }

    fn flag_set(&self, toggles: &Toggles) -> GameFlags {
        let mut flags = GameFlags::new();
        flags.insert(self.keys.master(), toggles.master);
        flags.insert(self.keys.shadow(), toggles.shadow);
        for system in GameSystem::iter() {
            flags.insert(self.keys.system(system.as_ref()), toggles.is_system_on(system));
        }
        flags
    }

    fn handle(&self, event: &GameEvent) {
        let (governor, gate, shadow) = {
            let state = self.state();
            let t = &state.toggles;
            let governor = governing_system(event.topic()).filter(|s| !t.is_active(*s));
            let gate = RewardGate {
                progression: t.is_active(GameSystem::Progression),
                quests: t.is_active(GameSystem::Quests),
            };
            (governor, gate, t.shadow)
        };

        if let Some(system) = governor {
            let entry = shadow.then(|| read_session(&self.session, |s| shadow_for_event(system, event, s)));
            self.suppress(entry);
            return;
        }

        let reaction = react(&self.session, event, gate);
        self.record_withheld(&reaction, shadow);
        self.bus.publish_all(&reaction.events);
    }

    fn record_withheld(&self, reaction: &Reaction, shadow: bool) {
        if let Some(rewards) = &reaction.withheld_rewards {
            self.suppress(shadow.then(|| shadow_for_rewards(rewards)));
        }
        if let Some(quests) = &reaction.withheld_quests {
            self.suppress(shadow.then(|| shadow_for_quests(quests)));
        }
    }

    fn suppress(&self, entry: Option<ShadowTraceEntry>) {
        let mut state = self.state();
        state.suppressed += 1;
        if let Some(entry) = entry {
            debug!(system = %entry.system, would_have = %entry.would_have, "shadow trace");
            state.trace.push(entry);
        }
    }
}

fn entry(
    system: GameSystem,
    incoming: &str,
    would_have: String,
    payload: serde_json::Value,
    store_updates: &[&str],
    bus_emissions: Vec<Topic>,
) -> ShadowTraceEntry {
    ShadowTraceEntry {
        timestamp: Utc::now(),
        system,
        incoming_event: incoming.to_owned(),
        would_have,
        payload,
        suppressed: SuppressedEffects {
            store_updates: store_updates.iter().map(|s| (*s).to_owned()).collect(),
            bus_emissions,
        },
    }
}

/// Describes what the handler for `event` would have done, reading the
/// session without changing it.
fn shadow_for_event(system: GameSystem, event: &GameEvent, session: &GameSession) -> ShadowTraceEntry {
    let incoming = event.topic().to_string();
    match event {
        GameEvent::NodeClicked { file_path, .. } | GameEvent::BranchEntered { file_path, .. } => {
            match session.preview_encounter(file_path) {
                Some(found) => entry(
                    system,
                    &incoming,
                    format!("Triggered {} encounter ({})", found.kind, found.monster.name),
                    json!({
                        "filePath": file_path,
                        "kind": found.kind,
                        "monsterId": found.monster.id,
                        "monsterName": found.monster.name,
                        "severity": found.monster.severity,
                    }),
                    &["encounterState", "battle"],
                    vec![Topic::EncounterTriggered, Topic::CombatStarted],
                ),
                None => entry(
                    system,
                    &incoming,
                    format!("No encounter at {file_path}"),
                    json!({ "filePath": file_path }),
                    &["encounterState"],
                    Vec::new(),
                ),
            }
        }
        GameEvent::SpellCast { spell_id, .. } => {
            if session.in_battle() {
                entry(
                    system,
                    &incoming,
                    format!("Executed combat turn with spell {spell_id}"),
                    json!({ "spellId": spell_id }),
                    &["battle"],
                    vec![Topic::CombatTurnStart, Topic::CombatTurnEnd],
                )
            } else {
                entry(
                    system,
                    &incoming,
                    format!("Ignored spell {spell_id}: no battle in progress"),
                    json!({ "spellId": spell_id }),
                    &[],
                    Vec::new(),
                )
            }
        }
        GameEvent::CombatAction { action } => {
            let payload = serde_json::to_value(action).unwrap_or(serde_json::Value::Null);
            if session.in_battle() {
                entry(
                    system,
                    &incoming,
                    format!("Dispatched combat action {}", action.name()),
                    payload,
                    &["battle"],
                    Vec::new(),
                )
            } else {
                entry(
                    system,
                    &incoming,
                    format!("Ignored combat action {}: no battle in progress", action.name()),
                    payload,
                    &[],
                    Vec::new(),
                )
            }
        }
        GameEvent::ItemUsed { item_id } => {
            if session.inventory.has(item_id) {
                entry(
                    system,
                    &incoming,
                    format!("Used item {item_id}"),
                    json!({ "itemId": item_id }),
                    &["inventory"],
                    Vec::new(),
                )
            } else {
                entry(
                    system,
                    &incoming,
                    format!("Ignored item {item_id}: not in inventory"),
                    json!({ "itemId": item_id }),
                    &[],
                    Vec::new(),
                )
            }
        }
        other => entry(
            system,
            &incoming,
            "No handler".to_owned(),
            serde_json::to_value(other).unwrap_or(serde_json::Value::Null),
            &[],
            Vec::new(),
        ),
    }
}

const VICTORY: &str = "battle:victory";

fn shadow_for_rewards(rewards: &BattleRewards) -> ShadowTraceEntry {
    let mut emissions = vec![Topic::ExperienceGained];
    if !rewards.loot.is_empty() {
        emissions.push(Topic::LootDropped);
    }
    entry(
        GameSystem::Progression,
        VICTORY,
        format!("Awarded {} XP, {} items", rewards.xp, rewards.loot.len()),
        serde_json::to_value(rewards).unwrap_or(serde_json::Value::Null),
        &["character", "inventory"],
        emissions,
    )
}

fn shadow_for_quests(quest_ids: &[String]) -> ShadowTraceEntry {
    let would_have = if quest_ids.is_empty() {
        "No quest progress".to_owned()
    } else {
        format!("Completed quests {}", quest_ids.join(", "))
    };
    let store_updates: &[&str] = if quest_ids.is_empty() { &[] } else { &["quests", "character"] };
    entry(
        GameSystem::Quests,
        VICTORY,
        would_have,
        json!({ "questIds": quest_ids }),
        store_updates,
        Vec::new(),
    )
}
