//! Persisted boolean flags.
//!
//! Flags are a flat string-keyed map saved with the game. The gating
//! controller reads and writes its toggles here under
//! `<namespace>.master.enabled`, `<namespace>.shadow.enabled` and
//! `<namespace>.system.<name>.enabled`.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::save::SaveError;
use crate::session::SharedSession;

pub type GameFlags = BTreeMap<String, bool>;

pub const DEFAULT_NAMESPACE: &str = "ludus";

/// Key layout for one namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlagKeys {
    namespace: String,
}

impl FlagKeys {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn master(&self) -> String {
        format!("{}.master.enabled", self.namespace)
    }

    pub fn shadow(&self) -> String {
        format!("{}.shadow.enabled", self.namespace)
    }

    pub fn system(&self, name: &str) -> String {
        format!("{}.system.{name}.enabled", self.namespace)
    }
}

impl Default for FlagKeys {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

/// Where flags live between sessions.
pub trait FlagStore: Send + Sync {
    fn load(&self) -> Result<GameFlags, SaveError>;

    /// Merges `flags` into the stored map; keys not in `flags` are kept.
    fn store(&self, flags: &GameFlags) -> Result<(), SaveError>;
}

/// Flag store for tests and headless runs.
#[derive(Debug, Default)]
pub struct InMemoryFlagStore {
    flags: RwLock<GameFlags>,
}

impl InMemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(flags: GameFlags) -> Self {
        Self {
            flags: RwLock::new(flags),
        }
    }
}

impl FlagStore for InMemoryFlagStore {
    fn load(&self) -> Result<GameFlags, SaveError> {
        let flags = self.flags.read().map_err(|_| SaveError::LockPoisoned)?;
        Ok(flags.clone())
    }

    fn store(&self, flags: &GameFlags) -> Result<(), SaveError> {
        let mut stored = self.flags.write().map_err(|_| SaveError::LockPoisoned)?;
        stored.extend(flags.iter().map(|(k, v)| (k.clone(), *v)));
        Ok(())
    }
}

/// Reads and writes the flags of a live session, so they travel with its
/// save file.
#[derive(Clone, Debug)]
pub struct SessionFlagStore {
    session: SharedSession,
}

impl SessionFlagStore {
    pub fn new(session: SharedSession) -> Self {
        Self { session }
    }
}

impl FlagStore for SessionFlagStore {
    fn load(&self) -> Result<GameFlags, SaveError> {
        let session = self.session.lock().map_err(|_| SaveError::LockPoisoned)?;
        Ok(session.flags.clone())
    }

    fn store(&self, flags: &GameFlags) -> Result<(), SaveError> {
        let mut session = self.session.lock().map_err(|_| SaveError::LockPoisoned)?;
        session.flags.extend(flags.iter().map(|(k, v)| (k.clone(), *v)));
        Ok(())
    }
}
