//! Unified error type surfaced by the runtime API.

use thiserror::Error;

pub use crate::save::SaveError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session lock was poisoned")]
    LockPoisoned,

    #[error("no battle is in progress")]
    NoActiveBattle,

    #[error("a battle is already in progress")]
    BattleInProgress,

    #[error("cannot start a battle without enemies")]
    NoEnemies,

    #[error(transparent)]
    Save(#[from] SaveError),

    #[cfg(feature = "balance-worker")]
    #[error(transparent)]
    Simulation(#[from] simulation::SimulationError),

    #[cfg(feature = "balance-worker")]
    #[error("balance worker command channel closed")]
    CommandChannelClosed,

    #[cfg(feature = "balance-worker")]
    #[error("balance worker reply channel closed")]
    ReplyChannelClosed(#[source] tokio::sync::oneshot::error::RecvError),

    #[cfg(feature = "balance-worker")]
    #[error("balance worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
