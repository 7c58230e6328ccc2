//! Canonical battle-state digest for determinism checks.

use core::fmt;

use sha2::{Digest, Sha256};

use crate::state::BattleState;

/// SHA-256 over the bincode encoding of a [`BattleState`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateDigest(pub [u8; 32]);

impl StateDigest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for StateDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for StateDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateDigest({self})")
    }
}

/// Two states with the same digest are byte-identical under bincode.
pub fn state_digest(state: &BattleState) -> Result<StateDigest, bincode::Error> {
    let bytes = bincode::serialize(state)?;
    Ok(StateDigest(Sha256::digest(&bytes).into()))
}
