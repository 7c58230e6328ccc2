//! Errors raised while loading, validating or storing saves.

use thiserror::Error;

use super::SAVE_VERSION;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Parse(String),

    #[error("Save data is not an object")]
    NotAnObject,

    #[error("Missing save version")]
    MissingVersion,

    #[error("Save version {found} is newer than supported ({})", SAVE_VERSION)]
    NewerVersion { found: u64 },

    #[error("Invalid character data: {0}")]
    InvalidCharacter(String),

    #[error("Invalid save data: {0}")]
    Invalid(String),

    #[error("no save in slot '{0}'")]
    NotFound(String),
}

impl SaveError {
    /// Problems with the save content, as opposed to the medium.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Parse(_)
                | Self::NotAnObject
                | Self::MissingVersion
                | Self::NewerVersion { .. }
                | Self::InvalidCharacter(_)
                | Self::Invalid(_)
        )
    }
}
