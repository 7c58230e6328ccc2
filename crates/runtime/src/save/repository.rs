//! Save slot storage.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::{SaveData, SaveError, load_from_json};

/// Named save slots.
pub trait SaveRepository: Send + Sync {
    fn save(&self, slot: &str, data: &SaveData) -> Result<(), SaveError>;

    /// Loads and validates a slot. `None` when the slot is empty.
    fn load(&self, slot: &str) -> Result<Option<SaveData>, SaveError>;

    fn exists(&self, slot: &str) -> Result<bool, SaveError>;

    fn delete(&self, slot: &str) -> Result<(), SaveError>;

    /// Slot names in ascending order.
    fn list_slots(&self) -> Result<Vec<String>, SaveError>;
}

/// One `slot_{name}.json` file per slot under a base directory.
///
/// Writes go to a temporary file that is renamed over the slot, so a crash
/// mid-write leaves the previous save intact.
#[derive(Debug, Clone)]
pub struct FileSaveRepository {
    base_dir: PathBuf,
}

impl FileSaveRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, SaveError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.base_dir.join(format!("slot_{slot}.json"))
    }
}

impl SaveRepository for FileSaveRepository {
    fn save(&self, slot: &str, data: &SaveData) -> Result<(), SaveError> {
        let path = self.slot_path(slot);
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, data.to_json()?)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved slot '{}': {}", slot, path.display());
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<SaveData>, SaveError> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        let data = load_from_json(&json)?;

        tracing::info!(
            "Loaded slot '{}' for {} (level {})",
            slot,
            data.character.name,
            data.character.level
        );
        Ok(Some(data))
    }

    fn exists(&self, slot: &str) -> Result<bool, SaveError> {
        Ok(self.slot_path(slot).exists())
    }

    fn delete(&self, slot: &str) -> Result<(), SaveError> {
        let path = self.slot_path(slot);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::info!("Deleted slot: {}", path.display());
        }
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>, SaveError> {
        let mut slots = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(slot) = filename
                    .strip_prefix("slot_")
                    .and_then(|s| s.strip_suffix(".json"))
            {
                slots.push(slot.to_string());
            }
        }
        slots.sort();
        Ok(slots)
    }
}

/// Keeps serialized slots in memory. Loads go through the same validation
/// as file loads.
#[derive(Debug, Default)]
pub struct InMemorySaveRepository {
    slots: RwLock<HashMap<String, String>>,
}

impl InMemorySaveRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw JSON without validating it.
    pub fn insert_raw(&self, slot: &str, json: impl Into<String>) -> Result<(), SaveError> {
        self.slots
            .write()
            .map_err(|_| SaveError::LockPoisoned)?
            .insert(slot.to_owned(), json.into());
        Ok(())
    }
}

impl SaveRepository for InMemorySaveRepository {
    fn save(&self, slot: &str, data: &SaveData) -> Result<(), SaveError> {
        let json = data.to_json()?;
        self.insert_raw(slot, json)
    }

    fn load(&self, slot: &str) -> Result<Option<SaveData>, SaveError> {
        let slots = self.slots.read().map_err(|_| SaveError::LockPoisoned)?;
        slots.get(slot).map(|json| load_from_json(json)).transpose()
    }

    fn exists(&self, slot: &str) -> Result<bool, SaveError> {
        let slots = self.slots.read().map_err(|_| SaveError::LockPoisoned)?;
        Ok(slots.contains_key(slot))
    }

    fn delete(&self, slot: &str) -> Result<(), SaveError> {
        self.slots
            .write()
            .map_err(|_| SaveError::LockPoisoned)?
            .remove(slot);
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>, SaveError> {
        let slots = self.slots.read().map_err(|_| SaveError::LockPoisoned)?;
        let mut names: Vec<String> = slots.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_load_validates_stored_json() {
        let repo = InMemorySaveRepository::new();
        repo.insert_raw("bad", r#"{"version":9,"character":{"name":"A","class":"dps","level":1}}"#)
            .unwrap();
        repo.insert_raw("good", r#"{"version":1,"character":{"name":"A","class":"dps","level":1}}"#)
            .unwrap();

        assert!(matches!(repo.load("bad"), Err(SaveError::NewerVersion { found: 9 })));
        assert_eq!(repo.load("good").unwrap().unwrap().character.name, "A");
        assert!(repo.load("missing").unwrap().is_none());
        assert_eq!(repo.list_slots().unwrap(), vec!["bad".to_owned(), "good".to_owned()]);
    }
}
