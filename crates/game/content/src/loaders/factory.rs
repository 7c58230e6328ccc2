//! Content factory assembling a bundle from a data directory.

use std::path::{Path, PathBuf};

use game_core::{BalanceConfig, Preset};

use crate::ContentBundle;
use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult};

/// Builds a [`ContentBundle`] from a data directory.
///
/// Every file is optional. Definitions found on disk are layered over the
/// built-in catalogues, replacing entries with the same id.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── balance.toml
/// ├── spells.ron
/// ├── items.ron
/// └── classes.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
    preset: Preset,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            preset: Preset::Normal,
        }
    }

    /// Baseline the balance overrides are merged onto.
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    pub fn load_balance(&self) -> LoadResult<BalanceConfig> {
        ConfigLoader::resolve(self.preset, self.existing("balance.toml").as_deref())
    }

    pub fn load(&self) -> LoadResult<ContentBundle> {
        let mut bundle = ContentBundle::with_balance(self.load_balance()?);

        if let Some(path) = self.existing("spells.ron") {
            for spell in CatalogLoader::load_spells(&path)? {
                bundle.spells.insert(spell);
            }
        }
        if let Some(path) = self.existing("items.ron") {
            for item in CatalogLoader::load_items(&path)? {
                bundle.items.insert(item);
            }
        }
        if let Some(path) = self.existing("classes.ron") {
            for (class, progression) in CatalogLoader::load_classes(&path)? {
                bundle.classes.insert(class, progression);
            }
        }
        Ok(bundle)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn existing(&self, name: &str) -> Option<PathBuf> {
        let path = self.data_dir.join(name);
        path.is_file().then_some(path)
    }
}
