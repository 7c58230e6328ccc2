//! Balance override loader.

use std::path::Path;

use anyhow::Context;
use game_core::{BalanceConfig, BalanceOverrides, Preset};

use crate::loaders::{LoadResult, read_file};

/// Loader for balance overrides from TOML files.
///
/// Every table and key is optional; unknown keys are rejected so a typo
/// does not silently fall back to the default.
///
/// ```toml
/// [damage]
/// defense_constant = 25.0
///
/// [encounters]
/// encounter_cooldown = 5
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load overrides from a TOML file.
    pub fn load(path: &Path) -> LoadResult<BalanceOverrides> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parse overrides from TOML text.
    pub fn parse(content: &str) -> LoadResult<BalanceOverrides> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse balance TOML: {}", e))
    }

    /// Load overrides, merge them onto `base` and validate the result.
    pub fn load_onto(path: &Path, base: &BalanceConfig) -> LoadResult<BalanceConfig> {
        let overrides = Self::load(path)?;
        let config = base.with_overrides(&overrides);
        config
            .validate()
            .with_context(|| format!("balance overrides in {} are out of range", path.display()))?;
        Ok(config)
    }

    /// Preset baseline with an optional override file layered on top.
    pub fn resolve(preset: Preset, path: Option<&Path>) -> LoadResult<BalanceConfig> {
        let base = BalanceConfig::preset(preset);
        match path {
            Some(path) => Self::load_onto(path, &base),
            None => Ok(base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_tables_merge_onto_defaults() {
        let overrides = ConfigLoader::parse(
            r#"
            [damage]
            defense_constant = 30.0

            [encounters]
            encounter_cooldown = 5
            "#,
        )
        .unwrap();
        let config = BalanceConfig::default().with_overrides(&overrides);
        assert_eq!(config.damage.defense_constant, 30.0);
        assert_eq!(config.encounters.encounter_cooldown, 5);
        assert_eq!(config.damage.crit_multiplier, 1.5);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ConfigLoader::parse("[damage]\ndefence_constant = 1.0\n").is_err());
    }
}
