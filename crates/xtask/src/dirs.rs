//! Platform-specific directory utilities
//!
//! Paths come from [`runtime::RuntimeConfig`], which honours
//! `LUDUS_SAVE_DIR` and `LUDUS_LOG_DIR` before the platform defaults.

use std::path::{Path, PathBuf};

use runtime::RuntimeConfig;

/// Log directory for xtask output
///
/// - Linux: `~/.cache/ludus/logs` (or `$XDG_CACHE_HOME/ludus/logs`)
/// - macOS: `~/Library/Caches/ludus/logs`
/// - Windows: `%LOCALAPPDATA%\ludus\logs`
pub fn log_dir() -> PathBuf {
    RuntimeConfig::from_env().log_dir
}

/// Save directory
///
/// - Linux: `~/.local/share/ludus` (or `$XDG_DATA_HOME/ludus`)
/// - macOS: `~/Library/Application Support/ludus`
/// - Windows: `%APPDATA%\ludus`
pub fn save_dir() -> PathBuf {
    RuntimeConfig::from_env().save_dir
}

/// Resolves a save argument: an existing path is used as is, anything
/// else is treated as a slot name in `save_dir`.
pub fn resolve_save(arg: &str, save_dir: &Path) -> PathBuf {
    let path = PathBuf::from(arg);
    if path.exists() {
        path
    } else {
        save_dir.join(format!("slot_{arg}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_paths_win_over_slot_names() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("manual.json");
        std::fs::write(&file, "{}").unwrap();

        assert_eq!(resolve_save(file.to_str().unwrap(), dir.path()), file);
        assert_eq!(resolve_save("autosave", dir.path()), dir.path().join("slot_autosave.json"));
    }
}
