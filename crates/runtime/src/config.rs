//! Runtime directories, read from the environment.

use std::env;
use std::path::PathBuf;

const APP_NAME: &str = "ludus";

/// Where saves and logs live.
///
/// - `LUDUS_SAVE_DIR` overrides the platform data directory
///   (`~/.local/share/ludus` on Linux, fallback `./save_data`).
/// - `LUDUS_LOG_DIR` overrides the platform cache directory plus `logs`
///   (`~/.cache/ludus/logs` on Linux, fallback `/tmp/ludus/logs`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub save_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        let dirs = directories::ProjectDirs::from("", "", APP_NAME);
        let save_dir = env::var_os("LUDUS_SAVE_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs.as_ref().map(|d| d.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("./save_data"));
        let log_dir = env::var_os("LUDUS_LOG_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs.as_ref().map(|d| d.cache_dir().join("logs")))
            .unwrap_or_else(|| PathBuf::from("/tmp").join(APP_NAME).join("logs"));
        Self { save_dir, log_dir }
    }

    pub fn with_save_dir(mut self, save_dir: impl Into<PathBuf>) -> Self {
        self.save_dir = save_dir.into();
        self
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
