//! The code base the player explores: files, commits and risk hotspots.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub language: String,
    /// Cyclomatic complexity.
    pub complexity: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub hash: String,
    pub message: String,
    #[serde(default)]
    pub files_changed: Vec<String>,
    #[serde(default)]
    pub insertions: u32,
    #[serde(default)]
    pub deletions: u32,
    #[serde(default)]
    pub is_bug_fix: bool,
}

impl Commit {
    pub fn lines_changed(&self) -> u32 {
        self.insertions.saturating_add(self.deletions)
    }

    pub fn touches(&self, path: &str) -> bool {
        self.files_changed.iter().any(|f| f == path)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub path: String,
    pub risk_score: f64,
    pub complexity: u32,
}

/// Files, commits (most recent first) and hotspots of one repository.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeWorld {
    pub files: Vec<SourceFile>,
    pub commits: Vec<Commit>,
    pub hotspots: Vec<Hotspot>,
}

impl CodeWorld {
    pub fn file(&self, path: &str) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn hotspot(&self, path: &str) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.path == path)
    }
}
