//! Quest graph built from repository history.
//!
//! Commit quests form a chain: each one requires the previous. Hotspot
//! quests stand alone. Quests move `locked -> available -> active ->
//! completed`; completing one unlocks every quest whose requirements are
//! all met.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::world::{Commit, Hotspot};

pub const MAX_QUESTS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum QuestKind {
    BugHunt,
    Refactor,
    Feature,
    Archaeology,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum QuestStatus {
    Locked,
    Available,
    Active,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum QuestReward {
    Experience(u32),
    Item(String),
    Knowledge(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: QuestKind,
    pub status: QuestStatus,
    /// Quest ids that must be completed first.
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub rewards: Vec<QuestReward>,
    /// Commit the quest was generated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_commit: Option<String>,
}

/// Summed rewards of one quest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewardTotals {
    pub xp: u32,
    pub items: Vec<String>,
    pub knowledge: Vec<String>,
}

impl Quest {
    pub fn reward_totals(&self) -> RewardTotals {
        let mut totals = RewardTotals::default();
        for reward in &self.rewards {
            match reward {
                QuestReward::Experience(xp) => totals.xp = totals.xp.saturating_add(*xp),
                QuestReward::Item(id) => totals.items.push(id.clone()),
                QuestReward::Knowledge(id) => totals.knowledge.push(id.clone()),
            }
        }
        totals
    }
}

/// Quest ids are sequential per generator.
#[derive(Clone, Debug, Default)]
pub struct QuestGenerator {
    next_id: u32,
}

const BUG_HUNT_VERBS: [&str; 5] = ["Squash", "Hunt", "Debug", "Exterminate", "Patch"];
const FEATURE_VERBS: [&str; 5] = ["Build", "Implement", "Forge", "Craft", "Deploy"];
const REFACTOR_VERBS: [&str; 5] = ["Refactor", "Restructure", "Optimize", "Rebuild", "Rewrite"];
const ARCHAEOLOGY_VERBS: [&str; 5] = ["Explore", "Excavate", "Unearth", "Discover", "Decode"];

const CONVENTIONAL_PREFIXES: [&str; 10] =
    ["fix", "feat", "refactor", "chore", "docs", "style", "test", "perf", "ci", "build"];

impl QuestGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> String {
        self.next_id += 1;
        format!("quest-{}", self.next_id)
    }

    /// One chained quest per sampled commit.
    pub fn quest_graph(&mut self, commits: &[Commit], max_quests: usize) -> Vec<Quest> {
        let mut quests: Vec<Quest> = Vec::new();
        for commit in sample_evenly(commits, max_quests) {
            let kind = quest_kind(commit);
            let id = self.next_id();
            let requirements: Vec<String> = quests.last().map(|q| q.id.clone()).into_iter().collect();

            let changes = commit.lines_changed();
            let mut rewards = vec![QuestReward::Experience(xp_for_change(changes))];
            if let Some(item) = item_for_change(changes) {
                rewards.push(QuestReward::Item(item.to_owned()));
            }
            if commit.files_changed.len() >= 3 {
                rewards.push(QuestReward::Knowledge(format!("knowledge-{}", short_hash(&commit.hash))));
            }

            quests.push(Quest {
                id,
                title: quest_title(kind, &commit.message),
                description: quest_description(kind, commit),
                kind,
                status: if requirements.is_empty() {
                    QuestStatus::Available
                } else {
                    QuestStatus::Locked
                },
                requirements,
                rewards,
                source_commit: Some(commit.hash.clone()),
            });
        }
        quests
    }

    pub fn bug_hunt_quests(&mut self, commits: &[Commit], max_quests: usize) -> Vec<Quest> {
        let bug_fixes: Vec<Commit> = commits.iter().filter(|c| c.is_bug_fix).cloned().collect();
        self.quest_graph(&bug_fixes, max_quests)
    }

    /// Standalone quests for the riskiest hotspots first.
    pub fn hotspot_quests(&mut self, hotspots: &[Hotspot], max_quests: usize) -> Vec<Quest> {
        let mut sorted: Vec<&Hotspot> = hotspots.iter().collect();
        sorted.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
        sample_evenly(&sorted, max_quests)
            .into_iter()
            .map(|hotspot| {
                let file_name = hotspot.path.rsplit('/').next().unwrap_or(&hotspot.path);
                Quest {
                    id: self.next_id(),
                    title: format!("Confront the {file_name} Hotspot"),
                    description: format!(
                        "The file {} has a risk score of {} and complexity {}. A powerful enemy guards this code.",
                        hotspot.path, hotspot.risk_score, hotspot.complexity
                    ),
                    kind: QuestKind::BugHunt,
                    status: QuestStatus::Available,
                    requirements: Vec::new(),
                    rewards: vec![
                        QuestReward::Experience((100.0 + hotspot.risk_score * 50.0).floor() as u32),
                        QuestReward::Item("item-core-dump".to_owned()),
                    ],
                    source_commit: None,
                }
            })
            .collect()
    }
}

/// Picks `n` items at regular intervals, keeping order.
fn sample_evenly<T>(items: &[T], n: usize) -> Vec<&T> {
    if items.len() <= n {
        return items.iter().collect();
    }
    let step = items.len() as f64 / n as f64;
    (0..n)
        .filter_map(|i| items.get((i as f64 * step).floor() as usize))
        .collect()
}

fn quest_kind(commit: &Commit) -> QuestKind {
    if commit.is_bug_fix {
        QuestKind::BugHunt
    } else if commit.lines_changed() > 80 {
        QuestKind::Refactor
    } else {
        QuestKind::Feature
    }
}

fn xp_for_change(changes: u32) -> u32 {
    match changes {
        201.. => 500,
        101..=200 => 300,
        51..=100 => 200,
        21..=50 => 100,
        _ => 50,
    }
}

fn item_for_change(changes: u32) -> Option<&'static str> {
    match changes {
        201.. => Some("item-root-cause"),
        101..=200 => Some("item-memory-snapshot"),
        51..=100 => Some("item-core-dump"),
        _ => None,
    }
}

fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

/// Strips a conventional-commit prefix such as `fix(parser): `.
fn commit_subject(message: &str) -> &str {
    let trimmed = message.trim();
    let Some((head, rest)) = trimmed.split_once(':') else {
        return trimmed;
    };
    let kind = head.split_once('(').map_or(head, |(kind, _)| kind);
    if CONVENTIONAL_PREFIXES.iter().any(|p| p.eq_ignore_ascii_case(kind)) {
        rest.trim()
    } else {
        trimmed
    }
}

fn quest_title(kind: QuestKind, message: &str) -> String {
    let verbs = match kind {
        QuestKind::BugHunt => &BUG_HUNT_VERBS,
        QuestKind::Feature => &FEATURE_VERBS,
        QuestKind::Refactor => &REFACTOR_VERBS,
        QuestKind::Archaeology => &ARCHAEOLOGY_VERBS,
    };
    let verb = verbs[message.len() % verbs.len()];
    let subject = commit_subject(message);
    let mut chars = subject.chars();
    let subject: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{verb} the {subject}")
}

fn quest_description(kind: QuestKind, commit: &Commit) -> String {
    let hash = short_hash(&commit.hash);
    let files = commit.files_changed.len();
    let plural = if files == 1 { "" } else { "s" };
    match kind {
        QuestKind::BugHunt => format!(
            "A bug was introduced in commit {hash}. Track it down across {files} file{plural} and defeat the monster it spawned."
        ),
        QuestKind::Feature => format!(
            "New functionality was added in commit {hash}. Navigate the {files} changed file{plural} and master the new code paths."
        ),
        QuestKind::Refactor => format!(
            "A major restructuring occurred in commit {hash}. {} lines added, {} removed. Survive the refactoring storm.",
            commit.insertions, commit.deletions
        ),
        QuestKind::Archaeology => format!(
            "Ancient code from commit {hash} lies dormant. Explore its {files} artifact{plural} to uncover forgotten knowledge."
        ),
    }
}

/// Quest list plus the ids completed so far.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuestLog {
    pub quests: Vec<Quest>,
    pub completed: BTreeSet<String>,
}

impl QuestLog {
    pub fn new(quests: Vec<Quest>) -> Self {
        let completed = quests
            .iter()
            .filter(|q| q.status == QuestStatus::Completed)
            .map(|q| q.id.clone())
            .collect();
        Self { quests, completed }
    }

    pub fn get(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    pub fn by_status(&self, status: QuestStatus) -> impl Iterator<Item = &Quest> {
        self.quests.iter().filter(move |q| q.status == status)
    }

    /// `available -> active`. Returns `false` for any other status.
    pub fn start(&mut self, id: &str) -> bool {
        match self.quests.iter_mut().find(|q| q.id == id) {
            Some(quest) if quest.status == QuestStatus::Available => {
                quest.status = QuestStatus::Active;
                true
            }
            _ => false,
        }
    }

    /// `active -> completed`, then unlocks dependents. Returns the completed
    /// quest.
    pub fn complete(&mut self, id: &str) -> Option<Quest> {
        let quest = self
            .quests
            .iter_mut()
            .find(|q| q.id == id && q.status == QuestStatus::Active)?;
        quest.status = QuestStatus::Completed;
        let done = quest.clone();
        self.completed.insert(done.id.clone());
        self.unlock_available();
        Some(done)
    }

    /// Active quests tied to `hash`.
    pub fn active_for_commit<'a>(&'a self, hash: &'a str) -> impl Iterator<Item = &'a Quest> + 'a {
        self.by_status(QuestStatus::Active)
            .filter(move |q| q.source_commit.as_deref() == Some(hash))
    }

    fn unlock_available(&mut self) {
        for quest in &mut self.quests {
            if quest.status == QuestStatus::Locked
                && quest.requirements.iter().all(|r| self.completed.contains(r))
            {
                quest.status = QuestStatus::Available;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(hash: &str, message: &str, lines: u32, bug_fix: bool) -> Commit {
        Commit {
            hash: hash.into(),
            message: message.into(),
            files_changed: vec!["a.rs".into(), "b.rs".into(), "c.rs".into()],
            insertions: lines,
            deletions: 0,
            is_bug_fix: bug_fix,
        }
    }

    #[test]
    fn commit_quests_form_a_chain() {
        let commits = [
            commit("aaaaaaaaa", "fix(parser): null deref", 10, true),
            commit("bbbbbbbbb", "feat: add cache", 120, false),
        ];
        let quests = QuestGenerator::new().quest_graph(&commits, MAX_QUESTS);

        assert_eq!(quests[0].status, QuestStatus::Available);
        assert_eq!(quests[0].kind, QuestKind::BugHunt);
        assert!(quests[0].title.ends_with("the Null deref"));
        assert_eq!(quests[1].status, QuestStatus::Locked);
        assert_eq!(quests[1].requirements, vec!["quest-1".to_owned()]);

        let totals = quests[1].reward_totals();
        assert_eq!(totals.xp, 300);
        assert_eq!(totals.items, vec!["item-memory-snapshot".to_owned()]);
        assert_eq!(totals.knowledge, vec!["knowledge-bbbbbbb".to_owned()]);
    }

    #[test]
    fn completing_unlocks_dependents() {
        let commits = [commit("a1", "fix: x", 1, true), commit("b2", "fix: y", 1, true)];
        let mut log = QuestLog::new(QuestGenerator::new().quest_graph(&commits, MAX_QUESTS));

        assert!(log.complete("quest-1").is_none());
        assert!(log.start("quest-1"));
        assert!(!log.start("quest-2"));
        assert!(log.complete("quest-1").is_some());

        assert_eq!(log.get("quest-2").map(|q| q.status), Some(QuestStatus::Available));
        assert!(log.completed.contains("quest-1"));
    }

    #[test]
    fn sampling_caps_quest_count() {
        let commits: Vec<Commit> = (0..10).map(|i| commit(&format!("h{i}"), "chore: tidy", 1, false)).collect();
        let quests = QuestGenerator::new().quest_graph(&commits, 4);
        assert_eq!(quests.len(), 4);
        assert_eq!(quests[1].source_commit.as_deref(), Some("h2"));
    }

    #[test]
    fn hotspot_quests_sorted_by_risk() {
        let hotspots = [
            Hotspot { path: "src/low.rs".into(), risk_score: 2.0, complexity: 3 },
            Hotspot { path: "src/high.rs".into(), risk_score: 9.0, complexity: 30 },
        ];
        let quests = QuestGenerator::new().hotspot_quests(&hotspots, MAX_QUESTS);
        assert_eq!(quests[0].title, "Confront the high.rs Hotspot");
        assert_eq!(quests[0].reward_totals().xp, 550);
    }
}
