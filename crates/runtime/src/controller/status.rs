use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Subsystems the controller can switch off.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum GameSystem {
    Encounters,
    Combat,
    Progression,
    Quests,
    Inventory,
}

/// Snapshot of every toggle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub master: bool,
    pub shadow: bool,
    /// Individual toggles, ignoring the master switch.
    pub systems: BTreeMap<GameSystem, bool>,
    /// `master && systems[name]`.
    pub effective: BTreeMap<GameSystem, bool>,
}
