use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::GameSystem;
use crate::events::Topic;

/// Side effects a suppressed handler would have produced.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuppressedEffects {
    /// Session fields the handler would have written.
    pub store_updates: Vec<String>,
    pub bus_emissions: Vec<Topic>,
}

/// What a gated-off subsystem would have done with one event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowTraceEntry {
    pub timestamp: DateTime<Utc>,
    pub system: GameSystem,
    /// Topic name of the event, or `battle:victory` for withheld rewards.
    pub incoming_event: String,
    pub would_have: String,
    pub payload: serde_json::Value,
    pub suppressed: SuppressedEffects,
}
