//! Serialisable machine snapshots.

use crate::core::TransitionRecord;
use crate::machine::{MachineId, ANY_STATE};
use serde::{Deserialize, Serialize};

/// A transition edge as seen by debug tools.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    pub from: String,
    pub to: String,
    /// The edge leaves the wildcard pseudo-state
    pub wildcard: bool,
}

/// Point-in-time view of a machine, taken with
/// [`StateMachine::snapshot`](crate::machine::StateMachine::snapshot).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub id: MachineId,
    pub current: String,
    pub default_state: Option<String>,
    /// Registered states, in registration order
    pub states: Vec<String>,
    pub edges: Vec<SnapshotEdge>,
    pub frame: u64,
    pub triggers: Vec<String>,
    pub history: Vec<TransitionRecord>,
}

impl MachineSnapshot {
    /// Graph nodes: the registered states, preceded by the wildcard
    /// pseudo-state when any wildcard edge exists.
    pub fn nodes(&self) -> Vec<&str> {
        let wildcard = self.edges.iter().any(|edge| edge.wildcard);
        wildcard
            .then_some(ANY_STATE)
            .into_iter()
            .chain(self.states.iter().map(String::as_str))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
