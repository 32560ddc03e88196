//! Explicit registry of machines published for debug viewers.

use super::layout::{GraphLayout, LayoutConfig};
use super::snapshot::MachineSnapshot;
use crate::machine::{MachineId, StateMachine};
use serde::Serialize;

/// A labelled snapshot held by the registry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VisualizerEntry {
    pub label: String,
    pub snapshot: MachineSnapshot,
}

/// Snapshots published by running machines, for a viewer to enumerate.
///
/// The registry is an ordinary value the owner creates and passes around;
/// there is no global instance. It only grows: publishing a machine that is
/// already listed refreshes its snapshot in place, and nothing is ever
/// removed. Create a new registry per play session.
///
/// # Example
///
/// ```rust
/// use statecraft::{PoseHandle, StateMachine, VisualizerRegistry};
///
/// let mut registry = VisualizerRegistry::new();
/// let mut machine = StateMachine::new(PoseHandle::default(), ());
/// machine.register_placeholder("Idle").unwrap();
/// machine.set_default_state("Idle");
///
/// registry.publish("harrier-01", &machine);
/// machine.tick();
/// registry.publish("harrier-01", &machine);
///
/// assert_eq!(registry.len(), 1);
/// assert_eq!(registry.get(machine.id()).unwrap().snapshot.current, "Idle");
/// ```
#[derive(Clone, Debug, Default, Serialize)]
pub struct VisualizerRegistry {
    entries: Vec<VisualizerEntry>,
}

impl VisualizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or refresh the snapshot of `machine`.
    pub fn publish<C: 'static>(&mut self, label: &str, machine: &StateMachine<C>) {
        self.publish_snapshot(label, machine.snapshot());
    }

    pub fn publish_snapshot(&mut self, label: &str, snapshot: MachineSnapshot) {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.snapshot.id == snapshot.id)
        {
            Some(entry) => {
                entry.label = label.to_string();
                entry.snapshot = snapshot;
            }
            None => self.entries.push(VisualizerEntry {
                label: label.to_string(),
                snapshot,
            }),
        }
    }

    pub fn get(&self, id: MachineId) -> Option<&VisualizerEntry> {
        self.entries.iter().find(|entry| entry.snapshot.id == id)
    }

    pub fn find_by_label(&self, label: &str) -> Option<&VisualizerEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    /// Entries in publication order.
    pub fn entries(&self) -> &[VisualizerEntry] {
        &self.entries
    }

    /// Lay out the graph of a published machine.
    pub fn layout(&self, id: MachineId, config: &LayoutConfig) -> Option<GraphLayout> {
        self.get(id)
            .map(|entry| GraphLayout::compute(&entry.snapshot, config))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
