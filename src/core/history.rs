//! State transition history tracking.
//!
//! Keeps a bounded, ordered record of the state changes a machine went
//! through, for debug views and tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// What caused a state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionSource {
    /// Lazy entry into the default state on the first tick
    Initial,
    /// A transition registered on the wildcard source
    Wildcard,
    /// A transition registered on the state that was current
    Local,
    /// A direct `enter_state` call
    Manual,
}

/// Record of a single state change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state being left
    pub from: String,
    /// The state being entered
    pub to: String,
    /// Machine frame on which the change happened
    pub frame: u64,
    /// Wall-clock time of the change
    pub timestamp: DateTime<Utc>,
    pub source: TransitionSource,
}

/// Ordered history of state changes, bounded to the most recent entries.
///
/// A capacity of zero disables recording.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use statecraft::{TransitionHistory, TransitionRecord, TransitionSource};
///
/// let mut history = TransitionHistory::with_capacity(8);
/// history.record(TransitionRecord {
///     from: "Idle".to_string(),
///     to: "Chasing".to_string(),
///     frame: 3,
///     timestamp: Utc::now(),
///     source: TransitionSource::Local,
/// });
///
/// assert_eq!(history.get_path(), vec!["Idle", "Chasing"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionHistory {
    records: VecDeque<TransitionRecord>,
    capacity: usize,
}

impl Default for TransitionHistory {
    fn default() -> Self {
        Self::with_capacity(32)
    }
}

impl TransitionHistory {
    /// A history keeping at most `capacity` records. Storage grows on
    /// demand, so a large capacity costs nothing up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity,
        }
    }

    /// Append a record, evicting the oldest once full.
    pub fn record(&mut self, record: TransitionRecord) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// States traversed, oldest first: the `from` of the oldest retained
    /// record followed by the `to` of every record.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from.as_str());
        }
        path.extend(self.records.iter().map(|record| record.to.as_str()));
        path
    }

    /// Wall-clock time between the oldest and newest retained records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
