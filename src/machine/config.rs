//! Per-machine engine settings.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};

/// How many passing transitions may fire in one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiringPolicy {
    /// At most one transition fires per tick. Wildcards are checked first;
    /// when one fires, the current state's own transitions are skipped for
    /// that tick. A wildcard whose destination is already current is not
    /// considered.
    #[default]
    FirstMatch,

    /// Every passing transition fires, in order, the last one deciding
    /// where the machine ends up. The current state's transitions are the
    /// list captured when the local pass starts, even if one of them moves
    /// the machine elsewhere.
    MultiFire,
}

/// Engine settings for one machine.
///
/// Every field has a default, so a config file only needs the fields it
/// changes.
///
/// # Example
///
/// ```rust
/// use statecraft::{FiringPolicy, MachineConfig};
///
/// let config = MachineConfig::from_json(r#"{ "tick_while_paused": true }"#).unwrap();
///
/// assert!(config.tick_while_paused);
/// assert_eq!(config.firing_policy, FiringPolicy::FirstMatch);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub firing_policy: FiringPolicy,

    /// Keep ticking while the pause signal is raised.
    pub tick_while_paused: bool,

    /// Number of state changes kept for debug views; zero disables.
    pub history_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            firing_policy: FiringPolicy::FirstMatch,
            tick_while_paused: false,
            history_capacity: 32,
        }
    }
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_firing_policy(mut self, policy: FiringPolicy) -> Self {
        self.firing_policy = policy;
        self
    }

    pub fn with_tick_while_paused(mut self, tick_while_paused: bool) -> Self {
        self.tick_while_paused = tick_while_paused;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}
