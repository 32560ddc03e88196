//! The state machine engine.
//!
//! This module drives states registered by the owner:
//!
//! - **Registry**: named states, unique per machine
//! - **Transitions**: per-state guarded edges plus wildcard edges
//! - **Engine**: tick ordering, lazy default entry, enter/exit hooks and
//!   event forwarding
//!
//! # Tick Order
//!
//! 1. Lazy entry into the default state on the first tick
//! 2. Wildcard transitions, in registration order
//! 3. The current state's transitions, in registration order
//! 4. `on_tick` of whichever state is current afterwards
//!
//! How many transitions may fire per tick is governed by [`FiringPolicy`].

mod config;
mod engine;
mod error;
mod registry;
mod transition;

pub use config::{FiringPolicy, MachineConfig};
pub use engine::{StateMachine, TickOutcome};
pub use error::{ConfigError, MachineError};
pub use registry::{StateRegistry, StateSlot};
pub use transition::{Transition, TransitionCallback, TransitionTable};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Reserved source name for transitions evaluated regardless of the
/// current state.
pub const ANY_STATE: &str = "AnyState";

/// Name reported as current before the machine has entered any state.
pub const NO_STATE: &str = "None";

/// Unique identity of a machine, used as the key in debug registries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineId(Uuid);

impl MachineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MachineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
