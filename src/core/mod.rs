//! Core state machine types.
//!
//! This module contains the building blocks the engine is assembled from:
//! - State lifecycle hooks via the `State` trait
//! - Guard predicates for transition control
//! - The per-machine context handed to states and guards
//! - Anchor/target geometry and the pause signal
//! - Bounded transition history
//!
//! Nothing in here drives a machine; see [`crate::machine`] for the engine.

mod context;
mod guard;
mod history;
mod spatial;
mod state;

pub use context::{MachineContext, PauseSignal};
pub use guard::Guard;
pub use history::{TransitionHistory, TransitionRecord, TransitionSource};
pub use spatial::{Pose, PoseHandle, Spatial};
pub use state::{tick_fn, FnState, State};
