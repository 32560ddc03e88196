//! Statecraft: a frame-driven state machine engine for game AI
//!
//! Statecraft drives the behaviour of game agents (enemies, companions,
//! player behaviour stacks) from a single `tick()` call per frame. A machine
//! owns a set of named states, guarded transitions between them, and a small
//! per-agent blackboard the states read and write.
//!
//! # Core Concepts
//!
//! - **State**: lifecycle hooks (`on_init`, `on_enter`, `on_exit`, `on_tick`,
//!   `on_event`) via the [`State`] trait
//! - **Transitions**: guarded edges, including wildcard edges from
//!   [`ANY_STATE`] that are evaluated before the current state's own edges
//! - **Properties**: a keyed, kind-checked value store for per-agent tunables
//!   and scratch values such as cooldown timers
//! - **Triggers**: one-shot flags consumed by the transition that reads them
//! - **Debug snapshots**: serialisable views of a machine plus a
//!   force-directed graph layout for inspection tools
//!
//! # Example
//!
//! ```rust
//! use glam::Vec3;
//! use statecraft::{PoseHandle, StateMachine, ANY_STATE};
//!
//! let target = PoseHandle::at(Vec3::new(10.0, 0.0, 0.0));
//! let mut machine = StateMachine::new(PoseHandle::default(), ());
//! machine.context_mut().set_target(target.clone());
//!
//! machine.register_placeholder("Idle").unwrap();
//! machine.register_placeholder("Chasing").unwrap();
//! machine.set_default_state("Idle");
//!
//! machine.register_transition(ANY_STATE, "Idle", |ctx| {
//!     ctx.distance_to_target().is_some_and(|d| d > 25.0)
//! });
//! machine.register_transition("Idle", "Chasing", |ctx| {
//!     ctx.distance_to_target().is_some_and(|d| d <= 15.0)
//! });
//!
//! machine.tick();
//! assert_eq!(machine.current_state_name(), "Chasing");
//!
//! target.set_position(Vec3::new(30.0, 0.0, 0.0));
//! machine.tick();
//! assert_eq!(machine.current_state_name(), "Idle");
//! ```

pub mod builder;
pub mod core;
pub mod debug;
pub mod machine;
pub mod properties;
pub mod triggers;

// Re-export commonly used types
pub use crate::core::{
    tick_fn, FnState, Guard, MachineContext, PauseSignal, Pose, PoseHandle, Spatial, State,
    TransitionHistory, TransitionRecord, TransitionSource,
};
pub use builder::{BuildError, BuildErrors, StateMachineBuilder, TransitionBuilder};
pub use debug::{GraphLayout, LayoutConfig, MachineSnapshot, VisualizerRegistry};
pub use machine::{
    FiringPolicy, MachineConfig, MachineError, MachineId, StateMachine, TickOutcome, Transition,
    ANY_STATE, NO_STATE,
};
pub use properties::{EntityId, PropertyError, PropertyKind, PropertyStore, PropertyValue};
pub use triggers::TriggerSet;
