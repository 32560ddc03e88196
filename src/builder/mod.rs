//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders that check a whole machine
//! description up front, accumulating every configuration problem instead
//! of stopping at the first one.

pub mod error;
pub mod machine;
pub mod transition;

pub use error::{BuildError, BuildErrors};
pub use machine::StateMachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::{Guard, MachineContext};
use crate::machine::Transition;

/// Create a transition with a guard predicate.
///
/// # Example
///
/// ```
/// use statecraft::builder::guarded_transition;
/// use statecraft::{MachineContext, PoseHandle};
///
/// let transition = guarded_transition("Idle", "Chasing", |ctx: &mut MachineContext<()>| {
///     ctx.distance_to_target().is_some_and(|d| d <= 15.0)
/// });
///
/// let mut ctx = MachineContext::new(PoseHandle::default(), ());
/// assert!(!transition.can_execute(&mut ctx));
/// ```
pub fn guarded_transition<C, F>(from: &str, to: &str, guard: F) -> Transition<C>
where
    C: 'static,
    F: Fn(&mut MachineContext<C>) -> bool + 'static,
{
    Transition::new(from, to, Guard::new(guard))
}

/// Create a transition that fires once each time `trigger` is armed.
pub fn trigger_transition<C: 'static>(from: &str, to: &str, trigger: &str) -> Transition<C> {
    Transition::new(from, to, Guard::trigger(trigger))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PoseHandle;
    use glam::Vec3;

    #[test]
    fn guarded_transition_respects_guard() {
        let transition = guarded_transition("Idle", "Chasing", |ctx: &mut MachineContext<()>| {
            ctx.distance_to_target().is_some_and(|d| d <= 15.0)
        });
        let mut ctx = MachineContext::new(PoseHandle::default(), ());

        assert!(!transition.can_execute(&mut ctx));

        ctx.set_target(Vec3::new(10.0, 0.0, 0.0));
        assert!(transition.can_execute(&mut ctx));
    }

    #[test]
    fn trigger_transition_consumes_trigger() {
        let transition = trigger_transition::<()>("Idle", "Roaring", "roar");
        let mut ctx = MachineContext::new(PoseHandle::default(), ());
        ctx.triggers.set_trigger("roar", true);

        assert!(transition.can_execute(&mut ctx));
        assert!(!transition.can_execute(&mut ctx));
    }
}
