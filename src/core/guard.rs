//! Guard predicates for controlling state transitions.
//!
//! Guards are boolean functions over the machine context that decide whether
//! a transition fires. They may consume triggers, which is the only mutation
//! a guard is expected to perform.

use super::context::MachineContext;

/// Predicate that determines if a transition can fire.
///
/// Guards are evaluated every tick for every candidate transition, so they
/// should be cheap. A guard that pops a trigger consumes it even when a
/// later check in the same guard fails.
///
/// # Example
///
/// ```rust
/// use statecraft::{Guard, MachineContext, PoseHandle};
///
/// let mut ctx = MachineContext::new(PoseHandle::default(), ());
/// let alerted = Guard::trigger("alerted");
///
/// assert!(!alerted.check(&mut ctx));
///
/// ctx.triggers.set_trigger("alerted", true);
/// assert!(alerted.check(&mut ctx));
/// assert!(!alerted.check(&mut ctx)); // consumed
/// ```
pub struct Guard<C> {
    predicate: Box<dyn Fn(&mut MachineContext<C>) -> bool>,
}

impl<C: 'static> Guard<C> {
    /// Create a guard from a predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&mut MachineContext<C>) -> bool + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// A guard that always passes.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// A guard that passes once per arming of `name`, consuming the trigger.
    pub fn trigger(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(move |ctx| ctx.triggers.pop_trigger(&name))
    }

    /// Passes only when both guards pass. `other` is not evaluated when
    /// `self` fails, so a trigger in `other` is left armed.
    pub fn and(self, other: Guard<C>) -> Self {
        Self::new(move |ctx| self.check(ctx) && other.check(ctx))
    }

    /// Passes when either guard passes, short-circuiting left to right.
    pub fn or(self, other: Guard<C>) -> Self {
        Self::new(move |ctx| self.check(ctx) || other.check(ctx))
    }

    /// Check if the guard allows the transition.
    pub fn check(&self, ctx: &mut MachineContext<C>) -> bool {
        (self.predicate)(ctx)
    }
}

impl<C> std::fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Guard(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PoseHandle;
    use glam::Vec3;

    fn context() -> MachineContext<()> {
        MachineContext::new(PoseHandle::default(), ())
    }

    #[test]
    fn guard_evaluates_predicate() {
        let mut ctx = context();
        ctx.properties.set("health", 10.0_f32).unwrap();
        let low_health = Guard::new(|ctx: &mut MachineContext<()>| {
            ctx.properties.get::<f32>("health") < 25.0
        });

        assert!(low_health.check(&mut ctx));
        ctx.properties.set("health", 80.0_f32).unwrap();
        assert!(!low_health.check(&mut ctx));
    }

    #[test]
    fn always_passes() {
        let mut ctx = context();
        assert!(Guard::<()>::always().check(&mut ctx));
    }

    #[test]
    fn trigger_guard_consumes_trigger() {
        let mut ctx = context();
        let guard = Guard::trigger("stagger");

        ctx.triggers.set_trigger("stagger", true);
        assert!(guard.check(&mut ctx));
        assert!(!ctx.triggers.peek_trigger("stagger"));
    }

    #[test]
    fn and_short_circuits_before_popping() {
        let mut ctx = context();
        ctx.triggers.set_trigger("fire", true);
        let guard = Guard::new(|_: &mut MachineContext<()>| false).and(Guard::trigger("fire"));

        assert!(!guard.check(&mut ctx));
        assert!(ctx.triggers.peek_trigger("fire"));
    }

    #[test]
    fn or_passes_when_either_side_passes() {
        let mut ctx = context();
        ctx.set_target(Vec3::new(3.0, 0.0, 4.0));
        let guard = Guard::trigger("taunted").or(Guard::new(|ctx: &mut MachineContext<()>| {
            ctx.distance_to_target().is_some_and(|d| d <= 5.0)
        }));

        assert!(guard.check(&mut ctx));
    }

    #[test]
    fn guard_is_deterministic_without_triggers() {
        let mut ctx = context();
        let guard = Guard::new(|ctx: &mut MachineContext<()>| !ctx.has_target());

        let result1 = guard.check(&mut ctx);
        let result2 = guard.check(&mut ctx);

        assert_eq!(result1, result2);
    }
}
