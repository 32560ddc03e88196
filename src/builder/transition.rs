//! Builder for constructing state transitions.

use crate::builder::error::BuildError;
use crate::core::{Guard, MachineContext};
use crate::machine::{Transition, TransitionCallback, ANY_STATE};

/// Builder for constructing transitions with a fluent API.
///
/// A transition without a guard always fires.
pub struct TransitionBuilder<C> {
    from: Option<String>,
    to: Option<String>,
    guard: Option<Guard<C>>,
    on_transition: Option<TransitionCallback<C>>,
}

impl<C: 'static> TransitionBuilder<C> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            guard: None,
            on_transition: None,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: &str) -> Self {
        self.from = Some(state.to_string());
        self
    }

    /// Evaluate this transition whatever the current state is.
    pub fn any_state(self) -> Self {
        self.from(ANY_STATE)
    }

    /// Set the target state (required).
    pub fn to(mut self, state: &str) -> Self {
        self.to = Some(state.to_string());
        self
    }

    pub fn guard(mut self, guard: Guard<C>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&mut MachineContext<C>) -> bool + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Fire once per arming of `name`.
    pub fn on_trigger(self, name: &str) -> Self {
        self.guard(Guard::trigger(name))
    }

    /// Side effect to run when the transition fires.
    pub fn on_transition<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut MachineContext<C>) + 'static,
    {
        self.on_transition = Some(Box::new(callback));
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<C>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        Ok(Transition {
            from,
            to,
            guard: self.guard.unwrap_or_else(Guard::always),
            on_transition: self.on_transition,
        })
    }
}

impl<C: 'static> Default for TransitionBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
