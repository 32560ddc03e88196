//! Core State trait for state machine states.
//!
//! A state is a named behavioural mode of an agent. The machine owns every
//! registered state and calls its hooks as the agent moves through them.

use super::context::MachineContext;

/// Lifecycle hooks for a state machine state.
///
/// Every hook has an empty default, so a state only implements what it
/// needs. Hooks receive the machine's [`MachineContext`] instead of holding a
/// back-reference to the machine, which gives them the anchor/target
/// geometry, the property store, the trigger set and the shared context.
///
/// # Hook Order
///
/// - `on_init`: once, when the state is registered
/// - `on_enter`: every time the machine switches into the state
/// - `on_tick`: once per frame while the state is current
/// - `on_event`: for every external event while the state is current
/// - `on_exit`: every time the machine switches away from the state
///
/// Hooks cannot switch states themselves. A hook that wants to leave, for
/// example on an animation event, arms a trigger that a transition guard
/// consumes; the switch then happens on the next tick, not the current
/// frame.
///
/// # Example
///
/// ```rust
/// use statecraft::{MachineContext, State};
///
/// struct Hover {
///     bob_time: f32,
/// }
///
/// impl State<()> for Hover {
///     fn on_enter(&mut self, _ctx: &mut MachineContext<()>) {
///         self.bob_time = 0.0;
///     }
///
///     fn on_tick(&mut self, ctx: &mut MachineContext<()>) {
///         self.bob_time += ctx.properties.get::<f32>("dt");
///     }
/// }
/// ```
pub trait State<C> {
    /// Called once when the state is registered with a machine.
    fn on_init(&mut self, _ctx: &mut MachineContext<C>) {}

    /// Called when the machine switches into this state.
    fn on_enter(&mut self, _ctx: &mut MachineContext<C>) {}

    /// Called when the machine switches away from this state.
    fn on_exit(&mut self, _ctx: &mut MachineContext<C>) {}

    /// Called once per frame while this state is current, after transitions.
    fn on_tick(&mut self, _ctx: &mut MachineContext<C>) {}

    /// Called for externally sourced events, e.g. animation callbacks.
    /// To leave the state in response, arm a trigger; the transition that
    /// reads it fires on the next tick.
    fn on_event(&mut self, _ctx: &mut MachineContext<C>, _kind: &str, _id: i32) {}
}

/// A state whose only behaviour is a per-frame closure.
pub struct FnState<F> {
    on_tick: F,
}

/// Wrap a closure as a state that runs it on every tick.
pub fn tick_fn<C, F>(on_tick: F) -> FnState<F>
where
    F: FnMut(&mut MachineContext<C>),
{
    FnState { on_tick }
}

impl<C, F> State<C> for FnState<F>
where
    F: FnMut(&mut MachineContext<C>),
{
    fn on_tick(&mut self, ctx: &mut MachineContext<C>) {
        (self.on_tick)(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PoseHandle;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl State<()> for Recorder {
        fn on_enter(&mut self, _ctx: &mut MachineContext<()>) {
            self.calls.push("enter".to_string());
        }

        fn on_event(&mut self, _ctx: &mut MachineContext<()>, kind: &str, id: i32) {
            self.calls.push(format!("{kind}:{id}"));
        }
    }

    fn context() -> MachineContext<()> {
        MachineContext::new(PoseHandle::default(), ())
    }

    #[test]
    fn default_hooks_are_no_ops() {
        struct Inert;
        impl State<()> for Inert {}

        let mut ctx = context();
        let mut state = Inert;
        state.on_init(&mut ctx);
        state.on_enter(&mut ctx);
        state.on_tick(&mut ctx);
        state.on_event(&mut ctx, "anim", 1);
        state.on_exit(&mut ctx);
    }

    #[test]
    fn overridden_hooks_are_called() {
        let mut ctx = context();
        let mut state = Recorder::default();

        state.on_enter(&mut ctx);
        state.on_event(&mut ctx, "anim", 7);

        assert_eq!(state.calls, vec!["enter", "anim:7"]);
    }

    #[test]
    fn tick_fn_runs_closure_each_tick() {
        let mut ctx = context();
        let mut state = tick_fn(|ctx: &mut MachineContext<()>| {
            ctx.properties.get_add_set("ticks", 1);
        });

        state.on_tick(&mut ctx);
        state.on_tick(&mut ctx);

        assert_eq!(ctx.properties.get::<i32>("ticks"), 2);
    }
}
