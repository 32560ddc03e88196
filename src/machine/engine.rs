//! State machine that drives registered states once per frame.

use super::config::{FiringPolicy, MachineConfig};
use super::error::MachineError;
use super::registry::{StateRegistry, StateSlot};
use super::transition::{Transition, TransitionTable};
use super::{MachineId, ANY_STATE, NO_STATE};
use crate::core::{
    Guard, MachineContext, PauseSignal, Spatial, State, TransitionHistory, TransitionRecord,
    TransitionSource,
};
use crate::debug::{MachineSnapshot, SnapshotEdge};
use crate::properties::PropertyStore;
use crate::triggers::TriggerSet;
use chrono::Utc;
use std::fmt;
use tracing::{debug, trace, warn};

/// Result of a single [`StateMachine::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The pause signal was raised; nothing ran
    Paused,

    /// The tick ran, changing state `transitions` times (lazy entry included)
    Ticked { transitions: usize },
}

/// A frame-driven state machine for one agent.
///
/// The machine is built by its owner, filled with states and transitions,
/// and then ticked once per frame. `C` is the owner's shared payload
/// (animator handles, controllers, ...), handed to every hook and guard
/// through [`MachineContext::shared`].
///
/// # Example
///
/// ```rust
/// use statecraft::{MachineContext, PoseHandle, State, StateMachine};
///
/// struct Circling;
///
/// impl State<u32> for Circling {
///     fn on_tick(&mut self, ctx: &mut MachineContext<u32>) {
///         ctx.shared += 1;
///     }
/// }
///
/// let mut machine = StateMachine::new(PoseHandle::default(), 0_u32);
/// machine.register_state("Circling", Circling).unwrap();
/// machine.set_default_state("Circling");
///
/// assert_eq!(machine.current_state_name(), "None");
/// machine.tick();
/// machine.tick();
/// assert_eq!(machine.current_state_name(), "Circling");
/// assert_eq!(*machine.shared(), 2);
/// ```
pub struct StateMachine<C = ()> {
    id: MachineId,
    config: MachineConfig,
    registry: StateRegistry<C>,
    transitions: TransitionTable<C>,
    default_state: Option<String>,
    started: bool,
    pause: Option<PauseSignal>,
    history: TransitionHistory,
    context: MachineContext<C>,
}

impl<C: 'static> StateMachine<C> {
    /// Create a machine anchored to `anchor` with default settings.
    pub fn new(anchor: impl Spatial + 'static, shared: C) -> Self {
        Self::with_config(anchor, shared, MachineConfig::default())
    }

    pub fn with_config(anchor: impl Spatial + 'static, shared: C, config: MachineConfig) -> Self {
        Self {
            id: MachineId::new(),
            history: TransitionHistory::with_capacity(config.history_capacity),
            config,
            registry: StateRegistry::new(),
            transitions: TransitionTable::new(),
            default_state: None,
            started: false,
            pause: None,
            context: MachineContext::new(anchor, shared),
        }
    }

    pub fn id(&self) -> MachineId {
        self.id
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Register a state with behaviour. `on_init` runs immediately.
    pub fn register_state<S>(&mut self, name: &str, state: S) -> Result<(), MachineError>
    where
        S: State<C> + 'static,
    {
        self.register_slot(name, Some(Box::new(state)))
    }

    /// Register a state that has transitions but no behaviour.
    pub fn register_placeholder(&mut self, name: &str) -> Result<(), MachineError> {
        self.register_slot(name, None)
    }

    pub fn register_slot(&mut self, name: &str, slot: StateSlot<C>) -> Result<(), MachineError> {
        self.registry.register(name, slot)?;
        if let Some(state) = self.registry.body_mut(name) {
            state.on_init(&mut self.context);
        }
        debug!(machine = %self.id, state = name, "registered state");
        Ok(())
    }

    /// Register a transition from `from` (or [`ANY_STATE`]) to `to`.
    pub fn register_transition<F>(&mut self, from: &str, to: &str, predicate: F)
    where
        F: Fn(&mut MachineContext<C>) -> bool + 'static,
    {
        self.add_transition(Transition::new(from, to, Guard::new(predicate)));
    }

    /// Register a transition with a side effect that runs when it fires.
    pub fn register_transition_with<F, G>(
        &mut self,
        from: &str,
        to: &str,
        predicate: F,
        on_transition: G,
    ) where
        F: Fn(&mut MachineContext<C>) -> bool + 'static,
        G: FnMut(&mut MachineContext<C>) + 'static,
    {
        self.add_transition(Transition::new(from, to, Guard::new(predicate)).with_callback(on_transition));
    }

    pub fn add_transition(&mut self, transition: Transition<C>) {
        trace!(
            machine = %self.id,
            from = %transition.from,
            to = %transition.to,
            "registered transition"
        );
        self.transitions.register(transition);
    }

    /// Record the state entered on the first tick. Does not enter it.
    pub fn set_default_state(&mut self, name: &str) {
        self.default_state = Some(name.to_string());
    }

    pub fn default_state(&self) -> Option<&str> {
        self.default_state.as_deref()
    }

    pub fn set_pause_signal(&mut self, signal: PauseSignal) {
        self.pause = Some(signal);
    }

    /// Whether the first tick has run.
    pub fn is_started(&self) -> bool {
        self.started
    }

    fn is_paused(&self) -> bool {
        !self.config.tick_while_paused && self.pause.as_ref().is_some_and(PauseSignal::is_paused)
    }

    /// Advance the machine by one frame.
    ///
    /// On the first tick the default state is entered, unless a state was
    /// already entered by hand. Transitions are then evaluated, and the
    /// state that is current afterwards gets its `on_tick`, so a state
    /// entered this frame also ticks this frame.
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_paused() {
            trace!(machine = %self.id, "paused, skipping tick");
            return TickOutcome::Paused;
        }

        self.context.frame += 1;
        let mut transitions = 0;

        if !self.started {
            self.started = true;
            if self.context.state_name == NO_STATE && self.enter_default() {
                transitions += 1;
            }
        }

        transitions += self.evaluate_transitions();

        if let Some(state) = self.registry.body_mut(&self.context.state_name) {
            state.on_tick(&mut self.context);
        }

        TickOutcome::Ticked { transitions }
    }

    /// Switch to `name` immediately, running exit and enter hooks.
    ///
    /// Unknown names are logged and ignored; the machine stays where it is
    /// and no hooks run. Returns whether the switch happened.
    pub fn enter_state(&mut self, name: &str) -> bool {
        self.change_state(name, TransitionSource::Manual)
    }

    /// Forward an external event to the current state only.
    ///
    /// Events are not queued: with no current state, or a placeholder
    /// state, the event is dropped.
    pub fn on_event(&mut self, kind: &str, id: i32) {
        match self.registry.body_mut(&self.context.state_name) {
            Some(state) => state.on_event(&mut self.context, kind, id),
            None => trace!(
                machine = %self.id,
                state = %self.context.state_name,
                kind,
                id,
                "event dropped"
            ),
        }
    }

    fn enter_default(&mut self) -> bool {
        match self.default_state.clone() {
            Some(name) => self.change_state(&name, TransitionSource::Initial),
            None => {
                warn!(machine = %self.id, "no default state set, machine starts without a state");
                false
            }
        }
    }

    fn evaluate_transitions(&mut self) -> usize {
        let policy = self.config.firing_policy;

        let fired = self.evaluate_wildcards(policy);
        if fired > 0 && policy == FiringPolicy::FirstMatch {
            return fired;
        }

        fired + self.evaluate_local(policy)
    }

    fn evaluate_wildcards(&mut self, policy: FiringPolicy) -> usize {
        let mut fired = 0;

        for index in 0..self.transitions.wildcard().len() {
            let transition = &mut self.transitions.wildcard_mut()[index];
            if policy == FiringPolicy::FirstMatch && transition.to == self.context.state_name {
                continue;
            }
            if !transition.can_execute(&mut self.context) {
                continue;
            }

            transition.notify(&mut self.context);
            let destination = transition.to.clone();
            if self.change_state(&destination, TransitionSource::Wildcard) {
                fired += 1;
            }
            if policy == FiringPolicy::FirstMatch {
                break;
            }
        }

        fired
    }

    fn evaluate_local(&mut self, policy: FiringPolicy) -> usize {
        let source = self.context.state_name.clone();
        let mut fired = 0;

        for index in 0..self.transitions.outgoing(&source).len() {
            let transition = &mut self.transitions.outgoing_mut(&source)[index];
            if !transition.can_execute(&mut self.context) {
                continue;
            }

            transition.notify(&mut self.context);
            let destination = transition.to.clone();
            if self.change_state(&destination, TransitionSource::Local) {
                fired += 1;
            }
            if policy == FiringPolicy::FirstMatch {
                break;
            }
        }

        fired
    }

    fn change_state(&mut self, name: &str, source: TransitionSource) -> bool {
        if !self.registry.contains(name) {
            warn!(
                machine = %self.id,
                state = name,
                current = %self.context.state_name,
                "cannot enter unregistered state"
            );
            return false;
        }

        let previous = self.context.state_name.clone();
        if let Some(state) = self.registry.body_mut(&previous) {
            state.on_exit(&mut self.context);
        }

        self.context.enter(name);

        if let Some(state) = self.registry.body_mut(name) {
            state.on_enter(&mut self.context);
        }

        debug!(
            machine = %self.id,
            from = %previous,
            to = name,
            ?source,
            frame = self.context.frame,
            "state changed"
        );
        self.history.record(TransitionRecord {
            from: previous,
            to: name.to_string(),
            frame: self.context.frame,
            timestamp: Utc::now(),
            source,
        });
        true
    }

    /// Name of the active state, or [`NO_STATE`] before the first tick.
    pub fn current_state_name(&self) -> &str {
        self.context.current_state_name()
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Registered state names, in registration order.
    pub fn state_names(&self) -> &[String] {
        self.registry.names()
    }

    pub fn transitions(&self) -> &TransitionTable<C> {
        &self.transitions
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    pub fn frame(&self) -> u64 {
        self.context.frame()
    }

    pub fn frames_in_state(&self) -> u64 {
        self.context.frames_in_state()
    }

    pub fn context(&self) -> &MachineContext<C> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut MachineContext<C> {
        &mut self.context
    }

    pub fn properties(&self) -> &PropertyStore {
        &self.context.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.context.properties
    }

    pub fn triggers(&self) -> &TriggerSet {
        &self.context.triggers
    }

    pub fn set_trigger(&mut self, name: &str, active: bool) {
        self.context.triggers.set_trigger(name, active);
    }

    pub fn get_trigger(&mut self, name: &str, pop: bool) -> bool {
        self.context.triggers.get_trigger(name, pop)
    }

    pub fn shared(&self) -> &C {
        &self.context.shared
    }

    pub fn shared_mut(&mut self) -> &mut C {
        &mut self.context.shared
    }

    pub fn distance_to_target(&self) -> Option<f32> {
        self.context.distance_to_target()
    }

    /// Capture the machine's structure and recent activity for debug views.
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            id: self.id,
            current: self.context.state_name.clone(),
            default_state: self.default_state.clone(),
            states: self.registry.names().to_vec(),
            edges: self
                .transitions
                .edges()
                .into_iter()
                .map(|(from, to)| SnapshotEdge {
                    from: from.to_string(),
                    to: to.to_string(),
                    wildcard: from == ANY_STATE,
                })
                .collect(),
            frame: self.context.frame,
            triggers: self.context.triggers.armed().map(str::to_string).collect(),
            history: self.history.iter().cloned().collect(),
        }
    }
}

impl<C: 'static> fmt::Debug for StateMachine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("current", &self.context.state_name)
            .field("default_state", &self.default_state)
            .field("states", &self.registry.names())
            .field("started", &self.started)
            .field("frame", &self.context.frame)
            .finish_non_exhaustive()
    }
}
