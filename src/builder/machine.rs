//! Builder for constructing state machines.

use crate::builder::error::{BuildError, BuildErrors};
use crate::builder::transition::TransitionBuilder;
use crate::core::{PauseSignal, Spatial, State};
use crate::machine::{MachineConfig, StateMachine, Transition, ANY_STATE, NO_STATE};
use crate::properties::{PropertyStore, PropertyValue};
use serde::Serialize;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{debug, warn};

type Check = Validation<(), NonEmptyVec<BuildError>>;

/// Builder for constructing state machines with a fluent API.
///
/// Unlike registering on a live [`StateMachine`], the builder checks the
/// whole graph before anything runs and reports every problem it finds at
/// once.
///
/// # Example
///
/// ```rust
/// use statecraft::{PoseHandle, StateMachineBuilder, TransitionBuilder};
///
/// let machine = StateMachineBuilder::<()>::new()
///     .placeholder("Idle")
///     .placeholder("Alert")
///     .default_state("Idle")
///     .transition(TransitionBuilder::new().from("Idle").to("Alert").on_trigger("noise"))
///     .build(PoseHandle::default(), ())
///     .unwrap();
///
/// assert_eq!(machine.state_names(), ["Idle", "Alert"]);
/// ```
pub struct StateMachineBuilder<C> {
    config: MachineConfig,
    states: Vec<(String, Option<Box<dyn State<C>>>)>,
    transitions: Vec<Transition<C>>,
    default_state: Option<String>,
    properties: PropertyStore,
    pause: Option<PauseSignal>,
    pending: Vec<BuildError>,
}

impl<C: 'static> StateMachineBuilder<C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: MachineConfig::default(),
            states: Vec::new(),
            transitions: Vec::new(),
            default_state: None,
            properties: PropertyStore::new(),
            pause: None,
            pending: Vec::new(),
        }
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a state with behaviour.
    pub fn state<S>(mut self, name: &str, state: S) -> Self
    where
        S: State<C> + 'static,
    {
        self.states.push((name.to_string(), Some(Box::new(state))));
        self
    }

    /// Add a state with transitions but no behaviour.
    pub fn placeholder(mut self, name: &str) -> Self {
        self.states.push((name.to_string(), None));
        self
    }

    /// Add a transition using a builder. An incomplete builder is reported
    /// by [`build`](Self::build) together with every other problem.
    pub fn transition(mut self, builder: TransitionBuilder<C>) -> Self {
        match builder.build() {
            Ok(transition) => self.transitions.push(transition),
            Err(error) => self.pending.push(error),
        }
        self
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<C>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<C>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Set the state entered on the first tick (required).
    pub fn default_state(mut self, name: &str) -> Self {
        self.default_state = Some(name.to_string());
        self
    }

    /// Seed a property. States see it from `on_init` onwards.
    pub fn property(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        if let Err(error) = self.properties.set(name, value) {
            self.pending.push(error.into());
        }
        self
    }

    /// Seed properties from the fields of a serialisable struct.
    pub fn import_properties<T: Serialize + ?Sized>(mut self, source: &T) -> Self {
        if let Err(error) = self.properties.import_properties(source) {
            self.pending.push(error.into());
        }
        self
    }

    pub fn pause_signal(mut self, signal: PauseSignal) -> Self {
        self.pause = Some(signal);
        self
    }

    fn has_state(&self, name: &str) -> bool {
        self.states.iter().any(|(registered, _)| registered == name)
    }

    /// Check the configuration, accumulating every problem.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<BuildError>> {
        let mut checks: Vec<Check> = self
            .pending
            .iter()
            .map(|error| Validation::fail(error.clone()))
            .collect();

        checks.push(match &self.default_state {
            None => Validation::fail(BuildError::MissingDefaultState),
            Some(name) if !self.has_state(name) => {
                Validation::fail(BuildError::UnknownDefaultState(name.clone()))
            }
            Some(_) => Validation::success(()),
        });

        let mut seen = HashSet::new();
        for (name, _) in &self.states {
            let check = if name == ANY_STATE || name == NO_STATE {
                Validation::fail(BuildError::ReservedName(name.clone()))
            } else if !seen.insert(name.as_str()) {
                Validation::fail(BuildError::DuplicateState(name.clone()))
            } else {
                Validation::success(())
            };
            checks.push(check);
        }

        for transition in &self.transitions {
            if !transition.is_wildcard() && !self.has_state(&transition.from) {
                checks.push(Validation::fail(BuildError::UnknownSource {
                    from: transition.from.clone(),
                    to: transition.to.clone(),
                }));
            }
            if !self.has_state(&transition.to) {
                checks.push(Validation::fail(BuildError::UnknownDestination {
                    from: transition.from.clone(),
                    to: transition.to.clone(),
                }));
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Validate and assemble the machine.
    pub fn build(
        self,
        anchor: impl Spatial + 'static,
        shared: C,
    ) -> Result<StateMachine<C>, BuildErrors> {
        if let Validation::Failure(errors) = self.validate() {
            let errors: Vec<BuildError> = errors.iter().cloned().collect();
            warn!(count = errors.len(), "state machine failed validation");
            return Err(BuildErrors(errors));
        }

        let mut machine = StateMachine::with_config(anchor, shared, self.config);
        *machine.properties_mut() = self.properties;

        for (name, slot) in self.states {
            machine
                .register_slot(&name, slot)
                .map_err(|error| BuildErrors(vec![error.into()]))?;
        }
        for transition in self.transitions {
            machine.add_transition(transition);
        }
        if let Some(name) = &self.default_state {
            machine.set_default_state(name);
        }
        if let Some(signal) = self.pause {
            machine.set_pause_signal(signal);
        }

        debug!(machine = %machine.id(), states = machine.state_names().len(), "built state machine");
        Ok(machine)
    }
}

impl<C: 'static> Default for StateMachineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{tick_fn, MachineContext, PoseHandle};

    fn errors_of(builder: StateMachineBuilder<()>) -> Vec<BuildError> {
        match builder.validate() {
            Validation::Failure(errors) => errors.iter().cloned().collect(),
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn builder_validates_required_fields() {
        let errors = errors_of(StateMachineBuilder::new().placeholder("Idle"));

        assert_eq!(errors, vec![BuildError::MissingDefaultState]);
    }

    #[test]
    fn builder_accumulates_all_problems() {
        let builder = StateMachineBuilder::new()
            .placeholder("Idle")
            .placeholder("Idle")
            .placeholder(ANY_STATE)
            .default_state("Sleeping")
            .transition(TransitionBuilder::new().from("Idle"))
            .transition(TransitionBuilder::new().from("Ghost").to("Idle"))
            .transition(TransitionBuilder::new().any_state().to("Nowhere"));

        let errors = errors_of(builder);

        assert_eq!(errors.len(), 6);
        assert!(errors.contains(&BuildError::MissingToState));
        assert!(errors.contains(&BuildError::UnknownDefaultState("Sleeping".to_string())));
        assert!(errors.contains(&BuildError::DuplicateState("Idle".to_string())));
        assert!(errors.contains(&BuildError::ReservedName(ANY_STATE.to_string())));
        assert!(errors.contains(&BuildError::UnknownSource {
            from: "Ghost".to_string(),
            to: "Idle".to_string(),
        }));
        assert!(errors.contains(&BuildError::UnknownDestination {
            from: ANY_STATE.to_string(),
            to: "Nowhere".to_string(),
        }));
    }

    #[test]
    fn build_reports_errors_without_constructing() {
        let result = StateMachineBuilder::<()>::new().build(PoseHandle::default(), ());

        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.to_string().contains("Default state not specified"));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let mut machine = StateMachineBuilder::new()
            .placeholder("Idle")
            .state(
                "Patrol",
                tick_fn(|ctx: &mut MachineContext<u32>| ctx.shared += 1),
            )
            .default_state("Idle")
            .transition(TransitionBuilder::new().from("Idle").to("Patrol"))
            .build(PoseHandle::default(), 0)
            .unwrap();

        assert_eq!(machine.default_state(), Some("Idle"));
        machine.tick();
        assert_eq!(machine.current_state_name(), "Patrol");
        assert_eq!(*machine.shared(), 1);
    }

    #[test]
    fn properties_are_seeded_before_states_init() {
        #[derive(Serialize)]
        struct Tuning {
            attack_range: f32,
            cooldown: f32,
        }

        struct ReadsRange;

        impl State<f32> for ReadsRange {
            fn on_init(&mut self, ctx: &mut MachineContext<f32>) {
                ctx.shared = ctx.properties.get("attack_range");
            }
        }

        let machine = StateMachineBuilder::new()
            .import_properties(&Tuning {
                attack_range: 6.5,
                cooldown: 1.0,
            })
            .property("fury", 0_i64)
            .state("Idle", ReadsRange)
            .default_state("Idle")
            .build(PoseHandle::default(), 0.0)
            .unwrap();

        assert_eq!(*machine.shared(), 6.5);
        assert_eq!(machine.properties().get::<f64>("cooldown"), 1.0);
        assert!(machine.properties().has_value("fury"));
    }

    #[test]
    fn property_kind_conflict_is_reported() {
        let builder = StateMachineBuilder::new()
            .placeholder("Idle")
            .default_state("Idle")
            .property("range", 4.0_f32)
            .property("range", "far");

        let errors = errors_of(builder);

        assert!(matches!(errors[..], [BuildError::Property(_)]));
    }

    #[test]
    fn pause_signal_is_attached() {
        let signal = PauseSignal::new();
        let mut machine = StateMachineBuilder::<()>::new()
            .placeholder("Idle")
            .default_state("Idle")
            .pause_signal(signal.clone())
            .build(PoseHandle::default(), ())
            .unwrap();

        signal.pause();

        assert_eq!(machine.tick(), crate::machine::TickOutcome::Paused);
    }
}
