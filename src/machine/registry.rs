//! Named state storage.

use super::error::MachineError;
use super::{ANY_STATE, NO_STATE};
use crate::core::State;
use std::collections::HashMap;

/// A registered state body; `None` is a placeholder state with
/// transitions but no behaviour.
pub type StateSlot<C> = Option<Box<dyn State<C>>>;

/// Owns every state of a machine, keyed by unique name.
pub struct StateRegistry<C> {
    states: HashMap<String, StateSlot<C>>,
    order: Vec<String>,
}

impl<C> Default for StateRegistry<C> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<C: 'static> StateRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `state` under `name`. Fails on duplicates and reserved names.
    pub fn register(&mut self, name: &str, state: StateSlot<C>) -> Result<(), MachineError> {
        if name == ANY_STATE || name == NO_STATE {
            return Err(MachineError::ReservedName(name.to_string()));
        }
        if self.states.contains_key(name) {
            return Err(MachineError::DuplicateState(name.to_string()));
        }

        self.states.insert(name.to_string(), state);
        self.order.push(name.to_string());
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// The behaviour registered under `name`, if it is not a placeholder.
    pub fn body_mut(&mut self, name: &str) -> Option<&mut (dyn State<C> + 'static)> {
        self.states.get_mut(name).and_then(|slot| slot.as_deref_mut())
    }

    pub fn is_placeholder(&self, name: &str) -> bool {
        matches!(self.states.get(name), Some(None))
    }

    /// State names in registration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
