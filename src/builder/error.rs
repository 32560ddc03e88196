//! Build errors for state machine and transition builders.

use crate::machine::MachineError;
use crate::properties::PropertyError;
use std::fmt;
use thiserror::Error;

/// A single problem found while building a machine or transition.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum BuildError {
    #[error("Default state not specified. Call .default_state(name) before .build()")]
    MissingDefaultState,

    #[error("Default state '{0}' is not registered")]
    UnknownDefaultState(String),

    #[error("State '{0}' is registered more than once")]
    DuplicateState(String),

    #[error("'{0}' is reserved and cannot name a state")]
    ReservedName(String),

    #[error("Transition {from} -> {to} leaves an unregistered state")]
    UnknownSource { from: String, to: String },

    #[error("Transition {from} -> {to} enters an unregistered state")]
    UnknownDestination { from: String, to: String },

    #[error("Transition source state not specified. Call .from(name) or .any_state()")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(name)")]
    MissingToState,

    #[error("Initial property rejected: {0}")]
    Property(#[from] PropertyError),
}

/// Every problem found by one build attempt, in discovery order.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildErrors(pub Vec<BuildError>);

impl BuildErrors {
    pub fn iter(&self) -> impl Iterator<Item = &BuildError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, error: &BuildError) -> bool {
        self.0.contains(error)
    }
}

impl fmt::Display for BuildErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} build error(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for BuildErrors {}

impl From<MachineError> for BuildError {
    fn from(error: MachineError) -> Self {
        match error {
            MachineError::DuplicateState(name) => BuildError::DuplicateState(name),
            MachineError::ReservedName(name) => BuildError::ReservedName(name),
        }
    }
}
