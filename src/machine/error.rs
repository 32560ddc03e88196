//! Engine configuration errors.

use thiserror::Error;

/// Errors raised while setting a machine up.
///
/// These are programmer errors meant to surface during development. Once a
/// machine is running, misuse is logged and degraded instead.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MachineError {
    #[error("State '{0}' is already registered")]
    DuplicateState(String),

    #[error("'{0}' is a reserved name and cannot be registered as a state")]
    ReservedName(String),
}

/// Errors loading a [`MachineConfig`](super::MachineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid machine config: {0}")]
    Parse(#[from] serde_json::Error),
}
