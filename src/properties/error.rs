//! Property store errors.

use super::value::PropertyKind;
use thiserror::Error;

/// Errors reported by the property store.
///
/// The store logs every one of these as a warning before returning it, so
/// callers that only care about the fallback value can ignore the `Err`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PropertyError {
    #[error("Property '{name}' has no value")]
    Missing { name: String },

    #[error("Property '{name}' cannot be set to null")]
    NullValue { name: String },

    #[error("Property '{name}' holds {found}, not {expected}")]
    TypeMismatch {
        name: String,
        expected: PropertyKind,
        found: PropertyKind,
    },

    #[error("Property '{name}' holds a {kind} outside the range of the requested type")]
    OutOfRange { name: String, kind: PropertyKind },

    #[error("Adding to property '{name}' would overflow")]
    Overflow { name: String },

    #[error("Property '{name}' is a {shape} and cannot be imported")]
    Unsupported { name: String, shape: &'static str },

    #[error("Properties source must serialize to a struct or map, got {0}")]
    NotAnObject(&'static str),

    #[error("Failed to serialize properties source: {0}")]
    Serialization(String),
}
