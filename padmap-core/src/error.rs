//! Core error types

use crate::event::EventId;
use thiserror::Error;

/// Errors raised while registering remap rules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemapError {
    /// The same (type, code) was added twice as a modifier of one rule
    #[error("modifier {0} already exists on this rule")]
    DuplicateModifier(EventId),

    /// A linear transform was configured with a zero divisor
    #[error("linear transform divisor must not be zero")]
    ZeroDivisor,
}

/// Errors from event code name lookup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    #[error("unknown event code name: \"{0}\"")]
    UnknownName(String),

    #[error("unknown event type: \"{0}\"")]
    UnknownType(String),

    #[error("event code {0} has no type prefix (expected KEY_, BTN_, REL_, ABS_ or SYN_)")]
    MissingType(String),
}
