//! The unified error type for the ACTUS engine.
//!
//! A closed enum covering every failure mode the engine can hit, from
//! attribute validation through simulation. `ensure!` and `fail!` give the
//! terse, macro-driven precondition style used throughout this workspace.

use thiserror::Error;

/// The error type returned by every fallible operation in the engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Required field missing, invalid combination, unparseable cycle, or
    /// unknown enum value. Always raised at factory time, never mid-simulation.
    #[error("invalid attributes: {0}")]
    InvalidAttributes(String),

    /// A cycle expanded to an empty or non-monotonic date list.
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    /// A composite contract's `contract_structure` contains a cycle.
    #[error("cyclic contract structure involving {0}")]
    CyclicStructure(String),

    /// A composite contract references a child id absent from the observer.
    #[error("missing child contract: {0}")]
    MissingChild(String),

    /// A numeric operation hit an undefined domain (division by zero in a
    /// rate-differential penalty, log of a non-positive value, etc.).
    #[error("numeric domain error in {event_kind} at {event_time} for {contract_id}: {detail}")]
    NumericDomain {
        /// The event time at which the error occurred, formatted by the caller.
        event_time: String,
        /// The event kind being processed.
        event_kind: String,
        /// The contract under simulation.
        contract_id: String,
        /// A human-readable description of the domain violation.
        detail: String,
    },

    /// An observer implementation reported an internal failure.
    #[error("observer failure: {0}")]
    ObserverFailure(String),

    /// A date is out of range or otherwise malformed.
    #[error("date error: {0}")]
    Date(String),
}

/// Shorthand `Result` type used throughout the engine.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return `Err(Error::InvalidAttributes(...))` unless `$cond` holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidAttributes(format!($($msg)*)));
        }
    };
}

/// Return `Err(Error::InvalidAttributes(...))` immediately.
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::InvalidAttributes(format!($($msg)*)))
    };
}
