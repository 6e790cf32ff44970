//! # actus-core
//!
//! Foundational types shared across the ACTUS workspace: numeric aliases and
//! the unified error hierarchy.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod errors;

/// Floating-point type used throughout the engine.
///
/// 64-bit IEEE-754, which sits comfortably inside the cross-validation
/// tolerances.
pub type Real = f64;

/// A time measurement in years, as produced by a day-count convention.
pub type Time = Real;

/// A cash amount in the contract's currency.
pub type Payoff = Real;

/// A sequence number used to break ties between same-timestamp events.
pub type Sequence = u32;
