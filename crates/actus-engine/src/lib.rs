//! # actus-engine
//!
//! The lifecycle driver and composite resolver sitting on top of
//! [`actus_registry`]'s POF/STF tables: turns a contract's attributes (and,
//! for composites, its already-simulated children) into a materialized
//! [`actus_model::SimulationResult`].

#![forbid(unsafe_code)]

mod contract;
mod lifecycle;
mod resolver;

pub use contract::{create_contract, Contract};
pub use lifecycle::{merge_callouts, simulate_contract, SimulationError};
pub use resolver::simulate_portfolio;
