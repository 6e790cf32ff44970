//! # actus
//!
//! A deterministic simulation engine for the ACTUS (Algorithmic Contract
//! Types Unified Standards) contract catalog.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `actus-*` crates.
//!
//! ## Quick start
//!
//! ```
//! use actus::model::{ContractAttributes, ContractRole, ContractType};
//! use actus::time::ActusDateTime;
//!
//! let status_date = ActusDateTime::from_ymd(2024, 1, 15).unwrap();
//! let attrs = ContractAttributes::new(
//!     "DEMO-1",
//!     ContractType::Pam,
//!     ContractRole::Rpa,
//!     status_date,
//!     "USD",
//! );
//! assert_eq!(attrs.contract_type.code(), "PAM");
//! assert_eq!(attrs.role_sign(), 1.0);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod json;

/// Numeric aliases and the unified error hierarchy.
pub use actus_core as core;

/// Date, calendar, day-count, and cycle types.
pub use actus_time as time;

/// Attributes, state, events, and the contract-type/role/event-kind enums.
pub use actus_model as model;

/// Market and child-contract observers.
pub use actus_observers as observers;

/// The `(variant, event kind)` POF/STF registry and schedule generator.
pub use actus_registry as registry;

/// The lifecycle driver and composite resolver.
pub use actus_engine as engine;
