//! Concrete calendar implementations.

pub mod target;

pub use target::Target;
