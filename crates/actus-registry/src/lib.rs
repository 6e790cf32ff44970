//! The POF/STF registry: resolves `(contract type, event kind)` to the pair
//! of functions that compute a payoff and advance state, and builds the
//! pre-simulation schedule each variant expands its own attributes into.

#![forbid(unsafe_code)]

mod conventions;
mod dispatch;
mod schedule;
mod variants;

pub use conventions::{calendar, conventions_for, day_counter};
pub use dispatch::{
    handlers_for, registry, EventContext, FinalizeSchedule, Pof, Stf, VariantHandlers,
};
pub use schedule::{generate_family, generate_single, merge, ScheduledEvent, SettlementLeg};
