//! `ContractEvent` and the ordering that makes an event list well-formed.

use actus_core::Sequence;
use actus_time::ActusDateTime;

use crate::event_kind::EventKind;
use crate::state::ContractState;

/// One materialized event in a contract's lifecycle.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContractEvent {
    /// The time at which this event settles/reports.
    pub event_time: ActusDateTime,
    /// The time used for year-fraction accrual. Differs from `event_time`
    /// under a calculate-shift business-day convention.
    pub calculation_time: ActusDateTime,
    /// The kind of event.
    pub event_kind: EventKind,
    /// Tiebreaker for events sharing `(event_time, priority)`.
    pub sequence: Sequence,
    /// The cash flow this event generates (zero before simulation).
    pub payoff: f64,
    /// State immediately before this event (after between-event accrual).
    pub state_pre: ContractState,
    /// State immediately after this event's state-transition function.
    pub state_post: ContractState,
    /// ISO currency code this event's payoff is denominated in.
    pub currency: String,
}

impl ContractEvent {
    /// The sort key establishing the invariant ordering of an event list:
    /// non-decreasing `(event_time, priority_rank, sequence)`.
    pub fn sort_key(&self) -> (ActusDateTime, u8, Sequence) {
        (self.event_time, self.event_kind.priority(), self.sequence)
    }
}

/// `true` if `events` is non-decreasing in `(event_time, priority, sequence)`.
pub fn is_well_ordered(events: &[ContractEvent]) -> bool {
    events.windows(2).all(|w| w[0].sort_key() <= w[1].sort_key())
}
