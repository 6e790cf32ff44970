//! Schedule Generator: turns a [`CycleSpec`] plus a terminal date into a
//! business-day-adjusted, `(event_time, calculation_time)` date sequence.

use actus_core::errors::Result;
use actus_model::{CycleSpec, EventKind};
use actus_time::{BusinessDayConvention, Calendar, ActusDateTime};

/// Which side of a two-legged contract an event settles, for contracts
/// whose `delivery_settlement` is gross: each coupon/settlement date then
/// carries one event per leg instead of a single netted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementLeg {
    /// The first (fixed, or first-currency) leg.
    First,
    /// The second (floating, or second-currency) leg.
    Second,
}

/// One entry in a contract's pre-simulation schedule: a date pair and the
/// event kind it will materialize as. Payoff and state are not yet known —
/// those are filled in by the lifecycle engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledEvent {
    /// The reporting/settlement time.
    pub event_time: ActusDateTime,
    /// The accrual time (equal to `event_time` except under a
    /// calculate-shift business-day convention).
    pub calculation_time: ActusDateTime,
    /// The kind of event this date will materialize as.
    pub event_kind: EventKind,
    /// An amount carried by a behavioral callout (a deposit, a prepayment);
    /// `None` for attribute-driven events. The payoff function reads this
    /// through [`crate::EventContext::payoff_hint`].
    pub payoff_hint: Option<f64>,
    /// The leg this event settles, for gross-settled two-legged contracts;
    /// `None` for single-legged or netted events.
    pub leg: Option<SettlementLeg>,
}

impl ScheduledEvent {
    /// An attribute-driven event at `(event_time, calculation_time)` with
    /// no callout amount.
    pub fn new(
        event_time: ActusDateTime,
        calculation_time: ActusDateTime,
        event_kind: EventKind,
    ) -> Self {
        ScheduledEvent {
            event_time,
            calculation_time,
            event_kind,
            payoff_hint: None,
            leg: None,
        }
    }

    /// The same event, tagged as settling one leg of a gross-settled
    /// contract.
    pub fn for_leg(self, leg: SettlementLeg) -> Self {
        ScheduledEvent { leg: Some(leg), ..self }
    }
}

/// Expand one event family (`spec`) up to and including `end`, producing
/// one [`ScheduledEvent`] of kind `kind` per expanded date, business-day
/// adjusted under `convention`/`calendar`.
///
/// 1. Resolve the anchor (carried on `spec`).
/// 2. Expand the cycle up to `end` (`spec.cycle == None` means a single,
///    non-repeating date at the anchor).
/// 3. Apply business-day adjustment, producing `(event_time, calc_time)`.
pub fn generate_family(
    spec: &CycleSpec,
    end: ActusDateTime,
    kind: EventKind,
    convention: BusinessDayConvention,
    calendar: &dyn Calendar,
) -> Result<Vec<ScheduledEvent>> {
    let raw_dates = match &spec.cycle {
        Some(cycle) => cycle.expand(spec.anchor, end, spec.end_of_month)?,
        None => {
            if spec.anchor > end {
                Vec::new()
            } else {
                vec![spec.anchor]
            }
        }
    };
    Ok(raw_dates
        .into_iter()
        .map(|d| {
            let (event_time, calculation_time) = calendar.adjust_with_calc_time(d, convention);
            ScheduledEvent::new(event_time, calculation_time, kind)
        })
        .collect())
}

/// A single non-repeating event at `date`, business-day adjusted.
pub fn generate_single(
    date: ActusDateTime,
    kind: EventKind,
    convention: BusinessDayConvention,
    calendar: &dyn Calendar,
) -> ScheduledEvent {
    let (event_time, calculation_time) = calendar.adjust_with_calc_time(date, convention);
    ScheduledEvent::new(event_time, calculation_time, kind)
}

/// Merge several families into one list, sorted by `(event_time, priority)`.
/// Stable: events already in the same relative order from equal-priority
/// families keep that order (the lifecycle engine assigns the final
/// sequence tiebreaker once merged with callouts).
pub fn merge(mut families: Vec<Vec<ScheduledEvent>>) -> Vec<ScheduledEvent> {
    let mut merged: Vec<ScheduledEvent> = families.drain(..).flatten().collect();
    merged.sort_by_key(|e| (e.event_time, e.event_kind.priority()));
    merged
}
