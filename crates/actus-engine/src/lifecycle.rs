//! The per-contract lifecycle driver: accrue, compute payoff, transition
//! state, emit — one event at a time, in schedule order.

use actus_core::errors::{Error, Result};
use actus_core::Sequence;
use actus_model::{
    is_well_ordered, ContractAttributes, ContractEvent, ContractState, ContractType, FeeBasis,
    SimulationResult,
};
use actus_observers::{CalloutEvent, ChildContractObserver, MarketObserver};
use actus_registry::{conventions_for, handlers_for, merge, EventContext, ScheduledEvent};

/// A mid-simulation failure: the underlying error plus every event
/// materialized before it, kept for diagnostics rather than silently
/// dropped.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct SimulationError {
    /// Events emitted before the failure, in order.
    pub partial_events: Vec<ContractEvent>,
    /// The error that aborted the simulation.
    #[source]
    pub source: Error,
}

impl From<SimulationError> for Error {
    fn from(e: SimulationError) -> Error {
        e.source
    }
}

/// Merge `callouts` into `base`, each materializing as a [`ScheduledEvent`]
/// at its own `(time, event_kind)` and carrying its payoff hint, business-day
/// adjustment already applied by whatever produced the callout. Ordering
/// with `base` follows the usual `(event_time, priority)` rule.
pub fn merge_callouts(base: Vec<ScheduledEvent>, callouts: &[CalloutEvent]) -> Vec<ScheduledEvent> {
    let injected = callouts
        .iter()
        .map(|c| ScheduledEvent {
            event_time: c.time,
            calculation_time: c.time,
            event_kind: c.event_kind,
            payoff_hint: Some(c.payoff_hint),
            leg: None,
        })
        .collect();
    merge(vec![base, injected])
}

/// Drive one contract's full lifecycle to completion.
///
/// 1. Build the attribute-driven schedule via the variant's registered
///    `schedule` function.
/// 2. Merge in any behavioral `callouts` (deposits, withdrawals, observed
///    exercises — already business-day adjusted by their source), then run
///    the variant's `finalize_schedule` hook if it has one (CLM retiming,
///    CEG settlement injection).
/// 3. Walk the merged schedule in order; between consecutive events, accrue
///    interest (and, for `SWPPV`, the floating leg's `Ipac2`; fees too when
///    the fee basis is notional-proportional) over the elapsed year
///    fraction at the currently active rate(s).
/// 4. At each event, resolve `(contract_type, event_kind)` to its payoff and
///    state-transition functions; a kind the variant doesn't register is
///    treated as a pure status_date advance with zero payoff.
/// 5. Assign a monotonic `sequence` and record the materialized
///    [`ContractEvent`].
/// 6. Assert the result is well-ordered before returning it.
pub fn simulate_contract(
    attrs: &ContractAttributes,
    market: &dyn MarketObserver,
    children: Option<&ChildContractObserver>,
    callouts: &[CalloutEvent],
) -> Result<SimulationResult, SimulationError> {
    let mut events = Vec::new();
    match drive(attrs, market, children, callouts, &mut events) {
        Ok(()) => Ok(SimulationResult { contract_id: attrs.contract_id.clone(), events }),
        Err(source) => Err(SimulationError { partial_events: events, source }),
    }
}

fn drive(
    attrs: &ContractAttributes,
    market: &dyn MarketObserver,
    children: Option<&ChildContractObserver>,
    callouts: &[CalloutEvent],
    events: &mut Vec<ContractEvent>,
) -> Result<()> {
    let handlers = handlers_for(attrs.contract_type).ok_or_else(|| {
        Error::InvalidAttributes(format!("unregistered contract type {}", attrs.contract_type))
    })?;

    let base = (handlers.schedule)(attrs)?;
    let mut schedule = merge_callouts(base, callouts);
    if let Some(finalize) = handlers.finalize_schedule {
        schedule = finalize(attrs, children, schedule)?;
    }

    let mut state = (handlers.initial_state)(attrs)?;
    events.reserve(schedule.len());
    let mut sequence: Sequence = 0;

    for scheduled in &schedule {
        let period_start = state.status_date;
        let state_pre = accrue(attrs, &state, scheduled.calculation_time)?;

        let ctx = EventContext {
            attrs,
            event_time: scheduled.event_time,
            calculation_time: scheduled.calculation_time,
            market,
            children,
            payoff_hint: scheduled.payoff_hint,
            leg: scheduled.leg,
            period_start,
        };

        let payoff = match (handlers.pof)(scheduled.event_kind) {
            Some(pof) => pof(&state_pre, &ctx)?,
            None => 0.0,
        };
        let state_post = match (handlers.stf)(scheduled.event_kind) {
            Some(stf) => stf(&state_pre, &ctx)?,
            None => ContractState { status_date: scheduled.event_time, ..state_pre },
        };

        events.push(ContractEvent {
            event_time: scheduled.event_time,
            calculation_time: scheduled.calculation_time,
            event_kind: scheduled.event_kind,
            sequence,
            payoff,
            state_pre,
            state_post,
            currency: attrs.currency.clone(),
        });
        sequence += 1;
        state = state_post;
    }

    if !is_well_ordered(events) {
        return Err(Error::InvalidSchedule(format!(
            "simulated event list for {} is not well-ordered",
            attrs.contract_id
        )));
    }

    Ok(())
}

/// Advance `state`'s accrual cells from its own `status_date` up to `to`,
/// at the rate(s) currently carried in state. A no-op if `to <= status_date`
/// (the common case for the first event, whose calculation time usually
/// equals `status_date`).
fn accrue(
    attrs: &ContractAttributes,
    state: &ContractState,
    to: actus_time::ActusDateTime,
) -> Result<ContractState> {
    if to <= state.status_date {
        return Ok(*state);
    }
    let (dc, _) = conventions_for(attrs);
    let y = dc.year_fraction(state.status_date, to);
    let delta = y * state.interest_scaling * state.nominal_rate * state.notional;
    let mut accrued = state.accrue_interest(delta, to);
    if attrs.fee_basis == Some(FeeBasis::Notional) {
        accrued.accrued_fees += y * attrs.fee_rate.unwrap_or(0.0) * state.notional;
    }
    if attrs.contract_type == ContractType::Swppv {
        let delta2 = y * state.interest_calc_base * state.notional;
        return Ok(accrued.accrue_interest_2(delta2, to));
    }
    Ok(accrued)
}
