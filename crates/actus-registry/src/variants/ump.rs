//! UMP — Undefined Maturity Profile: deposits/withdrawals injected by a
//! behavioral observer as callout `PR` events; between callouts, interest
//! simply accrues.

use actus_core::errors::Result;
use actus_model::{ContractAttributes, ContractState, EventKind};
use actus_time::BusinessDayConvention;

use crate::conventions::conventions_for;
use crate::dispatch::{EventContext, Pof, Stf, VariantHandlers};
use crate::schedule::{generate_family, generate_single, merge, ScheduledEvent};
use crate::variants::pam;

pub(crate) fn handlers() -> VariantHandlers {
    VariantHandlers {
        schedule,
        initial_state: pam::initial_state,
        pof,
        stf,
        finalize_schedule: None,
    }
}

pub(crate) fn schedule(attrs: &ContractAttributes) -> Result<Vec<ScheduledEvent>> {
    let (_, calendar) = conventions_for(attrs);
    let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
    let mut families = Vec::new();
    if let Some(ied) = attrs.initial_exchange_date {
        if ied >= attrs.status_date {
            families.push(vec![generate_single(ied, EventKind::Ied, bdc, &*calendar)]);
        }
    }
    if let (Some(spec), Some(horizon)) = (&attrs.interest_schedule, attrs.horizon_date) {
        families.push(generate_family(spec, horizon, EventKind::Ip, bdc, &*calendar)?);
    }
    // Deposits/withdrawals have no attribute-level schedule: they arrive as
    // behavioral callouts merged by the engine after this base schedule.
    Ok(merge(families))
}

pub(crate) fn pof(kind: EventKind) -> Option<Pof> {
    match kind {
        EventKind::Pr => Some(pof_pr),
        other => pam::pof(other),
    }
}

pub(crate) fn stf(kind: EventKind) -> Option<Stf> {
    match kind {
        EventKind::Pr => Some(stf_pr),
        other => pam::stf(other),
    }
}

/// A withdrawal pays out (positive hint), a deposit pays in (negative
/// hint); the same sign convention as `IED`'s disbursement.
fn pof_pr(_state: &ContractState, ctx: &EventContext) -> Result<f64> {
    Ok(ctx.payoff_hint.unwrap_or(0.0))
}

fn stf_pr(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    let amount = ctx.payoff_hint.unwrap_or(0.0);
    Ok(ContractState {
        status_date: ctx.event_time,
        notional: state.notional - amount,
        ..*state
    })
}
