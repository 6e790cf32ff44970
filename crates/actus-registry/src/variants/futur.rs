//! FUTUR — Futures: periodic mark-to-market settlement against an observed
//! reference price, plus a final settlement at maturity.

use actus_core::errors::Result;
use actus_model::{ContractAttributes, ContractState, EventKind};
use actus_time::BusinessDayConvention;

use crate::conventions::conventions_for;
use crate::dispatch::{EventContext, Pof, Stf, VariantHandlers};
use crate::schedule::{generate_family, generate_single, merge, ScheduledEvent};

/// Market-object code for the daily settlement price.
const FUTURE_SETTLEMENT: &str = "FUTURE_SETTLEMENT";

pub(crate) fn handlers() -> VariantHandlers {
    VariantHandlers { schedule, initial_state, pof, stf, finalize_schedule: None }
}

pub(crate) fn schedule(attrs: &ContractAttributes) -> Result<Vec<ScheduledEvent>> {
    let md = attrs.maturity_date.ok_or_else(|| {
        actus_core::errors::Error::InvalidAttributes("FUTUR requires maturity_date".into())
    })?;
    let (_, calendar) = conventions_for(attrs);
    let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
    let mut families = Vec::new();
    if let Some(spec) = &attrs.scaling_schedule {
        let mut marks = generate_family(spec, md, EventKind::Std, bdc, &*calendar)?;
        marks.retain(|e| e.event_time < md);
        families.push(marks);
    }
    families.push(vec![generate_single(md, EventKind::Md, bdc, &*calendar)]);
    Ok(merge(families))
}

pub(crate) fn initial_state(attrs: &ContractAttributes) -> Result<ContractState> {
    Ok(ContractState {
        maturity_date: attrs.maturity_date,
        // The last settled price, margined against at the next mark.
        next_principal_payment: attrs.future_price.unwrap_or(0.0),
        ..ContractState::zeroed(attrs.status_date)
    })
}

pub(crate) fn pof(kind: EventKind) -> Option<Pof> {
    match kind {
        EventKind::Std | EventKind::Md => Some(pof_std),
        _ => None,
    }
}

pub(crate) fn stf(kind: EventKind) -> Option<Stf> {
    match kind {
        EventKind::Std => Some(stf_std),
        EventKind::Md => Some(|state, ctx| {
            Ok(ContractState { status_date: ctx.event_time, ..*state })
        }),
        _ => None,
    }
}

fn observed_or_last(state: &ContractState, ctx: &EventContext) -> f64 {
    let settlement_price = ctx.market.get(FUTURE_SETTLEMENT, ctx.event_time);
    if settlement_price == 0.0 {
        state.next_principal_payment
    } else {
        settlement_price
    }
}

fn pof_std(state: &ContractState, ctx: &EventContext) -> Result<f64> {
    let reference = observed_or_last(state, ctx);
    Ok(ctx.attrs.role_sign() * (reference - state.next_principal_payment))
}

fn stf_std(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    let reference = observed_or_last(state, ctx);
    Ok(ContractState {
        status_date: ctx.event_time,
        next_principal_payment: reference,
        ..*state
    })
}
