//! CSH — Cash position: a single analysis (`AD`) event per query date,
//! tracking a constant position with no cash flow of its own.

use actus_core::errors::Result;
use actus_model::{ContractAttributes, ContractState, EventKind};
use actus_time::BusinessDayConvention;

use crate::conventions::conventions_for;
use crate::dispatch::{Pof, Stf, VariantHandlers};
use crate::schedule::{generate_family, generate_single, merge, ScheduledEvent};

pub(crate) fn handlers() -> VariantHandlers {
    VariantHandlers { schedule, initial_state, pof, stf, finalize_schedule: None }
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
        families.push(generate_family(spec, horizon, EventKind::Ad, bdc, &*calendar)?);
    }
    Ok(merge(families))
}

pub(crate) fn initial_state(attrs: &ContractAttributes) -> Result<ContractState> {
    Ok(ContractState {
        notional: attrs.role_sign() * attrs.notional_principal.unwrap_or(0.0),
        ..ContractState::zeroed(attrs.status_date)
    })
}

pub(crate) fn pof(kind: EventKind) -> Option<Pof> {
    match kind {
        EventKind::Ied => Some(|_, ctx| {
            Ok(ctx.attrs.role_sign() * -1.0 * ctx.attrs.notional_principal.unwrap_or(0.0))
        }),
        EventKind::Ad => Some(|_, _| Ok(0.0)),
        _ => None,
    }
}

pub(crate) fn stf(kind: EventKind) -> Option<Stf> {
    match kind {
        EventKind::Ied => Some(|_, ctx| initial_state(ctx.attrs)),
        EventKind::Ad => Some(|state, ctx| {
            Ok(ContractState { status_date: ctx.event_time, ..*state })
        }),
        _ => None,
    }
}
