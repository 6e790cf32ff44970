//! CAPFL — cap/floor: pays the excess of an underlying child's floating
//! rate over the cap bound (`rate_reset_ceiling`) or under the floor bound
//! (`rate_reset_floor`), applied to the underlying's notional at each `IP`
//! date. The rate compared is the one fixed for the period just ending —
//! when the underlier resets at the same timestamp, the comparison must not
//! see the freshly installed rate.

use actus_core::errors::{Error, Result};
use actus_model::{ContractAttributes, ContractState, EventKind};
use actus_time::BusinessDayConvention;

use crate::conventions::conventions_for;
use crate::dispatch::{EventContext, Pof, Stf, VariantHandlers};
use crate::schedule::{generate_family, generate_single, merge, ScheduledEvent};

pub(crate) fn handlers() -> VariantHandlers {
    VariantHandlers { schedule, initial_state, pof, stf, finalize_schedule: None }
}

pub(crate) fn schedule(attrs: &ContractAttributes) -> Result<Vec<ScheduledEvent>> {
    let md = attrs.maturity_date.ok_or_else(|| {
        Error::InvalidAttributes("CAPFL requires maturity_date".into())
    })?;
    let (_, calendar) = conventions_for(attrs);
    let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
    let mut families = Vec::new();
    if let Some(spec) = &attrs.interest_schedule {
        families.push(generate_family(spec, md, EventKind::Ip, bdc, &*calendar)?);
    }
    families.push(vec![generate_single(md, EventKind::Md, bdc, &*calendar)]);
    Ok(merge(families))
}

pub(crate) fn initial_state(attrs: &ContractAttributes) -> Result<ContractState> {
    Ok(ContractState {
        maturity_date: attrs.maturity_date,
        ..ContractState::zeroed(attrs.status_date)
    })
}

pub(crate) fn pof(kind: EventKind) -> Option<Pof> {
    match kind {
        EventKind::Ip => Some(pof_ip),
        EventKind::Md => Some(|_, _| Ok(0.0)),
        _ => None,
    }
}

pub(crate) fn stf(kind: EventKind) -> Option<Stf> {
    match kind {
        EventKind::Ip | EventKind::Md => Some(|state, ctx| {
            Ok(ContractState { status_date: ctx.event_time, ..*state })
        }),
        _ => None,
    }
}

/// The underlying's state with every event at this exact timestamp
/// excluded, so a coinciding `RR` on the underlier cannot leak its new
/// rate into the period being settled.
fn underlying_state(ctx: &EventContext) -> Result<ContractState> {
    let structure = ctx
        .attrs
        .contract_structure
        .as_ref()
        .ok_or_else(|| Error::InvalidAttributes("CAPFL requires contract_structure".into()))?;
    let child_id = structure.child("UnderlyingContract").ok_or_else(|| {
        Error::InvalidAttributes("CAPFL contract_structure missing UnderlyingContract".into())
    })?;
    let children = ctx
        .children
        .ok_or_else(|| Error::InvalidAttributes("CAPFL requires a ChildContractObserver".into()))?;
    children
        .state_before(child_id, ctx.event_time)?
        .ok_or_else(|| {
            Error::InvalidAttributes("underlying has no state at this event time".into())
        })
}

/// Each bound is protection the holder bought: the cap pays when the rate
/// runs above it, the floor when the rate falls below. The writer's side is
/// the same figure under a liability role.
fn pof_ip(_state: &ContractState, ctx: &EventContext) -> Result<f64> {
    let underlying = underlying_state(ctx)?;
    let rate = underlying.nominal_rate;
    let mut excess = 0.0;
    if let Some(cap) = ctx.attrs.rate_reset_ceiling {
        excess += (rate - cap).max(0.0);
    }
    if let Some(floor) = ctx.attrs.rate_reset_floor {
        excess += (floor - rate).max(0.0);
    }
    let (dc, _) = conventions_for(ctx.attrs);
    // The cap's own previous settlement opened this period; the child's
    // status_date may already sit at the shared timestamp.
    let y = dc.year_fraction(ctx.period_start, ctx.calculation_time);
    Ok(ctx.attrs.role_sign() * excess * y * underlying.notional.abs())
}
