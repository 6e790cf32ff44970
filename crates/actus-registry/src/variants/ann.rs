//! ANN — Annuity: NAM's state-transition logic, plus a `Prnxt` recompute at
//! every `RR` so the level payment keeps amortizing current `Nt` over the
//! remaining periods.

use actus_core::errors::Result;
use actus_model::{ContractAttributes, ContractState, EventKind};
use actus_time::BusinessDayConvention;

use crate::conventions::conventions_for;
use crate::dispatch::{EventContext, Pof, Stf, VariantHandlers};
use crate::schedule::generate_family;
use crate::variants::{lam, nam, pam};

pub(crate) fn handlers() -> VariantHandlers {
    VariantHandlers {
        schedule: lam::schedule,
        initial_state: lam::initial_state,
        pof,
        stf,
        finalize_schedule: None,
    }
}

pub(crate) fn pof(kind: EventKind) -> Option<Pof> {
    nam::pof(kind)
}

pub(crate) fn stf(kind: EventKind) -> Option<Stf> {
    match kind {
        EventKind::Rr => Some(stf_rr),
        EventKind::Rrf => Some(stf_rrf),
        other => nam::stf(other),
    }
}

fn stf_rr(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    let rate_reset = pam::stf(EventKind::Rr).expect("PAM registers RR");
    let reset = rate_reset(state, ctx)?;
    Ok(recompute_prnxt(reset, ctx))
}

fn stf_rrf(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    let fixing = pam::stf(EventKind::Rrf).expect("PAM registers RRF");
    let reset = fixing(state, ctx)?;
    Ok(recompute_prnxt(reset, ctx))
}

/// Recompute the level payment that amortizes `reset.notional` at
/// `reset.nominal_rate` over the periods remaining until maturity, using
/// the closed-form annuity factor.
fn recompute_prnxt(reset: ContractState, ctx: &EventContext) -> ContractState {
    let n = remaining_periods(ctx.attrs, ctx.event_time);
    if n == 0 {
        return reset;
    }
    let (dc, _) = conventions_for(ctx.attrs);
    let period_len = ctx
        .attrs
        .maturity_date
        .map(|md| dc.year_fraction(ctx.event_time, md) / n as f64)
        .unwrap_or(1.0);
    let r = reset.nominal_rate * period_len;
    let prnxt = if r.abs() < 1e-12 {
        reset.notional / n as f64
    } else {
        reset.notional * r / (1.0 - (1.0 + r).powi(-(n as i32)))
    };
    ContractState { next_principal_payment: prnxt, ..reset }
}

fn remaining_periods(attrs: &ContractAttributes, from: actus_time::ActusDateTime) -> u32 {
    let Some(md) = attrs.maturity_date else { return 0 };
    let Some(spec) = &attrs.principal_redemption_schedule else { return 0 };
    let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
    let (_, calendar) = conventions_for(attrs);
    match generate_family(spec, md, EventKind::Pr, bdc, &*calendar) {
        Ok(events) => events.iter().filter(|e| e.event_time >= from).count() as u32,
        Err(_) => 0,
    }
}
