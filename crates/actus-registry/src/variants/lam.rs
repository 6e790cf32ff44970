//! LAM — Linear Amortizer: PAM plus a periodic principal-redemption (`PR`)
//! family, a fixed payment per period.

use actus_core::errors::Result;
use actus_model::{ContractAttributes, ContractState, EventKind};
use actus_time::BusinessDayConvention;

use crate::conventions::conventions_for;
use crate::dispatch::{EventContext, Pof, Stf, VariantHandlers};
use crate::schedule::{generate_family, merge, ScheduledEvent};
use crate::variants::pam;

pub(crate) fn handlers() -> VariantHandlers {
    VariantHandlers { schedule, initial_state, pof, stf, finalize_schedule: None }
}

pub(crate) fn schedule(attrs: &ContractAttributes) -> Result<Vec<ScheduledEvent>> {
    // Amortizers may carry the terminal date as an amortization date
    // instead of a contractual maturity.
    let md = attrs.maturity_date.or(attrs.amortization_date).ok_or_else(|| {
        actus_core::errors::Error::InvalidAttributes(
            "LAM requires maturity_date or amortization_date".into(),
        )
    })?;
    let base = if attrs.maturity_date.is_some() {
        pam::schedule(attrs)?
    } else {
        let mut with_md = attrs.clone();
        with_md.maturity_date = Some(md);
        pam::schedule(&with_md)?
    };
    let mut families = vec![base];
    let (_, calendar) = conventions_for(attrs);
    let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
    if let Some(spec) = &attrs.principal_redemption_schedule {
        let mut prs = generate_family(spec, md, EventKind::Pr, bdc, &*calendar)?;
        // The final redemption flows through MD, like PAM's final coupon.
        prs.retain(|e| e.event_time < md);
        families.push(prs);
    }
    if let Some(spec) = &attrs.interest_calc_base_schedule {
        let mut ipcbs = generate_family(spec, md, EventKind::Ipcb, bdc, &*calendar)?;
        ipcbs.retain(|e| e.event_time < md);
        families.push(ipcbs);
    }
    Ok(merge(families))
}

/// PAM's initial state, plus the amortizer cells: the per-period payment
/// (`Prnxt`, taken from the attributes or spread evenly over the redemption
/// dates when absent) and the interest calculation base (`Ipcb`, the full
/// notional until an `IPCB` event says otherwise).
pub(crate) fn initial_state(attrs: &ContractAttributes) -> Result<ContractState> {
    let base = pam::initial_state(attrs)?;
    let role = attrs.role_sign();
    let prnxt = match attrs.next_principal_redemption_payment {
        Some(amount) => role * amount,
        None => {
            let count = redemption_count(attrs);
            if count > 0 {
                base.notional / count as f64
            } else {
                0.0
            }
        }
    };
    Ok(ContractState {
        next_principal_payment: prnxt,
        interest_calc_base: base.notional,
        ..base
    })
}

/// Number of scheduled `PR` dates, the final `MD` redemption included.
fn redemption_count(attrs: &ContractAttributes) -> usize {
    let (Some(spec), Some(md)) = (&attrs.principal_redemption_schedule, attrs.maturity_date)
    else {
        return 0;
    };
    let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
    let (_, calendar) = conventions_for(attrs);
    generate_family(spec, md, EventKind::Pr, bdc, &*calendar)
        .map(|events| events.len())
        .unwrap_or(0)
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
        EventKind::Ipcb => Some(stf_ipcb),
        EventKind::Ied => Some(|_, ctx| initial_state(ctx.attrs)),
        other => pam::stf(other),
    }
}

fn pof_pr(state: &ContractState, _ctx: &EventContext) -> Result<f64> {
    Ok(state.next_principal_payment)
}

/// Refix the interest calculation base to the outstanding notional.
fn stf_ipcb(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    Ok(ContractState {
        status_date: ctx.event_time,
        interest_calc_base: state.notional,
        ..*state
    })
}

/// `Nt <- Nt - Prnxt`, capped so the final redemption never drives the
/// notional past zero; any remainder effectively merges into `MD`.
fn stf_pr(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    let role = ctx.attrs.role_sign();
    let prnxt = state.next_principal_payment;
    let remaining = state.notional - prnxt;
    let capped = if role > 0.0 {
        remaining.max(0.0)
    } else {
        remaining.min(0.0)
    };
    Ok(ContractState { status_date: ctx.event_time, notional: capped, ..*state })
}
