//! NAM — Negative Amortizer: a fixed-payment schedule that can let the
//! notional grow when the payment doesn't cover accrued interest.
//!
//! `STF_PR` is the single most error-prone formula in the registry: the
//! right-hand side is already signed (`Prnxt` carries the role sign), so
//! applying `R(role)` to it again silently flips the direction of
//! amortization. See the `sign_regression` test below for the exact
//! numbers that catch the bug.

use actus_core::errors::Result;
use actus_model::{ContractState, EventKind};

use crate::conventions::conventions_for;
use crate::dispatch::{EventContext, Pof, Stf, VariantHandlers};
use crate::variants::lam;

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
    match kind {
        EventKind::Pr => Some(pof_pr),
        other => lam::pof(other),
    }
}

pub(crate) fn stf(kind: EventKind) -> Option<Stf> {
    match kind {
        EventKind::Pr => Some(stf_pr),
        other => lam::stf(other),
    }
}

/// The principal portion of the fixed payment and the notional left after
/// it: `Nt <- Nt - (Prnxt - Ipac - Y*Ipnr*Ipcb)`, the reduction capped so
/// the notional cannot cross zero. `Prnxt` is already signed by role; the
/// subtrahend is computed unsigned and must not be re-signed.
///
/// The `Y` term covers accrual between `state.status_date` and the event's
/// calculation time; when the engine has already folded that period into
/// `Ipac` the term is zero and the formula degenerates correctly.
fn redemption(state: &ContractState, ctx: &EventContext) -> (f64, f64) {
    let (dc, _) = conventions_for(ctx.attrs);
    let y = dc.year_fraction(state.status_date, ctx.calculation_time);
    let delta = state.next_principal_payment - state.accrued_interest
        - y * state.nominal_rate * state.interest_calc_base;
    let remaining = state.notional - delta;
    let capped = if ctx.attrs.role_sign() > 0.0 {
        remaining.max(0.0)
    } else {
        remaining.min(0.0)
    };
    (state.notional - capped, capped)
}

/// The interest share of the fixed payment flows through `IP`; `PR` pays
/// only the principal portion.
fn pof_pr(state: &ContractState, ctx: &EventContext) -> Result<f64> {
    let (paid, _) = redemption(state, ctx);
    Ok(paid)
}

fn stf_pr(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    let (_, remaining) = redemption(state, ctx);
    Ok(ContractState {
        status_date: ctx.event_time,
        notional: remaining,
        ..*state
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use super::*;
    use actus_model::{ContractAttributes, ContractRole, ContractType};
    use actus_observers::Constant;
    use actus_time::ActusDateTime;

    fn d(y: u16, m: u8, dd: u8) -> ActusDateTime {
        ActusDateTime::from_ymd(y, m, dd).unwrap()
    }

    fn attrs() -> ContractAttributes {
        ContractAttributes {
            notional_principal: Some(100_000.0),
            nominal_interest_rate: Some(0.10),
            next_principal_redemption_payment: Some(6_000.0),
            ..ContractAttributes::new(
                "NAM-1",
                ContractType::Nam,
                ContractRole::Rpl,
                d(2024, 1, 1),
                "USD",
            )
        }
    }

    #[test]
    fn sign_regression() {
        // NT=100,000, Prnxt=6,000/quarter, rate=10%, role=RPL, so every
        // signed cell is negative:
        // Nt <- -100,000 - (-6,000 - 0 - 0.25*0.10*(-100,000))
        //    = -100,000 + 3,500 = -96,500.
        // Re-signing the subtrahend produces -103,500 instead.
        let a = attrs();
        let d0 = a.status_date;
        let d1 = d(2024, 4, 1);
        let state = ContractState {
            notional: -100_000.0,
            next_principal_payment: -6_000.0,
            interest_calc_base: -100_000.0,
            nominal_rate: 0.10,
            ..ContractState::zeroed(d0)
        };
        let market = Constant(0.0);
        let ctx = EventContext {
            attrs: &a,
            event_time: d1,
            calculation_time: d1,
            market: &market,
            children: None,
            payoff_hint: None,
            leg: None,
            period_start: d0,
        };
        let next = stf_pr(&state, &ctx).unwrap();
        assert!((next.notional + 96_500.0).abs() < 1e-6, "got {}", next.notional);
        assert!(
            next.notional.abs() < 100_000.0,
            "sign-regressed implementations grow the liability instead"
        );
    }

    #[test]
    fn accrued_interest_already_in_ipac_is_not_double_counted() {
        // Same quarter, but the engine has already folded the accrual into
        // Ipac and advanced status_date, so the Y term is zero and Ipac
        // carries the reduction instead.
        let a = attrs();
        let d1 = d(2024, 4, 1);
        let state = ContractState {
            notional: -100_000.0,
            next_principal_payment: -6_000.0,
            interest_calc_base: -100_000.0,
            nominal_rate: 0.10,
            accrued_interest: -2_500.0,
            ..ContractState::zeroed(d1)
        };
        let market = Constant(0.0);
        let ctx = EventContext {
            attrs: &a,
            event_time: d1,
            calculation_time: d1,
            market: &market,
            children: None,
            payoff_hint: None,
            leg: None,
            period_start: d(2024, 1, 1),
        };
        let next = stf_pr(&state, &ctx).unwrap();
        assert!((next.notional + 96_500.0).abs() < 1e-6, "got {}", next.notional);
    }

    #[test]
    fn pr_pays_only_the_principal_portion() {
        let a = attrs();
        let d0 = a.status_date;
        let d1 = d(2024, 4, 1);
        let state = ContractState {
            notional: -100_000.0,
            next_principal_payment: -6_000.0,
            interest_calc_base: -100_000.0,
            nominal_rate: 0.10,
            ..ContractState::zeroed(d0)
        };
        let market = Constant(0.0);
        let ctx = EventContext {
            attrs: &a,
            event_time: d1,
            calculation_time: d1,
            market: &market,
            children: None,
            payoff_hint: None,
            leg: None,
            period_start: d0,
        };
        // -6,000 payment less -2,500 of interest leaves -3,500 of principal.
        assert_abs_diff_eq!(pof_pr(&state, &ctx).unwrap(), -3_500.0, epsilon = 1e-6);
    }
}
