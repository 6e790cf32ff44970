//! CEC — credit enhancement collateral: on each margin-call date, compares
//! the covered child's exposure against the covering child's value scaled
//! by `coverage`, plus collateral already posted (tracked in
//! `next_principal_payment`, the closest existing state cell to a running
//! balance), and pays the shortfall as a margin-call `STD`.

use actus_core::errors::{Error, Result};
use actus_model::{ContractAttributes, ContractState, EventKind};
use actus_time::BusinessDayConvention;

use crate::conventions::conventions_for;
use crate::dispatch::{EventContext, Pof, Stf, VariantHandlers};
use crate::schedule::{generate_family, generate_single, merge, ScheduledEvent};

pub(crate) fn handlers() -> VariantHandlers {
    VariantHandlers { schedule, initial_state, pof, stf, finalize_schedule: None }
}

/// Margin-call dates come from the interest family when given (the natural
/// monitoring cycle), with a final comparison at the horizon.
pub(crate) fn schedule(attrs: &ContractAttributes) -> Result<Vec<ScheduledEvent>> {
    let horizon = attrs.horizon_date.or(attrs.maturity_date).ok_or_else(|| {
        Error::InvalidAttributes("CEC requires horizon_date or maturity_date".into())
    })?;
    let (_, calendar) = conventions_for(attrs);
    let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
    let mut families = Vec::new();
    if let Some(spec) = &attrs.interest_schedule {
        let mut calls = generate_family(spec, horizon, EventKind::Std, bdc, &*calendar)?;
        calls.retain(|e| e.event_time < horizon);
        families.push(calls);
    }
    families.push(vec![generate_single(horizon, EventKind::Std, bdc, &*calendar)]);
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
        EventKind::Std => Some(pof_std),
        _ => None,
    }
}

pub(crate) fn stf(kind: EventKind) -> Option<Stf> {
    match kind {
        EventKind::Std => Some(stf_std),
        _ => None,
    }
}

fn child_state(ctx: &EventContext, role: &str) -> Result<ContractState> {
    let structure = ctx
        .attrs
        .contract_structure
        .as_ref()
        .ok_or_else(|| Error::InvalidAttributes("CEC requires contract_structure".into()))?;
    let child_id = structure.child(role).ok_or_else(|| {
        Error::InvalidAttributes(format!("CEC contract_structure missing {role}"))
    })?;
    let children = ctx
        .children
        .ok_or_else(|| Error::InvalidAttributes("CEC requires a ChildContractObserver".into()))?;
    children.state_at(child_id, ctx.event_time)?.ok_or_else(|| {
        Error::InvalidAttributes(format!("{role} has no state at this event time"))
    })
}

/// Exposure not yet backed: the covered child's notional plus accrued,
/// less `coverage` times the covering child's value, less collateral
/// already posted. Negative means over-collateralized, which calls no
/// margin.
fn shortfall(state: &ContractState, ctx: &EventContext) -> Result<f64> {
    let covered = child_state(ctx, "CoveredContract")?;
    let covering = child_state(ctx, "CoveringContract")?;
    let exposure = covered.notional.abs() + covered.accrued_interest.abs();
    let available =
        ctx.attrs.coverage.unwrap_or(1.0) * covering.notional.abs() + state.next_principal_payment;
    Ok((exposure - available).max(0.0))
}

fn pof_std(state: &ContractState, ctx: &EventContext) -> Result<f64> {
    Ok(ctx.attrs.role_sign() * shortfall(state, ctx)?)
}

fn stf_std(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    let posted = shortfall(state, ctx)?;
    Ok(ContractState {
        status_date: ctx.event_time,
        next_principal_payment: state.next_principal_payment + posted,
        ..*state
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use super::*;
    use actus_model::{
        ContractEvent, ContractRole, ContractStructure, ContractType, SimulationResult,
    };
    use actus_observers::{ChildContractObserver, Constant};
    use actus_time::ActusDateTime;

    fn d(y: u16, m: u8, dd: u8) -> ActusDateTime {
        ActusDateTime::from_ymd(y, m, dd).unwrap()
    }

    fn attrs() -> ContractAttributes {
        ContractAttributes {
            maturity_date: Some(d(2025, 1, 1)),
            horizon_date: Some(d(2025, 1, 1)),
            coverage: Some(0.5),
            contract_structure: Some(ContractStructure::new([
                ("CoveredContract".to_string(), "PAM-COVERED".to_string()),
                ("CoveringContract".to_string(), "STK-COLLATERAL".to_string()),
            ])),
            ..ContractAttributes::new(
                "CEC-1",
                ContractType::Cec,
                ContractRole::Col,
                d(2024, 1, 1),
                "USD",
            )
        }
    }

    fn result_with_notional(id: &str, notional: f64) -> SimulationResult {
        let t = d(2024, 1, 1);
        let s = ContractState { notional, ..ContractState::zeroed(t) };
        SimulationResult {
            contract_id: id.to_string(),
            events: vec![ContractEvent {
                event_time: t,
                calculation_time: t,
                event_kind: EventKind::Ied,
                sequence: 0,
                payoff: -notional,
                state_pre: ContractState::zeroed(t),
                state_post: s,
                currency: "USD".to_string(),
            }],
        }
    }

    #[test]
    fn margin_call_posts_only_the_uncovered_shortfall() {
        let a = attrs();
        let mut children = ChildContractObserver::new();
        children.register(result_with_notional("PAM-COVERED", 100_000.0));
        children.register(result_with_notional("STK-COLLATERAL", 80_000.0));
        children.freeze();
        let market = Constant(0.0);
        let t = d(2024, 2, 1);
        let ctx = EventContext {
            attrs: &a,
            event_time: t,
            calculation_time: t,
            market: &market,
            children: Some(&children),
            payoff_hint: None,
            leg: None,
            period_start: d(2024, 1, 1),
        };
        let state0 = initial_state(&a).unwrap();
        // Exposure 100,000 against 0.5 * 80,000 of collateral value.
        let payoff = pof_std(&state0, &ctx).unwrap();
        assert_abs_diff_eq!(payoff, 60_000.0, epsilon = 1e-9);
        let state1 = stf_std(&state0, &ctx).unwrap();
        assert_abs_diff_eq!(state1.next_principal_payment, 60_000.0, epsilon = 1e-9);
        // The same exposure calls no further margin once posted.
        assert!((pof_std(&state1, &ctx).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn over_collateralization_calls_no_margin() {
        let a = attrs();
        let mut children = ChildContractObserver::new();
        children.register(result_with_notional("PAM-COVERED", 10_000.0));
        children.register(result_with_notional("STK-COLLATERAL", 80_000.0));
        children.freeze();
        let market = Constant(0.0);
        let t = d(2024, 2, 1);
        let ctx = EventContext {
            attrs: &a,
            event_time: t,
            calculation_time: t,
            market: &market,
            children: Some(&children),
            payoff_hint: None,
            leg: None,
            period_start: d(2024, 1, 1),
        };
        let state0 = initial_state(&a).unwrap();
        assert_eq!(pof_std(&state0, &ctx).unwrap(), 0.0);
    }
}
