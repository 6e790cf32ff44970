//! CEG — credit enhancement guarantee: watches a covered child contract
//! and, the first time the child's performance leaves `PF`, settles once
//! via an `STD` event placed `settlement_period` after the credit event.
//! The trigger is latched in `exercise_date`/`exercise_amount` so a
//! duplicate settlement date cannot pay twice.

use actus_core::errors::{Error, Result};
use actus_model::{ContractAttributes, ContractState, EventKind, GuaranteeExtent};
use actus_observers::ChildContractObserver;
use actus_time::{ActusDateTime, BusinessDayConvention, Cycle};

use crate::conventions::conventions_for;
use crate::dispatch::{EventContext, Pof, Stf, VariantHandlers};
use crate::schedule::{generate_single, merge, ScheduledEvent};

/// Market-object code for the covered contract's observed market value,
/// used by the widest guarantee extent.
const CEG_MARKET_VALUE: &str = "CEG_MARKET_VALUE";

pub(crate) fn handlers() -> VariantHandlers {
    VariantHandlers {
        schedule,
        initial_state,
        pof,
        stf,
        finalize_schedule: Some(finalize_schedule),
    }
}

/// The attribute-driven schedule is a single analysis mark at the horizon;
/// the settlement event, if any, is injected by [`finalize_schedule`] once
/// the covered child's simulated history is known.
pub(crate) fn schedule(attrs: &ContractAttributes) -> Result<Vec<ScheduledEvent>> {
    let horizon = attrs.horizon_date.or(attrs.maturity_date).ok_or_else(|| {
        Error::InvalidAttributes("CEG requires horizon_date or maturity_date".into())
    })?;
    let (_, calendar) = conventions_for(attrs);
    let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
    Ok(vec![generate_single(horizon, EventKind::Ad, bdc, &*calendar)])
}

pub(crate) fn initial_state(attrs: &ContractAttributes) -> Result<ContractState> {
    Ok(ContractState {
        maturity_date: attrs.maturity_date,
        ..ContractState::zeroed(attrs.status_date)
    })
}

fn covered_child_id(attrs: &ContractAttributes) -> Result<&str> {
    attrs
        .contract_structure
        .as_ref()
        .ok_or_else(|| Error::InvalidAttributes("CEG requires contract_structure".into()))?
        .child("CoveredContract")
        .ok_or_else(|| {
            Error::InvalidAttributes("CEG contract_structure missing CoveredContract".into())
        })
}

fn settlement_offset(period: Option<Cycle>, from: ActusDateTime) -> Result<ActusDateTime> {
    match period {
        Some(cycle) => from
            .advance(cycle.n as i32, cycle.unit)
            .map_err(|e| Error::InvalidSchedule(e.to_string())),
        None => Ok(from),
    }
}

/// The covered child's first credit event, as `(event_time, state_post)`.
fn credit_event(
    attrs: &ContractAttributes,
    children: &ChildContractObserver,
) -> Result<Option<(ActusDateTime, ContractState)>> {
    let child_id = covered_child_id(attrs)?;
    let events = children.events(child_id)?;
    Ok(events
        .iter()
        .find(|e| e.state_post.performance.is_credit_event())
        .map(|e| (e.event_time, e.state_post)))
}

/// Inject the guarantee's settlement: `STD` at the credit event's time plus
/// `settlement_period`.
fn finalize_schedule(
    attrs: &ContractAttributes,
    children: Option<&ChildContractObserver>,
    schedule: Vec<ScheduledEvent>,
) -> Result<Vec<ScheduledEvent>> {
    let Some(children) = children else { return Ok(schedule) };
    let Some((trigger_time, _)) = credit_event(attrs, children)? else {
        return Ok(schedule);
    };
    let settlement = settlement_offset(attrs.settlement_period, trigger_time)?;
    let (_, calendar) = conventions_for(attrs);
    let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
    Ok(merge(vec![
        schedule,
        vec![generate_single(settlement, EventKind::Std, bdc, &*calendar)],
    ]))
}

pub(crate) fn pof(kind: EventKind) -> Option<Pof> {
    match kind {
        EventKind::Std => Some(pof_std),
        EventKind::Ad => Some(|_, _| Ok(0.0)),
        _ => None,
    }
}

pub(crate) fn stf(kind: EventKind) -> Option<Stf> {
    match kind {
        EventKind::Std => Some(stf_std),
        EventKind::Ad => Some(|state, ctx| {
            Ok(ContractState { status_date: ctx.event_time, ..*state })
        }),
        _ => None,
    }
}

fn guarantee_amount(ctx: &EventContext, child: &ContractState, at: ActusDateTime) -> f64 {
    let coverage = ctx.attrs.coverage.unwrap_or(1.0);
    let extent = ctx
        .attrs
        .credit_enhancement_guarantee_extent
        .unwrap_or(GuaranteeExtent::Notional);
    let base = match extent {
        GuaranteeExtent::Notional => child.notional.abs(),
        GuaranteeExtent::NotionalPlusAccrued => {
            child.notional.abs() + child.accrued_interest.abs()
        }
        GuaranteeExtent::NotionalPlusAccruedPlusMarket => {
            child.notional.abs()
                + child.accrued_interest.abs()
                + ctx.market.get(CEG_MARKET_VALUE, at)
        }
    };
    coverage * base
}

fn pof_std(state: &ContractState, ctx: &EventContext) -> Result<f64> {
    if state.exercise_date.is_some() {
        return Ok(0.0);
    }
    let children = ctx
        .children
        .ok_or_else(|| Error::InvalidAttributes("CEG requires a ChildContractObserver".into()))?;
    let Some((trigger_time, child)) = credit_event(ctx.attrs, children)? else {
        return Ok(0.0);
    };
    Ok(ctx.attrs.role_sign() * guarantee_amount(ctx, &child, trigger_time))
}

fn stf_std(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    if state.exercise_date.is_some() {
        return Ok(ContractState { status_date: ctx.event_time, ..*state });
    }
    let children = ctx
        .children
        .ok_or_else(|| Error::InvalidAttributes("CEG requires a ChildContractObserver".into()))?;
    let Some((trigger_time, child)) = credit_event(ctx.attrs, children)? else {
        return Ok(ContractState { status_date: ctx.event_time, ..*state });
    };
    let amount = guarantee_amount(ctx, &child, trigger_time);
    Ok(ContractState {
        status_date: ctx.event_time,
        exercise_date: Some(ctx.event_time),
        exercise_amount: Some(amount),
        ..*state
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use super::*;
    use actus_model::{
        ContractEvent, ContractRole, ContractStructure, ContractType, Performance,
        SimulationResult,
    };
    use actus_observers::Constant;

    fn d(y: u16, m: u8, dd: u8) -> ActusDateTime {
        ActusDateTime::from_ymd(y, m, dd).unwrap()
    }

    fn attrs() -> ContractAttributes {
        ContractAttributes {
            maturity_date: Some(d(2025, 1, 1)),
            horizon_date: Some(d(2025, 1, 1)),
            coverage: Some(1.0),
            credit_enhancement_guarantee_extent: Some(GuaranteeExtent::Notional),
            contract_structure: Some(ContractStructure::new([(
                "CoveredContract".to_string(),
                "PAM-COVERED".to_string(),
            )])),
            ..ContractAttributes::new(
                "CEG-1",
                ContractType::Ceg,
                ContractRole::Gua,
                d(2024, 1, 1),
                "USD",
            )
        }
    }

    fn covered_result(performance: Performance) -> SimulationResult {
        let t = d(2024, 6, 1);
        let s = ContractState { notional: 50_000.0, performance, ..ContractState::zeroed(t) };
        SimulationResult {
            contract_id: "PAM-COVERED".to_string(),
            events: vec![ContractEvent {
                event_time: t,
                calculation_time: t,
                event_kind: EventKind::Ad,
                sequence: 0,
                payoff: 0.0,
                state_pre: s,
                state_post: s,
                currency: "USD".to_string(),
            }],
        }
    }

    #[test]
    fn a_credit_event_injects_a_settlement() {
        let a = attrs();
        let mut children = ChildContractObserver::new();
        children.register(covered_result(Performance::Df));
        children.freeze();
        let base = schedule(&a).unwrap();
        let finalized = finalize_schedule(&a, Some(&children), base).unwrap();
        let stds: Vec<_> = finalized.iter().filter(|e| e.event_kind == EventKind::Std).collect();
        assert_eq!(stds.len(), 1);
        assert_eq!(stds[0].event_time, d(2024, 6, 1));
    }

    #[test]
    fn settlement_period_defers_the_payment_date() {
        let mut a = attrs();
        a.settlement_period = Some(actus_time::Cycle::parse("5D").unwrap());
        let mut children = ChildContractObserver::new();
        children.register(covered_result(Performance::Dl));
        children.freeze();
        let finalized =
            finalize_schedule(&a, Some(&children), schedule(&a).unwrap()).unwrap();
        let std = finalized.iter().find(|e| e.event_kind == EventKind::Std).unwrap();
        assert_eq!(std.event_time, d(2024, 6, 6));
    }

    #[test]
    fn pays_guarantee_once_on_default_and_stays_silent_after() {
        let a = attrs();
        let mut children = ChildContractObserver::new();
        children.register(covered_result(Performance::Df));
        children.freeze();
        let market = Constant(0.0);
        let t = d(2024, 6, 1);
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
        let payoff = pof_std(&state0, &ctx).unwrap();
        assert_abs_diff_eq!(payoff, 50_000.0, epsilon = 1e-9);
        let state1 = stf_std(&state0, &ctx).unwrap();
        assert_eq!(state1.exercise_date, Some(t));
        assert_eq!(pof_std(&state1, &ctx).unwrap(), 0.0);
    }

    #[test]
    fn performing_covered_contract_pays_nothing() {
        let a = attrs();
        let mut children = ChildContractObserver::new();
        children.register(covered_result(Performance::Pf));
        children.freeze();
        let finalized =
            finalize_schedule(&a, Some(&children), schedule(&a).unwrap()).unwrap();
        assert!(finalized.iter().all(|e| e.event_kind != EventKind::Std));
    }
}
