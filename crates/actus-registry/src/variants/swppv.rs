//! SWPPV — plain-vanilla interest-rate swap: a fixed leg (`Ipac`/`Ipnr`) and
//! a floating leg (`Ipac2`, rate held in `interest_calc_base` — SWPPV has no
//! use for `IPCB` itself) on a shared notional. Net settlement pays one
//! differential `IP` per coupon date; gross settlement schedules one `IP`
//! per leg, each paying its own accrual.

use actus_core::errors::Result;
use actus_model::{ContractAttributes, ContractState, DeliverySettlement, EventKind};
use actus_time::BusinessDayConvention;

use crate::conventions::conventions_for;
use crate::dispatch::{EventContext, Pof, Stf, VariantHandlers};
use crate::schedule::{generate_family, generate_single, merge, ScheduledEvent, SettlementLeg};

pub(crate) fn handlers() -> VariantHandlers {
    VariantHandlers { schedule, initial_state, pof, stf, finalize_schedule: None }
}

pub(crate) fn schedule(attrs: &ContractAttributes) -> Result<Vec<ScheduledEvent>> {
    let md = attrs.maturity_date.ok_or_else(|| {
        actus_core::errors::Error::InvalidAttributes("SWPPV requires maturity_date".into())
    })?;
    let (_, calendar) = conventions_for(attrs);
    let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
    let md_event = generate_single(md, EventKind::Md, bdc, &*calendar);
    let mut families = Vec::new();
    if let Some(ied) = attrs.initial_exchange_date {
        if ied >= attrs.status_date {
            families.push(vec![generate_single(ied, EventKind::Ied, bdc, &*calendar)]);
        }
    }
    let gross = attrs.delivery_settlement == Some(DeliverySettlement::Gross);
    if let Some(spec) = &attrs.interest_schedule {
        let mut ips = generate_family(spec, md, EventKind::Ip, bdc, &*calendar)?;
        if gross {
            // One event per leg at every coupon date, the final one
            // included: the MD event then has nothing left to sweep.
            families.push(
                ips.into_iter()
                    .flat_map(|e| {
                        [e.for_leg(SettlementLeg::First), e.for_leg(SettlementLeg::Second)]
                    })
                    .collect(),
            );
        } else {
            // MD settles the final net coupon itself.
            ips.retain(|e| e.event_time < md_event.event_time);
            families.push(ips);
        }
    }
    if let Some(spec) = &attrs.rate_reset_schedule {
        let mut rrs = generate_family(spec, md, EventKind::Rr, bdc, &*calendar)?;
        rrs.retain(|e| e.event_time < md_event.event_time);
        families.push(rrs);
    }
    families.push(vec![md_event]);
    Ok(merge(families))
}

pub(crate) fn initial_state(attrs: &ContractAttributes) -> Result<ContractState> {
    let nt = attrs.notional_principal.unwrap_or(0.0);
    Ok(ContractState {
        notional: attrs.role_sign() * nt,
        nominal_rate: attrs.nominal_interest_rate.unwrap_or(0.0),
        interest_calc_base: attrs.nominal_interest_rate_2.unwrap_or(0.0),
        accrued_interest: attrs.accrued_interest.unwrap_or(0.0),
        maturity_date: attrs.maturity_date,
        ..ContractState::zeroed(attrs.status_date)
    })
}

pub(crate) fn pof(kind: EventKind) -> Option<Pof> {
    match kind {
        EventKind::Ied => Some(|_, _| Ok(0.0)),
        EventKind::Ip | EventKind::Md => Some(pof_ip),
        _ => None,
    }
}

pub(crate) fn stf(kind: EventKind) -> Option<Stf> {
    match kind {
        EventKind::Ied => Some(|_, ctx| initial_state(ctx.attrs)),
        EventKind::Ip => Some(stf_ip),
        EventKind::Rr => Some(stf_rr),
        EventKind::Md => Some(|state, ctx| {
            Ok(ContractState {
                status_date: ctx.event_time,
                notional: 0.0,
                accrued_interest: 0.0,
                accrued_interest_2: 0.0,
                ..*state
            })
        }),
        _ => None,
    }
}

/// An untagged `IP` pays the net differential; a leg-tagged `IP` (gross
/// schedule) pays only its own side — the fixed accrual in, the floating
/// accrual out.
fn pof_ip(state: &ContractState, ctx: &EventContext) -> Result<f64> {
    let fixed = state.accrued_interest;
    let floating = state.accrued_interest_2;
    match ctx.leg {
        Some(SettlementLeg::First) => Ok(fixed),
        Some(SettlementLeg::Second) => Ok(-floating),
        None => Ok(fixed - floating),
    }
}

/// Sweep the accrual the event just paid; a leg-tagged `IP` leaves the
/// other leg's accrual for its sibling event at the same timestamp.
fn stf_ip(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    let (ipac, ipac2) = match ctx.leg {
        Some(SettlementLeg::First) => (0.0, state.accrued_interest_2),
        Some(SettlementLeg::Second) => (state.accrued_interest, 0.0),
        None => (0.0, 0.0),
    };
    Ok(ContractState {
        status_date: ctx.event_time,
        accrued_interest: ipac,
        accrued_interest_2: ipac2,
        ..*state
    })
}

/// Resets the floating rate for the *next* period. The period just ending
/// accrues with the old rate (`interest_calc_base`, not yet overwritten) —
/// the lifecycle engine's accrual step runs before this STF is invoked.
fn stf_rr(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    let market_object = ctx.attrs.rate_reset_market_object.as_deref().unwrap_or("");
    let observed = ctx.market.get(market_object, ctx.event_time);
    let mult = ctx.attrs.rate_multiplier.unwrap_or(1.0);
    let spread = ctx.attrs.rate_spread.unwrap_or(0.0);
    Ok(ContractState {
        status_date: ctx.event_time,
        interest_calc_base: observed * mult + spread,
        ..*state
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use super::*;
    use actus_model::{ContractRole, ContractType, CycleSpec};
    use actus_observers::Constant;
    use actus_time::{ActusDateTime, Cycle};

    fn d(y: u16, m: u8, dd: u8) -> ActusDateTime {
        ActusDateTime::from_ymd(y, m, dd).unwrap()
    }

    fn attrs() -> ContractAttributes {
        ContractAttributes {
            initial_exchange_date: Some(d(2024, 1, 1)),
            maturity_date: Some(d(2025, 1, 1)),
            interest_schedule: Some(CycleSpec {
                anchor: d(2024, 4, 1),
                cycle: Some(Cycle::parse("3M").unwrap()),
                end_of_month: false,
            }),
            rate_reset_schedule: Some(CycleSpec {
                anchor: d(2024, 4, 1),
                cycle: Some(Cycle::parse("3M").unwrap()),
                end_of_month: false,
            }),
            notional_principal: Some(1_000_000.0),
            nominal_interest_rate: Some(0.03),
            nominal_interest_rate_2: Some(0.025),
            rate_reset_market_object: Some("FLOATING_INDEX".into()),
            delivery_settlement: Some(DeliverySettlement::Net),
            ..ContractAttributes::new(
                "SWPPV-1",
                ContractType::Swppv,
                ContractRole::Rpa,
                d(2024, 1, 1),
                "USD",
            )
        }
    }

    #[test]
    fn net_settlement_pays_the_rate_differential() {
        let a = attrs();
        let mut state = initial_state(&a).unwrap();
        state.accrued_interest = 15_000.0;
        state.accrued_interest_2 = 12_500.0;
        let market = Constant(0.0);
        let ctx = EventContext {
            attrs: &a,
            event_time: d(2024, 7, 1),
            calculation_time: d(2024, 7, 1),
            market: &market,
            children: None,
            payoff_hint: None,
            leg: None,
            period_start: d(2024, 4, 1),
        };
        let payoff = pof_ip(&state, &ctx).unwrap();
        assert_abs_diff_eq!(payoff, 2_500.0, epsilon = 1e-9);
    }

    #[test]
    fn rate_reset_does_not_touch_accrued_legs() {
        let a = attrs();
        let state = initial_state(&a).unwrap();
        let market = Constant(0.04);
        let ctx = EventContext {
            attrs: &a,
            event_time: d(2024, 7, 1),
            calculation_time: d(2024, 7, 1),
            market: &market,
            children: None,
            payoff_hint: None,
            leg: None,
            period_start: d(2024, 4, 1),
        };
        let next = stf_rr(&state, &ctx).unwrap();
        assert_abs_diff_eq!(next.interest_calc_base, 0.04, epsilon = 1e-9);
        assert_eq!(next.accrued_interest_2, state.accrued_interest_2);
    }

    #[test]
    fn gross_settlement_pays_each_leg_separately() {
        let mut a = attrs();
        a.delivery_settlement = Some(DeliverySettlement::Gross);

        // Two tagged IP events per coupon date instead of one netted one.
        let events = schedule(&a).unwrap();
        let at_first_coupon: Vec<_> = events
            .iter()
            .filter(|e| e.event_kind == EventKind::Ip && e.event_time == d(2024, 4, 1))
            .collect();
        assert_eq!(at_first_coupon.len(), 2);
        assert_eq!(at_first_coupon[0].leg, Some(SettlementLeg::First));
        assert_eq!(at_first_coupon[1].leg, Some(SettlementLeg::Second));

        let mut state = initial_state(&a).unwrap();
        state.accrued_interest = 15_000.0;
        state.accrued_interest_2 = 12_500.0;
        let market = Constant(0.0);
        let ctx_first = EventContext {
            attrs: &a,
            event_time: d(2024, 7, 1),
            calculation_time: d(2024, 7, 1),
            market: &market,
            children: None,
            payoff_hint: None,
            leg: Some(SettlementLeg::First),
            period_start: d(2024, 4, 1),
        };
        let fixed_leg = pof_ip(&state, &ctx_first).unwrap();
        assert_abs_diff_eq!(fixed_leg, 15_000.0, epsilon = 1e-9);
        let state = stf_ip(&state, &ctx_first).unwrap();
        assert_eq!(state.accrued_interest, 0.0);
        assert_eq!(state.accrued_interest_2, 12_500.0);

        let ctx_second = EventContext { leg: Some(SettlementLeg::Second), ..ctx_first };
        let floating_leg = pof_ip(&state, &ctx_second).unwrap();
        assert_abs_diff_eq!(floating_leg, -12_500.0, epsilon = 1e-9);
        let state = stf_ip(&state, &ctx_second).unwrap();
        assert_eq!(state.accrued_interest_2, 0.0);

        // The two legs together carry the same net figure.
        assert_abs_diff_eq!(fixed_leg + floating_leg, 2_500.0, epsilon = 1e-9);
    }

    #[test]
    fn the_final_coupon_settles_through_md() {
        let a = attrs();
        let events = schedule(&a).unwrap();
        assert!(events
            .iter()
            .all(|e| e.event_kind != EventKind::Ip || e.event_time < d(2025, 1, 1)));
        assert_eq!(events.last().unwrap().event_kind, EventKind::Md);
    }
}
