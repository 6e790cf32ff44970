//! PAM — Principal at Maturity: a single notional disbursed at `IED` and
//! fully repaid at `MD`, with periodic interest in between. The baseline
//! variant: LAM/NAM/ANN/CLM/UMP all delegate here for the events they share.

use actus_core::errors::Result;
use actus_core::{ensure, fail};
use actus_model::{
    ContractAttributes, ContractState, EventKind, FeeBasis, PenaltyType, ScalingEffect,
};
use actus_time::BusinessDayConvention;

use crate::conventions::conventions_for;
use crate::dispatch::{EventContext, Pof, Stf, VariantHandlers};
use crate::schedule::{generate_family, generate_single, merge, ScheduledEvent};

pub(crate) fn handlers() -> VariantHandlers {
    VariantHandlers { schedule, initial_state, pof, stf, finalize_schedule: None }
}

pub(crate) fn schedule(attrs: &ContractAttributes) -> Result<Vec<ScheduledEvent>> {
    let md = attrs.maturity_date.ok_or_else(|| {
        actus_core::errors::Error::InvalidAttributes("PAM requires maturity_date".into())
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
    if let Some(spec) = &attrs.interest_schedule {
        let mut interest = generate_family(spec, md, EventKind::Ip, bdc, &*calendar)?;
        // Interest up to the capitalization end compounds into the notional
        // instead of paying out.
        if let Some(ipcied) = attrs.capitalization_end_date {
            for ev in &mut interest {
                if ev.event_time <= ipcied {
                    ev.event_kind = EventKind::Ipci;
                }
            }
        }
        families.push(interest);
    }
    if let Some(spec) = &attrs.rate_reset_schedule {
        families.push(generate_family(spec, md, EventKind::Rr, bdc, &*calendar)?);
    }
    if let Some(fixings) = &attrs.rate_reset_fixings {
        families.push(
            fixings
                .iter()
                .map(|&(date, _)| generate_single(date, EventKind::Rrf, bdc, &*calendar))
                .collect(),
        );
    }
    if let Some(spec) = &attrs.fee_schedule {
        families.push(generate_family(spec, md, EventKind::Fp, bdc, &*calendar)?);
    }
    if let Some(spec) = &attrs.scaling_schedule {
        families.push(generate_family(spec, md, EventKind::Sc, bdc, &*calendar)?);
    }
    // The maturity event itself settles the final coupon, so cyclic events
    // landing exactly on it would double-pay; everything at or past MD is
    // dropped before MD is appended.
    for family in &mut families {
        family.retain(|e| e.event_time < md_event.event_time || e.event_kind == EventKind::Ied);
    }
    if let Some(prd) = attrs.purchase_date {
        families.push(vec![generate_single(prd, EventKind::Prd, bdc, &*calendar)]);
    }
    if let Some(td) = attrs.termination_date {
        families.push(vec![generate_single(td, EventKind::Td, bdc, &*calendar)]);
    }
    families.push(vec![md_event]);

    let mut merged = merge(families);
    // Termination ends the contract: nothing settles after TD, including MD.
    if attrs.termination_date.is_some() {
        if let Some(td_at) = merged
            .iter()
            .find(|e| e.event_kind == EventKind::Td)
            .map(|e| e.event_time)
        {
            merged.retain(|e| {
                e.event_time < td_at
                    || (e.event_time == td_at
                        && e.event_kind.priority() <= EventKind::Td.priority())
            });
        }
    }
    Ok(merged)
}

pub(crate) fn initial_state(attrs: &ContractAttributes) -> Result<ContractState> {
    let nt = attrs.notional_principal.unwrap_or(0.0);
    let rate = attrs.nominal_interest_rate.unwrap_or(0.0);
    let role = attrs.role_sign();
    let ied = attrs.initial_exchange_date.unwrap_or(attrs.status_date);

    let ipac = match attrs.accrued_interest {
        Some(ipac) => ipac,
        None => {
            if ied < attrs.status_date {
                let (dc, _) = conventions_for(attrs);
                role * dc.year_fraction(ied, attrs.status_date) * rate * nt
            } else {
                0.0
            }
        }
    };

    Ok(ContractState {
        notional: role * nt,
        nominal_rate: rate,
        accrued_interest: ipac,
        maturity_date: attrs.maturity_date,
        ..ContractState::zeroed(attrs.status_date)
    })
}

pub(crate) fn pof(kind: EventKind) -> Option<Pof> {
    match kind {
        EventKind::Ied => Some(pof_ied),
        EventKind::Ip => Some(pof_ip),
        EventKind::Ipci => Some(|_, _| Ok(0.0)),
        EventKind::Md => Some(pof_md),
        EventKind::Fp => Some(pof_fp),
        EventKind::Pp => Some(pof_pp),
        EventKind::Py => Some(pof_py),
        EventKind::Prd => Some(pof_prd),
        EventKind::Td => Some(pof_td),
        _ => None,
    }
}

pub(crate) fn stf(kind: EventKind) -> Option<Stf> {
    match kind {
        EventKind::Ied => Some(stf_ied),
        EventKind::Ip => Some(stf_ip),
        EventKind::Ipci => Some(stf_ipci),
        EventKind::Md => Some(stf_md),
        EventKind::Rr => Some(stf_rr),
        EventKind::Rrf => Some(stf_rrf),
        EventKind::Sc => Some(stf_sc),
        EventKind::Fp => Some(stf_fp),
        EventKind::Pp => Some(stf_pp),
        EventKind::Py => Some(stf_advance),
        EventKind::Prd => Some(stf_advance),
        EventKind::Td => Some(stf_td),
        _ => None,
    }
}

fn pof_ied(_state: &ContractState, ctx: &EventContext) -> Result<f64> {
    let nt = ctx.attrs.notional_principal.unwrap_or(0.0);
    Ok(ctx.attrs.role_sign() * -1.0 * nt)
}

fn pof_ip(state: &ContractState, _ctx: &EventContext) -> Result<f64> {
    Ok(state.interest_scaling * state.accrued_interest + state.accrued_fees)
}

fn pof_md(state: &ContractState, _ctx: &EventContext) -> Result<f64> {
    Ok(state.notional_scaling * state.notional
        + state.interest_scaling * state.accrued_interest
        + state.accrued_fees)
}

fn pof_fp(state: &ContractState, ctx: &EventContext) -> Result<f64> {
    match ctx.attrs.fee_basis {
        Some(FeeBasis::Absolute) | None => Ok(ctx.attrs.fee_rate.unwrap_or(0.0)),
        // The engine's between-event accrual has already folded the
        // notional-proportional fee for the elapsed period into `Feac`.
        Some(FeeBasis::Notional) => Ok(state.accrued_fees),
    }
}

/// A prepayment's amount is whatever the behavioral callout declared; an
/// attribute-scheduled `PP` with no callout amount pays nothing.
fn pof_pp(_state: &ContractState, ctx: &EventContext) -> Result<f64> {
    Ok(ctx.payoff_hint.unwrap_or(0.0))
}

fn pof_py(state: &ContractState, ctx: &EventContext) -> Result<f64> {
    let pyrt = ctx.attrs.penalty_rate.unwrap_or(0.0);
    let (dc, _) = conventions_for(ctx.attrs);
    let y = dc.year_fraction(ctx.period_start, ctx.calculation_time);
    match ctx.attrs.penalty_type {
        Some(PenaltyType::Absolute) | None => Ok(ctx.attrs.role_sign() * pyrt),
        Some(PenaltyType::Notional) => Ok(y * state.notional * pyrt),
        Some(PenaltyType::RateDifferential) => {
            match ctx.attrs.rate_reset_market_object.as_deref() {
                Some(market_object) => {
                    let observed = ctx.market.get(market_object, ctx.event_time);
                    Ok(y * state.notional * (state.nominal_rate - observed).max(0.0))
                }
                // No rate observer to difference against: degrade to the
                // notional-proportional form.
                None => Ok(y * state.notional * pyrt),
            }
        }
    }
}

fn pof_prd(state: &ContractState, ctx: &EventContext) -> Result<f64> {
    let (dc, _) = conventions_for(ctx.attrs);
    let y = dc.year_fraction(ctx.period_start, ctx.calculation_time);
    let pprd = ctx.attrs.price_at_purchase.unwrap_or(0.0);
    Ok(ctx.attrs.role_sign()
        * -1.0
        * (pprd + state.accrued_interest + y * state.nominal_rate * state.notional))
}

fn pof_td(state: &ContractState, ctx: &EventContext) -> Result<f64> {
    let (dc, _) = conventions_for(ctx.attrs);
    let y = dc.year_fraction(ctx.period_start, ctx.calculation_time);
    let ptd = ctx.attrs.price_at_termination.unwrap_or(0.0);
    Ok(ctx.attrs.role_sign()
        * (ptd + state.accrued_interest + y * state.nominal_rate * state.notional))
}

fn stf_ied(_state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    initial_state(ctx.attrs)
}

fn stf_advance(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    Ok(ContractState { status_date: ctx.event_time, ..*state })
}

fn stf_ip(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    Ok(ContractState {
        status_date: ctx.event_time,
        accrued_interest: 0.0,
        accrued_fees: 0.0,
        ..*state
    })
}

/// Capitalization: the accrued interest compounds into the notional instead
/// of paying out.
fn stf_ipci(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    Ok(ContractState {
        status_date: ctx.event_time,
        notional: state.notional + state.interest_scaling * state.accrued_interest,
        accrued_interest: 0.0,
        ..*state
    })
}

fn stf_md(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    Ok(ContractState {
        status_date: ctx.event_time,
        notional: 0.0,
        accrued_interest: 0.0,
        accrued_fees: 0.0,
        // Ipnr is deliberately preserved: MD reports the rate active at
        // maturity rather than clearing it.
        ..*state
    })
}

fn stf_rr(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    let market_object = ctx
        .attrs
        .rate_reset_market_object
        .as_deref()
        .unwrap_or("");
    let observed = ctx.market.get(market_object, ctx.event_time);
    let mult = ctx.attrs.rate_multiplier.unwrap_or(1.0);
    let spread = ctx.attrs.rate_spread.unwrap_or(0.0);
    let mut rate = observed * mult + spread;
    if let Some(floor) = ctx.attrs.rate_reset_floor {
        ensure!(floor.is_finite(), "rate_reset_floor must be finite");
        rate = rate.max(floor);
    }
    if let Some(ceiling) = ctx.attrs.rate_reset_ceiling {
        if ceiling < ctx.attrs.rate_reset_floor.unwrap_or(f64::NEG_INFINITY) {
            fail!("rate_reset_ceiling below rate_reset_floor");
        }
        rate = rate.min(ceiling);
    }
    Ok(ContractState { status_date: ctx.event_time, nominal_rate: rate, ..*state })
}

/// A scheduled fixing: the new rate was agreed up front, no market
/// observation takes place.
fn stf_rrf(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    let fixed = ctx
        .attrs
        .rate_reset_fixings
        .as_ref()
        .and_then(|fixings| {
            fixings
                .iter()
                .find(|&&(date, _)| date == ctx.calculation_time || date == ctx.event_time)
                .map(|&(_, rate)| rate)
        })
        .unwrap_or(state.nominal_rate);
    Ok(ContractState { status_date: ctx.event_time, nominal_rate: fixed, ..*state })
}

fn stf_sc(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    let market_object = ctx.attrs.scaling_market_object.as_deref().unwrap_or("");
    let observed = ctx.market.get(market_object, ctx.event_time);
    let baseline = ctx.attrs.scaling_index_baseline.unwrap_or(1.0);
    ensure!(baseline != 0.0, "scaling_index_baseline must not be zero");
    let factor = observed / baseline;
    let (nsc, isc) = match ctx.attrs.scaling_effect {
        None | Some(ScalingEffect::None) => (state.notional_scaling, state.interest_scaling),
        Some(ScalingEffect::Notional) => (factor, state.interest_scaling),
        Some(ScalingEffect::Interest) => (state.notional_scaling, factor),
        Some(ScalingEffect::Both) => (factor, factor),
    };
    Ok(ContractState {
        status_date: ctx.event_time,
        notional_scaling: nsc,
        interest_scaling: isc,
        ..*state
    })
}

fn stf_fp(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    Ok(ContractState { status_date: ctx.event_time, accrued_fees: 0.0, ..*state })
}

fn stf_pp(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    let amount = ctx.payoff_hint.unwrap_or(0.0);
    Ok(ContractState {
        status_date: ctx.event_time,
        notional: state.notional - amount,
        ..*state
    })
}

fn stf_td(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    Ok(ContractState {
        status_date: ctx.event_time,
        notional: 0.0,
        accrued_interest: 0.0,
        accrued_fees: 0.0,
        ..*state
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use super::*;
    use actus_model::{ContractRole, ContractType, CycleSpec, DayCountConventionCode};
    use actus_observers::{Constant, Dict, MarketObserver};
    use actus_time::{ActusDateTime, Cycle};

    fn d(y: u16, m: u8, dd: u8) -> ActusDateTime {
        ActusDateTime::from_ymd(y, m, dd).unwrap()
    }

    fn pam_attrs() -> ContractAttributes {
        ContractAttributes {
            initial_exchange_date: Some(d(2024, 1, 15)),
            maturity_date: Some(d(2025, 1, 15)),
            interest_schedule: Some(CycleSpec {
                anchor: d(2024, 7, 15),
                cycle: Some(Cycle::parse("6M").unwrap()),
                end_of_month: false,
            }),
            notional_principal: Some(100_000.0),
            nominal_interest_rate: Some(0.05),
            day_count_convention: Some(DayCountConventionCode::Thirty360E),
            ..ContractAttributes::new(
                "PAM-1",
                ContractType::Pam,
                ContractRole::Rpa,
                d(2024, 1, 15),
                "USD",
            )
        }
    }

    fn ctx<'a>(
        attrs: &'a ContractAttributes,
        market: &'a dyn MarketObserver,
        at: ActusDateTime,
        period_start: ActusDateTime,
    ) -> EventContext<'a> {
        EventContext {
            attrs,
            event_time: at,
            calculation_time: at,
            market,
            children: None,
            payoff_hint: None,
            leg: None,
            period_start,
        }
    }

    #[test]
    fn schedule_has_no_interest_event_at_maturity() {
        let attrs = pam_attrs();
        let events = schedule(&attrs).unwrap();
        // IED, IP at 2024-07-15, MD at 2025-01-15: the coupon landing on
        // the maturity date settles through MD, not a separate IP.
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].event_kind, EventKind::Ied);
        assert_eq!(events[1].event_kind, EventKind::Ip);
        assert_eq!(events[2].event_kind, EventKind::Md);
    }

    #[test]
    fn scenario_pam_semi_annual_one_year() {
        let attrs = pam_attrs();
        let events = schedule(&attrs).unwrap();
        let market = Constant(0.0);
        let mut state = initial_state(&attrs).unwrap();

        let ctx_ied = ctx(&attrs, &market, events[0].event_time, state.status_date);
        let payoff_ied = pof_ied(&state, &ctx_ied).unwrap();
        assert_eq!(payoff_ied, -100_000.0);
        state = stf_ied(&state, &ctx_ied).unwrap();

        // Accrue up to the IP date, as the engine does between events.
        let (dc, _) = conventions_for(&attrs);
        let period_start = state.status_date;
        let y1 = dc.year_fraction(state.status_date, events[1].calculation_time);
        state.accrued_interest += state.notional * state.nominal_rate * y1;
        state.status_date = events[1].calculation_time;

        let ctx_ip = ctx(&attrs, &market, events[1].event_time, period_start);
        let payoff_ip = pof_ip(&state, &ctx_ip).unwrap();
        assert_abs_diff_eq!(payoff_ip, 2_500.0, epsilon = 1e-6);
        state = stf_ip(&state, &ctx_ip).unwrap();

        let period_start = state.status_date;
        let y2 = dc.year_fraction(state.status_date, events[2].calculation_time);
        state.accrued_interest += state.notional * state.nominal_rate * y2;
        state.status_date = events[2].calculation_time;

        let ctx_md = ctx(&attrs, &market, events[2].event_time, period_start);
        let payoff_md = pof_md(&state, &ctx_md).unwrap();
        assert_abs_diff_eq!(payoff_md, 102_500.0, epsilon = 1e-6);

        assert_abs_diff_eq!(payoff_ied + payoff_ip + payoff_md, 5_000.0, epsilon = 1e-6);
    }

    #[test]
    fn capitalization_turns_early_coupons_into_ipci() {
        let mut attrs = pam_attrs();
        attrs.capitalization_end_date = Some(d(2024, 7, 15));
        let events = schedule(&attrs).unwrap();
        assert_eq!(events[1].event_kind, EventKind::Ipci);

        // Capitalizing folds the accrued coupon into the notional.
        let market = Constant(0.0);
        let state = ContractState {
            notional: 100_000.0,
            accrued_interest: 2_500.0,
            ..ContractState::zeroed(d(2024, 7, 15))
        };
        let c = ctx(&attrs, &market, d(2024, 7, 15), d(2024, 1, 15));
        let next = stf_ipci(&state, &c).unwrap();
        assert_eq!(next.notional, 102_500.0);
        assert_eq!(next.accrued_interest, 0.0);
    }

    #[test]
    fn scheduled_fixing_sets_the_rate_without_observation() {
        let mut attrs = pam_attrs();
        attrs.rate_reset_fixings = Some(vec![(d(2024, 7, 15), 0.065)]);
        let events = schedule(&attrs).unwrap();
        assert!(events.iter().any(|e| e.event_kind == EventKind::Rrf));

        let market = Constant(0.99); // must be ignored
        let state = initial_state(&attrs).unwrap();
        let c = ctx(&attrs, &market, d(2024, 7, 15), d(2024, 1, 15));
        let next = stf_rrf(&state, &c).unwrap();
        assert_abs_diff_eq!(next.nominal_rate, 0.065, epsilon = 1e-12);
    }

    #[test]
    fn penalty_types_absolute_notional_and_differential() {
        let mut attrs = pam_attrs();
        attrs.penalty_rate = Some(0.02);
        let market = Dict::new([("BENCHMARK".to_string(), 0.03)]);
        let state = ContractState {
            notional: 100_000.0,
            nominal_rate: 0.05,
            ..ContractState::zeroed(d(2024, 7, 15))
        };

        attrs.penalty_type = Some(PenaltyType::Absolute);
        let c = ctx(&attrs, &market, d(2024, 7, 15), d(2024, 1, 15));
        assert_abs_diff_eq!(pof_py(&state, &c).unwrap(), 0.02, epsilon = 1e-12);

        attrs.penalty_type = Some(PenaltyType::Notional);
        let c = ctx(&attrs, &market, d(2024, 7, 15), d(2024, 1, 15));
        assert!((pof_py(&state, &c).unwrap() - 0.5 * 100_000.0 * 0.02).abs() < 1e-6);

        attrs.penalty_type = Some(PenaltyType::RateDifferential);
        attrs.rate_reset_market_object = Some("BENCHMARK".to_string());
        let c = ctx(&attrs, &market, d(2024, 7, 15), d(2024, 1, 15));
        // 0.5y * 100,000 * (5% - 3%)
        assert_abs_diff_eq!(pof_py(&state, &c).unwrap(), 1_000.0, epsilon = 1e-6);
    }

    #[test]
    fn termination_cuts_the_schedule_short() {
        let mut attrs = pam_attrs();
        attrs.termination_date = Some(d(2024, 10, 1));
        attrs.price_at_termination = Some(101_000.0);
        let events = schedule(&attrs).unwrap();
        assert_eq!(events.last().unwrap().event_kind, EventKind::Td);
        assert!(events.iter().all(|e| e.event_kind != EventKind::Md));
    }
}
