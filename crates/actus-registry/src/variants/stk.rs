//! STK — Stock position: like CSH, plus periodic `DV` (dividend) events
//! paying an observed per-share amount on the held quantity.

use actus_core::errors::Result;
use actus_model::{ContractAttributes, ContractState, EventKind};
use actus_time::BusinessDayConvention;

use crate::conventions::conventions_for;
use crate::dispatch::{EventContext, Pof, Stf, VariantHandlers};
use crate::schedule::{generate_family, merge, ScheduledEvent};
use crate::variants::csh;

/// Market-object code a dividend payoff observes.
const DIVIDEND: &str = "DIVIDEND";

pub(crate) fn handlers() -> VariantHandlers {
    VariantHandlers {
        schedule,
        initial_state: csh::initial_state,
        pof,
        stf,
        finalize_schedule: None,
    }
}

pub(crate) fn schedule(attrs: &ContractAttributes) -> Result<Vec<ScheduledEvent>> {
    let mut families = vec![csh::schedule(attrs)?];
    if let (Some(spec), Some(horizon)) = (&attrs.dividend_schedule, attrs.horizon_date) {
        let (_, calendar) = conventions_for(attrs);
        let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
        families.push(generate_family(spec, horizon, EventKind::Dv, bdc, &*calendar)?);
    }
    Ok(merge(families))
}

pub(crate) fn pof(kind: EventKind) -> Option<Pof> {
    match kind {
        EventKind::Dv => Some(pof_dv),
        other => csh::pof(other),
    }
}

pub(crate) fn stf(kind: EventKind) -> Option<Stf> {
    match kind {
        EventKind::Dv => Some(|state, ctx| {
            Ok(ContractState { status_date: ctx.event_time, ..*state })
        }),
        other => csh::stf(other),
    }
}

fn pof_dv(state: &ContractState, ctx: &EventContext) -> Result<f64> {
    let per_share = ctx.market.get(DIVIDEND, ctx.event_time);
    Ok(ctx.attrs.role_sign() * per_share * state.notional.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actus_model::{ContractRole, ContractType, CycleSpec};
    use actus_observers::Constant;
    use actus_time::{ActusDateTime, Cycle};

    fn d(y: u16, m: u8, dd: u8) -> ActusDateTime {
        ActusDateTime::from_ymd(y, m, dd).unwrap()
    }

    #[test]
    fn dividends_pay_per_share_on_the_position() {
        let attrs = ContractAttributes {
            horizon_date: Some(d(2025, 1, 1)),
            dividend_schedule: Some(CycleSpec {
                anchor: d(2024, 6, 1),
                cycle: Some(Cycle::parse("6M").unwrap()),
                end_of_month: false,
            }),
            notional_principal: Some(1_000.0),
            ..ContractAttributes::new(
                "STK-1",
                ContractType::Stk,
                ContractRole::Rpa,
                d(2024, 1, 1),
                "USD",
            )
        };
        let events = schedule(&attrs).unwrap();
        assert!(events.iter().any(|e| e.event_kind == EventKind::Dv));

        let state = csh::initial_state(&attrs).unwrap();
        let market = Constant(1.25);
        let ctx = EventContext {
            attrs: &attrs,
            event_time: d(2024, 6, 1),
            calculation_time: d(2024, 6, 1),
            market: &market,
            children: None,
            payoff_hint: None,
            leg: None,
            period_start: d(2024, 1, 1),
        };
        assert_eq!(pof_dv(&state, &ctx).unwrap(), 1_250.0);
    }
}
