//! OPTNS — Option: generates `XD` (exercise) events per the chosen exercise
//! style, paying `R(role) * max(0, sign*(S_t - K))` at each.

use actus_core::errors::Result;
use actus_model::{ContractAttributes, ContractState, EventKind, OptionExerciseType, OptionType};
use actus_time::{BusinessDayConvention, Cycle};

use crate::conventions::conventions_for;
use crate::dispatch::{EventContext, Pof, Stf, VariantHandlers};
use crate::schedule::{generate_single, merge, ScheduledEvent};

/// Market-object code for the underlying's spot price.
const UNDERLYING: &str = "UNDERLYING";

pub(crate) fn handlers() -> VariantHandlers {
    VariantHandlers { schedule, initial_state, pof, stf, finalize_schedule: None }
}

pub(crate) fn schedule(attrs: &ContractAttributes) -> Result<Vec<ScheduledEvent>> {
    let md = attrs.maturity_date.ok_or_else(|| {
        actus_core::errors::Error::InvalidAttributes("OPTNS requires maturity_date".into())
    })?;
    let (_, calendar) = conventions_for(attrs);
    let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
    let xd_dates = match attrs.option_exercise_type.unwrap_or(OptionExerciseType::European) {
        OptionExerciseType::European => vec![md],
        OptionExerciseType::American => {
            let monthly = Cycle::parse("1M").unwrap();
            monthly.expand(attrs.status_date, md, false)?
        }
        OptionExerciseType::Bermudan => {
            let end = attrs.option_exercise_end_date.unwrap_or(md);
            let monthly = Cycle::parse("1M").unwrap();
            monthly.expand(attrs.status_date, end, false)?
        }
    };
    let families = vec![xd_dates
        .into_iter()
        .map(|d| generate_single(d, EventKind::Xd, bdc, &*calendar))
        .collect()];
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
        EventKind::Xd => Some(pof_xd),
        _ => None,
    }
}

pub(crate) fn stf(kind: EventKind) -> Option<Stf> {
    match kind {
        EventKind::Xd => Some(stf_xd),
        _ => None,
    }
}

fn intrinsic_value(state_price: f64, ctx: &EventContext) -> f64 {
    let k = ctx.attrs.option_strike_1.unwrap_or(0.0);
    let sign = match ctx.attrs.option_type.unwrap_or(OptionType::Call) {
        OptionType::Call => 1.0,
        OptionType::Put => -1.0,
    };
    (sign * (state_price - k)).max(0.0)
}

fn pof_xd(_state: &ContractState, ctx: &EventContext) -> Result<f64> {
    let underlying = ctx.market.get(UNDERLYING, ctx.event_time);
    Ok(ctx.attrs.role_sign() * intrinsic_value(underlying, ctx))
}

/// Record the exercise whenever the option is in the money; the first
/// in-the-money date sticks.
fn stf_xd(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    let underlying = ctx.market.get(UNDERLYING, ctx.event_time);
    let value = intrinsic_value(underlying, ctx);
    if value > 0.0 && state.exercise_date.is_none() {
        return Ok(ContractState {
            status_date: ctx.event_time,
            exercise_date: Some(ctx.event_time),
            exercise_amount: Some(ctx.attrs.role_sign() * value),
            ..*state
        });
    }
    Ok(ContractState { status_date: ctx.event_time, ..*state })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actus_model::{ContractRole, ContractType};
    use actus_observers::Constant;
    use actus_time::ActusDateTime;

    fn d(y: u16, m: u8, dd: u8) -> ActusDateTime {
        ActusDateTime::from_ymd(y, m, dd).unwrap()
    }

    fn optns_attrs(option_type: OptionType, style: OptionExerciseType) -> ContractAttributes {
        ContractAttributes {
            maturity_date: Some(d(2024, 7, 1)),
            option_strike_1: Some(100.0),
            option_type: Some(option_type),
            option_exercise_type: Some(style),
            ..ContractAttributes::new(
                "OPTNS-1",
                ContractType::Optns,
                ContractRole::Buy,
                d(2024, 1, 1),
                "USD",
            )
        }
    }

    #[test]
    fn european_exercise_is_a_single_date_at_maturity() {
        let attrs = optns_attrs(OptionType::Call, OptionExerciseType::European);
        let events = schedule(&attrs).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_time, d(2024, 7, 1));
        assert_eq!(events[0].event_kind, EventKind::Xd);
    }

    #[test]
    fn american_exercise_runs_monthly_to_maturity() {
        let attrs = optns_attrs(OptionType::Call, OptionExerciseType::American);
        let events = schedule(&attrs).unwrap();
        assert_eq!(events.len(), 7); // Jan through Jul inclusive
    }

    #[test]
    fn call_and_put_intrinsic_values() {
        let call = optns_attrs(OptionType::Call, OptionExerciseType::European);
        let put = optns_attrs(OptionType::Put, OptionExerciseType::European);
        let market = Constant(110.0);
        let state = ContractState::zeroed(d(2024, 1, 1));
        let ctx_of = |attrs| EventContext {
            attrs,
            event_time: d(2024, 7, 1),
            calculation_time: d(2024, 7, 1),
            market: &market,
            children: None,
            payoff_hint: None,
            leg: None,
            period_start: d(2024, 1, 1),
        };
        assert_eq!(pof_xd(&state, &ctx_of(&call)).unwrap(), 10.0);
        assert_eq!(pof_xd(&state, &ctx_of(&put)).unwrap(), 0.0);
    }

    #[test]
    fn exercise_is_latched_once() {
        let attrs = optns_attrs(OptionType::Call, OptionExerciseType::American);
        let market = Constant(110.0);
        let state = ContractState::zeroed(d(2024, 1, 1));
        let ctx = EventContext {
            attrs: &attrs,
            event_time: d(2024, 3, 1),
            calculation_time: d(2024, 3, 1),
            market: &market,
            children: None,
            payoff_hint: None,
            leg: None,
            period_start: d(2024, 1, 1),
        };
        let first = stf_xd(&state, &ctx).unwrap();
        assert_eq!(first.exercise_date, Some(d(2024, 3, 1)));
        let later_ctx = EventContext { event_time: d(2024, 4, 1), ..ctx };
        let second = stf_xd(&first, &later_ctx).unwrap();
        assert_eq!(second.exercise_date, Some(d(2024, 3, 1)));
    }
}
