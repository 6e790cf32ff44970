//! CLM — Call Money: open-ended until an observed `XD` (exercise) callout
//! triggers settlement at `XD + notice period`; `IP`/`MD` retime to that
//! settlement date.

use actus_core::errors::{Error, Result};
use actus_model::{ContractAttributes, ContractState, EventKind};
use actus_observers::ChildContractObserver;
use actus_time::{ActusDateTime, BusinessDayConvention, Cycle};

use crate::conventions::conventions_for;
use crate::dispatch::{EventContext, Pof, Stf, VariantHandlers};
use crate::schedule::{generate_family, generate_single, merge, ScheduledEvent};
use crate::variants::pam;

pub(crate) fn handlers() -> VariantHandlers {
    VariantHandlers {
        schedule,
        initial_state: pam::initial_state,
        pof,
        stf,
        finalize_schedule: Some(finalize_schedule),
    }
}

/// Open-ended: the terminal date is `horizon_date` if supplied, otherwise
/// the engine simply stops once the schedule is exhausted, so families are
/// expanded against `horizon_date` when present and left single-shot
/// (interest family resolved to just its anchor) otherwise.
pub(crate) fn schedule(attrs: &ContractAttributes) -> Result<Vec<ScheduledEvent>> {
    let (_, calendar) = conventions_for(attrs);
    let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
    let mut families = Vec::new();
    if let Some(ied) = attrs.initial_exchange_date {
        if ied >= attrs.status_date {
            families.push(vec![generate_single(ied, EventKind::Ied, bdc, &*calendar)]);
        }
    }
    if let (Some(spec), Some(horizon)) = (&attrs.interest_schedule, attrs.horizon_date) {
        families.push(generate_family(spec, horizon, EventKind::Ip, bdc, &*calendar)?);
    } else if let Some(spec) = &attrs.interest_schedule {
        families.push(vec![generate_single(spec.anchor, EventKind::Ip, bdc, &*calendar)]);
    }
    Ok(merge(families))
}

fn settlement_date(xd: ActusDateTime, notice: Option<Cycle>) -> Result<ActusDateTime> {
    match notice {
        Some(cycle) => xd
            .advance(cycle.n as i32, cycle.unit)
            .map_err(|e| Error::InvalidSchedule(e.to_string())),
        None => Ok(xd),
    }
}

/// Once an exercise callout is in the merged schedule, the call has been
/// made: interest dates after the call are void, and the deposit plus its
/// final interest settle together at `XD + notice` through `IP`/`MD`.
fn finalize_schedule(
    attrs: &ContractAttributes,
    _children: Option<&ChildContractObserver>,
    mut schedule: Vec<ScheduledEvent>,
) -> Result<Vec<ScheduledEvent>> {
    let Some(xd_at) = schedule
        .iter()
        .filter(|e| e.event_kind == EventKind::Xd)
        .map(|e| e.event_time)
        .min()
    else {
        return Ok(schedule);
    };
    let settlement = settlement_date(xd_at, attrs.exercise_notice_period)?;
    schedule.retain(|e| {
        e.event_time <= xd_at
            || !matches!(e.event_kind, EventKind::Ip | EventKind::Md)
    });
    let (_, calendar) = conventions_for(attrs);
    let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
    let retimed = vec![
        generate_single(settlement, EventKind::Ip, bdc, &*calendar),
        generate_single(settlement, EventKind::Md, bdc, &*calendar),
    ];
    Ok(merge(vec![schedule, retimed]))
}

pub(crate) fn pof(kind: EventKind) -> Option<Pof> {
    match kind {
        EventKind::Xd => Some(|_, _| Ok(0.0)),
        other => pam::pof(other),
    }
}

pub(crate) fn stf(kind: EventKind) -> Option<Stf> {
    match kind {
        EventKind::Xd => Some(stf_xd),
        other => pam::stf(other),
    }
}

/// The observed exercise latches the settlement date and the amount being
/// called; the retimed `IP`/`MD` pair does the actual paying.
fn stf_xd(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    let settlement = settlement_date(ctx.event_time, ctx.attrs.exercise_notice_period)?;
    Ok(ContractState {
        status_date: ctx.event_time,
        exercise_date: Some(settlement),
        exercise_amount: Some(state.notional),
        ..*state
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actus_model::{ContractRole, ContractType, CycleSpec};

    fn d(y: u16, m: u8, dd: u8) -> ActusDateTime {
        ActusDateTime::from_ymd(y, m, dd).unwrap()
    }

    fn clm_attrs() -> ContractAttributes {
        ContractAttributes {
            initial_exchange_date: Some(d(2024, 1, 1)),
            horizon_date: Some(d(2025, 1, 1)),
            interest_schedule: Some(CycleSpec {
                anchor: d(2024, 2, 1),
                cycle: Some(Cycle::parse("1M").unwrap()),
                end_of_month: false,
            }),
            notional_principal: Some(500_000.0),
            nominal_interest_rate: Some(0.03),
            exercise_notice_period: Some(Cycle::parse("2D").unwrap()),
            ..ContractAttributes::new(
                "CLM-1",
                ContractType::Clm,
                ContractRole::Rpa,
                d(2024, 1, 1),
                "USD",
            )
        }
    }

    #[test]
    fn exercise_retimes_interest_and_maturity_to_the_notice_date() {
        let attrs = clm_attrs();
        let base = schedule(&attrs).unwrap();
        let with_xd = merge(vec![
            base,
            vec![ScheduledEvent::new(d(2024, 6, 15), d(2024, 6, 15), EventKind::Xd)],
        ]);
        let finalized = finalize_schedule(&attrs, None, with_xd).unwrap();

        let settlement = d(2024, 6, 17);
        let md: Vec<_> = finalized.iter().filter(|e| e.event_kind == EventKind::Md).collect();
        assert_eq!(md.len(), 1);
        assert_eq!(md[0].event_time, settlement);
        // No interest date survives between the call and its settlement.
        assert!(finalized
            .iter()
            .filter(|e| e.event_kind == EventKind::Ip)
            .all(|e| e.event_time <= d(2024, 6, 15) || e.event_time == settlement));
    }

    #[test]
    fn without_exercise_the_schedule_runs_to_the_horizon() {
        let attrs = clm_attrs();
        let base = schedule(&attrs).unwrap();
        let finalized = finalize_schedule(&attrs, None, base.clone()).unwrap();
        assert_eq!(base, finalized);
        assert!(finalized.iter().all(|e| e.event_kind != EventKind::Md));
    }
}
