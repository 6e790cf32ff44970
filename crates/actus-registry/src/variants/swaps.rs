//! SWAPS — composite swap over two already-simulated leg contracts
//! (`FirstLeg`/`SecondLeg`) named in `contract_structure`: their flows at
//! each settlement date are netted into one event, or, under gross
//! settlement, emitted as one event per leg.

use actus_core::errors::{Error, Result};
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
        Error::InvalidAttributes("SWAPS requires maturity_date".into())
    })?;
    let (_, calendar) = conventions_for(attrs);
    let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
    let md_event = generate_single(md, EventKind::Md, bdc, &*calendar);
    let gross = attrs.delivery_settlement == Some(DeliverySettlement::Gross);
    let split = |e: ScheduledEvent| {
        if gross {
            vec![e.for_leg(SettlementLeg::First), e.for_leg(SettlementLeg::Second)]
        } else {
            vec![e]
        }
    };
    let mut families = Vec::new();
    if let Some(spec) = &attrs.interest_schedule {
        let mut ips = generate_family(spec, md, EventKind::Ip, bdc, &*calendar)?;
        ips.retain(|e| e.event_time < md_event.event_time);
        families.push(ips.into_iter().flat_map(&split).collect());
    }
    families.push(split(md_event));
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
        EventKind::Ip | EventKind::Md => Some(pof_ip),
        _ => None,
    }
}

pub(crate) fn stf(kind: EventKind) -> Option<Stf> {
    match kind {
        EventKind::Ip | EventKind::Md => Some(|state, ctx| {
            Ok(ContractState { status_date: ctx.event_time, ..*state })
        }),
        _ => None,
    }
}

fn leg_payoff_at(ctx: &EventContext, role: &str) -> Result<f64> {
    let structure = ctx
        .attrs
        .contract_structure
        .as_ref()
        .ok_or_else(|| Error::InvalidAttributes("SWAPS requires contract_structure".into()))?;
    let child_id = structure
        .child(role)
        .ok_or_else(|| {
            Error::InvalidAttributes(format!("SWAPS contract_structure missing {role}"))
        })?;
    let children = ctx
        .children
        .ok_or_else(|| Error::InvalidAttributes("SWAPS requires a ChildContractObserver".into()))?;
    let events = children.events(child_id)?;
    Ok(events
        .iter()
        .filter(|e| e.event_time == ctx.event_time)
        .map(|e| e.payoff)
        .sum())
}

/// An untagged event nets both legs' flows at this timestamp; a leg-tagged
/// event (gross schedule) carries only its own leg's flows.
fn pof_ip(_state: &ContractState, ctx: &EventContext) -> Result<f64> {
    match ctx.leg {
        Some(SettlementLeg::First) => leg_payoff_at(ctx, "FirstLeg"),
        Some(SettlementLeg::Second) => leg_payoff_at(ctx, "SecondLeg"),
        None => {
            Ok(leg_payoff_at(ctx, "FirstLeg")? + leg_payoff_at(ctx, "SecondLeg")?)
        }
    }
}
