//! FXOUT — FX outright: two notionals in two currencies settled at
//! maturity. Net settlement pays one difference; gross settlement
//! exchanges both legs as two separate `STD` events, each reported in the
//! contract's currency at the observed rate (an event carries a single
//! currency, so the second leg is converted rather than quoted raw).

use actus_core::errors::{Error, Result};
use actus_model::{ContractAttributes, ContractState, DeliverySettlement, EventKind};
use actus_time::BusinessDayConvention;

use crate::conventions::conventions_for;
use crate::dispatch::{EventContext, Pof, Stf, VariantHandlers};
use crate::schedule::{generate_single, merge, ScheduledEvent, SettlementLeg};

/// Market-object code for the exchange rate between the two legs'
/// currencies, quoted as units of the second currency per unit of the
/// first.
const FX: &str = "FX";

pub(crate) fn handlers() -> VariantHandlers {
    VariantHandlers { schedule, initial_state, pof, stf, finalize_schedule: None }
}

pub(crate) fn schedule(attrs: &ContractAttributes) -> Result<Vec<ScheduledEvent>> {
    let md = attrs.maturity_date.ok_or_else(|| {
        Error::InvalidAttributes("FXOUT requires maturity_date".into())
    })?;
    let (_, calendar) = conventions_for(attrs);
    let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
    let mut families = Vec::new();
    if let Some(ied) = attrs.initial_exchange_date {
        if ied >= attrs.status_date {
            families.push(vec![generate_single(ied, EventKind::Ied, bdc, &*calendar)]);
        }
    }
    let std_event = generate_single(md, EventKind::Std, bdc, &*calendar);
    match attrs.delivery_settlement.unwrap_or(DeliverySettlement::Net) {
        DeliverySettlement::Net => families.push(vec![std_event]),
        DeliverySettlement::Gross => families.push(vec![
            std_event.for_leg(SettlementLeg::First),
            std_event.for_leg(SettlementLeg::Second),
        ]),
    }
    Ok(merge(families))
}

pub(crate) fn initial_state(attrs: &ContractAttributes) -> Result<ContractState> {
    Ok(ContractState {
        notional: attrs.role_sign() * attrs.notional_principal.unwrap_or(0.0),
        maturity_date: attrs.maturity_date,
        ..ContractState::zeroed(attrs.status_date)
    })
}

pub(crate) fn pof(kind: EventKind) -> Option<Pof> {
    match kind {
        EventKind::Ied => Some(|_, _| Ok(0.0)),
        EventKind::Std => Some(pof_std),
        _ => None,
    }
}

pub(crate) fn stf(kind: EventKind) -> Option<Stf> {
    match kind {
        EventKind::Ied => Some(|_, ctx| initial_state(ctx.attrs)),
        EventKind::Std => Some(|state, ctx| {
            Ok(ContractState { status_date: ctx.event_time, ..*state })
        }),
        _ => None,
    }
}

fn observed_fx(ctx: &EventContext) -> Result<f64> {
    let fx = ctx.market.get(FX, ctx.event_time);
    if fx == 0.0 {
        return Err(Error::NumericDomain {
            event_time: ctx.event_time.to_string(),
            event_kind: EventKind::Std.code().to_string(),
            contract_id: ctx.attrs.contract_id.clone(),
            detail: "observed FX rate is zero".into(),
        });
    }
    Ok(fx)
}

/// The untagged (net) settlement pays the second leg converted at the
/// observed rate, less the first; a leg-tagged settlement (gross schedule)
/// pays the first-leg notional away and receives the converted second leg,
/// the pair summing to the same net figure.
fn pof_std(_state: &ContractState, ctx: &EventContext) -> Result<f64> {
    let leg1 = ctx.attrs.notional_principal.unwrap_or(0.0);
    let leg2 = ctx.attrs.notional_principal_2.unwrap_or(0.0);
    match ctx.leg {
        Some(SettlementLeg::First) => Ok(ctx.attrs.role_sign() * -leg1),
        Some(SettlementLeg::Second) => {
            Ok(ctx.attrs.role_sign() * leg2 / observed_fx(ctx)?)
        }
        None => Ok(ctx.attrs.role_sign() * (leg2 / observed_fx(ctx)? - leg1)),
    }
}
