//! LAX — Exotic Linear Amortizer: like LAM, but the principal schedule is
//! given as an explicit `(date, amount)` array instead of a cycle.

use actus_core::errors::Result;
use actus_model::{ContractAttributes, ContractState, EventKind};
use actus_time::BusinessDayConvention;

use crate::conventions::conventions_for;
use crate::dispatch::{EventContext, Pof, Stf, VariantHandlers};
use crate::schedule::{generate_single, merge, ScheduledEvent};
use crate::variants::{lam, pam};

pub(crate) fn handlers() -> VariantHandlers {
    VariantHandlers {
        schedule,
        initial_state: lam::initial_state,
        pof,
        stf,
        finalize_schedule: None,
    }
}

pub(crate) fn schedule(attrs: &ContractAttributes) -> Result<Vec<ScheduledEvent>> {
    let mut families = vec![pam::schedule(attrs)?];
    let bdc = attrs.business_day_convention.unwrap_or(BusinessDayConvention::NoShift);
    let (_, calendar) = conventions_for(attrs);
    if let Some(array) = &attrs.principal_redemption_array {
        families.push(
            array
                .iter()
                .map(|&(date, _)| generate_single(date, EventKind::Pr, bdc, &*calendar))
                .collect(),
        );
    }
    Ok(merge(families))
}

/// The amount scheduled at `time` in `principal_redemption_array`, or the
/// state's carried `next_principal_payment` if `time` isn't in the array.
fn scheduled_amount(attrs: &ContractAttributes, state: &ContractState, ctx: &EventContext) -> f64 {
    attrs
        .principal_redemption_array
        .as_ref()
        .and_then(|array| {
            array
                .iter()
                .find(|&&(d, _)| d == ctx.event_time || d == ctx.calculation_time)
                .map(|&(_, amt)| attrs.role_sign() * amt)
        })
        .unwrap_or(state.next_principal_payment)
}

pub(crate) fn pof(kind: EventKind) -> Option<Pof> {
    match kind {
        EventKind::Pr => Some(pof_pr),
        other => pam::pof(other),
    }
}

pub(crate) fn stf(kind: EventKind) -> Option<Stf> {
    match kind {
        EventKind::Pr => Some(stf_pr),
        EventKind::Ied => Some(|_, ctx| lam::initial_state(ctx.attrs)),
        other => pam::stf(other),
    }
}

fn pof_pr(state: &ContractState, ctx: &EventContext) -> Result<f64> {
    Ok(scheduled_amount(ctx.attrs, state, ctx))
}

fn stf_pr(state: &ContractState, ctx: &EventContext) -> Result<ContractState> {
    let role = ctx.attrs.role_sign();
    let amount = scheduled_amount(ctx.attrs, state, ctx);
    let remaining = state.notional - amount;
    let capped = if role > 0.0 { remaining.max(0.0) } else { remaining.min(0.0) };
    Ok(ContractState { status_date: ctx.event_time, notional: capped, ..*state })
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

    fn lax_attrs(array: Vec<(ActusDateTime, f64)>) -> ContractAttributes {
        ContractAttributes {
            initial_exchange_date: Some(d(2024, 1, 1)),
            maturity_date: Some(d(2025, 1, 1)),
            principal_redemption_array: Some(array),
            notional_principal: Some(100_000.0),
            ..ContractAttributes::new(
                "LAX-1",
                ContractType::Lax,
                ContractRole::Rpa,
                d(2024, 1, 1),
                "USD",
            )
        }
    }

    #[test]
    fn the_array_drives_both_payoff_and_notional() {
        let d1 = d(2024, 4, 1);
        let attrs = lax_attrs(vec![(d1, 15_000.0)]);
        let state = ContractState { notional: 100_000.0, ..ContractState::zeroed(attrs.status_date) };
        let market = Constant(0.0);
        let ctx = EventContext {
            attrs: &attrs,
            event_time: d1,
            calculation_time: d1,
            market: &market,
            children: None,
            payoff_hint: None,
            leg: None,
            period_start: attrs.status_date,
        };
        assert_eq!(pof_pr(&state, &ctx).unwrap(), 15_000.0);
        let next = stf_pr(&state, &ctx).unwrap();
        assert_eq!(next.notional, 85_000.0);
    }

    #[test]
    fn the_dispatch_table_resolves_to_the_array_aware_functions() {
        let d1 = d(2024, 4, 1);
        let attrs = lax_attrs(vec![(d1, 15_000.0)]);
        let state = ContractState {
            notional: 100_000.0,
            next_principal_payment: 99.0,
            ..ContractState::zeroed(attrs.status_date)
        };
        let market = Constant(0.0);
        let ctx = EventContext {
            attrs: &attrs,
            event_time: d1,
            calculation_time: d1,
            market: &market,
            children: None,
            payoff_hint: None,
            leg: None,
            period_start: attrs.status_date,
        };
        // Resolving PR through the handlers must pay the array amount, not
        // the cycle-based `Prnxt` a LAM would use.
        let via_table = pof(EventKind::Pr).unwrap()(&state, &ctx).unwrap();
        assert_eq!(via_table, 15_000.0);
    }

    #[test]
    fn schedule_contains_one_pr_per_array_entry() {
        let attrs = lax_attrs(vec![(d(2024, 4, 1), 40_000.0), (d(2024, 9, 1), 60_000.0)]);
        let events = schedule(&attrs).unwrap();
        let prs: Vec<_> = events.iter().filter(|e| e.event_kind == EventKind::Pr).collect();
        assert_eq!(prs.len(), 2);
    }
}
