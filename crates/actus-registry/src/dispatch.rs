//! The (variant, event-kind)-keyed dispatch tables, plus the static factory
//! that resolves a [`ContractType`] to its handler record.

use std::collections::HashMap;
use std::sync::OnceLock;

use actus_core::errors::Result;
use actus_core::Payoff;
use actus_model::{ContractAttributes, ContractState, ContractType, EventKind};
use actus_observers::{ChildContractObserver, MarketObserver};
use actus_time::ActusDateTime;

use crate::schedule::{ScheduledEvent, SettlementLeg};
use crate::variants;

/// Everything a POF/STF needs besides the state being transitioned: the
/// contract's own attributes, the two distinguished times, and the
/// observers it may consult.
pub struct EventContext<'a> {
    /// The contract's attributes.
    pub attrs: &'a ContractAttributes,
    /// The event's reporting/settlement time.
    pub event_time: ActusDateTime,
    /// The event's accrual time.
    pub calculation_time: ActusDateTime,
    /// Market/behavioral data.
    pub market: &'a dyn MarketObserver,
    /// Already-simulated children, for composite variants. `None` for
    /// non-composite variants.
    pub children: Option<&'a ChildContractObserver>,
    /// The amount a behavioral callout attached to this event, if any.
    pub payoff_hint: Option<Payoff>,
    /// The leg this event settles, for gross-settled two-legged contracts.
    pub leg: Option<SettlementLeg>,
    /// The state's `status_date` before the engine's between-event accrual
    /// ran, i.e. the start of the period this event closes. Payoff terms
    /// quoted per elapsed time (penalties, notional-based fees) measure
    /// from here, since the accrued state's own `status_date` has already
    /// advanced to `calculation_time`.
    pub period_start: ActusDateTime,
}

/// `(state, ctx) -> payoff`. Never mutates `state`.
pub type Pof = fn(&ContractState, &EventContext) -> Result<Payoff>;

/// `(state, ctx) -> new state`. Always returns a fresh value.
pub type Stf = fn(&ContractState, &EventContext) -> Result<ContractState>;

/// Rework a contract's merged schedule (attribute-driven events plus
/// behavioral callouts) once per simulation, with the child observer in
/// hand. Variants whose event lists depend on observed history use this:
/// CLM retimes `IP`/`MD` after an exercise callout, CEG injects the
/// guarantee's `STD` once the covered child's performance breaks.
pub type FinalizeSchedule = fn(
    &ContractAttributes,
    Option<&ChildContractObserver>,
    Vec<ScheduledEvent>,
) -> Result<Vec<ScheduledEvent>>;

/// The operations a variant must supply, keyed by event-kind for the
/// POF/STF pair.
pub struct VariantHandlers {
    /// Build the pre-simulation schedule from attributes.
    pub schedule: fn(&ContractAttributes) -> Result<Vec<ScheduledEvent>>,
    /// Build the state a contract starts in, as of `status_date`.
    pub initial_state: fn(&ContractAttributes) -> Result<ContractState>,
    /// Resolve the payoff function for one event kind, if this variant
    /// handles that kind.
    pub pof: fn(EventKind) -> Option<Pof>,
    /// Resolve the state-transition function for one event kind, if this
    /// variant handles that kind.
    pub stf: fn(EventKind) -> Option<Stf>,
    /// Optional post-merge schedule rework; `None` for variants whose
    /// schedule is fully attribute-driven.
    pub finalize_schedule: Option<FinalizeSchedule>,
}

static REGISTRY: OnceLock<HashMap<ContractType, VariantHandlers>> = OnceLock::new();

/// The static variant registry, built once on first access.
pub fn registry() -> &'static HashMap<ContractType, VariantHandlers> {
    REGISTRY.get_or_init(|| {
        let mut m = HashMap::new();
        m.insert(ContractType::Pam, variants::pam::handlers());
        m.insert(ContractType::Lam, variants::lam::handlers());
        m.insert(ContractType::Nam, variants::nam::handlers());
        m.insert(ContractType::Ann, variants::ann::handlers());
        m.insert(ContractType::Lax, variants::lax::handlers());
        m.insert(ContractType::Clm, variants::clm::handlers());
        m.insert(ContractType::Ump, variants::ump::handlers());
        m.insert(ContractType::Csh, variants::csh::handlers());
        m.insert(ContractType::Stk, variants::stk::handlers());
        m.insert(ContractType::Com, variants::com::handlers());
        m.insert(ContractType::Fxout, variants::fxout::handlers());
        m.insert(ContractType::Optns, variants::optns::handlers());
        m.insert(ContractType::Futur, variants::futur::handlers());
        m.insert(ContractType::Swppv, variants::swppv::handlers());
        m.insert(ContractType::Swaps, variants::swaps::handlers());
        m.insert(ContractType::Capfl, variants::capfl::handlers());
        m.insert(ContractType::Ceg, variants::ceg::handlers());
        m.insert(ContractType::Cec, variants::cec::handlers());
        m
    })
}

/// Look up the handlers for `contract_type`. Every [`ContractType`] variant
/// is registered, so this never returns `None` in practice, but callers at
/// the engine boundary still treat an unknown type as `InvalidAttributes`.
pub fn handlers_for(contract_type: ContractType) -> Option<&'static VariantHandlers> {
    registry().get(&contract_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_contract_type_is_registered() {
        for ct in [
            ContractType::Pam,
            ContractType::Lam,
            ContractType::Lax,
            ContractType::Nam,
            ContractType::Ann,
            ContractType::Clm,
            ContractType::Ump,
            ContractType::Csh,
            ContractType::Stk,
            ContractType::Com,
            ContractType::Fxout,
            ContractType::Optns,
            ContractType::Futur,
            ContractType::Swppv,
            ContractType::Swaps,
            ContractType::Capfl,
            ContractType::Ceg,
            ContractType::Cec,
        ] {
            assert!(handlers_for(ct).is_some(), "{ct} missing from registry");
        }
    }
}
