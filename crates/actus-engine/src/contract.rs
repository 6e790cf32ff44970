//! The contract object the factory hands out: attributes bound to their
//! observers, with the schedule generated and the initial state built once
//! at construction.

use actus_core::errors::Result;
use actus_model::{ContractAttributes, ContractEvent, ContractState, SimulationResult};
use actus_observers::{CalloutEvent, ChildContractObserver, MarketObserver};
use actus_registry::{handlers_for, ScheduledEvent};

use crate::lifecycle::{simulate_contract, SimulationError};

/// A contract ready to simulate: attributes, observers, the pre-generated
/// schedule, and the initial state.
///
/// Attribute validation happens entirely in [`create_contract`]; once a
/// `Contract` exists, its attributes and schedule never change.
#[derive(Debug)]
pub struct Contract {
    attrs: ContractAttributes,
    market: Box<dyn MarketObserver>,
    children: Option<ChildContractObserver>,
    callouts: Vec<CalloutEvent>,
    schedule: Vec<ScheduledEvent>,
    initial_state: ContractState,
}

/// Build a [`Contract`] from attributes and observers, running every
/// attribute-stage validation up front: an unknown contract type, a missing
/// mandatory term, or a schedule that fails to expand all surface here, and
/// never during [`Contract::simulate`].
pub fn create_contract(
    attrs: ContractAttributes,
    market: Box<dyn MarketObserver>,
    children: Option<ChildContractObserver>,
) -> Result<Contract> {
    let handlers = handlers_for(attrs.contract_type).ok_or_else(|| {
        actus_core::errors::Error::InvalidAttributes(format!(
            "unregistered contract type {}",
            attrs.contract_type
        ))
    })?;
    let schedule = (handlers.schedule)(&attrs)?;
    let initial_state = (handlers.initial_state)(&attrs)?;
    Ok(Contract {
        attrs,
        market,
        children,
        callouts: Vec::new(),
        schedule,
        initial_state,
    })
}

impl Contract {
    /// Attach behavioral callout events (deposits, prepayments, observed
    /// exercises) to be merged into the schedule at simulation time.
    pub fn with_callouts(mut self, callouts: Vec<CalloutEvent>) -> Self {
        self.callouts = callouts;
        self
    }

    /// The contract's attributes.
    pub fn attributes(&self) -> &ContractAttributes {
        &self.attrs
    }

    /// The pre-simulation schedule: one zero-payoff event per scheduled
    /// date, states not yet evaluated. Behavioral callouts and
    /// history-dependent rework (CLM retiming, CEG settlement injection)
    /// appear only in [`Self::simulate`]'s output.
    pub fn schedule(&self) -> Vec<ContractEvent> {
        let blank = ContractState::zeroed(self.attrs.status_date);
        self.schedule
            .iter()
            .enumerate()
            .map(|(i, s)| ContractEvent {
                event_time: s.event_time,
                calculation_time: s.calculation_time,
                event_kind: s.event_kind,
                sequence: i as u32,
                payoff: 0.0,
                state_pre: blank,
                state_post: blank,
                currency: self.attrs.currency.clone(),
            })
            .collect()
    }

    /// The state the contract starts in, as of `status_date`.
    pub fn initial_state(&self) -> ContractState {
        self.initial_state
    }

    /// Drive the lifecycle to completion. A mid-simulation failure returns
    /// [`SimulationError`], which keeps the events materialized before it.
    pub fn simulate(&self) -> Result<SimulationResult, SimulationError> {
        simulate_contract(
            &self.attrs,
            &*self.market,
            self.children.as_ref(),
            &self.callouts,
        )
    }
}
