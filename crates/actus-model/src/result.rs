//! The output of driving a contract's lifecycle to completion.

use crate::event::ContractEvent;

/// The materialized event list produced by simulating one contract.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimulationResult {
    /// The contract id this result belongs to.
    pub contract_id: String,
    /// Events in `(event_time, priority, sequence)` order.
    pub events: Vec<ContractEvent>,
}

impl SimulationResult {
    /// Sum of every event's payoff.
    pub fn total_payoff(&self) -> f64 {
        self.events.iter().map(|e| e.payoff).sum()
    }
}
