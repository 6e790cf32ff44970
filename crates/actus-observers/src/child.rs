//! `ChildContractObserver`: gives a composite contract read access to its
//! already-simulated children.

use std::collections::HashMap;

use actus_core::errors::{Error, Result};
use actus_model::{ContractAttributes, ContractEvent, ContractState, SimulationResult};
use actus_time::ActusDateTime;

/// A registry of simulated child-contract results, frozen once a composite
/// parent starts reading from it.
#[derive(Debug, Default)]
pub struct ChildContractObserver {
    children: HashMap<String, SimulationResult>,
    attributes: HashMap<String, ContractAttributes>,
    frozen: bool,
}

impl ChildContractObserver {
    /// An empty, unfrozen observer.
    pub fn new() -> Self {
        ChildContractObserver::default()
    }

    /// Register a child's simulation result. Panics if the observer has
    /// already been frozen by a call to [`Self::freeze`].
    pub fn register(&mut self, result: SimulationResult) {
        assert!(!self.frozen, "cannot register a child after freezing");
        self.children.insert(result.contract_id.clone(), result);
    }

    /// Register a child's simulation result along with the attributes it
    /// was simulated from, making them queryable via [`Self::attributes`].
    pub fn register_with_attributes(
        &mut self,
        result: SimulationResult,
        attrs: ContractAttributes,
    ) {
        self.attributes.insert(result.contract_id.clone(), attrs);
        self.register(result);
    }

    /// Prevent further registration. The composite resolver calls this
    /// immediately before simulating the parent.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// The full event list of child `id`.
    pub fn events(&self, id: &str) -> Result<&[ContractEvent]> {
        self.children
            .get(id)
            .map(|r| r.events.as_slice())
            .ok_or_else(|| Error::MissingChild(id.to_string()))
    }

    /// The state a child held immediately after the last event at or before
    /// `time`. Returns `None` if the child has no events at or before `time`.
    pub fn state_at(&self, id: &str, time: ActusDateTime) -> Result<Option<ContractState>> {
        let events = self.events(id)?;
        Ok(events
            .iter()
            .filter(|e| e.event_time <= time)
            .max_by_key(|e| e.sort_key())
            .map(|e| e.state_post))
    }

    /// The state a child held immediately before any event at `time` ran:
    /// the `state_pre` of the first event at exactly `time` if one exists,
    /// otherwise the `state_post` of the last event strictly before `time`.
    ///
    /// This is the right query for a parent whose own event coincides with
    /// one of the child's (a cap's `IP` against the underlier's `RR` at the
    /// same timestamp must see the rate fixed in the *previous* period).
    pub fn state_before(&self, id: &str, time: ActusDateTime) -> Result<Option<ContractState>> {
        let events = self.events(id)?;
        if let Some(first_at) = events
            .iter()
            .filter(|e| e.event_time == time)
            .min_by_key(|e| e.sort_key())
        {
            return Ok(Some(first_at.state_pre));
        }
        Ok(events
            .iter()
            .filter(|e| e.event_time < time)
            .max_by_key(|e| e.sort_key())
            .map(|e| e.state_post))
    }

    /// The attributes child `id` was simulated from, when its registration
    /// supplied them.
    pub fn attributes(&self, id: &str) -> Result<Option<&ContractAttributes>> {
        if !self.children.contains_key(id) {
            return Err(Error::MissingChild(id.to_string()));
        }
        Ok(self.attributes.get(id))
    }

    /// `true` if a child with this id has been registered.
    pub fn contains(&self, id: &str) -> bool {
        self.children.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actus_model::{EventKind, Performance};

    fn d(y: u16, m: u8, dd: u8) -> ActusDateTime {
        ActusDateTime::from_ymd(y, m, dd).unwrap()
    }

    fn sample_result(id: &str) -> SimulationResult {
        let s0 = ContractState::zeroed(d(2024, 1, 1));
        let s1 = ContractState { notional: 100.0, performance: Performance::Pf, ..s0 };
        SimulationResult {
            contract_id: id.to_string(),
            events: vec![ContractEvent {
                event_time: d(2024, 1, 1),
                calculation_time: d(2024, 1, 1),
                event_kind: EventKind::Ied,
                sequence: 0,
                payoff: -100.0,
                state_pre: s0,
                state_post: s1,
                currency: "USD".to_string(),
            }],
        }
    }

    #[test]
    fn missing_child_errors() {
        let obs = ChildContractObserver::new();
        assert!(obs.events("absent").is_err());
    }

    #[test]
    fn state_at_returns_latest_before_time() {
        let mut obs = ChildContractObserver::new();
        obs.register(sample_result("CHILD-1"));
        obs.freeze();
        let state = obs.state_at("CHILD-1", d(2024, 6, 1)).unwrap().unwrap();
        assert_eq!(state.notional, 100.0);
        assert!(obs.state_at("CHILD-1", d(2023, 1, 1)).unwrap().is_none());
    }

    #[test]
    fn state_before_excludes_coincident_events() {
        let mut obs = ChildContractObserver::new();
        obs.register(sample_result("CHILD-1"));
        obs.freeze();
        // At the event's own timestamp: the pre-event state.
        let at = obs.state_before("CHILD-1", d(2024, 1, 1)).unwrap().unwrap();
        assert_eq!(at.notional, 0.0);
        // Strictly after: the post-event state.
        let after = obs.state_before("CHILD-1", d(2024, 6, 1)).unwrap().unwrap();
        assert_eq!(after.notional, 100.0);
    }

    #[test]
    fn attributes_are_queryable_when_registered_with_them() {
        use actus_model::{ContractAttributes, ContractRole, ContractType};
        let mut obs = ChildContractObserver::new();
        let attrs = ContractAttributes::new(
            "CHILD-1",
            ContractType::Pam,
            ContractRole::Rpa,
            d(2024, 1, 1),
            "USD",
        );
        obs.register_with_attributes(sample_result("CHILD-1"), attrs);
        obs.register(sample_result("CHILD-2"));
        obs.freeze();
        assert_eq!(
            obs.attributes("CHILD-1").unwrap().map(|a| a.contract_type),
            Some(ContractType::Pam)
        );
        assert!(obs.attributes("CHILD-2").unwrap().is_none());
        assert!(obs.attributes("ABSENT").is_err());
    }

    #[test]
    #[should_panic(expected = "cannot register a child after freezing")]
    fn registering_after_freeze_panics() {
        let mut obs = ChildContractObserver::new();
        obs.freeze();
        obs.register(sample_result("CHILD-1"));
    }
}
