//! Composite Resolver: topologically orders a portfolio by
//! `contract_structure` references, simulating leaf contracts first so each
//! composite's [`ChildContractObserver`] is fully populated before the
//! composite itself is driven.

use std::collections::HashMap;

use actus_core::errors::{Error, Result};
use actus_model::{ContractAttributes, SimulationResult};
use actus_observers::{CalloutEvent, ChildContractObserver, MarketObserver};

use crate::lifecycle::simulate_contract;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Simulate every contract in `contracts`, resolving composite dependencies
/// first. `callouts` supplies per-contract behavioral events, keyed by
/// `contract_id`; a contract absent from the map gets none.
///
/// Returns a map from `contract_id` to its [`SimulationResult`]. Raises
/// [`Error::CyclicStructure`] if `contract_structure` references form a
/// cycle, and [`Error::MissingChild`] if a composite references an id not
/// present in `contracts`.
pub fn simulate_portfolio(
    contracts: &[ContractAttributes],
    market: &dyn MarketObserver,
    callouts: &HashMap<String, Vec<CalloutEvent>>,
) -> Result<HashMap<String, SimulationResult>> {
    let by_id: HashMap<&str, &ContractAttributes> =
        contracts.iter().map(|c| (c.contract_id.as_str(), c)).collect();

    let mut order = Vec::with_capacity(contracts.len());
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    for c in contracts {
        visit(c.contract_id.as_str(), &by_id, &mut marks, &mut order)?;
    }

    let mut results: HashMap<String, SimulationResult> = HashMap::new();
    for id in order {
        let attrs = by_id[id];
        let empty = Vec::new();
        let own_callouts = callouts.get(id).unwrap_or(&empty);

        let children = if let Some(structure) = &attrs.contract_structure {
            let mut observer = ChildContractObserver::new();
            for child_id in structure.children() {
                let result = results
                    .get(child_id)
                    .ok_or_else(|| Error::MissingChild(child_id.to_string()))?;
                observer.register_with_attributes(result.clone(), by_id[child_id].clone());
            }
            observer.freeze();
            Some(observer)
        } else {
            None
        };

        let result = simulate_contract(attrs, market, children.as_ref(), own_callouts)?;
        results.insert(id.to_string(), result);
    }

    Ok(results)
}

/// Depth-first post-order visit: a node's dependencies (its
/// `contract_structure` children) are appended to `order` before the node
/// itself, so simulating in `order` never looks up an unsimulated child.
fn visit<'a>(
    id: &'a str,
    by_id: &HashMap<&'a str, &'a ContractAttributes>,
    marks: &mut HashMap<&'a str, Mark>,
    order: &mut Vec<&'a str>,
) -> Result<()> {
    // A reference to a contract absent from this portfolio isn't a cycle;
    // it surfaces as `MissingChild` once the composite tries to read the
    // (never-simulated) child's result.
    let Some(attrs) = by_id.get(id) else { return Ok(()) };

    match marks.get(id) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => return Err(Error::CyclicStructure(id.to_string())),
        None => {}
    }
    marks.insert(id, Mark::InProgress);

    if let Some(structure) = &attrs.contract_structure {
        for child_id in structure.children() {
            visit(child_id, by_id, marks, order)?;
        }
    }

    marks.insert(id, Mark::Done);
    order.push(id);
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use actus_model::{ContractRole, ContractStructure, ContractType, CycleSpec, DeliverySettlement};
    use actus_observers::Constant;
    use actus_time::{ActusDateTime, Cycle};

    fn d(y: u16, m: u8, dd: u8) -> ActusDateTime {
        ActusDateTime::from_ymd(y, m, dd).unwrap()
    }

    fn leg(id: &str, role: ContractRole) -> ContractAttributes {
        ContractAttributes {
            initial_exchange_date: Some(d(2024, 1, 1)),
            maturity_date: Some(d(2025, 1, 1)),
            interest_schedule: Some(CycleSpec {
                anchor: d(2024, 7, 1),
                cycle: Some(Cycle::parse("6M").unwrap()),
                end_of_month: false,
            }),
            notional_principal: Some(100_000.0),
            nominal_interest_rate: Some(0.05),
            ..ContractAttributes::new(id, ContractType::Pam, role, d(2024, 1, 1), "USD")
        }
    }

    fn swaps(id: &str, first: &str, second: &str) -> ContractAttributes {
        ContractAttributes {
            maturity_date: Some(d(2025, 1, 1)),
            interest_schedule: Some(CycleSpec {
                anchor: d(2024, 7, 1),
                cycle: Some(Cycle::parse("6M").unwrap()),
                end_of_month: false,
            }),
            delivery_settlement: Some(DeliverySettlement::Net),
            contract_structure: Some(ContractStructure::new([
                ("FirstLeg".to_string(), first.to_string()),
                ("SecondLeg".to_string(), second.to_string()),
            ])),
            ..ContractAttributes::new(id, ContractType::Swaps, ContractRole::Rpa, d(2024, 1, 1), "USD")
        }
    }

    #[test]
    fn legs_simulate_before_the_composite_parent() {
        let contracts = vec![
            swaps("SWAPS-1", "LEG-FIX", "LEG-FLT"),
            leg("LEG-FIX", ContractRole::Rpa),
            leg("LEG-FLT", ContractRole::Rpl),
        ];
        let market = Constant(0.0);
        let results = simulate_portfolio(&contracts, &market, &HashMap::new()).unwrap();
        assert!(results.contains_key("SWAPS-1"));
        assert!(results.contains_key("LEG-FIX"));
        assert!(results.contains_key("LEG-FLT"));
    }

    #[test]
    fn opposite_role_legs_net_to_zero_through_the_parent() {
        let contracts = vec![
            swaps("SWAPS-1", "LEG-FIX", "LEG-FLT"),
            leg("LEG-FIX", ContractRole::Rpa),
            leg("LEG-FLT", ContractRole::Rpl),
        ];
        let market = Constant(0.0);
        let results = simulate_portfolio(&contracts, &market, &HashMap::new()).unwrap();
        // Two identical legs with mirrored roles cancel at every shared date.
        let parent = &results["SWAPS-1"];
        assert!(parent.events.iter().all(|e| e.payoff.abs() < 1e-9));
    }

    #[test]
    fn self_referential_structure_is_a_cycle() {
        let contracts = vec![
            swaps("SWAPS-1", "SWAPS-1", "LEG-FLT"),
            leg("LEG-FLT", ContractRole::Rpl),
        ];
        let market = Constant(0.0);
        let err = simulate_portfolio(&contracts, &market, &HashMap::new()).unwrap_err();
        assert!(matches!(err, Error::CyclicStructure(_)));
    }

    #[test]
    fn reference_to_an_absent_contract_is_missing_child() {
        let contracts = vec![
            swaps("SWAPS-1", "LEG-FIX", "LEG-FLT"),
            leg("LEG-FIX", ContractRole::Rpa),
        ];
        let market = Constant(0.0);
        let err = simulate_portfolio(&contracts, &market, &HashMap::new()).unwrap_err();
        assert!(matches!(err, Error::MissingChild(_)));
    }
}
