//! `ContractStructure`: the composite descriptor linking a parent to its
//! children, e.g. `{"FirstLeg":"EUR-LEG","SecondLeg":"USD-LEG"}`.

use std::collections::BTreeMap;

/// A named reference from a composite contract to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContractStructure {
    /// Role name (`"FirstLeg"`, `"CoveredContract"`, ...) to child contract id.
    #[serde(flatten)]
    legs: BTreeMap<String, String>,
}

impl ContractStructure {
    /// Build a structure from `(role, child_id)` pairs.
    pub fn new(legs: impl IntoIterator<Item = (String, String)>) -> Self {
        ContractStructure {
            legs: legs.into_iter().collect(),
        }
    }

    /// The child contract id referenced under `role`, if present.
    pub fn child(&self, role: &str) -> Option<&str> {
        self.legs.get(role).map(String::as_str)
    }

    /// Every child contract id this structure references, in role order.
    pub fn children(&self) -> impl Iterator<Item = &str> {
        self.legs.values().map(String::as_str)
    }

    /// Every `(role, child_id)` pair, in role order.
    pub fn legs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.legs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
