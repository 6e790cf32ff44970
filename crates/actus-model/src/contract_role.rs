//! Contract role codes and the sign they contribute to signed state cells.

use std::fmt;

/// A contract-role code, mapped to `R(role) ∈ {+1, −1}` at attribute load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ContractRole {
    /// Real position asset (long).
    Rpa,
    /// Real position liability (short).
    Rpl,
    /// Receive fixed leg (asset side).
    Rfl,
    /// Pay fixed leg (liability side).
    Pfl,
    /// Buyer.
    Buy,
    /// Seller.
    Sel,
    /// Guarantor (asset-side protection seller).
    Gua,
    /// Obligee/protection buyer.
    Obl,
    /// Collateral poster (asset side).
    Col,
    /// Collateralized counterparty (liability side).
    Cnc,
}

impl ContractRole {
    /// `+1` for asset-side roles, `-1` for liability-side roles.
    pub fn sign(self) -> f64 {
        match self {
            ContractRole::Rpa
            | ContractRole::Rfl
            | ContractRole::Buy
            | ContractRole::Gua
            | ContractRole::Col => 1.0,
            ContractRole::Rpl
            | ContractRole::Pfl
            | ContractRole::Sel
            | ContractRole::Obl
            | ContractRole::Cnc => -1.0,
        }
    }

    /// The ACTUS short code, e.g. `"RPA"`.
    pub fn code(self) -> &'static str {
        match self {
            ContractRole::Rpa => "RPA",
            ContractRole::Rpl => "RPL",
            ContractRole::Rfl => "RFL",
            ContractRole::Pfl => "PFL",
            ContractRole::Buy => "BUY",
            ContractRole::Sel => "SEL",
            ContractRole::Gua => "GUA",
            ContractRole::Obl => "OBL",
            ContractRole::Col => "COL",
            ContractRole::Cnc => "CNC",
        }
    }

    /// Parse an ACTUS short code.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "RPA" => ContractRole::Rpa,
            "RPL" => ContractRole::Rpl,
            "RFL" => ContractRole::Rfl,
            "PFL" => ContractRole::Pfl,
            "BUY" => ContractRole::Buy,
            "SEL" => ContractRole::Sel,
            "GUA" => ContractRole::Gua,
            "OBL" => ContractRole::Obl,
            "COL" => ContractRole::Col,
            "CNC" => ContractRole::Cnc,
            _ => return None,
        })
    }
}

impl fmt::Display for ContractRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_side_is_positive() {
        assert_eq!(ContractRole::Rpa.sign(), 1.0);
        assert_eq!(ContractRole::Rpl.sign(), -1.0);
    }

    #[test]
    fn code_roundtrip() {
        for role in [ContractRole::Rpa, ContractRole::Rpl, ContractRole::Gua] {
            assert_eq!(ContractRole::from_code(role.code()), Some(role));
        }
    }
}
