//! The 18 ACTUS contract variants and the three groups they fall into.

use std::fmt;

/// A contract variant, identified by its ACTUS short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum ContractType {
    /// Principal at Maturity.
    Pam,
    /// Linear Amortizer.
    Lam,
    /// Exotic Linear Amortizer (array-driven principal schedule).
    Lax,
    /// Negative Amortizer.
    Nam,
    /// Annuity.
    Ann,
    /// Call Money.
    Clm,
    /// Undefined Maturity Profile.
    Ump,
    /// Cash position.
    Csh,
    /// Stock position.
    Stk,
    /// Commodity position.
    Com,
    /// FX outright.
    Fxout,
    /// Option.
    Optns,
    /// Future.
    Futur,
    /// Plain-vanilla interest rate swap.
    Swppv,
    /// Multi-leg swap (composite).
    Swaps,
    /// Cap/floor (composite).
    Capfl,
    /// Credit Enhancement Guarantee (composite).
    Ceg,
    /// Credit Enhancement Collateral (composite).
    Cec,
}

/// The three families the ACTUS taxonomy groups contract types into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractGroup {
    /// PAM, LAM, LAX, NAM, ANN, CLM, UMP.
    PrincipalAmortizer,
    /// CSH, STK, COM.
    NonPrincipal,
    /// FXOUT, OPTNS, FUTUR, SWPPV, SWAPS, CAPFL, CEG, CEC.
    Derivative,
}

impl ContractType {
    /// The short ACTUS code, e.g. `"PAM"`.
    pub fn code(self) -> &'static str {
        match self {
            ContractType::Pam => "PAM",
            ContractType::Lam => "LAM",
            ContractType::Lax => "LAX",
            ContractType::Nam => "NAM",
            ContractType::Ann => "ANN",
            ContractType::Clm => "CLM",
            ContractType::Ump => "UMP",
            ContractType::Csh => "CSH",
            ContractType::Stk => "STK",
            ContractType::Com => "COM",
            ContractType::Fxout => "FXOUT",
            ContractType::Optns => "OPTNS",
            ContractType::Futur => "FUTUR",
            ContractType::Swppv => "SWPPV",
            ContractType::Swaps => "SWAPS",
            ContractType::Capfl => "CAPFL",
            ContractType::Ceg => "CEG",
            ContractType::Cec => "CEC",
        }
    }

    /// Parse a short ACTUS code.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "PAM" => ContractType::Pam,
            "LAM" => ContractType::Lam,
            "LAX" => ContractType::Lax,
            "NAM" => ContractType::Nam,
            "ANN" => ContractType::Ann,
            "CLM" => ContractType::Clm,
            "UMP" => ContractType::Ump,
            "CSH" => ContractType::Csh,
            "STK" => ContractType::Stk,
            "COM" => ContractType::Com,
            "FXOUT" => ContractType::Fxout,
            "OPTNS" => ContractType::Optns,
            "FUTUR" => ContractType::Futur,
            "SWPPV" => ContractType::Swppv,
            "SWAPS" => ContractType::Swaps,
            "CAPFL" => ContractType::Capfl,
            "CEG" => ContractType::Ceg,
            "CEC" => ContractType::Cec,
            _ => return None,
        })
    }

    /// The family this variant belongs to.
    pub fn group(self) -> ContractGroup {
        match self {
            ContractType::Pam
            | ContractType::Lam
            | ContractType::Lax
            | ContractType::Nam
            | ContractType::Ann
            | ContractType::Clm
            | ContractType::Ump => ContractGroup::PrincipalAmortizer,
            ContractType::Csh | ContractType::Stk | ContractType::Com => {
                ContractGroup::NonPrincipal
            }
            ContractType::Fxout
            | ContractType::Optns
            | ContractType::Futur
            | ContractType::Swppv
            | ContractType::Swaps
            | ContractType::Capfl
            | ContractType::Ceg
            | ContractType::Cec => ContractGroup::Derivative,
        }
    }

    /// `true` for the four variants that simulate children before themselves.
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            ContractType::Swaps | ContractType::Capfl | ContractType::Ceg | ContractType::Cec
        )
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
