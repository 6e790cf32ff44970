//! Contract performance status.

use std::fmt;

/// The current performance status of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Performance {
    /// Performing.
    #[default]
    Pf,
    /// Delayed.
    Dl,
    /// Delinquent.
    Dq,
    /// Default.
    Df,
}

impl Performance {
    /// The ACTUS short code.
    pub fn code(self) -> &'static str {
        match self {
            Performance::Pf => "PF",
            Performance::Dl => "DL",
            Performance::Dq => "DQ",
            Performance::Df => "DF",
        }
    }

    /// `true` for DL, DQ, DF: the states a credit-event observer can report.
    pub fn is_credit_event(self) -> bool {
        !matches!(self, Performance::Pf)
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
