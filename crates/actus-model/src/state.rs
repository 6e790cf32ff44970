//! `ContractState`: the immutable record threaded through the lifecycle
//! engine. STFs always return a new value; nothing here is ever mutated.

use actus_time::ActusDateTime;

use crate::performance::Performance;

/// The full set of numeric cells a contract carries between events.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContractState {
    /// Current simulation time (the last event's `event_time`).
    pub status_date: ActusDateTime,
    /// Scheduled or computed maturity.
    pub maturity_date: Option<ActusDateTime>,
    /// Notional (`Nt`), signed by role.
    pub notional: f64,
    /// Nominal interest rate (`Ipnr`).
    pub nominal_rate: f64,
    /// Accrued interest (`Ipac`), fixed/primary leg.
    pub accrued_interest: f64,
    /// Accrued interest (`Ipac2`), floating leg of a SWPPV.
    pub accrued_interest_2: f64,
    /// Accrued fees (`Feac`).
    pub accrued_fees: f64,
    /// Notional scaling multiplier (`Nsc`).
    pub notional_scaling: f64,
    /// Interest scaling multiplier (`Isc`).
    pub interest_scaling: f64,
    /// The next scheduled principal payment (`Prnxt`).
    pub next_principal_payment: f64,
    /// Interest-calculation base (`Ipcb`).
    pub interest_calc_base: f64,
    /// Current performance status.
    pub performance: Performance,
    /// Date an exercise (XD) event was observed, if any.
    pub exercise_date: Option<ActusDateTime>,
    /// Amount fixed at exercise, if any.
    pub exercise_amount: Option<f64>,
}

impl ContractState {
    /// A state with every numeric cell zeroed and performance `PF`, at
    /// `status_date`. Variant `STF_IED` equivalents overwrite the fields
    /// they own.
    pub fn zeroed(status_date: ActusDateTime) -> Self {
        ContractState {
            status_date,
            maturity_date: None,
            notional: 0.0,
            nominal_rate: 0.0,
            accrued_interest: 0.0,
            accrued_interest_2: 0.0,
            accrued_fees: 0.0,
            notional_scaling: 1.0,
            interest_scaling: 1.0,
            next_principal_payment: 0.0,
            interest_calc_base: 0.0,
            performance: Performance::Pf,
            exercise_date: None,
            exercise_amount: None,
        }
    }

    /// Return a copy with `accrued_interest` advanced by `delta` and
    /// `status_date` moved to `to`. Used by the lifecycle engine's
    /// between-event accrual step.
    pub fn accrue_interest(&self, delta: f64, to: ActusDateTime) -> Self {
        ContractState {
            status_date: to,
            accrued_interest: self.accrued_interest + delta,
            ..*self
        }
    }

    /// Like [`Self::accrue_interest`] but for the floating leg (`Ipac2`),
    /// used by SWPPV.
    pub fn accrue_interest_2(&self, delta: f64, to: ActusDateTime) -> Self {
        ContractState {
            status_date: to,
            accrued_interest_2: self.accrued_interest_2 + delta,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_has_unit_scaling() {
        let d = ActusDateTime::from_ymd(2024, 1, 1).unwrap();
        let s = ContractState::zeroed(d);
        assert_eq!(s.notional_scaling, 1.0);
        assert_eq!(s.interest_scaling, 1.0);
        assert_eq!(s.notional, 0.0);
    }

    #[test]
    fn accrue_preserves_other_cells() {
        let d0 = ActusDateTime::from_ymd(2024, 1, 1).unwrap();
        let d1 = ActusDateTime::from_ymd(2024, 4, 1).unwrap();
        let s0 = ContractState { notional: 1000.0, ..ContractState::zeroed(d0) };
        let s1 = s0.accrue_interest(12.5, d1);
        assert_eq!(s1.accrued_interest, 12.5);
        assert_eq!(s1.notional, 1000.0);
        assert_eq!(s1.status_date, d1);
    }
}
