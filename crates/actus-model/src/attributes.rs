//! `ContractAttributes`: the immutable, mostly-optional record a contract is
//! built from.

use actus_time::{ActusDateTime, BusinessDayConvention, Cycle};

use crate::contract_role::ContractRole;
use crate::contract_type::ContractType;
use crate::structure::ContractStructure;

/// Day-count convention selector, serialized as the ACTUS short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DayCountConventionCode {
    /// A/360.
    A360,
    /// A/365.
    A365,
    /// A/A.
    Aa,
    /// 30E/360.
    Thirty360E,
    /// 30/360 (US).
    Thirty360Us,
    /// B/252.
    B252,
}

/// A schedule descriptor: an anchor date, a repetition cycle, and whether
/// end-of-month clamping applies.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CycleSpec {
    /// The first (or only) date in the family.
    pub anchor: ActusDateTime,
    /// The repetition cycle. `None` means a single, non-repeating event.
    pub cycle: Option<Cycle>,
    /// Whether month-based steps clamp to end-of-month.
    pub end_of_month: bool,
}

/// The penalty type selector for `POF_PY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PenaltyType {
    /// Absolute penalty amount (`PYRT`).
    Absolute,
    /// Proportional to notional and elapsed time (`Y * Nt * PYRT`).
    Notional,
    /// Rate-differential; falls back to `Notional` with no rate observer.
    RateDifferential,
}

/// The fee-basis selector for `POF_FP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FeeBasis {
    /// Absolute fee amount (`FER`).
    Absolute,
    /// Proportional to notional and elapsed time.
    Notional,
}

/// Which state cells a scaling observation updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScalingEffect {
    /// No scaling.
    None,
    /// Scale notional-affected cells only.
    Notional,
    /// Scale interest-affected cells only.
    Interest,
    /// Scale both.
    Both,
}

/// Net vs. gross settlement for two-legged/composite contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DeliverySettlement {
    /// Net the legs before settling.
    Net,
    /// Settle each leg separately.
    Gross,
}

/// Option style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OptionType {
    /// Call.
    Call,
    /// Put.
    Put,
}

/// Option exercise style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OptionExerciseType {
    /// Single exercise date at maturity.
    European,
    /// Exercisable on any scheduled date up to maturity.
    American,
    /// Exercisable on scheduled dates up to a named end date.
    Bermudan,
}

/// Which of the covered child's quantities a CEG payoff is based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GuaranteeExtent {
    /// Outstanding notional only.
    Notional,
    /// Notional plus accrued interest.
    NotionalPlusAccrued,
    /// Notional plus accrued interest plus observed market value.
    NotionalPlusAccruedPlusMarket,
}

/// The immutable description of one ACTUS contract.
///
/// Grouped by concern: identification, calendar anchors, schedule descriptors,
/// numerics, conventions, and derivative-specific terms. All fields beyond
/// the five mandatory ones are optional; a variant's POF/STF pair documents
/// which subset it reads.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContractAttributes {
    // --- identification (mandatory) ---
    /// Unique contract identifier.
    pub contract_id: String,
    /// The variant.
    pub contract_type: ContractType,
    /// Asset/liability role, determining `R(role)`.
    pub contract_role: ContractRole,
    /// The simulation's starting time.
    pub status_date: ActusDateTime,
    /// ISO currency code.
    pub currency: String,

    // --- calendar anchors ---
    /// Disbursement date. May precede `status_date` for a pre-existing
    /// contract, in which case the IED event is skipped but state
    /// initializes as if it had occurred.
    pub initial_exchange_date: Option<ActusDateTime>,
    /// Scheduled maturity. `None` for open-ended contracts (UMP/STK/CLM).
    pub maturity_date: Option<ActusDateTime>,
    /// Date a purchase (PRD) event occurs.
    pub purchase_date: Option<ActusDateTime>,
    /// Date a termination (TD) event occurs.
    pub termination_date: Option<ActusDateTime>,
    /// Date amortization begins, if distinct from `initial_exchange_date`.
    pub amortization_date: Option<ActusDateTime>,
    /// Last date on which accrued interest capitalizes into notional
    /// (`IPCI`) instead of being paid out (`IP`). `None` means every
    /// interest date pays.
    pub capitalization_end_date: Option<ActusDateTime>,
    /// Upper bound for open-ended contracts with no natural maturity.
    pub horizon_date: Option<ActusDateTime>,

    // --- schedule descriptors ---
    /// Interest-payment family (IP/IPCI).
    pub interest_schedule: Option<CycleSpec>,
    /// Rate-reset family (RR/RRF).
    pub rate_reset_schedule: Option<CycleSpec>,
    /// Principal-redemption family (PR).
    pub principal_redemption_schedule: Option<CycleSpec>,
    /// Fee-payment family (FP).
    pub fee_schedule: Option<CycleSpec>,
    /// Scaling family (SC).
    pub scaling_schedule: Option<CycleSpec>,
    /// Interest-calculation-base update family (IPCB).
    pub interest_calc_base_schedule: Option<CycleSpec>,
    /// Dividend family (DV), for STK.
    pub dividend_schedule: Option<CycleSpec>,
    /// Explicit (date, amount) principal schedule for LAX.
    pub principal_redemption_array: Option<Vec<(ActusDateTime, f64)>>,
    /// Scheduled rate fixings for RRF, keyed by event date.
    pub rate_reset_fixings: Option<Vec<(ActusDateTime, f64)>>,
    /// Option-exercise window end for Bermudan options.
    pub option_exercise_end_date: Option<ActusDateTime>,

    // --- numerics ---
    /// Notional principal at `initial_exchange_date` (`NT`, unsigned).
    pub notional_principal: Option<f64>,
    /// Nominal interest rate at `initial_exchange_date`.
    pub nominal_interest_rate: Option<f64>,
    /// Secondary notional, for FX/swap second legs.
    pub notional_principal_2: Option<f64>,
    /// Secondary rate, for FX/swap second legs.
    pub nominal_interest_rate_2: Option<f64>,
    /// Accrued interest at `status_date`, for pre-existing contracts.
    pub accrued_interest: Option<f64>,
    /// The next scheduled principal redemption payment.
    pub next_principal_redemption_payment: Option<f64>,
    /// Additive spread applied on top of the observed reset rate.
    pub rate_spread: Option<f64>,
    /// Multiplicative factor applied to the observed reset rate.
    pub rate_multiplier: Option<f64>,
    /// Lower bound (floor) on the reset rate.
    pub rate_reset_floor: Option<f64>,
    /// Upper bound (cap) on the reset rate.
    pub rate_reset_ceiling: Option<f64>,
    /// Fixed fee rate.
    pub fee_rate: Option<f64>,
    /// Basis for fee computation.
    pub fee_basis: Option<FeeBasis>,
    /// Penalty rate (`PYRT`).
    pub penalty_rate: Option<f64>,
    /// Penalty basis selector.
    pub penalty_type: Option<PenaltyType>,
    /// Purchase price (`PPRD`).
    pub price_at_purchase: Option<f64>,
    /// Termination price (`PTD`).
    pub price_at_termination: Option<f64>,
    /// Baseline value for scaling-index observations.
    pub scaling_index_baseline: Option<f64>,
    /// Which cells a scaling observation updates.
    pub scaling_effect: Option<ScalingEffect>,
    /// Strike price for options / cap-floor differentials.
    pub option_strike_1: Option<f64>,
    /// Secondary strike (e.g. collar's floor leg).
    pub option_strike_2: Option<f64>,
    /// Reference price for futures mark-to-market.
    pub future_price: Option<f64>,
    /// Coverage fraction for CEG/CEC.
    pub coverage: Option<f64>,
    /// Settlement lag applied after an observed credit event.
    pub settlement_period: Option<Cycle>,
    /// Notice period for CLM exercise settlement.
    pub exercise_notice_period: Option<Cycle>,

    // --- conventions ---
    /// Day-count convention.
    pub day_count_convention: Option<DayCountConventionCode>,
    /// Business-day adjustment convention.
    pub business_day_convention: Option<BusinessDayConvention>,
    /// End-of-month handling toggle for schedule generation.
    pub end_of_month_convention: Option<bool>,
    /// Named calendar identifier (`"TARGET"`, `"NC"`, `"WeekendsOnly"`).
    pub calendar: Option<String>,
    /// Market-object code the rate reset observes.
    pub rate_reset_market_object: Option<String>,
    /// Market-object code the scaling event observes.
    pub scaling_market_object: Option<String>,
    /// Delivery settlement mode for two-legged/composite contracts.
    pub delivery_settlement: Option<DeliverySettlement>,

    // --- derivative-specific ---
    /// Call or put.
    pub option_type: Option<OptionType>,
    /// Exercise style.
    pub option_exercise_type: Option<OptionExerciseType>,
    /// Which of the covered child's state a CEG payoff is based on.
    pub credit_enhancement_guarantee_extent: Option<GuaranteeExtent>,
    /// Children referenced by a composite contract.
    pub contract_structure: Option<ContractStructure>,
}

impl ContractAttributes {
    /// A record with the five mandatory fields set and every optional term
    /// absent. Callers fill in what their variant needs via struct-update
    /// syntax.
    pub fn new(
        contract_id: impl Into<String>,
        contract_type: ContractType,
        contract_role: ContractRole,
        status_date: ActusDateTime,
        currency: impl Into<String>,
    ) -> Self {
        ContractAttributes {
            contract_id: contract_id.into(),
            contract_type,
            contract_role,
            status_date,
            currency: currency.into(),
            initial_exchange_date: None,
            maturity_date: None,
            purchase_date: None,
            termination_date: None,
            amortization_date: None,
            capitalization_end_date: None,
            horizon_date: None,
            interest_schedule: None,
            rate_reset_schedule: None,
            principal_redemption_schedule: None,
            fee_schedule: None,
            scaling_schedule: None,
            interest_calc_base_schedule: None,
            dividend_schedule: None,
            principal_redemption_array: None,
            rate_reset_fixings: None,
            option_exercise_end_date: None,
            notional_principal: None,
            nominal_interest_rate: None,
            notional_principal_2: None,
            nominal_interest_rate_2: None,
            accrued_interest: None,
            next_principal_redemption_payment: None,
            rate_spread: None,
            rate_multiplier: None,
            rate_reset_floor: None,
            rate_reset_ceiling: None,
            fee_rate: None,
            fee_basis: None,
            penalty_rate: None,
            penalty_type: None,
            price_at_purchase: None,
            price_at_termination: None,
            scaling_index_baseline: None,
            scaling_effect: None,
            option_strike_1: None,
            option_strike_2: None,
            future_price: None,
            coverage: None,
            settlement_period: None,
            exercise_notice_period: None,
            day_count_convention: None,
            business_day_convention: None,
            end_of_month_convention: None,
            calendar: None,
            rate_reset_market_object: None,
            scaling_market_object: None,
            delivery_settlement: None,
            option_type: None,
            option_exercise_type: None,
            credit_enhancement_guarantee_extent: None,
            contract_structure: None,
        }
    }

    /// `R(role)`: `+1` for asset-side roles, `-1` for liability-side.
    pub fn role_sign(&self) -> f64 {
        self.contract_role.sign()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_carries_only_the_mandatory_fields() {
        let attrs = ContractAttributes::new(
            "C-1",
            ContractType::Pam,
            ContractRole::Rpa,
            ActusDateTime::from_ymd(2024, 1, 1).unwrap(),
            "EUR",
        );
        assert_eq!(attrs.contract_id, "C-1");
        assert_eq!(attrs.role_sign(), 1.0);
        assert!(attrs.maturity_date.is_none());
        assert!(attrs.notional_principal.is_none());
    }
}
