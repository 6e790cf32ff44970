//! Business-day adjustment conventions, including ACTUS's calculate-shift
//! variants (CSF/CSMF/CSP/CSMP), which shift the *settlement* date for
//! business-day purposes while leaving the *calculation* date (used for
//! year-fraction accrual) at the original, unshifted schedule date.

use std::fmt;

/// How to adjust a date that falls on a non-business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BusinessDayConvention {
    /// Shift forward to the next business day (SCF).
    ShiftFollowing,
    /// Shift forward unless that crosses a month boundary, in which case
    /// shift backward instead — restarting the search from the *original*
    /// date, never from the already-shifted candidate (SCMF).
    ShiftModifiedFollowing,
    /// Shift backward to the previous business day (SCP).
    ShiftPreceding,
    /// Shift backward unless that crosses a month boundary, in which case
    /// shift forward instead, restarting from the original date (SCMP).
    ShiftModifiedPreceding,
    /// Like `ShiftFollowing`, but the unshifted date is preserved as the
    /// calculation time (CSF).
    CalculateShiftFollowing,
    /// Like `ShiftModifiedFollowing`, but the unshifted date is preserved as
    /// the calculation time (CSMF).
    CalculateShiftModifiedFollowing,
    /// Like `ShiftPreceding`, but the unshifted date is preserved as the
    /// calculation time (CSP).
    CalculateShiftPreceding,
    /// Like `ShiftModifiedPreceding`, but the unshifted date is preserved as
    /// the calculation time (CSMP).
    CalculateShiftModifiedPreceding,
    /// No adjustment at all.
    NoShift,
}

impl BusinessDayConvention {
    /// `true` for the four CSx variants that preserve the unshifted date as
    /// the calculation time.
    pub fn is_calculate_shift(self) -> bool {
        matches!(
            self,
            BusinessDayConvention::CalculateShiftFollowing
                | BusinessDayConvention::CalculateShiftModifiedFollowing
                | BusinessDayConvention::CalculateShiftPreceding
                | BusinessDayConvention::CalculateShiftModifiedPreceding
        )
    }

    /// The plain (non-calculate-shift) convention driving date selection.
    pub fn shift_rule(self) -> ShiftRule {
        match self {
            BusinessDayConvention::ShiftFollowing
            | BusinessDayConvention::CalculateShiftFollowing => ShiftRule::Following,
            BusinessDayConvention::ShiftModifiedFollowing
            | BusinessDayConvention::CalculateShiftModifiedFollowing => ShiftRule::ModifiedFollowing,
            BusinessDayConvention::ShiftPreceding
            | BusinessDayConvention::CalculateShiftPreceding => ShiftRule::Preceding,
            BusinessDayConvention::ShiftModifiedPreceding
            | BusinessDayConvention::CalculateShiftModifiedPreceding => ShiftRule::ModifiedPreceding,
            BusinessDayConvention::NoShift => ShiftRule::None,
        }
    }
}

/// The four direction rules shared by both plain and calculate-shift
/// conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftRule {
    /// SCF.
    Following,
    /// SCMF.
    ModifiedFollowing,
    /// SCP.
    Preceding,
    /// SCMP.
    ModifiedPreceding,
    /// No adjustment.
    None,
}

impl fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BusinessDayConvention::ShiftFollowing => "SCF",
            BusinessDayConvention::ShiftModifiedFollowing => "SCMF",
            BusinessDayConvention::ShiftPreceding => "SCP",
            BusinessDayConvention::ShiftModifiedPreceding => "SCMP",
            BusinessDayConvention::CalculateShiftFollowing => "CSF",
            BusinessDayConvention::CalculateShiftModifiedFollowing => "CSMF",
            BusinessDayConvention::CalculateShiftPreceding => "CSP",
            BusinessDayConvention::CalculateShiftModifiedPreceding => "CSMP",
            BusinessDayConvention::NoShift => "NoShift",
        };
        write!(f, "{s}")
    }
}
