//! Units a [`crate::cycle::Cycle`] or date-advance can be expressed in.

use std::fmt;

/// A unit of time, as used by the ACTUS cycle grammar (`nU[+-]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TimeUnit {
    /// Calendar days.
    Days,
    /// Weeks (7 days).
    Weeks,
    /// Calendar months.
    Months,
    /// Quarters (3 months).
    Quarters,
    /// Half-years (6 months).
    HalfYears,
    /// Calendar years.
    Years,
}

impl TimeUnit {
    /// The single-letter ACTUS grammar code for this unit (`D W M Q H Y`).
    pub fn code(self) -> char {
        match self {
            TimeUnit::Days => 'D',
            TimeUnit::Weeks => 'W',
            TimeUnit::Months => 'M',
            TimeUnit::Quarters => 'Q',
            TimeUnit::HalfYears => 'H',
            TimeUnit::Years => 'Y',
        }
    }

    /// Parse a single-letter ACTUS grammar code.
    pub fn from_code(c: char) -> Option<Self> {
        Some(match c {
            'D' => TimeUnit::Days,
            'W' => TimeUnit::Weeks,
            'M' => TimeUnit::Months,
            'Q' => TimeUnit::Quarters,
            'H' => TimeUnit::HalfYears,
            'Y' => TimeUnit::Years,
            _ => return None,
        })
    }

    /// Whether this unit is month-based (M/Q/H/Y), and therefore subject to
    /// end-of-month clamping during cycle expansion.
    pub fn is_month_based(self) -> bool {
        !matches!(self, TimeUnit::Days | TimeUnit::Weeks)
    }

    /// Equivalent number of months for month-based units (used to normalize
    /// Q/H into a month count before calling [`crate::date::ActusDateTime::add_months`]).
    pub fn months_per_unit(self) -> i32 {
        match self {
            TimeUnit::Months => 1,
            TimeUnit::Quarters => 3,
            TimeUnit::HalfYears => 6,
            TimeUnit::Years => 12,
            TimeUnit::Days | TimeUnit::Weeks => 0,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
