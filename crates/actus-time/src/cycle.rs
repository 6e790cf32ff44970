//! ACTUS cycle grammar (`nU[+-]`) and date-sequence expansion.

use crate::date::ActusDateTime;
use crate::time_unit::TimeUnit;
use actus_core::errors::{Error, Result};

/// Stub polarity: whether a short leftover period is attached at the end of
/// the schedule (`+`) or would have been at the beginning (`-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum StubPolarity {
    /// Long stub at the end of the schedule (default when unspecified).
    LongEnd,
    /// Short stub at the end of the schedule.
    ShortEnd,
    /// Short stub at the beginning of the schedule.
    ShortBeginning,
}

/// A parsed ACTUS cycle: `n` repetitions of `unit`, with an optional stub
/// polarity suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Cycle {
    /// The repetition count (always positive).
    pub n: u32,
    /// The repetition unit.
    pub unit: TimeUnit,
    /// The stub polarity.
    pub stub: StubPolarity,
}

impl Cycle {
    /// Parse a cycle string of the form `[0-9]+[DWMQHY][+-]?`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSchedule`] for any other form.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut chars: Vec<char> = s.chars().collect();
        if chars.is_empty() {
            return Err(invalid(s));
        }
        let stub = match chars.last() {
            Some('+') => {
                chars.pop();
                StubPolarity::ShortEnd
            }
            Some('-') => {
                chars.pop();
                StubPolarity::ShortBeginning
            }
            _ => StubPolarity::LongEnd,
        };
        let unit_char = *chars.last().ok_or_else(|| invalid(s))?;
        let unit = TimeUnit::from_code(unit_char).ok_or_else(|| invalid(s))?;
        chars.pop();
        if chars.is_empty() {
            return Err(invalid(s));
        }
        let digits: String = chars.into_iter().collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid(s));
        }
        let n: u32 = digits.parse().map_err(|_| invalid(s))?;
        if n == 0 {
            return Err(invalid(s));
        }
        Ok(Cycle { n, unit, stub })
    }

    /// Format back into the canonical `nU[+-]` grammar.
    pub fn format(&self) -> String {
        let suffix = match self.stub {
            StubPolarity::LongEnd => "",
            StubPolarity::ShortEnd => "+",
            StubPolarity::ShortBeginning => "-",
        };
        format!("{}{}{}", self.n, self.unit.code(), suffix)
    }

    /// Expand `anchor + k * cycle` for `k = 0, 1, 2, ...` up to `end`.
    ///
    /// Dates are always computed directly from `anchor`, never by
    /// incrementing the previous date, so month-end drift cannot accumulate
    /// (Jan 30 + 2M yields Mar 30, not Mar 28 via two 1M hops).
    ///
    /// `end` is included exactly when it equals `anchor + k*cycle` for some
    /// integer `k`; otherwise the last date strictly before `end` is kept
    /// and `end` itself is appended as the stub, per this cycle's polarity.
    pub fn expand(
        &self,
        anchor: ActusDateTime,
        end: ActusDateTime,
        end_of_month: bool,
    ) -> Result<Vec<ActusDateTime>> {
        if end < anchor {
            return Err(Error::InvalidSchedule(
                "cycle end precedes anchor".to_string(),
            ));
        }
        let clamp_to_eom = end_of_month && self.unit.is_month_based() && anchor.is_end_of_month();
        let step = self.n as i32;

        let mut dates = Vec::new();
        let mut k: i32 = 0;
        loop {
            let raw = anchor
                .advance(k * step, self.unit)
                .map_err(|e| Error::InvalidSchedule(e.to_string()))?;
            let candidate = if clamp_to_eom {
                raw.end_of_month()
            } else {
                raw
            };
            if candidate > end {
                break;
            }
            dates.push(candidate);
            if candidate == end {
                return Ok(dates);
            }
            k += 1;
        }
        // `end` was not hit exactly: dates currently holds every date
        // strictly before `end`; append `end` as the stub.
        dates.push(end);
        Ok(dates)
    }
}

fn invalid(s: &str) -> Error {
    Error::InvalidSchedule(format!("invalid cycle string: {s:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: u16, m: u8, dd: u8) -> ActusDateTime {
        ActusDateTime::from_ymd(y, m, dd).unwrap()
    }

    #[test]
    fn parse_canonical_forms() {
        let c = Cycle::parse("6M").unwrap();
        assert_eq!(c.n, 6);
        assert_eq!(c.unit, TimeUnit::Months);
        assert_eq!(c.stub, StubPolarity::LongEnd);

        let c2 = Cycle::parse("1Y+").unwrap();
        assert_eq!(c2.stub, StubPolarity::ShortEnd);

        let c3 = Cycle::parse("3Q-").unwrap();
        assert_eq!(c3.unit, TimeUnit::Quarters);
        assert_eq!(c3.stub, StubPolarity::ShortBeginning);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Cycle::parse("").is_err());
        assert!(Cycle::parse("M3").is_err());
        assert!(Cycle::parse("3X").is_err());
        assert!(Cycle::parse("0M").is_err());
        assert!(Cycle::parse("-3M").is_err());
    }

    #[test]
    fn roundtrip_format() {
        for s in ["6M", "1Y+", "3Q-", "30D"] {
            assert_eq!(Cycle::parse(s).unwrap().format(), s);
        }
    }

    #[test]
    fn expand_exact_end() {
        let c = Cycle::parse("6M").unwrap();
        let dates = c
            .expand(d(2024, 1, 15), d(2025, 1, 15), false)
            .unwrap();
        assert_eq!(
            dates,
            vec![d(2024, 1, 15), d(2024, 7, 15), d(2025, 1, 15)]
        );
    }

    #[test]
    fn expand_with_stub() {
        let c = Cycle::parse("6M").unwrap();
        let dates = c
            .expand(d(2024, 1, 15), d(2024, 10, 1), false)
            .unwrap();
        // anchor, anchor+6M=Jul 15, then stub at Oct 1 (Jul 15 + 6M = Jan 15
        // 2025 is past end).
        assert_eq!(dates, vec![d(2024, 1, 15), d(2024, 7, 15), d(2024, 10, 1)]);
    }

    #[test]
    fn expand_no_incremental_drift() {
        // Anchor Jan 30; monthly cycle must land on the 30th (or eom) every
        // time, not drift from cumulative day-capping.
        let c = Cycle::parse("1M").unwrap();
        let dates = c.expand(d(2024, 1, 30), d(2024, 4, 30), false).unwrap();
        assert_eq!(
            dates,
            vec![d(2024, 1, 30), d(2024, 2, 29), d(2024, 3, 30), d(2024, 4, 30)]
        );
    }

    #[test]
    fn expand_end_of_month_clamping() {
        let c = Cycle::parse("1M").unwrap();
        let dates = c.expand(d(2024, 1, 31), d(2024, 4, 30), true).unwrap();
        assert_eq!(
            dates,
            vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31), d(2024, 4, 30)]
        );
    }

    #[test]
    fn expand_determinism() {
        let c = Cycle::parse("3M").unwrap();
        let a = c.expand(d(2024, 1, 1), d(2025, 1, 1), false).unwrap();
        let b = c.expand(d(2024, 1, 1), d(2025, 1, 1), false).unwrap();
        assert_eq!(a, b);
    }
}
