//! `DayCounter` trait and the six day-count conventions the ACTUS
//! dictionary names.

use crate::date::{is_leap_year, ActusDateTime};
use actus_core::Time;

/// A convention for computing the year-fraction between two dates.
///
/// `year_fraction(a, a) == 0` and `year_fraction` is never negative for
/// `end >= start`, for every implementation below.
pub trait DayCounter: std::fmt::Debug + Send + Sync {
    /// Human-readable name (e.g. `"30E/360"`).
    fn name(&self) -> &str;

    /// Fraction of a year between `start` and `end`.
    fn year_fraction(&self, start: ActusDateTime, end: ActusDateTime) -> Time;
}

/// Actual/360: `actual_days / 360`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual360;

impl DayCounter for Actual360 {
    fn name(&self) -> &str {
        "A/360"
    }

    fn year_fraction(&self, start: ActusDateTime, end: ActusDateTime) -> Time {
        start.days_between(end) as Time / 360.0
    }
}

/// Actual/365 (Fixed): `actual_days / 365`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual365;

impl DayCounter for Actual365 {
    fn name(&self) -> &str {
        "A/365"
    }

    fn year_fraction(&self, start: ActusDateTime, end: ActusDateTime) -> Time {
        start.days_between(end) as Time / 365.0
    }
}

/// Actual/Actual (ISDA): splits the period at year boundaries, dividing each
/// slice by 365 or 366 depending on whether that calendar year is a leap year.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActualActual;

impl DayCounter for ActualActual {
    fn name(&self) -> &str {
        "A/A"
    }

    fn year_fraction(&self, start: ActusDateTime, end: ActusDateTime) -> Time {
        if start == end {
            return 0.0;
        }
        if start > end {
            return -self.year_fraction(end, start);
        }
        let y1 = start.year();
        let y2 = end.year();
        if y1 == y2 {
            let denom = if is_leap_year(y1) { 366.0 } else { 365.0 };
            return start.days_between(end) as Time / denom;
        }
        let jan1_next = ActusDateTime::from_ymd(y1 + 1, 1, 1).expect("valid date");
        let denom1 = if is_leap_year(y1) { 366.0 } else { 365.0 };
        let first_slice = start.days_between(jan1_next) as Time / denom1;
        first_slice + self.year_fraction(jan1_next, end)
    }
}

/// 30E/360 (European 30/360): both day-of-month values capped at 30.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thirty360European;

impl DayCounter for Thirty360European {
    fn name(&self) -> &str {
        "30E/360"
    }

    fn year_fraction(&self, start: ActusDateTime, end: ActusDateTime) -> Time {
        let d1 = start.day_of_month().min(30) as i64;
        let d2 = end.day_of_month().min(30) as i64;
        thirty_360(start, end, d1, d2) / 360.0
    }
}

/// 30/360 (US Bond Basis): d1 = 31 becomes 30; d2 = 31 becomes 30 only if
/// d1 (after its own adjustment) is already >= 30.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thirty360Us;

impl DayCounter for Thirty360Us {
    fn name(&self) -> &str {
        "30/360"
    }

    fn year_fraction(&self, start: ActusDateTime, end: ActusDateTime) -> Time {
        let mut d1 = start.day_of_month() as i64;
        let mut d2 = end.day_of_month() as i64;
        if d1 == 31 {
            d1 = 30;
        }
        if d2 == 31 && d1 >= 30 {
            d2 = 30;
        }
        thirty_360(start, end, d1, d2) / 360.0
    }
}

fn thirty_360(d1_date: ActusDateTime, d2_date: ActusDateTime, d1: i64, d2: i64) -> Time {
    let y1 = d1_date.year() as i64;
    let m1 = d1_date.month() as i64;
    let y2 = d2_date.year() as i64;
    let m2 = d2_date.month() as i64;
    (360 * (y2 - y1) + 30 * (m2 - m1) + (d2 - d1)) as Time
}

/// Business/252: counts business days under a named calendar and divides
/// by 252.
#[derive(Debug)]
pub struct Business252 {
    calendar: Box<dyn crate::calendar::Calendar>,
}

impl Business252 {
    /// A B/252 counter over `calendar`'s business days.
    pub fn new(calendar: Box<dyn crate::calendar::Calendar>) -> Self {
        Business252 { calendar }
    }
}

impl Default for Business252 {
    fn default() -> Self {
        Business252::new(Box::new(crate::calendar::WeekendsOnly))
    }
}

impl DayCounter for Business252 {
    fn name(&self) -> &str {
        "B/252"
    }

    fn year_fraction(&self, start: ActusDateTime, end: ActusDateTime) -> Time {
        if start == end {
            return 0.0;
        }
        if start > end {
            return -self.year_fraction(end, start);
        }
        let mut count = 0i64;
        let mut d = start;
        while d < end {
            if self.calendar.is_business_day(d) {
                count += 1;
            }
            d = d.add_days(1).expect("within range for a schedule-sized span");
        }
        count as Time / 252.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use super::*;

    fn d(y: u16, m: u8, dd: u8) -> ActusDateTime {
        ActusDateTime::from_ymd(y, m, dd).unwrap()
    }

    #[test]
    fn zero_on_equal_dates() {
        let x = d(2024, 6, 1);
        for dc in dccs() {
            assert_eq!(dc.year_fraction(x, x), 0.0, "{}", dc.name());
        }
    }

    fn dccs() -> Vec<Box<dyn DayCounter>> {
        vec![
            Box::new(Actual360),
            Box::new(Actual365),
            Box::new(ActualActual),
            Box::new(Thirty360European),
            Box::new(Thirty360Us),
            Box::new(Business252::default()),
        ]
    }

    #[test]
    fn thirty_e_360_full_year() {
        let dc = Thirty360European;
        let yf = dc.year_fraction(d(2024, 1, 15), d(2025, 1, 15));
        assert_abs_diff_eq!(yf, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn thirty_e_360_semiannual() {
        let dc = Thirty360European;
        // Jan 15 -> Jul 15: 6 months * 30 = 180 days.
        let yf = dc.year_fraction(d(2024, 1, 15), d(2024, 7, 15));
        assert_abs_diff_eq!(yf, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn actual_actual_splits_leap_year() {
        let dc = ActualActual;
        let yf = dc.year_fraction(d(2023, 1, 1), d(2024, 1, 1));
        assert_abs_diff_eq!(yf, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn additivity_actual_360() {
        let dc = Actual360;
        let a = d(2024, 1, 1);
        let b = d(2024, 6, 1);
        let c = d(2025, 1, 1);
        let lhs = dc.year_fraction(a, b) + dc.year_fraction(b, c);
        let rhs = dc.year_fraction(a, c);
        assert!((lhs - rhs).abs() < 1e-12);
    }
}
