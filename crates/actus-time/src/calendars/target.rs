//! TARGET (the euro area's real-time gross settlement system) calendar —
//! the default calendar for ACTUS contracts carrying no explicit
//! `calendar` attribute.
//!
//! The closing-day list follows the ECB's published schedule: weekends,
//! New Year's Day, Christmas Day and the day after, the harmonized
//! Good Friday / Easter Monday / Labour Day closings in force from 2000,
//! and the year-end closings of the system's first years.

use crate::calendar::Calendar;
use crate::date::ActusDateTime;

/// The TARGET/ECB settlement calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct Target;

impl Calendar for Target {
    fn name(&self) -> &str {
        "TARGET"
    }

    fn is_business_day(&self, date: ActusDateTime) -> bool {
        date.weekday().is_weekday() && !is_closing_day(date)
    }
}

fn is_closing_day(date: ActusDateTime) -> bool {
    let year = date.year();
    match (date.month(), date.day_of_month()) {
        (1, 1) | (12, 25) | (12, 26) => true,
        (5, 1) if year >= 2000 => true,
        (12, 31) if matches!(year, 1998 | 1999 | 2001) => true,
        _ => {
            if year < 2000 {
                return false;
            }
            // Good Friday and Easter Monday.
            let offset = easter_sunday(year).days_between(date);
            offset == -2 || offset == 1
        }
    }
}

/// Easter Sunday of `year`, via the Gauss computus for the Gregorian
/// calendar.
fn easter_sunday(year: u16) -> ActusDateTime {
    let y = year as i32;
    let a = y % 19;
    let b = y % 4;
    let c = y % 7;
    let k = y / 100;
    let p = (13 + 8 * k) / 25;
    let q = k / 4;
    let m = (15 - p + k - q) % 30;
    let n = (4 + k - q) % 7;
    let d = (19 * a + m) % 30;
    let e = (2 * b + 4 * c + 6 * d + n) % 7;
    let (month, day) = if d == 29 && e == 6 {
        // The computus would land on April 26; the feast moves a week up.
        (4, 19)
    } else if d == 28 && e == 6 && (11 * m + 11) % 30 < 19 {
        // Same correction for the April 25 edge.
        (4, 18)
    } else {
        let march_day = 22 + d + e;
        if march_day > 31 {
            (4, march_day - 31)
        } else {
            (3, march_day)
        }
    };
    ActusDateTime::from_ymd(year, month as u8, day as u8)
        .expect("the computus stays inside the supported year range")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: u16, m: u8, dd: u8) -> ActusDateTime {
        ActusDateTime::from_ymd(y, m, dd).unwrap()
    }

    #[test]
    fn fixed_holidays() {
        let cal = Target;
        assert!(!cal.is_business_day(d(2024, 1, 1)));
        assert!(!cal.is_business_day(d(2024, 5, 1)));
        assert!(!cal.is_business_day(d(2024, 12, 25)));
        assert!(!cal.is_business_day(d(2024, 12, 26)));
        assert!(cal.is_business_day(d(2024, 12, 24)));
    }

    #[test]
    fn easter_closings_2024() {
        // Easter Sunday 2024 is March 31: Good Friday March 29 and Easter
        // Monday April 1 are both closed, the Thursday before is open.
        let cal = Target;
        assert!(!cal.is_business_day(d(2024, 3, 29)));
        assert!(!cal.is_business_day(d(2024, 4, 1)));
        assert!(cal.is_business_day(d(2024, 3, 28)));
    }

    #[test]
    fn computus_edge_years() {
        // 2076 hits the April 26 correction: Easter Sunday is April 19.
        assert_eq!(easter_sunday(2076), d(2076, 4, 19));
        // 1954 hits the April 25 correction: Easter Sunday is April 18.
        assert_eq!(easter_sunday(1954), d(1954, 4, 18));
        assert_eq!(easter_sunday(2024), d(2024, 3, 31));
        let cal = Target;
        assert!(!cal.is_business_day(d(2076, 4, 20)));
    }

    #[test]
    fn easter_closings_start_with_the_harmonized_list() {
        // Easter Monday 1999 (April 5) predates the harmonized closing-day
        // list and was an open TARGET day.
        let cal = Target;
        assert!(cal.is_business_day(d(1999, 4, 5)));
        // The 1999 year-end closing, by contrast, applies.
        assert!(!cal.is_business_day(d(1999, 12, 31)));
    }
}
