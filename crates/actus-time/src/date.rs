//! `ActusDateTime` — an immutable civil date-time at second resolution.
//!
//! Adapted from the serial-number `Date` representation: a day serial number
//! (days since 1900-01-01) plus a seconds-of-day offset. Day-count and
//! business-day logic operate purely on the day serial, which is what the
//! ACTUS cross-validation suite encodes; the seconds offset is carried for
//! completeness (ACTUS timestamps are second-resolution) and participates only in
//! total ordering and equality.

use crate::time_unit::TimeUnit;
use crate::weekday::Weekday;
use actus_core::errors::{Error, Result};

/// A calendar date-time, accurate to the second.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct ActusDateTime {
    serial: i32,
    seconds: u32,
}

impl ActusDateTime {
    /// Minimum representable date: 1901-01-01.
    pub const MIN: ActusDateTime = ActusDateTime {
        serial: 367,
        seconds: 0,
    };

    /// Maximum representable date: 2199-12-31.
    pub const MAX: ActusDateTime = ActusDateTime {
        serial: 109_573,
        seconds: 86_399,
    };

    /// Construct from a Gregorian calendar date, midnight.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self> {
        Self::from_ymd_hms(year, month, day, 0, 0, 0)
    }

    /// Construct from a Gregorian calendar date and a time of day.
    pub fn from_ymd_hms(year: u16, month: u8, day: u8, h: u8, m: u8, s: u8) -> Result<Self> {
        if !(1900..=2199).contains(&year) {
            return Err(Error::Date(format!("year {year} out of range [1900, 2199]")));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::Date(format!("month {month} out of range [1, 12]")));
        }
        let days_in = days_in_month(year, month);
        if day == 0 || day > days_in {
            return Err(Error::Date(format!(
                "day {day} out of range [1, {days_in}] for {year}-{month:02}"
            )));
        }
        if h > 23 || m > 59 || s > 59 {
            return Err(Error::Date(format!("invalid time of day {h:02}:{m:02}:{s:02}")));
        }
        Ok(ActusDateTime {
            serial: serial_from_ymd(year, month, day),
            seconds: h as u32 * 3600 + m as u32 * 60 + s as u32,
        })
    }

    /// The calendar year.
    pub fn year(&self) -> u16 {
        ymd_from_serial(self.serial).0
    }

    /// The calendar month (1-12).
    pub fn month(&self) -> u8 {
        ymd_from_serial(self.serial).1
    }

    /// The day of the month (1-31).
    pub fn day_of_month(&self) -> u8 {
        ymd_from_serial(self.serial).2
    }

    /// The seconds elapsed since midnight.
    pub fn seconds_of_day(&self) -> u32 {
        self.seconds
    }

    /// The day serial number (days since 1900-01-01).
    pub fn serial(&self) -> i32 {
        self.serial
    }

    /// The weekday.
    pub fn weekday(&self) -> Weekday {
        let w = ((self.serial - 1).rem_euclid(7) + 1) as u8;
        Weekday::from_ordinal(w).expect("rem_euclid always in 1..=7")
    }

    /// Advance by `n` calendar days (time of day unchanged).
    pub fn add_days(self, n: i32) -> Result<Self> {
        let serial = self.serial + n;
        if serial <= 0 || (ActusDateTime { serial, seconds: 0 }) > Self::MAX {
            return Err(Error::Date(format!("date arithmetic: result serial {serial} out of range")));
        }
        Ok(ActusDateTime { serial, seconds: self.seconds })
    }

    /// Advance by `n` months, clamping the day-of-month to the last day of
    /// the resulting month (e.g. Jan 31 + 1M = Feb 28).
    pub fn add_months(self, n: i32) -> Result<Self> {
        let (mut y, m, d) = ymd_from_serial(self.serial);
        let total_months = m as i32 - 1 + n;
        let new_y = y as i32 + total_months.div_euclid(12);
        let new_m = total_months.rem_euclid(12) as u8 + 1;
        if !(1900..=2199).contains(&new_y) {
            return Err(Error::Date(format!("year {new_y} out of range")));
        }
        y = new_y as u16;
        let clamped_d = d.min(days_in_month(y, new_m));
        Ok(ActusDateTime {
            serial: serial_from_ymd(y, new_m, clamped_d),
            seconds: self.seconds,
        })
    }

    /// Advance by `n` units of the given [`TimeUnit`].
    pub fn advance(self, n: i32, unit: TimeUnit) -> Result<Self> {
        match unit {
            TimeUnit::Days => self.add_days(n),
            TimeUnit::Weeks => self.add_days(n * 7),
            TimeUnit::Months | TimeUnit::Quarters | TimeUnit::HalfYears | TimeUnit::Years => {
                self.add_months(n * unit.months_per_unit())
            }
        }
    }

    /// `true` if this date is the last calendar day of its month.
    pub fn is_end_of_month(&self) -> bool {
        self.day_of_month() == days_in_month(self.year(), self.month())
    }

    /// The last calendar day of the month containing this date.
    pub fn end_of_month(&self) -> Self {
        let (y, m, _) = ymd_from_serial(self.serial);
        ActusDateTime {
            serial: serial_from_ymd(y, m, days_in_month(y, m)),
            seconds: self.seconds,
        }
    }

    /// Number of calendar days between `self` and `other` (positive if
    /// `other` is later).
    pub fn days_between(self, other: ActusDateTime) -> i32 {
        other.serial - self.serial
    }
}

impl std::fmt::Debug for ActusDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (y, m, d) = ymd_from_serial(self.serial);
        if self.seconds == 0 {
            write!(f, "{y:04}-{m:02}-{d:02}")
        } else {
            write!(
                f,
                "{y:04}-{m:02}-{d:02}T{:02}:{:02}:{:02}",
                self.seconds / 3600,
                (self.seconds / 60) % 60,
                self.seconds % 60
            )
        }
    }
}

impl std::fmt::Display for ActusDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// `true` if `year` is a Gregorian leap year.
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`.
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => unreachable!("month out of range"),
    }
}

const MONTH_OFFSET: [i32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

fn serial_from_ymd(year: u16, month: u8, day: u8) -> i32 {
    let y = year as i32;
    let m = month as i32;
    let d = day as i32;
    let mut serial = (y - 1900) * 365;
    serial += (y - 1901) / 4 - (y - 1901) / 100 + (y - 1601) / 400;
    serial += MONTH_OFFSET[m as usize - 1];
    if m > 2 && is_leap_year(year) {
        serial += 1;
    }
    serial += d;
    serial
}

fn ymd_from_serial(serial: i32) -> (u16, u8, u8) {
    let mut y = (serial / 365 + 1900) as u16;
    loop {
        let start_of_year = serial_from_ymd(y, 1, 1);
        if serial < start_of_year {
            y -= 1;
        } else if serial >= serial_from_ymd(y + 1, 1, 1) {
            y += 1;
        } else {
            break;
        }
    }
    let start_of_year = serial_from_ymd(y, 1, 1);
    let mut remaining = serial - start_of_year + 1;
    let mut m = 1u8;
    loop {
        let days = days_in_month(y, m) as i32;
        if remaining <= days {
            break;
        }
        remaining -= days;
        m += 1;
    }
    (y, m, remaining as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: u16, m: u8, dd: u8) -> ActusDateTime {
        ActusDateTime::from_ymd(y, m, dd).unwrap()
    }

    #[test]
    fn roundtrip() {
        for (y, m, dd) in [(2024, 1, 15), (2000, 2, 29), (2100, 2, 28), (2199, 12, 31)] {
            let date = d(y, m, dd);
            assert_eq!(date.year(), y);
            assert_eq!(date.month(), m);
            assert_eq!(date.day_of_month(), dd);
        }
    }

    #[test]
    fn end_of_month_clamping_on_advance() {
        let jan30 = d(2024, 1, 30);
        // Jan 30 + 2M must be Mar 30, not drifted by repeated day-capping.
        let mar30 = jan30.advance(2, TimeUnit::Months).unwrap();
        assert_eq!(mar30, d(2024, 3, 30));

        let jan31 = d(2024, 1, 31);
        let feb29 = jan31.advance(1, TimeUnit::Months).unwrap();
        assert_eq!(feb29, d(2024, 2, 29));
    }

    #[test]
    fn ordering_and_seconds() {
        let a = ActusDateTime::from_ymd_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let b = ActusDateTime::from_ymd_hms(2024, 1, 1, 11, 0, 0).unwrap();
        assert!(a < b);
        assert_eq!(a.days_between(b), 0);
    }

    #[test]
    fn weekday_known_anchor() {
        // 2024-01-01 is a Monday.
        assert_eq!(d(2024, 1, 1).weekday(), Weekday::Monday);
    }
}
