//! `Calendar` trait: knows which dates are business days and can adjust
//! dates under a [`BusinessDayConvention`], including the calculate-shift
//! variants that must report a distinct calculation date.

use crate::business_day_convention::{BusinessDayConvention, ShiftRule};
use crate::date::ActusDateTime;
use crate::weekday::Weekday;

/// A holiday calendar.
pub trait Calendar: std::fmt::Debug + Send + Sync {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// `true` if `date` is a business day under this calendar.
    fn is_business_day(&self, date: ActusDateTime) -> bool;

    /// `true` if `date` is not a business day.
    fn is_holiday(&self, date: ActusDateTime) -> bool {
        !self.is_business_day(date)
    }

    /// Apply a [`ShiftRule`] to `date`, returning the adjusted date.
    fn shift(&self, date: ActusDateTime, rule: ShiftRule) -> ActusDateTime {
        match rule {
            ShiftRule::None => date,
            ShiftRule::Following => self.following(date),
            ShiftRule::Preceding => self.preceding(date),
            ShiftRule::ModifiedFollowing => {
                let shifted = self.following(date);
                if shifted.month() != date.month() {
                    self.preceding(date)
                } else {
                    shifted
                }
            }
            ShiftRule::ModifiedPreceding => {
                let shifted = self.preceding(date);
                if shifted.month() != date.month() {
                    self.following(date)
                } else {
                    shifted
                }
            }
        }
    }

    /// Adjust `date` under a full [`BusinessDayConvention`], returning
    /// `(event_time, calculation_time)`. For the plain SCx conventions the
    /// two are equal; for the CSx conventions `calculation_time` stays at
    /// the original, unshifted `date`.
    fn adjust_with_calc_time(
        &self,
        date: ActusDateTime,
        convention: BusinessDayConvention,
    ) -> (ActusDateTime, ActusDateTime) {
        let shifted = self.shift(date, convention.shift_rule());
        if convention.is_calculate_shift() {
            (shifted, date)
        } else {
            (shifted, shifted)
        }
    }

    fn following(&self, mut date: ActusDateTime) -> ActusDateTime {
        while self.is_holiday(date) {
            date = date.add_days(1).expect("following: in-range schedule date");
        }
        date
    }

    fn preceding(&self, mut date: ActusDateTime) -> ActusDateTime {
        while self.is_holiday(date) {
            date = date.add_days(-1).expect("preceding: in-range schedule date");
        }
        date
    }
}

/// A calendar where every day is a business day.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCalendar;

impl Calendar for NullCalendar {
    fn name(&self) -> &str {
        "NC"
    }

    fn is_business_day(&self, _date: ActusDateTime) -> bool {
        true
    }
}

/// A calendar whose only non-business days are Saturday and Sunday.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendsOnly;

impl Calendar for WeekendsOnly {
    fn name(&self) -> &str {
        "WeekendsOnly"
    }

    fn is_business_day(&self, date: ActusDateTime) -> bool {
        !matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
    }
}
