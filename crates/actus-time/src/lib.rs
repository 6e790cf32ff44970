//! Temporal kernel: dates, day-count conventions, business-day adjustment,
//! calendars, and the ACTUS cycle grammar.

#![forbid(unsafe_code)]

mod business_day_convention;
mod calendar;
mod calendars;
mod cycle;
mod date;
mod day_counter;
mod time_unit;
mod weekday;

pub use business_day_convention::{BusinessDayConvention, ShiftRule};
pub use calendar::{Calendar, NullCalendar, WeekendsOnly};
pub use calendars::Target;
pub use cycle::{Cycle, StubPolarity};
pub use date::{days_in_month, is_leap_year, ActusDateTime};
pub use day_counter::{
    Actual360, Actual365, ActualActual, Business252, DayCounter, Thirty360European, Thirty360Us,
};
pub use time_unit::TimeUnit;
pub use weekday::Weekday;
