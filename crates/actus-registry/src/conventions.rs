//! Maps attribute-level convention codes onto the concrete `actus-time`
//! implementations they select.

use actus_model::{ContractAttributes, DayCountConventionCode};
use actus_time::{
    Actual360, Actual365, ActualActual, Business252, Calendar, DayCounter, NullCalendar, Target,
    Thirty360European, Thirty360Us, WeekendsOnly,
};

/// Resolve a [`DayCountConventionCode`] to its implementation. Defaults to
/// 30E/360, ACTUS's most common convention, when the attribute is absent.
/// B/252 counts business days under `calendar_name`'s calendar.
pub fn day_counter(
    code: Option<DayCountConventionCode>,
    calendar_name: Option<&str>,
) -> Box<dyn DayCounter> {
    match code {
        Some(DayCountConventionCode::A360) => Box::new(Actual360),
        Some(DayCountConventionCode::A365) => Box::new(Actual365),
        Some(DayCountConventionCode::Aa) => Box::new(ActualActual),
        Some(DayCountConventionCode::Thirty360Us) => Box::new(Thirty360Us),
        Some(DayCountConventionCode::B252) => Box::new(Business252::new(calendar(calendar_name))),
        Some(DayCountConventionCode::Thirty360E) | None => Box::new(Thirty360European),
    }
}

/// Resolve a named calendar identifier. Defaults to [`Target`], ACTUS's
/// default calendar, when the attribute is absent or unrecognized.
pub fn calendar(name: Option<&str>) -> Box<dyn Calendar> {
    match name {
        Some("NC") => Box::new(NullCalendar),
        Some("WeekendsOnly") => Box::new(WeekendsOnly),
        _ => Box::new(Target),
    }
}

/// Convenience: resolve both conventions directly from a contract's
/// attributes.
pub fn conventions_for(attrs: &ContractAttributes) -> (Box<dyn DayCounter>, Box<dyn Calendar>) {
    (
        day_counter(attrs.day_count_convention, attrs.calendar.as_deref()),
        calendar(attrs.calendar.as_deref()),
    )
}
