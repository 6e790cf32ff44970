//! `MarketObserver`: a total function from `(identifier, time)` to a scalar,
//! with several concrete backends.

use std::collections::HashMap;

use actus_model::EventKind;
use actus_time::ActusDateTime;

/// A query interface for external market and behavioral data.
///
/// `get` is total: every implementation must return *some* value for any
/// `(identifier, time)` pair, never an error or `None`.
pub trait MarketObserver: std::fmt::Debug + Send + Sync {
    /// The observed value of `identifier` at `time`.
    fn get(&self, identifier: &str, time: ActusDateTime) -> f64;
}

/// Always returns the same scalar, regardless of identifier or time.
#[derive(Debug, Clone, Copy)]
pub struct Constant(pub f64);

impl MarketObserver for Constant {
    fn get(&self, _identifier: &str, _time: ActusDateTime) -> f64 {
        self.0
    }
}

/// A map keyed by identifier; missing keys return `0.0`.
#[derive(Debug, Clone, Default)]
pub struct Dict(HashMap<String, f64>);

impl Dict {
    /// Build from `(identifier, value)` pairs.
    pub fn new(values: impl IntoIterator<Item = (String, f64)>) -> Self {
        Dict(values.into_iter().collect())
    }
}

impl MarketObserver for Dict {
    fn get(&self, identifier: &str, _time: ActusDateTime) -> f64 {
        self.0.get(identifier).copied().unwrap_or(0.0)
    }
}

/// A per-identifier sorted sample list, piecewise-constant between samples.
///
/// The value at a query time is the value of the greatest sample whose time
/// is `<=` the query time; before the first sample, the first value is
/// returned.
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    series: HashMap<String, Vec<(ActusDateTime, f64)>>,
}

impl TimeSeries {
    /// Build from `(identifier, sorted samples)` pairs. Samples for each
    /// identifier must already be sorted by time.
    pub fn new(series: impl IntoIterator<Item = (String, Vec<(ActusDateTime, f64)>)>) -> Self {
        TimeSeries { series: series.into_iter().collect() }
    }
}

impl MarketObserver for TimeSeries {
    fn get(&self, identifier: &str, time: ActusDateTime) -> f64 {
        let Some(samples) = self.series.get(identifier) else {
            return 0.0;
        };
        if samples.is_empty() {
            return 0.0;
        }
        match samples.binary_search_by_key(&time, |(t, _)| *t) {
            Ok(idx) => samples[idx].1,
            Err(0) => samples[0].1,
            Err(idx) => samples[idx - 1].1,
        }
    }
}

/// A curve keyed by tenor (in years from some implicit reference), linearly
/// interpolated between the two bracketing tenors and flat-extrapolated
/// outside the range.
#[derive(Debug, Clone, Default)]
pub struct Curve {
    curves: HashMap<String, Vec<(f64, f64)>>,
}

impl Curve {
    /// Build from `(identifier, sorted (tenor, value) pairs)`.
    pub fn new(curves: impl IntoIterator<Item = (String, Vec<(f64, f64)>)>) -> Self {
        Curve { curves: curves.into_iter().collect() }
    }

    fn interpolate(points: &[(f64, f64)], tenor: f64) -> f64 {
        if points.is_empty() {
            return 0.0;
        }
        if tenor <= points[0].0 {
            return points[0].1;
        }
        if tenor >= points[points.len() - 1].0 {
            return points[points.len() - 1].1;
        }
        let idx = points.partition_point(|&(t, _)| t <= tenor);
        let (t0, v0) = points[idx - 1];
        let (t1, v1) = points[idx];
        v0 + (v1 - v0) * (tenor - t0) / (t1 - t0)
    }

    /// The interpolated value of `identifier` at `tenor` years.
    pub fn at_tenor(&self, identifier: &str, tenor: f64) -> f64 {
        self.curves
            .get(identifier)
            .map(|points| Self::interpolate(points, tenor))
            .unwrap_or(0.0)
    }
}

impl MarketObserver for Curve {
    fn get(&self, identifier: &str, time: ActusDateTime) -> f64 {
        // Without a reference date the `time` axis has no tenor meaning for
        // a pure MarketObserver query; callers that need tenor-indexed
        // lookups should use `at_tenor` directly. `get` treats the serial
        // day count as a degenerate tenor so the trait remains total.
        self.at_tenor(identifier, time.serial() as f64)
    }
}

/// An ordered list of observers; `get` returns the first non-default (i.e.
/// non-`0.0`) answer, falling back to `0.0` if every observer is silent.
#[derive(Debug, Default)]
pub struct Composite {
    observers: Vec<Box<dyn MarketObserver>>,
}

impl Composite {
    /// Build from a list of observers, tried in order.
    pub fn new(observers: Vec<Box<dyn MarketObserver>>) -> Self {
        Composite { observers }
    }
}

impl MarketObserver for Composite {
    fn get(&self, identifier: &str, time: ActusDateTime) -> f64 {
        for observer in &self.observers {
            let v = observer.get(identifier, time);
            if v != 0.0 {
                return v;
            }
        }
        0.0
    }
}

/// A callout event a [`Behavioral`] observer injects into a contract's
/// schedule before lifecycle evaluation begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalloutEvent {
    /// When the callout occurs.
    pub time: ActusDateTime,
    /// The kind of event it materializes as.
    pub event_kind: EventKind,
    /// A hint for the payoff the driver loop should expect (e.g. a
    /// prepayment amount); the POF still computes the authoritative value.
    pub payoff_hint: f64,
}

/// Wraps an inner observer and additionally declares a fixed list of
/// callout events, merged into the schedule at generation time.
#[derive(Debug)]
pub struct Behavioral<O> {
    inner: O,
    callouts: Vec<CalloutEvent>,
}

impl<O: MarketObserver> Behavioral<O> {
    /// Wrap `inner`, declaring `callouts` to be merged into the schedule.
    pub fn new(inner: O, callouts: Vec<CalloutEvent>) -> Self {
        Behavioral { inner, callouts }
    }

    /// The callout events this observer injects.
    pub fn callouts(&self) -> &[CalloutEvent] {
        &self.callouts
    }
}

impl<O: MarketObserver> MarketObserver for Behavioral<O> {
    fn get(&self, identifier: &str, time: ActusDateTime) -> f64 {
        self.inner.get(identifier, time)
    }
}
