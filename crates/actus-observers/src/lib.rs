//! Market-data and child-contract observers.

#![forbid(unsafe_code)]

mod child;
mod market;

pub use child::ChildContractObserver;
pub use market::{Behavioral, CalloutEvent, Composite, Constant, Curve, Dict, MarketObserver, TimeSeries};
