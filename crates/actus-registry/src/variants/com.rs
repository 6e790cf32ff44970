//! COM — Commodity position: tracks a quantity with no interest or
//! dividend logic, analogous to CSH's minimal analysis-date tracking.

use crate::dispatch::VariantHandlers;
use crate::variants::csh;

pub(crate) fn handlers() -> VariantHandlers {
    VariantHandlers {
        schedule: csh::schedule,
        initial_state: csh::initial_state,
        pof: csh::pof,
        stf: csh::stf,
        finalize_schedule: None,
    }
}
