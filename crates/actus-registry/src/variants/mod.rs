//! One module per ACTUS contract variant, each exposing a `handlers()`
//! function returning its [`crate::dispatch::VariantHandlers`].

pub(crate) mod ann;
pub(crate) mod capfl;
pub(crate) mod cec;
pub(crate) mod ceg;
pub(crate) mod clm;
pub(crate) mod com;
pub(crate) mod csh;
pub(crate) mod futur;
pub(crate) mod fxout;
pub(crate) mod lam;
pub(crate) mod lax;
pub(crate) mod nam;
pub(crate) mod optns;
pub(crate) mod pam;
pub(crate) mod stk;
pub(crate) mod swaps;
pub(crate) mod swppv;
pub(crate) mod ump;
