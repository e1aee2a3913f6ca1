// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free momentum indicators used by the screener.  They are
// total functions: insufficient data degrades to neutral values rather than
// an error, so a short sparkline never aborts a run.

pub mod rsi;

pub use rsi::{current_rsi, DEFAULT_RSI_PERIOD};
