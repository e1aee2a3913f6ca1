// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive samples.
// Step 2 — Seed average gain / average loss with the sum of the first
//          `period` gains / losses divided by `period`.
// Step 3 — Apply Wilder's exponential smoothing:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// The output is aligned to the *price* series, not the delta series: the
// first `period` slots hold the neutral placeholder and the tail is padded by
// repeating the last computed value, so `output.len() == prices.len()` for
// every input.  Callers only read the final value.
// =============================================================================

use crate::classifier::{classify, Classification};

/// Default Wilder look-back.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Value emitted wherever there is not enough history to smooth.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Compute the RSI series for `prices` with the given smoothing `period`.
///
/// This never fails.  Degenerate inputs degrade to neutral values:
/// - `prices.len() < period + 1` => every slot is [`NEUTRAL_RSI`]
/// - `period == 0` => every slot is [`NEUTRAL_RSI`]
/// - empty input => empty output
///
/// When the average loss is exactly zero the RSI is 100.0, including the flat
/// market case where the average gain is zero too.
pub fn calculate_rsi(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period + 1 {
        return vec![NEUTRAL_RSI; prices.len()];
    }

    // --- Compute price deltas ------------------------------------------------
    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();

    // --- Seed averages from the first `period` deltas ------------------------
    let (sum_gain, sum_loss) = deltas[..period].iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else if d < 0.0 {
            (g, l - d)
        } else {
            (g, l)
        }
    });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    let mut result = Vec::with_capacity(prices.len());
    result.resize(period, NEUTRAL_RSI);

    // --- Wilder's smoothing for subsequent deltas ----------------------------
    for &delta in &deltas[period..] {
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { -delta } else { 0.0 };

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        result.push(rsi_from_averages(avg_gain, avg_loss));
    }

    // One short of the price length at this point; repeat the tail.
    let last = result.last().copied().unwrap_or(NEUTRAL_RSI);
    result.resize(prices.len(), last);

    result
}

/// Convenience function: return the most recent RSI value together with its
/// classification.
///
/// Returns `None` only for an empty price window.
pub fn current_rsi(prices: &[f64], period: usize) -> Option<(f64, Classification)> {
    let value = *calculate_rsi(prices, period).last()?;
    Some((value, classify(value)))
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
