// =============================================================================
// Screener Pipeline — raw market entries to a sorted, classified result set
// =============================================================================
//
// Per coin:
//   1. Decode the raw entry (missing / mistyped field => skip)
//   2. Drop null sparkline samples; require `min_samples` usable prices
//   3. Run the RSI engine and keep the last value
//   4. Classify and build an `AssetResult`
//
// Skips are values, not errors: they are logged and the batch continues.
// The final list is sorted by RSI ascending with a stable sort, so ties keep
// the data source's market-cap order.
// =============================================================================

use tracing::{debug, warn};

use crate::coingecko::{label_of, CoinMarket};
use crate::config::ScreenerConfig;
use crate::indicators::current_rsi;
use crate::types::{round2, AssetResult};

/// Why a coin was left out of the report.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The entry could not be decoded.
    Malformed(String),
    /// Too few usable sparkline samples.
    InsufficientSamples { available: usize, required: usize },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(msg) => write!(f, "malformed record: {msg}"),
            Self::InsufficientSamples { available, required } => {
                write!(f, "insufficient samples: {available} < {required}")
            }
        }
    }
}

/// Outcome of evaluating one raw market entry.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetOutcome {
    Scored(AssetResult),
    Skipped { label: String, reason: SkipReason },
}

/// Stateless evaluator parameterised by the RSI period and sample floor.
#[derive(Debug, Clone, Copy)]
pub struct Screener {
    pub period: usize,
    pub min_samples: usize,
}

impl Screener {
    pub fn new(period: usize, min_samples: usize) -> Self {
        Self { period, min_samples }
    }

    pub fn from_config(config: &ScreenerConfig) -> Self {
        Self::new(config.rsi_period, config.min_samples)
    }

    /// Evaluate a single raw market entry.
    pub fn evaluate_asset(&self, raw: &serde_json::Value) -> AssetOutcome {
        let coin = match CoinMarket::from_value(raw) {
            Ok(coin) => coin,
            Err(e) => {
                return AssetOutcome::Skipped {
                    label: label_of(raw),
                    reason: SkipReason::Malformed(e.to_string()),
                }
            }
        };

        let raw_count = coin.raw_sample_count();
        let prices = coin.price_window();
        if raw_count < self.min_samples || prices.len() < self.min_samples {
            return AssetOutcome::Skipped {
                label: coin.name,
                reason: SkipReason::InsufficientSamples {
                    available: prices.len(),
                    required: self.min_samples,
                },
            };
        }

        // A non-empty window always yields a value.
        let Some((rsi, classification)) = current_rsi(&prices, self.period) else {
            return AssetOutcome::Skipped {
                label: coin.name,
                reason: SkipReason::InsufficientSamples { available: 0, required: self.min_samples },
            };
        };

        AssetOutcome::Scored(AssetResult {
            symbol: coin.symbol.to_uppercase(),
            name: coin.name,
            current_price: coin.current_price,
            market_cap: coin.market_cap.unwrap_or(0.0),
            market_cap_rank: coin.market_cap_rank,
            price_change_24h_pct: coin.price_change_percentage_24h.unwrap_or(0.0),
            price_change_7d_pct: coin.price_change_percentage_7d_in_currency.unwrap_or(0.0),
            rsi: round2(rsi),
            classification,
        })
    }

    /// Evaluate every entry, log skips, and return results sorted by RSI.
    pub fn analyze(&self, raw_coins: &[serde_json::Value]) -> Vec<AssetResult> {
        let mut results = Vec::with_capacity(raw_coins.len());

        for raw in raw_coins {
            match self.evaluate_asset(raw) {
                AssetOutcome::Scored(result) => {
                    debug!(symbol = %result.symbol, rsi = result.rsi, category = %result.classification, "asset scored");
                    results.push(result);
                }
                AssetOutcome::Skipped { label, reason } => {
                    warn!(asset = %label, reason = %reason, "skipping asset");
                }
            }
        }

        sort_by_rsi(&mut results);
        results
    }
}

/// Stable ascending sort on RSI.
pub fn sort_by_rsi(results: &mut [AssetResult]) {
    results.sort_by(|a, b| a.rsi.total_cmp(&b.rsi));
}
