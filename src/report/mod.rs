// =============================================================================
// Report Module
// =============================================================================
//
// A `Report` is the sorted result set plus per-bucket counts, stamped with
// its generation time.  Sinks turn it into something people (HTML) and
// machines (JSON snapshot) can read.  An empty report is valid and renders
// an explicit "no data" state.

pub mod html;
pub mod sink;

pub use sink::StaticSiteSink;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::Classification;
use crate::types::{AssetResult, CategoryStats};

/// Human-readable timestamp used in both the page and the snapshot.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Quote currency assumed when none is given.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Destination for a finished screener run.
pub trait ReportSink {
    fn publish(&self, report: &Report) -> Result<()>;
}

/// One screener run, ready for publishing.
#[derive(Debug, Clone)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    /// Sorted by RSI ascending.
    pub results: Vec<AssetResult>,
    pub stats: CategoryStats,
    /// Lower-case quote currency of prices (e.g. "usd").
    pub currency: String,
}

/// Machine-readable form written to `data.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: String,
    pub currency: String,
    pub results: Vec<AssetResult>,
    pub stats: CategoryStats,
}

impl Report {
    pub fn new(results: Vec<AssetResult>, generated_at: DateTime<Utc>) -> Self {
        let stats = CategoryStats::from_results(&results);
        Self { generated_at, results, stats, currency: DEFAULT_CURRENCY.to_string() }
    }

    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = currency.trim().to_lowercase();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn timestamp(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Up to `n` oversold coins, lowest RSI first.
    ///
    /// Scans the whole list: a Neutral coin whose rounded RSI ties an
    /// Oversold one may sort ahead of it.
    pub fn most_oversold(&self, n: usize) -> Vec<&AssetResult> {
        self.results
            .iter()
            .filter(|r| r.classification == Classification::Oversold)
            .take(n)
            .collect()
    }

    /// Up to `n` overbought coins, highest RSI first; ties keep list order.
    pub fn most_overbought(&self, n: usize) -> Vec<&AssetResult> {
        let mut overbought: Vec<&AssetResult> = self
            .results
            .iter()
            .filter(|r| r.classification == Classification::Overbought)
            .collect();
        overbought.sort_by(|a, b| b.rsi.total_cmp(&a.rsi));
        overbought.truncate(n);
        overbought
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            timestamp: self.timestamp(),
            currency: self.currency.clone(),
            results: self.results.clone(),
            stats: self.stats,
        }
    }

    /// Pretty-printed JSON snapshot.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.snapshot()).context("failed to serialise report snapshot")
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::TimeZone;

    pub fn asset(symbol: &str, rsi: f64, classification: Classification) -> AssetResult {
        AssetResult {
            symbol: symbol.to_string(),
            name: format!("{symbol} Token"),
            current_price: 1234.5,
            market_cap: 9_876_543.0,
            market_cap_rank: Some(7),
            price_change_24h_pct: 2.5,
            price_change_7d_pct: -4.25,
            rsi,
            classification,
        }
    }

    pub fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap()
    }

    pub fn sample_report() -> Report {
        Report::new(
            vec![
                asset("AAA", 12.0, Classification::Oversold),
                asset("BBB", 25.5, Classification::Oversold),
                asset("CCC", 48.0, Classification::Neutral),
                asset("DDD", 71.0, Classification::Overbought),
                asset("EEE", 88.8, Classification::Overbought),
            ],
            fixed_time(),
        )
    }
}
