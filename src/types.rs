// =============================================================================
// Shared types used across the screener
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::classifier::Classification;

/// Screener verdict for a single coin.  Built once per run, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetResult {
    /// Ticker, upper-cased (e.g. "BTC").
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub market_cap: f64,
    /// `None` when the data source has not ranked the coin.
    pub market_cap_rank: Option<u32>,
    #[serde(rename = "price_change_24h")]
    pub price_change_24h_pct: f64,
    #[serde(rename = "price_change_7d")]
    pub price_change_7d_pct: f64,
    /// Latest RSI, rounded to two decimals.
    pub rsi: f64,
    #[serde(rename = "category")]
    pub classification: Classification,
}

/// Per-bucket counts over a result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub oversold: usize,
    pub neutral: usize,
    pub overbought: usize,
    pub total: usize,
}

impl CategoryStats {
    pub fn from_results(results: &[AssetResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            match r.classification {
                Classification::Oversold => acc.oversold += 1,
                Classification::Neutral => acc.neutral += 1,
                Classification::Overbought => acc.overbought += 1,
            }
            acc.total += 1;
            acc
        })
    }
}

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(symbol: &str, rsi: f64, classification: Classification) -> AssetResult {
        AssetResult {
            symbol: symbol.to_string(),
            name: symbol.to_lowercase(),
            current_price: 1.0,
            market_cap: 1_000.0,
            market_cap_rank: Some(1),
            price_change_24h_pct: 0.0,
            price_change_7d_pct: 0.0,
            rsi,
            classification,
        }
    }

    #[test]
    fn stats_count_each_bucket() {
        let results = vec![
            result("A", 10.0, Classification::Oversold),
            result("B", 20.0, Classification::Oversold),
            result("C", 50.0, Classification::Neutral),
            result("D", 90.0, Classification::Overbought),
        ];
        let stats = CategoryStats::from_results(&results);
        assert_eq!(
            stats,
            CategoryStats { oversold: 2, neutral: 1, overbought: 1, total: 4 }
        );
    }

    #[test]
    fn stats_empty() {
        assert_eq!(CategoryStats::from_results(&[]), CategoryStats::default());
    }

    #[test]
    fn round2_behaviour() {
        assert_eq!(round2(66.24961855355505), 66.25);
        assert_eq!(round2(10.526095797545068), 10.53);
        assert_eq!(round2(100.0), 100.0);
    }

    #[test]
    fn serialises_with_report_field_names() {
        let json = serde_json::to_value(result("BTC", 42.0, Classification::Neutral)).unwrap();
        assert_eq!(json["category"], "Neutral");
        assert_eq!(json["price_change_24h"], 0.0);
        assert_eq!(json["market_cap_rank"], 1);
    }
}
