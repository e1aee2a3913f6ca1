// =============================================================================
// CoinGecko market record — decoded one coin at a time
// =============================================================================
//
// The markets endpoint is fetched as a raw JSON array and every element is
// decoded separately, so a single coin with a missing or mistyped field is
// skipped without failing the rest of the batch.
//
// Required: `symbol`, `name`, `current_price`.
// Required but nullable: `market_cap`, `market_cap_rank`.
// Optional: percentage changes and the 7-day sparkline
// (`sparkline_in_7d.price`, an array of numbers that may contain nulls).
// =============================================================================

use serde::{Deserialize, Deserializer};

/// One element of `GET /coins/markets`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinMarket {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    #[serde(deserialize_with = "nullable")]
    pub market_cap: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d_in_currency: Option<f64>,
    #[serde(default)]
    pub sparkline_in_7d: Option<Sparkline>,
}

/// `null` decodes to `None`, but the key itself must be present.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Hourly price samples covering the last seven days.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sparkline {
    #[serde(default)]
    pub price: Vec<Option<f64>>,
}

impl CoinMarket {
    /// Decode a single raw market entry.
    pub fn from_value(raw: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(raw)
    }

    /// Number of sparkline slots as delivered, nulls included.
    pub fn raw_sample_count(&self) -> usize {
        self.sparkline_in_7d.as_ref().map_or(0, |s| s.price.len())
    }

    /// Sparkline with null samples removed, in chronological order.
    pub fn price_window(&self) -> Vec<f64> {
        self.sparkline_in_7d
            .as_ref()
            .map(|s| s.price.iter().flatten().copied().collect())
            .unwrap_or_default()
    }
}

/// Best-effort display label for a raw entry, used in skip diagnostics.
pub fn label_of(raw: &serde_json::Value) -> String {
    raw.get("name")
        .and_then(|v| v.as_str())
        .or_else(|| raw.get("id").and_then(|v| v.as_str()))
        .unwrap_or("Unknown")
        .to_string()
}
