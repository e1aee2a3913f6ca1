// =============================================================================
// Screener Configuration — JSON file + environment overrides
// =============================================================================
//
// Every tunable lives here.  All fields carry `#[serde(default)]` so that a
// partial (or empty) config file is valid and adding new fields never breaks
// loading an older file.  Environment variables win over the file.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::indicators::DEFAULT_RSI_PERIOD;

/// Largest page size the markets endpoint accepts.
const MAX_PER_PAGE: u32 = 250;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_api_base_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

fn default_per_page() -> u32 {
    50
}

fn default_page() -> u32 {
    1
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_rsi_period() -> usize {
    DEFAULT_RSI_PERIOD
}

fn default_min_samples() -> usize {
    14
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("docs")
}

// =============================================================================
// ScreenerConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    // --- Data source ---------------------------------------------------------

    /// Base URL of the CoinGecko v3 API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Quote currency for prices and market caps.
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,

    /// Number of coins requested (top N by market cap).
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default = "default_page")]
    pub page: u32,

    /// Single-attempt HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    // --- Analysis ------------------------------------------------------------

    /// Wilder smoothing period.
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Coins with fewer usable sparkline samples are skipped.
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,

    // --- Output --------------------------------------------------------------

    /// Directory receiving `index.html` and `data.json`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            vs_currency: default_vs_currency(),
            per_page: default_per_page(),
            page: default_page(),
            request_timeout_secs: default_request_timeout_secs(),
            rsi_period: default_rsi_period(),
            min_samples: default_min_samples(),
            output_dir: default_output_dir(),
        }
    }
}

impl ScreenerConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing or unreadable file is an error so the caller can fall back
    /// to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read screener config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse screener config from {}", path.display()))?;

        info!(
            path = %path.display(),
            per_page = config.per_page,
            rsi_period = config.rsi_period,
            "screener config loaded"
        );

        Ok(config)
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("RSI_SCREENER_OUTPUT_DIR").filter(|s| !s.trim().is_empty()) {
            self.output_dir = PathBuf::from(dir.trim());
        }
        if let Some(raw) = lookup("RSI_SCREENER_PER_PAGE") {
            match raw.trim().parse::<u32>() {
                Ok(n) => self.per_page = n,
                Err(e) => warn!(value = %raw, error = %e, "ignoring invalid RSI_SCREENER_PER_PAGE"),
            }
        }
        if let Some(cur) = lookup("RSI_SCREENER_VS_CURRENCY").filter(|s| !s.trim().is_empty()) {
            self.vs_currency = cur.trim().to_lowercase();
        }
        if let Some(url) = lookup("COINGECKO_API_BASE").filter(|s| !s.trim().is_empty()) {
            self.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
    }

    /// Clamp values into ranges the screener can work with.
    pub fn validate(&mut self) {
        if self.rsi_period == 0 {
            warn!("rsi_period must be >= 1, using 1");
            self.rsi_period = 1;
        }
        let clamped = self.per_page.clamp(1, MAX_PER_PAGE);
        if clamped != self.per_page {
            warn!(requested = self.per_page, used = clamped, "per_page out of range");
            self.per_page = clamped;
        }
    }
}
