// =============================================================================
// Crypto RSI Screener — Main Entry Point
// =============================================================================
//
// One pass per invocation:
//   fetch top coins  →  RSI per sparkline  →  classify + sort  →  publish
//
// A failed fetch is not fatal: the run continues with zero assets and still
// publishes an explicit "no data" report.  Only a failure to write the report
// ends the process with a non-zero status.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod classifier;
mod coingecko;
mod config;
mod indicators;
mod pipeline;
mod report;
mod types;

use anyhow::Context;
use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::coingecko::CoinGeckoClient;
use crate::config::ScreenerConfig;
use crate::pipeline::Screener;
use crate::report::{Report, ReportSink, StaticSiteSink};

/// Config file consulted when `RSI_SCREENER_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "screener_config.json";

/// How many coins to list under "most oversold" / "most overbought".
const SUMMARY_TOP_N: usize = 3;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Crypto RSI Screener starting");

    let config_path =
        std::env::var("RSI_SCREENER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let mut config = ScreenerConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        ScreenerConfig::default()
    });
    config.apply_env(|key| std::env::var(key).ok());
    config.validate();

    info!(
        vs_currency = %config.vs_currency,
        per_page = config.per_page,
        rsi_period = config.rsi_period,
        output_dir = %config.output_dir.display(),
        "Configured screener"
    );

    // ── 2. Fetch ─────────────────────────────────────────────────────────
    info!("Fetching cryptocurrency data...");
    let client = CoinGeckoClient::new(&config)?;
    let raw_coins = client.fetch_markets_or_empty().await;

    // ── 3. Analyse ───────────────────────────────────────────────────────
    let results = Screener::from_config(&config).analyze(&raw_coins);
    let report = Report::new(results, Utc::now()).with_currency(&config.vs_currency);
    log_summary(&report);

    // ── 4. Publish ───────────────────────────────────────────────────────
    let sink = StaticSiteSink::new(&config.output_dir);
    sink.publish(&report)
        .with_context(|| format!("failed to publish report to {}", config.output_dir.display()))?;

    info!(path = %sink.html_path().display(), "HTML report generated");
    Ok(())
}

/// Log category counts and the most extreme readings.
fn log_summary(report: &Report) {
    if report.is_empty() {
        warn!("No results to display");
        return;
    }

    let stats = &report.stats;
    info!(
        analysed = stats.total,
        oversold = stats.oversold,
        neutral = stats.neutral,
        overbought = stats.overbought,
        "Summary"
    );

    for coin in report.most_oversold(SUMMARY_TOP_N) {
        info!(symbol = %coin.symbol, rsi = coin.rsi, "Most oversold");
    }
    for coin in report.most_overbought(SUMMARY_TOP_N) {
        info!(symbol = %coin.symbol, rsi = coin.rsi, "Most overbought");
    }
}
