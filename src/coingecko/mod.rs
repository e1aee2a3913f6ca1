// =============================================================================
// CoinGecko Data Source
// =============================================================================
//
// Supplies the screener with the top coins by market cap, each carrying a
// 7-day hourly price sparkline.  Transport failures collapse to an empty
// list at this boundary.

pub mod client;
pub mod types;

pub use client::CoinGeckoClient;
pub use types::{label_of, CoinMarket};
