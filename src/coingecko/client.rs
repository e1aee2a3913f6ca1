// =============================================================================
// CoinGecko REST Client — top coins by market cap with 7-day sparklines
// =============================================================================
//
// Public endpoint, no API key.  One request per run with a fixed timeout and
// no retry: a failed fetch means "no data" for this run, not a crash.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, error, info, instrument};

use crate::config::ScreenerConfig;

/// Thin client for `GET /coins/markets`.
#[derive(Clone)]
pub struct CoinGeckoClient {
    base_url: String,
    vs_currency: String,
    per_page: u32,
    page: u32,
    client: reqwest::Client,
}

impl CoinGeckoClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Build a client from the screener configuration.
    pub fn new(config: &ScreenerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("crypto-rsi-screener/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build reqwest client")?;

        debug!(base_url = %config.api_base_url, "CoinGeckoClient initialised");

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            vs_currency: config.vs_currency.clone(),
            per_page: config.per_page,
            page: config.page,
            client,
        })
    }

    /// Full URL of the markets endpoint (without query string).
    pub fn markets_url(&self) -> String {
        format!("{}/coins/markets", self.base_url)
    }

    /// Query parameters sent with the markets request.
    pub fn markets_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", self.vs_currency.clone()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
            ("sparkline", "true".to_string()),
            ("price_change_percentage", "24h,7d".to_string()),
        ]
    }

    // -------------------------------------------------------------------------
    // Market data
    // -------------------------------------------------------------------------

    /// GET /coins/markets.
    ///
    /// Returns the raw array elements undecoded so that each coin can be
    /// validated on its own downstream.
    #[instrument(skip(self), name = "coingecko::fetch_markets")]
    pub async fn fetch_markets(&self) -> Result<Vec<serde_json::Value>> {
        let url = self.markets_url();

        let resp = self
            .client
            .get(&url)
            .query(&self.markets_query())
            .send()
            .await
            .context("GET /coins/markets request failed")?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse markets response")?;

        if !status.is_success() {
            anyhow::bail!("CoinGecko GET /coins/markets returned {}: {}", status, body);
        }

        let coins = parse_markets_body(body)?;
        debug!(count = coins.len(), "markets fetched");
        Ok(coins)
    }

    /// Like [`fetch_markets`](Self::fetch_markets) but never fails: any
    /// transport or decode error is logged and yields an empty list.
    pub async fn fetch_markets_or_empty(&self) -> Vec<serde_json::Value> {
        match self.fetch_markets().await {
            Ok(coins) => {
                info!(count = coins.len(), "market data received");
                coins
            }
            Err(e) => {
                let reason = format!("{e:#}");
                error!(error = %reason, "error fetching market data — continuing with no assets");
                Vec::new()
            }
        }
    }
}

/// The markets payload must be a JSON array.
fn parse_markets_body(body: serde_json::Value) -> Result<Vec<serde_json::Value>> {
    match body {
        serde_json::Value::Array(items) => Ok(items),
        other => anyhow::bail!("markets response is not an array: {other}"),
    }
}

impl std::fmt::Debug for CoinGeckoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinGeckoClient")
            .field("base_url", &self.base_url)
            .field("vs_currency", &self.vs_currency)
            .field("per_page", &self.per_page)
            .field("page", &self.page)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a loopback port and return
    /// a client pointed at it.
    async fn one_shot_server(status_line: &'static str, body: String) -> CoinGeckoClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let cfg = ScreenerConfig {
            api_base_url: format!("http://{addr}/api/v3"),
            request_timeout_secs: 5,
            ..Default::default()
        };
        CoinGeckoClient::new(&cfg).unwrap()
    }

    #[test]
    fn markets_request_shape() {
        let cfg = ScreenerConfig {
            api_base_url: "http://localhost:9/api/v3/".to_string(),
            per_page: 25,
            ..Default::default()
        };
        let client = CoinGeckoClient::new(&cfg).unwrap();
        assert_eq!(client.markets_url(), "http://localhost:9/api/v3/coins/markets");

        let query = client.markets_query();
        let get = |k: &str| query.iter().find(|(name, _)| *name == k).map(|(_, v)| v.as_str());
        assert_eq!(get("vs_currency"), Some("usd"));
        assert_eq!(get("order"), Some("market_cap_desc"));
        assert_eq!(get("per_page"), Some("25"));
        assert_eq!(get("page"), Some("1"));
        assert_eq!(get("sparkline"), Some("true"));
        assert_eq!(get("price_change_percentage"), Some("24h,7d"));
    }

    #[test]
    fn body_must_be_array() {
        assert_eq!(parse_markets_body(json!([{ "id": "a" }, 3])).unwrap().len(), 2);
        assert!(parse_markets_body(json!({ "status": { "error_code": 429 } })).is_err());
    }

    #[tokio::test]
    async fn unreachable_host_yields_empty_list() {
        // Port 9 (discard) on localhost is not expected to speak HTTP.
        let cfg = ScreenerConfig {
            api_base_url: "http://127.0.0.1:9/api/v3".to_string(),
            request_timeout_secs: 2,
            ..Default::default()
        };
        let client = CoinGeckoClient::new(&cfg).unwrap();
        assert!(client.fetch_markets_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let body = json!({ "status": { "error_code": 429, "error_message": "rate limited" } });
        let client = one_shot_server("429 Too Many Requests", body.to_string()).await;
        assert!(client.fetch_markets().await.is_err());
    }

    #[tokio::test]
    async fn rate_limited_status_is_swallowed() {
        let body = json!({ "status": { "error_code": 429 } });
        let client = one_shot_server("429 Too Many Requests", body.to_string()).await;
        assert!(client.fetch_markets_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn object_body_with_ok_status_yields_empty_list() {
        let body = json!({ "error": "unexpected shape" });
        let client = one_shot_server("200 OK", body.to_string()).await;
        assert!(client.fetch_markets_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn array_body_is_returned_raw() {
        let body = json!([{ "id": "bitcoin" }, { "id": "ethereum" }]);
        let client = one_shot_server("200 OK", body.to_string()).await;
        let coins = client.fetch_markets_or_empty().await;
        assert_eq!(coins.len(), 2);
        assert_eq!(coins[1]["id"], "ethereum");
    }
}
