use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::market::{MarketDataSource, TickerSnapshot};
use crate::core::symbol::Symbol;

/// Parses one of Binance's decimal strings. Zero means "no trades" and is
/// treated as missing.
fn parse_price(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Midpoint of open and last, the average an exchange reports when it has none.
fn average_price(open: Option<f64>, last: Option<f64>) -> Option<f64> {
    match (open, last) {
        (Some(open), Some(last)) => Some((open + last) / 2.0),
        _ => None,
    }
}

// BinanceProvider implementation for MarketDataSource
pub struct BinanceProvider {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("crypticker/0.1")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(BinanceProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_text(&self, url: &str, what: &str) -> Result<String> {
        debug!("Requesting {} from {}", what, url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for {} URL: {}", e, what, url))?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let detail = serde_json::from_str::<BinanceErrorResponse>(&text)
                .map(|e| format!(" ({})", e.msg))
                .unwrap_or_default();
            return Err(anyhow!("HTTP error: {} for {}{}", status, what, detail));
        }
        Ok(text)
    }
}

#[derive(Deserialize, Debug)]
struct BinanceErrorResponse {
    msg: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Ticker24hResponse {
    high_price: Option<String>,
    low_price: Option<String>,
    open_price: Option<String>,
    last_price: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ExchangeInfoResponse {
    symbols: Vec<ExchangeSymbol>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ExchangeSymbol {
    base_asset: String,
    quote_asset: String,
}

#[async_trait]
impl MarketDataSource for BinanceProvider {
    #[instrument(
        name = "BinanceTickerFetch",
        skip(self),
        fields(symbol = %symbol)
    )]
    async fn fetch_ticker(&self, symbol: &Symbol) -> Result<TickerSnapshot> {
        let url = format!(
            "{}/api/v3/ticker/24hr?symbol={}",
            self.base_url,
            symbol.pair()
        );
        let text = self.get_text(&url, &format!("symbol: {symbol}")).await?;

        let data: Ticker24hResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse ticker response for {}: {}", symbol, e))?;
        debug!(response = ?data, "Received Binance ticker");

        let open = parse_price(data.open_price.as_deref());
        let last = parse_price(data.last_price.as_deref());
        Ok(TickerSnapshot {
            high: parse_price(data.high_price.as_deref()),
            low: parse_price(data.low_price.as_deref()),
            open,
            last,
            average: average_price(open, last),
        })
    }

    #[instrument(name = "BinanceSymbolList", skip(self))]
    async fn list_symbols(&self) -> Result<Vec<Symbol>> {
        let url = format!("{}/api/v3/exchangeInfo", self.base_url);
        let text = self.get_text(&url, "exchange info").await?;

        let data: ExchangeInfoResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse exchange info response: {}", e))?;

        let mut symbols: Vec<Symbol> = data
            .symbols
            .iter()
            .map(|s| Symbol::new(&s.base_asset, &s.quote_asset))
            .collect();
        symbols.sort();
        symbols.dedup();
        debug!(count = symbols.len(), "Received Binance exchange info");
        Ok(symbols)
    }
}
