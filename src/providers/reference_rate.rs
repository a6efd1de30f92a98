use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::core::currency::{ConversionRate, CurrencyRateProvider};
use crate::core::market::MarketDataSource;
use crate::core::symbol::Symbol;

/// Derives a currency rate from a market quote: `from -> to` is priced through
/// the `to/from` instrument and inverted, so `USDT -> EUR` uses `EUR/USDT`.
pub struct ReferenceRateProvider {
    source: Arc<dyn MarketDataSource>,
}

impl ReferenceRateProvider {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        ReferenceRateProvider { source }
    }
}

#[async_trait]
impl CurrencyRateProvider for ReferenceRateProvider {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        if from.eq_ignore_ascii_case(to) {
            return Ok(1.0);
        }

        let reference = Symbol::new(to, from);
        let ticker = self
            .source
            .fetch_ticker(&reference)
            .await
            .with_context(|| format!("Failed to price reference instrument {reference}"))?;

        let rate = ConversionRate::from_reference_price(ticker.last)
            .with_context(|| format!("Cannot derive rate from {reference}"))?;
        debug!(%reference, rate = rate.value(), "Derived conversion rate");
        Ok(rate.value())
    }
}
