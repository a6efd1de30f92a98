//! Market data abstractions and core types

use anyhow::Result;
use async_trait::async_trait;

use super::symbol::Symbol;

/// Price statistics for one instrument at one instant. Providers may omit any field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickerSnapshot {
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub open: Option<f64>,
    pub last: Option<f64>,
    pub average: Option<f64>,
}

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetches the current ticker for `symbol`. Any provider-side failure is an `Err`.
    async fn fetch_ticker(&self, symbol: &Symbol) -> Result<TickerSnapshot>;

    /// Enumerates every instrument the provider knows, sorted alphabetically.
    async fn list_symbols(&self) -> Result<Vec<Symbol>>;
}
