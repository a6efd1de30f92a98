//! Derived market signals: volatility, percent change, trend and recommendation.
//!
//! Everything here is pure. Currency-denominated inputs are converted to the
//! display currency before any formula runs, so the formulas never care which
//! currency they are working in.

use std::fmt::Display;

use super::currency::ConversionRate;
use super::market::TickerSnapshot;

/// Below `average * BUY_THRESHOLD` the price is a buy.
pub const BUY_THRESHOLD: f64 = 0.99;
/// Above `average * SELL_THRESHOLD` the price is a sell.
pub const SELL_THRESHOLD: f64 = 1.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Trend::Rising => "Rising",
                Trend::Falling => "Falling",
                Trend::Stable => "Stable",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Recommendation::Buy => "Buy",
                Recommendation::Sell => "Sell",
                Recommendation::Hold => "Hold",
            }
        )
    }
}

/// Spread between high and low relative to the low, in percent.
pub fn volatility(high: Option<f64>, low: Option<f64>) -> Option<f64> {
    match (high, low) {
        (Some(high), Some(low)) if low != 0.0 => Some((high - low) / low * 100.0),
        _ => None,
    }
}

/// Change from open to last, in percent.
pub fn percent_change(open: Option<f64>, last: Option<f64>) -> Option<f64> {
    match (open, last) {
        (Some(open), Some(last)) if open != 0.0 => Some((last - open) / open * 100.0),
        _ => None,
    }
}

/// An undefined change is classified as `Stable`.
pub fn trend(percent_change: Option<f64>) -> Trend {
    match percent_change {
        Some(change) if change > 0.0 => Trend::Rising,
        Some(change) if change < 0.0 => Trend::Falling,
        _ => Trend::Stable,
    }
}

/// Compares the current price with the average price. Both bands are strict,
/// so a price exactly on a band edge is a `Hold`.
pub fn recommendation(current_price: f64, average_price: f64) -> Recommendation {
    if current_price < average_price * BUY_THRESHOLD {
        Recommendation::Buy
    } else if current_price > average_price * SELL_THRESHOLD {
        Recommendation::Sell
    } else {
        Recommendation::Hold
    }
}

/// Per-symbol values in display currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    pub price: f64,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub volatility: Option<f64>,
    pub percent_change: Option<f64>,
    pub trend: Trend,
    pub recommendation: Recommendation,
}

impl DerivedMetrics {
    /// Returns `None` when the ticker has no last price.
    ///
    /// A missing average price falls back to the current price, which always
    /// yields `Hold`: without a baseline the signal degrades to neutral.
    pub fn compute(ticker: &TickerSnapshot, rate: ConversionRate) -> Option<Self> {
        let last = ticker.last?;

        let price = rate.convert(last);
        let high = ticker.high.map(|v| rate.convert(v));
        let low = ticker.low.map(|v| rate.convert(v));
        let open = ticker.open.map(|v| rate.convert(v));
        let average = ticker.average.map(|v| rate.convert(v)).unwrap_or(price);

        let percent_change = percent_change(open, Some(price));

        Some(DerivedMetrics {
            price,
            high,
            low,
            volatility: volatility(high, low),
            percent_change,
            trend: trend(percent_change),
            recommendation: recommendation(price, average),
        })
    }
}
