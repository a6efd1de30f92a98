//! Currency conversion abstractions

use anyhow::{Result, anyhow};
use async_trait::async_trait;

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Returns the multiplier converting an amount in `from` into `to`.
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}

/// A positive multiplier from the provider's quote currency to the display
/// currency, fixed for the lifetime of one polling session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRate(f64);

impl ConversionRate {
    pub fn new(rate: f64) -> Result<Self> {
        if rate.is_finite() && rate > 0.0 {
            Ok(ConversionRate(rate))
        } else {
            Err(anyhow!("Conversion rate must be positive, got {}", rate))
        }
    }

    /// Builds the rate by inverting a reference instrument's price
    /// (e.g. `EUR/USDT` priced at 1.08 gives a USDT to EUR rate of 1/1.08).
    pub fn from_reference_price(price: Option<f64>) -> Result<Self> {
        match price {
            Some(p) if p.is_finite() && p > 0.0 => Self::new(1.0 / p),
            Some(p) => Err(anyhow!("Reference price is not usable: {}", p)),
            None => Err(anyhow!("Reference price is missing")),
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn convert(&self, amount: f64) -> f64 {
        amount * self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_from_reference_price() {
        let rate = ConversionRate::from_reference_price(Some(1.25)).unwrap();
        assert_eq!(rate.value(), 0.8);
        assert_eq!(rate.convert(100.0), 80.0);
    }

    #[test]
    fn test_rate_rejects_unusable_reference_price() {
        assert!(ConversionRate::from_reference_price(None).is_err());
        assert!(ConversionRate::from_reference_price(Some(0.0)).is_err());
        assert!(ConversionRate::from_reference_price(Some(-2.0)).is_err());
        assert!(ConversionRate::from_reference_price(Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_rate_must_be_positive() {
        assert!(ConversionRate::new(0.0).is_err());
        assert!(ConversionRate::new(f64::INFINITY).is_err());
        assert_eq!(ConversionRate::new(1.0).unwrap().convert(42.0), 42.0);
    }
}
