pub mod binance;
pub mod reference_rate;

pub use binance::BinanceProvider;
pub use reference_rate::ReferenceRateProvider;
