//! Core polling engine abstractions

pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod market;
pub mod metrics;
pub mod session;
pub mod snapshot;
pub mod symbol;

// Re-export main types for cleaner imports
pub use currency::{ConversionRate, CurrencyRateProvider};
pub use error::{Reported, SessionError, ValidationError};
pub use market::{MarketDataSource, TickerSnapshot};
pub use metrics::{DerivedMetrics, Recommendation, Trend};
pub use session::{PollingController, SessionSettings, SessionState};
pub use snapshot::{Severity, Snapshot, SnapshotSink, StatusMessage, SymbolRow, UnavailableReason};
pub use symbol::Symbol;
