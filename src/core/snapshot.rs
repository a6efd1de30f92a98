//! Per-cycle output of a polling session and the sink that receives it.

use chrono::{DateTime, Utc};
use std::fmt::Display;

use super::metrics::DerivedMetrics;
use super::symbol::Symbol;

/// Why a symbol has no metrics in a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The ticker could not be fetched.
    Ticker,
    /// The ticker was fetched but carried no last price.
    Price,
}

impl Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::Ticker => write!(f, "Ticker data not available."),
            UnavailableReason::Price => write!(f, "Price data not available."),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolRow {
    Metrics {
        symbol: Symbol,
        metrics: DerivedMetrics,
    },
    Unavailable {
        symbol: Symbol,
        reason: UnavailableReason,
    },
}

impl SymbolRow {
    pub fn symbol(&self) -> &Symbol {
        match self {
            SymbolRow::Metrics { symbol, .. } | SymbolRow::Unavailable { symbol, .. } => symbol,
        }
    }

    pub fn metrics(&self) -> Option<&DerivedMetrics> {
        match self {
            SymbolRow::Metrics { metrics, .. } => Some(metrics),
            SymbolRow::Unavailable { .. } => None,
        }
    }
}

/// All rows of one poll cycle, in the order the symbols were entered.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub cycle: u64,
    pub taken_at: DateTime<Utc>,
    pub currency: String,
    pub rows: Vec<SymbolRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub severity: Severity,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        StatusMessage {
            severity: Severity::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        StatusMessage {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}

/// Receives what a polling session produces. Implemented by the presentation layer.
pub trait SnapshotSink: Send + Sync {
    fn publish(&self, snapshot: Snapshot);

    fn report(&self, message: StatusMessage);
}
