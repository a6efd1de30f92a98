//! The polling controller: session lifecycle and the fixed-interval fetch loop.
//!
//! One background task polls at a time. The control path talks to it only
//! through a stop signal and observes it through [`SessionState`]; results go
//! straight from the task to the [`SnapshotSink`].

use chrono::Utc;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use super::currency::{ConversionRate, CurrencyRateProvider};
use super::error::{SessionError, parse_interval};
use super::market::MarketDataSource;
use super::metrics::DerivedMetrics;
use super::snapshot::{Snapshot, SnapshotSink, StatusMessage, SymbolRow, UnavailableReason};
use super::symbol::{Symbol, parse_symbol_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Validating,
    Running,
    Stopping,
}

impl Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SessionState::Idle => "idle",
                SessionState::Validating => "validating",
                SessionState::Running => "running",
                SessionState::Stopping => "stopping",
            }
        )
    }
}

/// Currencies a controller works in, fixed for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Quote asset appended to every entered coin (`USDT`).
    pub quote_asset: String,
    /// Currency the metrics are shown in (`EUR`).
    pub display_currency: String,
}

/// Validated parameters of one polling session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingSession {
    pub symbols: Vec<Symbol>,
    pub interval: Duration,
    pub quote_asset: String,
    pub display_currency: String,
}

impl PollingSession {
    pub fn parse(
        coins: &str,
        interval: &str,
        settings: &SessionSettings,
    ) -> Result<Self, SessionError> {
        let symbols = parse_symbol_list(coins, &settings.quote_asset)?;
        let interval_secs = parse_interval(interval)?;
        Ok(PollingSession {
            symbols,
            interval: Duration::from_secs(interval_secs),
            quote_asset: settings.quote_asset.clone(),
            display_currency: settings.display_currency.clone(),
        })
    }
}

struct Worker {
    /// Yields the fatal error that ended the session, if any.
    handle: JoinHandle<Option<SessionError>>,
    stop: watch::Sender<bool>,
}

pub struct PollingController {
    source: Arc<dyn MarketDataSource>,
    rates: Arc<dyn CurrencyRateProvider>,
    sink: Arc<dyn SnapshotSink>,
    settings: SessionSettings,
    state: Arc<watch::Sender<SessionState>>,
    worker: Option<Worker>,
}

impl PollingController {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        rates: Arc<dyn CurrencyRateProvider>,
        sink: Arc<dyn SnapshotSink>,
        settings: SessionSettings,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        PollingController {
            source,
            rates,
            sink,
            settings,
            state: Arc::new(state),
            worker: None,
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Follows state changes, including the worker returning to `Idle` on its own.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Validates the request and launches the polling task.
    ///
    /// Must be called from within a Tokio runtime. Returns once the task is
    /// spawned; a conversion rate failure is reported to the sink by the task
    /// itself, which then returns the controller to `Idle`.
    pub fn start(&mut self, coins: &str, interval: &str) -> Result<(), SessionError> {
        if self.state() != SessionState::Idle {
            return Err(self.fail(SessionError::AlreadyRunning));
        }
        // A worker that ended on its own has already left `Running`.
        self.worker = None;

        self.state.send_replace(SessionState::Validating);
        let session = match PollingSession::parse(coins, interval, &self.settings) {
            Ok(session) => session,
            Err(e) => {
                self.state.send_replace(SessionState::Idle);
                return Err(self.fail(e));
            }
        };

        let symbols: Vec<String> = session.symbols.iter().map(|s| s.to_string()).collect();
        info!(
            symbols = ?symbols,
            interval_secs = session.interval.as_secs(),
            currency = %session.display_currency,
            "Starting polling session"
        );
        self.sink.report(StatusMessage::info(format!(
            "Tracking {} every {}s in {}",
            symbols.join(", "),
            session.interval.as_secs(),
            session.display_currency
        )));

        let (stop, stop_rx) = watch::channel(false);
        self.state.send_replace(SessionState::Running);
        let handle = tokio::spawn(run_session(
            session,
            Arc::clone(&self.source),
            Arc::clone(&self.rates),
            Arc::clone(&self.sink),
            stop_rx,
            Arc::clone(&self.state),
        ));
        self.worker = Some(Worker { handle, stop });
        Ok(())
    }

    /// Asks the polling task to stop and waits for it to finish.
    ///
    /// A cycle already in progress completes and publishes its snapshot; a
    /// pending interval wait is cut short. Does nothing when no session exists.
    ///
    /// Returns the fatal error that ended the session on its own. The sink
    /// has already been told about it.
    pub async fn stop(&mut self) -> Option<SessionError> {
        let Some(worker) = self.worker.take() else {
            return None;
        };

        if self.state() == SessionState::Running {
            self.state.send_replace(SessionState::Stopping);
        }
        // The receiver is gone if the task already finished.
        let _ = worker.stop.send(true);

        let outcome = match worker.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Polling task ended abnormally");
                None
            }
        };
        self.state.send_replace(SessionState::Idle);
        outcome
    }

    /// Lists every symbol the market data source knows, independent of any session.
    pub async fn list_all_symbols(&self) -> Result<Vec<Symbol>, SessionError> {
        match self.source.list_symbols().await {
            Ok(mut symbols) => {
                symbols.sort();
                symbols.dedup();
                debug!(count = symbols.len(), "Loaded available symbols");
                Ok(symbols)
            }
            Err(e) => Err(self.fail(SessionError::SymbolListing(e.to_string()))),
        }
    }

    /// Stops any running session and releases the controller.
    pub async fn exit(mut self) -> Option<SessionError> {
        let outcome = self.stop().await;
        info!("Polling controller shut down");
        outcome
    }

    fn fail(&self, e: SessionError) -> SessionError {
        warn!(error = %e, "Session request failed");
        self.sink.report(StatusMessage::error(e.to_string()));
        e
    }
}

async fn acquire_rate(
    rates: &dyn CurrencyRateProvider,
    session: &PollingSession,
) -> Result<ConversionRate, SessionError> {
    rates
        .get_rate(&session.quote_asset, &session.display_currency)
        .await
        .and_then(ConversionRate::new)
        .map_err(|e| SessionError::RateUnavailable {
            from: session.quote_asset.clone(),
            to: session.display_currency.clone(),
            reason: e.to_string(),
        })
}

async fn run_session(
    session: PollingSession,
    source: Arc<dyn MarketDataSource>,
    rates: Arc<dyn CurrencyRateProvider>,
    sink: Arc<dyn SnapshotSink>,
    mut stop: watch::Receiver<bool>,
    state: Arc<watch::Sender<SessionState>>,
) -> Option<SessionError> {
    let rate = match acquire_rate(rates.as_ref(), &session).await {
        Ok(rate) => rate,
        Err(e) => {
            error!(error = %e, "Cannot poll without a conversion rate");
            sink.report(StatusMessage::error(e.to_string()));
            state.send_replace(SessionState::Idle);
            return Some(e);
        }
    };
    debug!(rate = rate.value(), "Acquired conversion rate");

    let mut cycle = 0u64;
    loop {
        if *stop.borrow() {
            break;
        }

        cycle += 1;
        let snapshot = poll_cycle(
            source.as_ref(),
            &session.symbols,
            rate,
            &session.display_currency,
            cycle,
        )
        .await;
        sink.publish(snapshot);

        tokio::select! {
            _ = tokio::time::sleep(session.interval) => {}
            changed = stop.changed() => {
                // The controller is gone; nobody can stop us later.
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    info!(cycles = cycle, "Polling session stopped");
    sink.report(StatusMessage::info("Polling stopped."));
    state.send_replace(SessionState::Idle);
    None
}

/// Fetches every symbol once, in order, and assembles the cycle's snapshot.
///
/// A symbol whose ticker cannot be fetched gets an unavailable row; the
/// remaining symbols are still polled.
#[instrument(name = "PollCycle", skip_all, fields(cycle = cycle))]
pub async fn poll_cycle(
    source: &dyn MarketDataSource,
    symbols: &[Symbol],
    rate: ConversionRate,
    currency: &str,
    cycle: u64,
) -> Snapshot {
    let mut rows = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        let row = match source.fetch_ticker(symbol).await {
            Ok(ticker) => match DerivedMetrics::compute(&ticker, rate) {
                Some(metrics) => SymbolRow::Metrics {
                    symbol: symbol.clone(),
                    metrics,
                },
                None => {
                    debug!(symbol = %symbol, "Ticker has no last price");
                    SymbolRow::Unavailable {
                        symbol: symbol.clone(),
                        reason: UnavailableReason::Price,
                    }
                }
            },
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Error fetching ticker data");
                SymbolRow::Unavailable {
                    symbol: symbol.clone(),
                    reason: UnavailableReason::Ticker,
                }
            }
        };
        rows.push(row);
    }

    Snapshot {
        cycle,
        taken_at: Utc::now(),
        currency: currency.to_string(),
        rows,
    }
}
