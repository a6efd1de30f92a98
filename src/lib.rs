pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{MarketDataSource, PollingController, Reported, SnapshotSink};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub enum AppCommand {
    /// Poll until interrupted. `None` falls back to the configured value.
    Watch {
        coins: Option<String>,
        interval: Option<u64>,
    },
    List,
    Console,
}

/// Wires the configured market data source into a controller reporting to `sink`.
pub fn build_controller(
    config: &AppConfig,
    sink: Arc<dyn SnapshotSink>,
) -> Result<PollingController> {
    let binance = config.binance();
    let source: Arc<dyn MarketDataSource> = Arc::new(providers::BinanceProvider::new(
        &binance.base_url,
        Duration::from_secs(binance.timeout_secs),
    )?);
    let rates = Arc::new(providers::ReferenceRateProvider::new(Arc::clone(&source)));

    Ok(PollingController::new(
        source,
        rates,
        sink,
        config.session_settings(),
    ))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");

    let clear_screen = matches!(command, AppCommand::Watch { .. });
    let sink = Arc::new(cli::terminal::TerminalSink::new(clear_screen));
    run_with_sink(command, &config, sink).await
}

/// Runs `command` with every snapshot and status message going to `sink`.
pub async fn run_with_sink(
    command: AppCommand,
    config: &AppConfig,
    sink: Arc<dyn SnapshotSink>,
) -> Result<()> {
    let controller = build_controller(config, sink)?;

    match command {
        AppCommand::Watch { coins, interval } => {
            let coins = coins.unwrap_or_else(|| config.coins.join(","));
            let interval = interval.unwrap_or(config.interval_secs).to_string();
            cli::watch::run(controller, &coins, &interval).await
        }
        AppCommand::List => {
            let result = cli::list::run(&controller).await;
            controller.exit().await;
            result
        }
        AppCommand::Console => cli::console::run(controller).await,
    }
}

/// The text to show for a failed command, or `None` when the sink already
/// showed it.
pub fn failure_message(e: &anyhow::Error) -> Option<String> {
    if e.is::<Reported>() {
        None
    } else {
        Some(format!("{e:#}"))
    }
}
