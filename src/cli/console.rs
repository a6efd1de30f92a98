//! Interactive prompt driving the session control surface.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::{list, ui};
use crate::core::PollingController;

const HELP: &str = "Commands:
  start <coins> <seconds>  track comma-separated coins, e.g. start LTC,BTC,SOL 5
  stop                     stop tracking
  list                     list all available coins
  status                   show whether a session is running
  help                     show this help
  exit                     stop tracking and quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start { coins: String, interval: String },
    Stop,
    List,
    Status,
    Help,
    Exit,
}

/// Parses one prompt line. The last word of `start` is the interval, the
/// rest are coins, so `start LTC, BTC 5` works. A missing interval is left
/// empty for the controller to reject.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    let command = match verb.to_lowercase().as_str() {
        "start" => {
            let (coins, interval) = rest
                .rsplit_once(char::is_whitespace)
                .map_or((rest, ""), |(coins, interval)| (coins.trim(), interval));
            ConsoleCommand::Start {
                coins: coins.to_string(),
                interval: interval.to_string(),
            }
        }
        "stop" => ConsoleCommand::Stop,
        "list" => ConsoleCommand::List,
        "status" => ConsoleCommand::Status,
        "help" | "?" => ConsoleCommand::Help,
        "exit" | "quit" => ConsoleCommand::Exit,
        other => return Err(format!("Unknown command '{other}'. Type 'help' for commands.")),
    };
    Ok(Some(command))
}

pub fn status_line(controller: &PollingController) -> String {
    let settings = controller.settings();
    format!(
        "Session is {} (prices in {}, coins quoted in {})",
        controller.state(),
        settings.display_currency,
        settings.quote_asset
    )
}

pub async fn run(mut controller: PollingController) -> Result<()> {
    println!(
        "{}",
        ui::style_text("Welcome to the Crypto Market Tracker!", ui::StyleType::Title)
    );
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read from stdin")?
    {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{}", ui::style_text(&message, ui::StyleType::Error));
                continue;
            }
        };
        debug!(?command, "Console command");

        match command {
            // Validation and conflicts are reported through the sink.
            ConsoleCommand::Start { coins, interval } => {
                let _ = controller.start(&coins, &interval);
            }
            // A fatal error that ended the session was already reported.
            ConsoleCommand::Stop => {
                controller.stop().await;
            }
            ConsoleCommand::List => {
                let _ = list::run(&controller).await;
            }
            ConsoleCommand::Status => println!("{}", status_line(&controller)),
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Exit => break,
        }
    }

    controller.exit().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        CurrencyRateProvider, MarketDataSource, SessionSettings, Snapshot, SnapshotSink,
        StatusMessage, Symbol, TickerSnapshot,
    };
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Offline;

    #[async_trait]
    impl MarketDataSource for Offline {
        async fn fetch_ticker(&self, _symbol: &Symbol) -> anyhow::Result<TickerSnapshot> {
            Err(anyhow!("offline"))
        }

        async fn list_symbols(&self) -> anyhow::Result<Vec<Symbol>> {
            Err(anyhow!("offline"))
        }
    }

    #[async_trait]
    impl CurrencyRateProvider for Offline {
        async fn get_rate(&self, _from: &str, _to: &str) -> anyhow::Result<f64> {
            Err(anyhow!("offline"))
        }
    }

    impl SnapshotSink for Offline {
        fn publish(&self, _snapshot: Snapshot) {}
        fn report(&self, _message: StatusMessage) {}
    }

    #[test]
    fn test_status_line_shows_state_and_currencies() {
        let controller = PollingController::new(
            Arc::new(Offline),
            Arc::new(Offline),
            Arc::new(Offline),
            SessionSettings {
                quote_asset: "USDT".to_string(),
                display_currency: "EUR".to_string(),
            },
        );
        assert_eq!(
            status_line(&controller),
            "Session is idle (prices in EUR, coins quoted in USDT)"
        );
    }

    #[test]
    fn test_parse_start_command() {
        assert_eq!(
            parse_command("start LTC,BTC,SOL 5"),
            Ok(Some(ConsoleCommand::Start {
                coins: "LTC,BTC,SOL".to_string(),
                interval: "5".to_string(),
            }))
        );
        assert_eq!(
            parse_command("  START ltc, btc   10 "),
            Ok(Some(ConsoleCommand::Start {
                coins: "ltc, btc".to_string(),
                interval: "10".to_string(),
            }))
        );
    }

    #[test]
    fn test_parse_start_without_interval() {
        assert_eq!(
            parse_command("start BTC"),
            Ok(Some(ConsoleCommand::Start {
                coins: "BTC".to_string(),
                interval: String::new(),
            }))
        );
        assert_eq!(
            parse_command("start"),
            Ok(Some(ConsoleCommand::Start {
                coins: String::new(),
                interval: String::new(),
            }))
        );
    }

    #[test]
    fn test_parse_other_commands() {
        assert_eq!(parse_command("stop"), Ok(Some(ConsoleCommand::Stop)));
        assert_eq!(parse_command("List"), Ok(Some(ConsoleCommand::List)));
        assert_eq!(parse_command("status"), Ok(Some(ConsoleCommand::Status)));
        assert_eq!(parse_command("?"), Ok(Some(ConsoleCommand::Help)));
        assert_eq!(parse_command("quit"), Ok(Some(ConsoleCommand::Exit)));
        assert_eq!(parse_command("   "), Ok(None));
        assert!(parse_command("buy BTC").is_err());
    }
}
