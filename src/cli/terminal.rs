//! Renders snapshots and status messages to the terminal.

use comfy_table::{Cell, Table};
use console::Term;
use std::sync::Mutex;

use super::ui;
use crate::core::{Severity, Snapshot, SnapshotSink, StatusMessage, SymbolRow};

pub struct TerminalSink {
    clear_screen: bool,
    /// Latest info line, shown again above each redrawn table.
    status: Mutex<Option<String>>,
}

impl TerminalSink {
    /// With `clear_screen`, every snapshot replaces the previous one.
    pub fn new(clear_screen: bool) -> Self {
        TerminalSink {
            clear_screen,
            status: Mutex::new(None),
        }
    }

    /// What one published snapshot looks like on screen.
    pub fn frame(&self, snapshot: &Snapshot) -> String {
        let table = render_snapshot(snapshot);
        if !self.clear_screen {
            return table;
        }
        match self.status.lock().ok().and_then(|status| status.clone()) {
            Some(line) => format!("{line}\n{table}"),
            None => table,
        }
    }
}

impl SnapshotSink for TerminalSink {
    fn publish(&self, snapshot: Snapshot) {
        let term = Term::stdout();
        if self.clear_screen {
            let _ = term.clear_screen();
        }
        if let Err(e) = term.write_line(&self.frame(&snapshot)) {
            tracing::error!(error = %e, "Failed to write snapshot");
        }
    }

    fn report(&self, message: StatusMessage) {
        let line = render_message(&message);
        if message.severity == Severity::Info {
            if let Ok(mut status) = self.status.lock() {
                *status = Some(line.clone());
            }
        }
        if let Err(e) = Term::stdout().write_line(&line) {
            tracing::error!(error = %e, "Failed to write status message");
        }
    }
}

pub fn render_message(message: &StatusMessage) -> String {
    match message.severity {
        Severity::Error => ui::style_text(&format!("Error: {}", message.text), ui::StyleType::Error),
        Severity::Info => ui::style_text(&message.text, ui::StyleType::Subtle),
    }
}

pub fn snapshot_table(snapshot: &Snapshot) -> Table {
    let currency = &snapshot.currency;
    let mut table = ui::new_styled_table();

    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell(&format!("Price ({currency})")),
        ui::header_cell(&format!("High ({currency})")),
        ui::header_cell(&format!("Low ({currency})")),
        ui::header_cell("Volatility (%)"),
        ui::header_cell("Change (%)"),
        ui::header_cell("Trend"),
        ui::header_cell("Recommendation"),
    ]);

    for row in &snapshot.rows {
        match row {
            SymbolRow::Metrics { symbol, metrics } => {
                table.add_row(vec![
                    Cell::new(symbol.to_string()),
                    ui::format_optional_cell(Some(metrics.price)),
                    ui::format_optional_cell(metrics.high),
                    ui::format_optional_cell(metrics.low),
                    ui::format_optional_cell(metrics.volatility),
                    ui::change_cell(metrics.percent_change, metrics.trend),
                    ui::trend_cell(metrics.trend),
                    ui::recommendation_cell(metrics.recommendation),
                ]);
            }
            SymbolRow::Unavailable { symbol, reason } => {
                table.add_row(vec![
                    Cell::new(symbol.to_string()),
                    ui::unavailable_cell(&reason.to_string()),
                ]);
            }
        }
    }

    table
}

pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let title = format!(
        "Current Market Data (update {}, {})",
        snapshot.cycle,
        snapshot.taken_at.format("%H:%M:%S UTC")
    );
    format!(
        "{}\n{}",
        ui::style_text(&title, ui::StyleType::Title),
        snapshot_table(snapshot)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConversionRate, DerivedMetrics, Symbol, TickerSnapshot, UnavailableReason};
    use chrono::{TimeZone, Utc};

    fn snapshot() -> Snapshot {
        let ticker = TickerSnapshot {
            high: Some(110.0),
            low: Some(100.0),
            open: None,
            last: Some(105.0),
            average: Some(120.0),
        };
        let metrics = DerivedMetrics::compute(&ticker, ConversionRate::new(1.0).unwrap()).unwrap();
        Snapshot {
            cycle: 3,
            taken_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 5).unwrap(),
            currency: "EUR".to_string(),
            rows: vec![
                SymbolRow::Metrics {
                    symbol: Symbol::new("BTC", "USDT"),
                    metrics,
                },
                SymbolRow::Unavailable {
                    symbol: Symbol::new("NOPE", "USDT"),
                    reason: UnavailableReason::Ticker,
                },
            ],
        }
    }

    #[test]
    fn test_render_snapshot() {
        let output = render_snapshot(&snapshot());

        assert!(output.contains("Current Market Data (update 3, 12:30:05 UTC)"));
        assert!(output.contains("Price (EUR)"));
        assert!(output.contains("BTC/USDT"));
        assert!(output.contains("105.00"));
        assert!(output.contains("10.00"));
        // No open price, so change is undefined and the trend falls back.
        assert!(output.contains("N/A"));
        assert!(output.contains("Stable"));
        assert!(output.contains("Buy"));
        assert!(output.contains("NOPE/USDT"));
        assert!(output.contains("Ticker data not available."));
    }

    #[test]
    fn test_cleared_frame_keeps_status_line() {
        let sink = TerminalSink::new(true);
        assert!(!sink.frame(&snapshot()).contains("Tracking"));

        sink.report(StatusMessage::info("Tracking BTC/USDT every 5s in EUR"));
        sink.report(StatusMessage::error("Not a status line"));
        let frame = sink.frame(&snapshot());
        assert!(frame.contains("Tracking BTC/USDT every 5s in EUR"));
        assert!(!frame.contains("Not a status line"));
        assert!(frame.contains("Current Market Data (update 3"));

        // Without clearing, the status line is still on screen already.
        let scrolling = TerminalSink::new(false);
        scrolling.report(StatusMessage::info("Tracking BTC/USDT every 5s in EUR"));
        assert!(!scrolling.frame(&snapshot()).contains("Tracking"));
    }

    #[test]
    fn test_render_message() {
        let error = render_message(&StatusMessage::error("Failed to fetch rate"));
        assert!(error.contains("Error: Failed to fetch rate"));

        let info = render_message(&StatusMessage::info("Polling stopped."));
        assert!(info.contains("Polling stopped."));
        assert!(!info.contains("Error"));
    }
}
