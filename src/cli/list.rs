use anyhow::Result;

use super::ui;
use crate::core::{PollingController, Reported, Symbol};

const COINS_PER_ROW: usize = 5;

/// Lays out symbols in fixed-width columns, `per_row` to a line.
pub fn render_symbol_grid(symbols: &[Symbol], per_row: usize) -> String {
    let per_row = per_row.max(1);
    symbols
        .chunks(per_row)
        .map(|chunk| {
            chunk
                .iter()
                .map(|s| format!("{:<15}", s.to_string()))
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prints every symbol the exchange knows. Failures are already reported
/// through the controller's sink.
pub async fn run(controller: &PollingController) -> Result<()> {
    let pb = ui::new_spinner("Loading available coins...");
    let result = controller.list_all_symbols().await;
    pb.finish_and_clear();

    let symbols = result.map_err(Reported)?;
    println!(
        "{}",
        ui::style_text(
            "Available Coins (Alphabetically Sorted):",
            ui::StyleType::Title
        )
    );
    println!("{}", render_symbol_grid(&symbols, COINS_PER_ROW));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_symbol_grid() {
        let symbols: Vec<Symbol> = ["A", "B", "C", "D", "E", "F", "G"]
            .iter()
            .map(|base| Symbol::new(base, "USDT"))
            .collect();

        let grid = render_symbol_grid(&symbols, 5);
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "A/USDT         B/USDT         C/USDT         D/USDT         E/USDT"
        );
        assert_eq!(lines[1], "F/USDT         G/USDT");
    }

    #[test]
    fn test_render_empty_grid() {
        assert_eq!(render_symbol_grid(&[], 5), "");
    }
}
