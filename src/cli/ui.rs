use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::core::{Recommendation, Trend};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<f64>` into a right-aligned `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell(value: Option<f64>) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format!("{v:.2}")).set_alignment(CellAlignment::Right),
    )
}

fn trend_color(trend: Trend) -> Color {
    match trend {
        Trend::Rising => Color::Green,
        Trend::Falling => Color::Red,
        Trend::Stable => Color::Yellow,
    }
}

/// Creates a percentage cell colored by the row's trend.
pub fn change_cell(change: Option<f64>, trend: Trend) -> Cell {
    match change {
        Some(change) => Cell::new(format!("{change:.2}"))
            .fg(trend_color(trend))
            .set_alignment(CellAlignment::Right),
        None => format_optional_cell(None),
    }
}

pub fn trend_cell(trend: Trend) -> Cell {
    Cell::new(trend.to_string()).fg(trend_color(trend))
}

pub fn recommendation_cell(recommendation: Recommendation) -> Cell {
    let color = match recommendation {
        Recommendation::Buy => Color::Green,
        Recommendation::Sell => Color::Red,
        Recommendation::Hold => Color::Yellow,
    };
    Cell::new(recommendation.to_string())
        .fg(color)
        .add_attribute(Attribute::Bold)
}

/// Creates a cell for rows without data, with error-specific styling.
pub fn unavailable_cell(text: &str) -> Cell {
    Cell::new(text).fg(Color::Red)
}

/// Creates a spinner for requests with no known length.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
