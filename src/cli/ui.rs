use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Heading,
    Good,
    Bad,
    Warning,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).green().bold().underlined(),
        StyleType::Heading => style(text).bold(),
        StyleType::Good => style(text).green().bold(),
        StyleType::Bad => style(text).red().bold(),
        StyleType::Warning => style(text).yellow(),
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

/// Right-aligned bold cell in the given colour.
pub fn figure_cell(text: String, color: Color) -> Cell {
    Cell::new(text)
        .fg(color)
        .add_attribute(Attribute::Bold)
        .set_alignment(CellAlignment::Right)
}

/// Green for non-negative amounts, red otherwise.
pub fn signed_cell(value: f64, text: String) -> Cell {
    let color = if value >= 0.0 {
        Color::Green
    } else {
        Color::Red
    };
    figure_cell(text, color)
}

pub fn rate_cell(text: String) -> Cell {
    Cell::new(text)
        .fg(Color::Red)
        .set_alignment(CellAlignment::Right)
}

/// Creates a cell for "N/A" values.
pub fn na_cell() -> Cell {
    Cell::new("N/A")
        .fg(Color::DarkGrey)
        .set_alignment(CellAlignment::Right)
}

/// Spinner shown while the first price quote is in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Horizontal bar scaled against `max`, at most `width` cells wide.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if !(value.is_finite() && max.is_finite()) || max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let cells = ((value / max) * width as f64).round() as usize;
    "█".repeat(cells.clamp(1, width))
}
