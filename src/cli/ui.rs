use crate::core::rates::{FetchStatus, RateStore};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Value,
    Favorite,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Value => style(text).green().bold(),
        StyleType::Favorite => style(text).yellow().bold(),
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

/// Right aligned numeric cell; zero rates are shown as "N/A".
pub fn number_cell(value: f64, format_fn: impl Fn(f64) -> String) -> Cell {
    if value == 0.0 {
        return Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right);
    }
    Cell::new(format_fn(value)).set_alignment(CellAlignment::Right)
}

pub fn favorite_cell(is_favorite: bool) -> Cell {
    if is_favorite {
        Cell::new("★").fg(Color::Yellow)
    } else {
        Cell::new("☆").fg(Color::DarkGrey)
    }
}

/// Spinner shown while exchange rates load.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// One line describing where the displayed rates come from.
pub fn rates_status_line(rates: &RateStore) -> String {
    match (rates.status(), rates.snapshot()) {
        (FetchStatus::Succeeded, Some(snapshot)) => style_text(
            &format!(
                "Rates for {} fetched at {}",
                snapshot.base_currency,
                snapshot.fetched_at.format("%Y-%m-%d %H:%M UTC")
            ),
            StyleType::Subtle,
        ),
        (FetchStatus::Failed, _) => style_text(
            &format!(
                "Failed to load exchange rates: {}",
                rates.error().unwrap_or("unknown error")
            ),
            StyleType::Error,
        ),
        (status, _) => style_text(&format!("Exchange rates {status}"), StyleType::Subtle),
    }
}
