use super::ui;
use crate::core::Session;
use crate::core::conversion::format_rate;
use crate::core::ratelist::{RateRow, rate_list};
use anyhow::Result;
use comfy_table::{Cell, Table};

pub fn run(session: &Session, search: Option<&str>) -> Result<()> {
    let rates = session.rates();
    println!("{}", ui::rates_status_line(rates));

    let view = rates.view();
    if view.table.is_empty() {
        return Ok(());
    }

    let rows = rate_list(view, session.preferences().favorites(), search);
    println!(
        "\n{} {}",
        ui::style_text("Base currency:", ui::StyleType::Label),
        ui::style_text(view.base, ui::StyleType::Value)
    );

    if rows.is_empty() {
        println!("No currencies match the search.");
        return Ok(());
    }

    let favorites: Vec<&RateRow> = rows.iter().filter(|r| r.is_favorite).collect();
    if favorites.is_empty() {
        println!(
            "{}",
            ui::style_text(
                "No favorite currencies yet. Use `fxconv favorite <CODE>` to add one.",
                ui::StyleType::Subtle
            )
        );
    } else {
        println!(
            "\n{}",
            ui::style_text("Favorite currencies", ui::StyleType::Favorite)
        );
        println!("{}", rates_table(&favorites, view.base));
    }

    let others: Vec<&RateRow> = rows.iter().filter(|r| !r.is_favorite).collect();
    if !others.is_empty() {
        println!(
            "\n{}",
            ui::style_text("All currencies", ui::StyleType::Title)
        );
        println!("{}", rates_table(&others, view.base));
    }

    Ok(())
}

fn rates_table(rows: &[&RateRow], base: &str) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Currency"),
        ui::header_cell(&format!("1 {base} =")),
        ui::header_cell(&format!("= 1 unit in {base}")),
    ]);

    for row in rows {
        table.add_row(vec![
            ui::favorite_cell(row.is_favorite),
            Cell::new(&row.code),
            ui::number_cell(row.rate, format_rate),
            ui::number_cell(row.inverse, format_rate),
        ]);
    }
    table
}
