use super::ui;
use crate::core::conversion::{format_amount, is_valid_amount_input};
use crate::core::rates::RateView;
use crate::core::{Session, Side, SyncController};
use anyhow::{Result, bail};
use comfy_table::{Cell, CellAlignment};

#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    pub amount: String,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Treat `amount` as the target side and derive the source amount.
    pub reverse: bool,
    pub swap: bool,
}

/// Replays the command line as a sequence of edits on a fresh pair.
pub fn build_pair(base: &str, args: &ConvertArgs, rates: RateView<'_>) -> Result<SyncController> {
    if !is_valid_amount_input(&args.amount) {
        bail!(
            "Invalid amount: {} (use digits with at most one '.' or ',')",
            args.amount
        );
    }

    let mut sync = SyncController::new(base);
    sync.sync_available(rates);
    if let Some(from) = &args.from {
        sync.select_from(from, rates);
    }
    if let Some(to) = &args.to {
        sync.select_to(to, rates);
    }

    if args.reverse {
        sync.edit_to(&args.amount, rates);
    } else {
        sync.edit_from(&args.amount, rates);
    }

    if args.swap {
        sync.swap(rates);
    }
    Ok(sync)
}

pub fn run(session: &Session, args: &ConvertArgs) -> Result<()> {
    let rates = session.rates();
    let view = rates.view();
    if !view.is_ready() {
        println!("{}", ui::rates_status_line(rates));
        bail!("Exchange rates are not available");
    }

    let sync = build_pair(session.preferences().base_currency(), args, view)?;
    let pair = sync.pair();

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Amount"),
        ui::header_cell("Currency"),
    ]);
    for (label, amount, code, side) in [
        ("From", &pair.from_amount, &pair.from_currency, Side::From),
        ("To", &pair.to_amount, &pair.to_currency, Side::To),
    ] {
        let mut amount_cell = Cell::new(amount).set_alignment(CellAlignment::Right);
        if side == pair.last_edited {
            amount_cell = amount_cell.add_attribute(comfy_table::Attribute::Bold);
        }
        table.add_row(vec![Cell::new(label), amount_cell, Cell::new(code)]);
    }
    println!("{table}");

    let quote = sync.quote(view);
    println!(
        "{} 1 {} = {} {}",
        ui::style_text("Current rate:", ui::StyleType::Label),
        pair.from_currency,
        format_amount(quote.forward),
        pair.to_currency
    );
    println!(
        "{} 1 {} = {} {}",
        ui::style_text("Reverse rate:", ui::StyleType::Label),
        pair.to_currency,
        format_amount(quote.reverse),
        pair.from_currency
    );
    println!("{}", ui::rates_status_line(rates));
    Ok(())
}
