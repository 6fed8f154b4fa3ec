//! Currency conversion against a single-base rate table

use super::rates::RateTable;

fn usable_rate(table: &RateTable, code: &str) -> Option<f64> {
    table
        .get(code)
        .copied()
        .filter(|rate| rate.is_finite() && *rate > 0.0)
}

/// Converts `amount` of `from` into `to` using rates quoted against `base`.
///
/// Cross rates pivot through the base currency. A missing or unusable rate on
/// either side yields `0.0` instead of an error so partially loaded tables
/// still render.
pub fn convert(amount: f64, from: &str, to: &str, base: &str, table: &RateTable) -> f64 {
    if from == to {
        return amount;
    }

    if from == base {
        return usable_rate(table, to).map_or(0.0, |to_rate| amount * to_rate);
    }

    if to == base {
        return usable_rate(table, from).map_or(0.0, |from_rate| amount / from_rate);
    }

    match (usable_rate(table, from), usable_rate(table, to)) {
        (Some(from_rate), Some(to_rate)) => (amount / from_rate) * to_rate,
        _ => 0.0,
    }
}

/// Reverse of a base quote: how many base units one unit of the currency buys.
pub fn inverse_rate(rate: f64) -> f64 {
    if rate.is_finite() && rate > 0.0 {
        1.0 / rate
    } else {
        0.0
    }
}

/// Formats a converted amount for an amount field.
pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

/// Formats a quoted rate for the rate list.
pub fn format_rate(value: f64) -> String {
    format!("{value:.4}")
}

/// Parses amount text, accepting either `.` or `,` as the decimal separator.
/// Anything unparseable reads as zero.
pub fn parse_amount(text: &str) -> f64 {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Whether `text` is acceptable as typed amount input: ASCII digits with at
/// most one decimal separator. The empty string is accepted.
pub fn is_valid_amount_input(text: &str) -> bool {
    let mut separators = 0;
    for c in text.chars() {
        match c {
            '0'..='9' => {}
            '.' | ',' => {
                separators += 1;
                if separators > 1 {
                    return false;
                }
            }
            _ => return false,
        }
    }
    true
}
