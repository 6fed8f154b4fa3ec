//! Two linked amount fields kept consistent through the conversion engine.
//!
//! One side is authoritative (the side the user last typed into) and the other
//! is always derived from it. Every transition ends with a recomputation that
//! only ever writes the derived side, so a recomputation can never feed back
//! into another one.

use super::conversion::{convert, format_amount, is_valid_amount_input, parse_amount};
use super::rates::RateView;
use tracing::debug;

const DEFAULT_TO_CURRENCY: &str = "EUR";
const DEFAULT_FROM_AMOUNT: &str = "1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    From,
    To,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPair {
    pub from_currency: String,
    pub to_currency: String,
    pub from_amount: String,
    pub to_amount: String,
    pub last_edited: Side,
}

/// Current rate in both directions for the selected pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub forward: f64,
    pub reverse: f64,
}

#[derive(Debug, Clone)]
pub struct SyncController {
    pair: ConversionPair,
}

impl SyncController {
    /// Starts converting from `from_currency` into the default target.
    pub fn new(from_currency: &str) -> Self {
        Self::with_pair(ConversionPair {
            from_currency: from_currency.to_string(),
            to_currency: DEFAULT_TO_CURRENCY.to_string(),
            from_amount: DEFAULT_FROM_AMOUNT.to_string(),
            to_amount: String::new(),
            last_edited: Side::From,
        })
    }

    pub fn with_pair(pair: ConversionPair) -> Self {
        Self { pair }
    }

    pub fn pair(&self) -> &ConversionPair {
        &self.pair
    }

    /// User typed into the "from" field. Rejected input leaves everything as it
    /// was and returns `false`.
    pub fn edit_from(&mut self, text: &str, rates: RateView<'_>) -> bool {
        if !is_valid_amount_input(text) {
            debug!(text, "Rejected from amount input");
            return false;
        }
        self.pair.from_amount = text.to_string();
        self.pair.last_edited = Side::From;
        self.recompute(rates);
        true
    }

    /// User typed into the "to" field. Flips authority to the "to" side.
    pub fn edit_to(&mut self, text: &str, rates: RateView<'_>) -> bool {
        if !is_valid_amount_input(text) {
            debug!(text, "Rejected to amount input");
            return false;
        }
        self.pair.to_amount = text.to_string();
        self.pair.last_edited = Side::To;
        self.recompute(rates);
        true
    }

    pub fn select_from(&mut self, code: &str, rates: RateView<'_>) {
        self.pair.from_currency = code.to_string();
        self.recompute(rates);
    }

    pub fn select_to(&mut self, code: &str, rates: RateView<'_>) {
        self.pair.to_currency = code.to_string();
        self.recompute(rates);
    }

    /// Exchanges the two currencies. The "from" amount is kept and the "to"
    /// side is recomputed under the swapped codes.
    pub fn swap(&mut self, rates: RateView<'_>) {
        std::mem::swap(&mut self.pair.from_currency, &mut self.pair.to_currency);
        self.pair.last_edited = Side::From;
        self.recompute(rates);
    }

    /// Rate data changed (new table or base). Reassigns the target currency if
    /// it is no longer available, then recomputes.
    pub fn sync_available(&mut self, rates: RateView<'_>) {
        let target_missing = !rates.table.contains_key(&self.pair.to_currency);
        if target_missing {
            if let Some(first) = rates.codes().next() {
                debug!(
                    previous = %self.pair.to_currency,
                    next = first,
                    "Target currency unavailable, reassigning"
                );
                self.pair.to_currency = first.to_string();
            }
        }
        self.recompute(rates);
    }

    /// Rewrites the derived side from the authoritative one. Never changes
    /// which side is authoritative.
    pub fn recompute(&mut self, rates: RateView<'_>) {
        if !rates.is_ready() {
            return;
        }

        let pair = &mut self.pair;
        match pair.last_edited {
            Side::From if !pair.from_amount.is_empty() => {
                let amount = parse_amount(&pair.from_amount);
                let result = convert(
                    amount,
                    &pair.from_currency,
                    &pair.to_currency,
                    rates.base,
                    rates.table,
                );
                pair.to_amount = format_amount(result);
            }
            Side::To if !pair.to_amount.is_empty() => {
                let amount = parse_amount(&pair.to_amount);
                let result = convert(
                    amount,
                    &pair.to_currency,
                    &pair.from_currency,
                    rates.base,
                    rates.table,
                );
                pair.from_amount = format_amount(result);
            }
            _ => {}
        }
    }

    pub fn quote(&self, rates: RateView<'_>) -> Quote {
        let pair = &self.pair;
        Quote {
            forward: convert(
                1.0,
                &pair.from_currency,
                &pair.to_currency,
                rates.base,
                rates.table,
            ),
            reverse: convert(
                1.0,
                &pair.to_currency,
                &pair.from_currency,
                rates.base,
                rates.table,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::{FetchStatus, RateTable};

    fn table() -> RateTable {
        RateTable::from([("EUR".to_string(), 0.9), ("JPY".to_string(), 150.0)])
    }

    fn ready(table: &RateTable) -> RateView<'_> {
        RateView {
            status: FetchStatus::Succeeded,
            base: "USD",
            table,
        }
    }

    fn pair(from: &str, to: &str, from_amount: &str) -> ConversionPair {
        ConversionPair {
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            from_amount: from_amount.to_string(),
            to_amount: String::new(),
            last_edited: Side::From,
        }
    }

    #[test]
    fn test_defaults() {
        let sync = SyncController::new("RUB");
        let pair = sync.pair();
        assert_eq!(pair.from_currency, "RUB");
        assert_eq!(pair.to_currency, "EUR");
        assert_eq!(pair.from_amount, "1");
        assert_eq!(pair.last_edited, Side::From);
    }

    #[test]
    fn test_from_base_scenario() {
        let table = table();
        let mut sync = SyncController::with_pair(pair("USD", "EUR", ""));
        assert!(sync.edit_from("10", ready(&table)));
        assert_eq!(sync.pair().to_amount, "9.00");
        assert_eq!(sync.pair().last_edited, Side::From);
    }

    #[test]
    fn test_cross_rate_scenario() {
        let table = table();
        let mut sync = SyncController::with_pair(pair("EUR", "JPY", "2"));
        sync.recompute(ready(&table));
        assert_eq!(sync.pair().to_amount, "333.33");
    }

    #[test]
    fn test_recompute_is_a_fixed_point() {
        let table = table();
        let mut sync = SyncController::with_pair(pair("EUR", "JPY", ""));
        sync.edit_from("2,5", ready(&table));
        let after_edit = sync.pair().clone();

        for _ in 0..5 {
            sync.recompute(ready(&table));
            assert_eq!(sync.pair(), &after_edit);
        }
        assert_eq!(sync.pair().from_amount, "2,5");
    }

    #[test]
    fn test_recompute_is_a_fixed_point_when_to_is_authoritative() {
        let table = table();
        let mut sync = SyncController::with_pair(pair("EUR", "JPY", "1"));
        assert!(sync.edit_to("300", ready(&table)));
        let after_edit = sync.pair().clone();
        assert_eq!(after_edit.last_edited, Side::To);
        assert_eq!(after_edit.from_amount, "1.80");

        for _ in 0..5 {
            sync.recompute(ready(&table));
            assert_eq!(sync.pair(), &after_edit);
        }
        assert_eq!(sync.pair().to_amount, "300");
    }

    #[test]
    fn test_edit_to_flips_authority() {
        let table = table();
        let mut sync = SyncController::with_pair(pair("USD", "EUR", "10"));
        sync.recompute(ready(&table));

        assert!(sync.edit_to("18", ready(&table)));
        assert_eq!(sync.pair().last_edited, Side::To);
        assert_eq!(sync.pair().to_amount, "18");
        assert_eq!(sync.pair().from_amount, "20.00");

        // Changing a currency recomputes the derived "from" side.
        sync.select_from("JPY", ready(&table));
        assert_eq!(sync.pair().last_edited, Side::To);
        assert_eq!(sync.pair().from_amount, "3000.00");
        assert_eq!(sync.pair().to_amount, "18");
    }

    #[test]
    fn test_rejected_input_leaves_state_unchanged() {
        let table = table();
        let mut sync = SyncController::with_pair(pair("USD", "EUR", "10"));
        sync.recompute(ready(&table));
        let before = sync.pair().clone();

        assert!(!sync.edit_from("1.2.3", ready(&table)));
        assert!(!sync.edit_to("abc", ready(&table)));
        assert_eq!(sync.pair(), &before);
    }

    #[test]
    fn test_no_recompute_until_rates_ready() {
        let table = table();
        let empty = RateTable::new();
        let mut sync = SyncController::with_pair(pair("USD", "EUR", ""));

        for status in [FetchStatus::Idle, FetchStatus::Loading, FetchStatus::Failed] {
            let view = RateView {
                status,
                base: "USD",
                table: &table,
            };
            assert!(sync.edit_from("10", view));
            assert_eq!(sync.pair().to_amount, "");
        }

        sync.recompute(RateView {
            status: FetchStatus::Succeeded,
            base: "USD",
            table: &empty,
        });
        assert_eq!(sync.pair().to_amount, "");

        sync.recompute(ready(&table));
        assert_eq!(sync.pair().to_amount, "9.00");
    }

    #[test]
    fn test_empty_authoritative_field_keeps_derived_value() {
        let table = table();
        let mut sync = SyncController::with_pair(pair("USD", "EUR", "10"));
        sync.recompute(ready(&table));
        sync.edit_from("", ready(&table));
        assert_eq!(sync.pair().to_amount, "9.00");
    }

    #[test]
    fn test_swap_keeps_from_amount() {
        let table = table();
        let mut sync = SyncController::with_pair(pair("USD", "EUR", "10"));
        sync.edit_to("45", ready(&table));
        assert_eq!(sync.pair().from_amount, "50.00");

        sync.swap(ready(&table));
        let pair = sync.pair();
        assert_eq!(pair.from_currency, "EUR");
        assert_eq!(pair.to_currency, "USD");
        assert_eq!(pair.last_edited, Side::From);
        assert_eq!(pair.from_amount, "50.00");
        assert_eq!(pair.to_amount, "55.56");
    }

    #[test]
    fn test_unavailable_target_is_reassigned() {
        let table = RateTable::from([("AUD".to_string(), 1.5), ("CAD".to_string(), 1.3)]);
        let mut sync = SyncController::with_pair(pair("USD", "EUR", "2"));
        sync.sync_available(ready(&table));
        assert_eq!(sync.pair().to_currency, "AUD");
        assert_eq!(sync.pair().to_amount, "3.00");

        sync.select_to("CAD", ready(&table));
        sync.sync_available(ready(&table));
        assert_eq!(sync.pair().to_currency, "CAD");
    }

    #[test]
    fn test_quote() {
        let table = table();
        let sync = SyncController::with_pair(pair("EUR", "USD", "1"));
        let quote = sync.quote(ready(&table));
        assert!((quote.forward - 1.0 / 0.9).abs() < 1e-9);
        assert!((quote.reverse - 0.9).abs() < 1e-9);
    }
}
