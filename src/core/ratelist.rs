//! Rows of the rate list: every quoted currency against the base, favorites
//! first.

use super::conversion::inverse_rate;
use super::rates::RateView;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub struct RateRow {
    pub code: String,
    /// Units of `code` per one base unit
    pub rate: f64,
    /// Base units per one unit of `code`
    pub inverse: f64,
    pub is_favorite: bool,
}

/// Builds the rate list for `rates`, excluding the base currency itself and
/// keeping only codes containing `search` (case-insensitive).
pub fn rate_list(
    rates: RateView<'_>,
    favorites: &BTreeSet<String>,
    search: Option<&str>,
) -> Vec<RateRow> {
    let needle = search.map(str::to_lowercase).unwrap_or_default();

    let mut rows: Vec<RateRow> = rates
        .table
        .iter()
        .filter(|(code, _)| code.as_str() != rates.base)
        .filter(|(code, _)| code.to_lowercase().contains(&needle))
        .map(|(code, rate)| RateRow {
            code: code.clone(),
            rate: *rate,
            inverse: inverse_rate(*rate),
            is_favorite: favorites.contains(code),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.is_favorite
            .cmp(&a.is_favorite)
            .then_with(|| a.code.cmp(&b.code))
    });
    rows
}
