//! Exchange rate data and its fetch lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

/// Currency code to rate, where `1 base = rate units of code`.
pub type RateTable = BTreeMap<String, f64>;

static EMPTY_TABLE: RateTable = BTreeMap::new();

/// A rate table together with the base it was fetched for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub base_currency: String,
    pub table: RateTable,
    pub fetched_at: DateTime<Utc>,
}

impl RateSnapshot {
    pub fn new(base_currency: impl Into<String>, table: RateTable) -> Self {
        Self {
            base_currency: base_currency.into(),
            table,
            fetched_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FetchStatus::Idle => "idle",
                FetchStatus::Loading => "loading",
                FetchStatus::Succeeded => "succeeded",
                FetchStatus::Failed => "failed",
            }
        )
    }
}

/// Handle for one in-flight fetch. Only the most recently issued ticket may
/// complete into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    id: u64,
    base: String,
}

impl FetchTicket {
    pub fn base(&self) -> &str {
        &self.base
    }
}

/// Read-only view of the rate data handed to conversion consumers.
#[derive(Debug, Clone, Copy)]
pub struct RateView<'a> {
    pub status: FetchStatus,
    pub base: &'a str,
    pub table: &'a RateTable,
}

impl RateView<'_> {
    /// Whether consumers may compute against this data.
    pub fn is_ready(&self) -> bool {
        self.status == FetchStatus::Succeeded && !self.table.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

#[derive(Debug)]
pub struct RateStore {
    status: FetchStatus,
    snapshot: Option<Arc<RateSnapshot>>,
    error: Option<String>,
    loading_base: Option<String>,
    latest_request: u64,
}

impl RateStore {
    pub fn new() -> Self {
        Self {
            status: FetchStatus::Idle,
            snapshot: None,
            error: None,
            loading_base: None,
            latest_request: 0,
        }
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    /// Last known snapshot. It is only fresh while the status is `Succeeded`.
    pub fn snapshot(&self) -> Option<&Arc<RateSnapshot>> {
        self.snapshot.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn table_is_empty(&self) -> bool {
        self.snapshot.as_ref().is_none_or(|s| s.table.is_empty())
    }

    pub fn is_fresh_for(&self, base: &str) -> bool {
        self.status == FetchStatus::Succeeded
            && self.snapshot.as_ref().is_some_and(|s| s.base_currency == base)
    }

    /// Starts a fetch for `base`. Returns `None` when a fetch for the same base
    /// is already in flight.
    pub fn request_rates(&mut self, base: &str) -> Option<FetchTicket> {
        if self.status == FetchStatus::Loading && self.loading_base.as_deref() == Some(base) {
            debug!(base, "Rate fetch already in flight");
            return None;
        }

        self.latest_request += 1;
        self.status = FetchStatus::Loading;
        self.loading_base = Some(base.to_string());
        debug!(base, request = self.latest_request, "Rate fetch started");

        Some(FetchTicket {
            id: self.latest_request,
            base: base.to_string(),
        })
    }

    /// Applies the outcome of a fetch. Returns `false` if the ticket was
    /// superseded by a newer request and the outcome was discarded.
    pub fn complete(&mut self, ticket: FetchTicket, result: anyhow::Result<RateSnapshot>) -> bool {
        if ticket.id != self.latest_request {
            debug!(
                base = %ticket.base,
                request = ticket.id,
                latest = self.latest_request,
                "Discarding superseded rate fetch"
            );
            return false;
        }

        self.loading_base = None;
        match result {
            Ok(snapshot) => {
                debug!(
                    base = %snapshot.base_currency,
                    rates = snapshot.table.len(),
                    "Rate fetch succeeded"
                );
                self.snapshot = Some(Arc::new(snapshot));
                self.status = FetchStatus::Succeeded;
                self.error = None;
            }
            Err(e) => {
                debug!(base = %ticket.base, error = %e, "Rate fetch failed");
                self.status = FetchStatus::Failed;
                self.error = Some(format!("{e:#}"));
            }
        }
        true
    }

    /// Marks the current snapshot as no longer valid and supersedes any
    /// in-flight fetch. The snapshot stays available for display.
    pub fn invalidate(&mut self) {
        self.latest_request += 1;
        self.loading_base = None;
        self.status = FetchStatus::Idle;
        debug!("Rate snapshot invalidated");
    }

    pub fn view(&self) -> RateView<'_> {
        match &self.snapshot {
            Some(snapshot) => RateView {
                status: self.status,
                base: &snapshot.base_currency,
                table: &snapshot.table,
            },
            None => RateView {
                status: self.status,
                base: "",
                table: &EMPTY_TABLE,
            },
        }
    }
}

impl Default for RateStore {
    fn default() -> Self {
        Self::new()
    }
}
