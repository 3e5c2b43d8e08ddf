//! Snapshot of the ambassador tables

use chrono::{DateTime, Utc};

use super::checkout::{ActiveCheckout, CheckoutRequest, StagedRequest};

/// Immutable view of the three ambassador tables at one point in time.
///
/// The tables are fetched one after another, so a snapshot is not an
/// atomic cut of the backend state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub requests: Vec<CheckoutRequest>,
    pub staged: Vec<StagedRequest>,
    pub checkouts: Vec<ActiveCheckout>,
    /// Time of the last successful table fetch
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl BoardSnapshot {
    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    pub fn staged_count(&self) -> usize {
        self.staged.len()
    }

    pub fn checkout_count(&self) -> usize {
        self.checkouts.len()
    }

    pub fn overdue(&self, now: DateTime<Utc>) -> impl Iterator<Item = &ActiveCheckout> {
        self.checkouts.iter().filter(move |c| c.is_overdue(now))
    }
}
