//! Ambassador board: state container for the three checkout tables
//!
//! The board is the component boundary. Actions run the lifecycle
//! operation, then immediately re-fetch only the tables it touched.
//! Failures are logged and leave the snapshot as it was; they never
//! reach the caller as errors.

use std::future::Future;

use chrono::Utc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::checkouts::CheckoutLifecycleService;
use crate::{
    error::AppResult,
    models::{ActiveCheckout, BoardSnapshot, CheckoutRequest, StagedRequest},
};

pub struct CheckoutBoard {
    lifecycle: CheckoutLifecycleService,
    state: watch::Sender<BoardSnapshot>,
}

impl CheckoutBoard {
    pub fn new(lifecycle: CheckoutLifecycleService) -> Self {
        let (state, _) = watch::channel(BoardSnapshot::default());
        Self { lifecycle, state }
    }

    /// Current tables
    pub fn snapshot(&self) -> BoardSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.state.subscribe()
    }

    /// Stream of snapshots, starting with the current one
    pub fn updates(&self) -> WatchStream<BoardSnapshot> {
        WatchStream::new(self.subscribe())
    }

    // --- Refresh ---

    pub async fn refresh_requests(&self) -> bool {
        match log_failure("refresh requests", self.lifecycle.list_requests()).await {
            Some(requests) => {
                self.state.send_modify(|s| {
                    s.requests = requests;
                    s.refreshed_at = Some(Utc::now());
                });
                true
            }
            None => false,
        }
    }

    pub async fn refresh_staged(&self) -> bool {
        match log_failure("refresh staged requests", self.lifecycle.list_staged_requests()).await {
            Some(staged) => {
                self.state.send_modify(|s| {
                    s.staged = staged;
                    s.refreshed_at = Some(Utc::now());
                });
                true
            }
            None => false,
        }
    }

    pub async fn refresh_checkouts(&self) -> bool {
        match log_failure("refresh active checkouts", self.lifecycle.list_active_checkouts()).await {
            Some(checkouts) => {
                self.state.send_modify(|s| {
                    s.checkouts = checkouts;
                    s.refreshed_at = Some(Utc::now());
                });
                true
            }
            None => false,
        }
    }

    /// Re-fetch the three tables one after another.
    ///
    /// Returns how many of them were refreshed.
    pub async fn refresh_all(&self) -> usize {
        let mut refreshed = 0;
        refreshed += usize::from(self.refresh_requests().await);
        refreshed += usize::from(self.refresh_staged().await);
        refreshed += usize::from(self.refresh_checkouts().await);
        tracing::debug!(refreshed, "Board refreshed");
        refreshed
    }

    // --- Actions ---

    pub async fn approve_request(&self, request: &CheckoutRequest) -> Option<StagedRequest> {
        let staged = log_failure("approve request", self.lifecycle.approve_request(request)).await;
        // A failed delete still leaves a persisted staged record
        self.refresh_requests().await;
        self.refresh_staged().await;
        staged
    }

    pub async fn reject_request(&self, request: &CheckoutRequest) -> Option<()> {
        log_failure("reject request", self.lifecycle.reject_request(request)).await?;
        self.refresh_requests().await;
        Some(())
    }

    /// Assign `equipment_id` to the staged request and check it out
    pub async fn approve_staged(&self, staged: &StagedRequest, equipment_id: i32) -> Option<ActiveCheckout> {
        let checkout = log_failure("approve staged request", async {
            let selected = self.lifecycle.select_item(staged, equipment_id)?;
            self.lifecycle.approve_staged_request(&selected).await
        })
        .await?;
        self.refresh_staged().await;
        self.refresh_checkouts().await;
        Some(checkout)
    }

    pub async fn reject_staged(&self, staged: &StagedRequest) -> Option<()> {
        log_failure("reject staged request", self.lifecycle.reject_staged_request(staged)).await?;
        self.refresh_staged().await;
        Some(())
    }

    pub async fn return_checkout(&self, checkout: &ActiveCheckout) -> Option<ActiveCheckout> {
        let returned = log_failure("return checkout", self.lifecycle.return_checkout(checkout)).await?;
        self.refresh_checkouts().await;
        Some(returned)
    }
}

async fn log_failure<T>(action: &str, fut: impl Future<Output = AppResult<T>>) -> Option<T> {
    match fut.await {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(action, error = %e, "Board action failed");
            None
        }
    }
}
