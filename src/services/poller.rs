//! Periodic board refresh
//!
//! Stands in for push notifications: every tick re-fetches the three
//! tables, independent of user actions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::board::CheckoutBoard;

pub struct BoardPoller;

impl BoardPoller {
    /// Start polling `board` every `period`, with the first refresh right away
    pub fn spawn(board: Arc<CheckoutBoard>, period: Duration) -> PollHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            tracing::info!(period_ms = period.as_millis() as u64, "Starting board poller");
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut ticks: u64 = 0;

            while !*shutdown_rx.borrow() {
                tokio::select! {
                    _ = ticker.tick() => {
                        ticks += 1;
                        let refreshed = board.refresh_all().await;
                        if refreshed < 3 {
                            tracing::warn!(tick = ticks, refreshed, "Poll tick left stale tables");
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::info!(ticks, "Board poller stopped");
        });

        PollHandle {
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }
}

/// Owns the poll task. Dropping the handle signals the task to stop.
pub struct PollHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Stop polling and wait for an in-flight tick to finish
    pub async fn shutdown(mut self) {
        self.shutdown.send_replace(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Board poller task failed");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}
