//! # Scan Polling
//!
//! Scans run asynchronously on the server. [`ApiClient::block_until_finished`]
//! polls the project status at a fixed interval until the scan reports phase 0
//! at 100 percent.

use std::future::Future;
use std::time::Duration;

use log::debug;

use crate::api::client::{ApiClient, ApiError};
use crate::api::types::ScanStatus;

/// Default time between two status requests
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Shortest sleep between two status requests; smaller intervals are raised to it
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Deadline and interval for [`ApiClient::block_until_finished`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Give up once `polls × interval` exceeds this; wait forever if `None`
    pub max_wait: Option<Duration>,
    /// Fixed sleep between polls, no backoff; at least [`MIN_POLL_INTERVAL`]
    pub interval: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            max_wait: None,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PollOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// The interval actually slept, also when `interval` was set directly.
    fn sleep_interval(&self) -> Duration {
        self.interval.max(MIN_POLL_INTERVAL)
    }

    /// Whether the wait budget is used up after `polls` unfinished polls.
    fn exhausted(&self, polls: u32) -> bool {
        self.max_wait
            .is_some_and(|max_wait| self.sleep_interval().saturating_mul(polls) > max_wait)
    }
}

impl ApiClient {
    /// Wait until the scan of `project_id` is finished.
    ///
    /// Returns the final status. Errors while fetching the status abort the
    /// wait immediately; there is no retry.
    pub async fn block_until_finished(
        &self,
        project_id: u64,
        options: &PollOptions,
    ) -> Result<ScanStatus, ApiError> {
        self.block_until_finished_or_cancelled(project_id, options, std::future::pending())
            .await
    }

    /// [`block_until_finished`](Self::block_until_finished) that stops with
    /// `Cancelled` once `cancel` completes.
    ///
    /// Cancellation is only observed while sleeping between polls, never in
    /// the middle of a status request.
    pub async fn block_until_finished_or_cancelled<F>(
        &self,
        project_id: u64,
        options: &PollOptions,
        cancel: F,
    ) -> Result<ScanStatus, ApiError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        let mut polls: u32 = 0;

        loop {
            let status = self.get_project_status(project_id).await?;
            polls = polls.saturating_add(1);
            debug!(
                "Project {} scan: phase {}, {}% (poll {})",
                project_id, status.phase, status.percent, polls
            );

            if status.is_finished() {
                return Ok(status);
            }

            if options.exhausted(polls) {
                return Err(ApiError::Timeout {
                    project_id,
                    max_wait: options.max_wait.unwrap_or_default(),
                });
            }

            tokio::select! {
                _ = tokio::time::sleep(options.sleep_interval()) => {}
                _ = &mut cancel => return Err(ApiError::Cancelled { project_id }),
            }
        }
    }
}
