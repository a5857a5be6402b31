//! Rolling-window quota tracker.
//!
//! The tracker records the instant of every request it admits and keeps only
//! those that still fall inside the configured window. Before a request is
//! sent the caller waits for a slot:
//!
//! 1. stale timestamps are pruned,
//! 2. utilization is computed as `count / max_requests`,
//! 3. at or above the throttle threshold the caller sleeps for a delay that
//!    ramps up with utilization (see [`backoff::throttle_delay`]),
//! 4. when the window is full the caller also sleeps until the oldest
//!    timestamp ages out, so the next request cannot exceed the quota.
//!
//! Time comes from [`tokio::time::Instant`], so tests can pause and advance
//! the clock.

use crate::{QuotaConfig, backoff};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument, trace};

/// Tracks requests in a rolling window and decides how long callers wait.
///
/// One tracker belongs to one client. It is safe to share behind an `Arc`:
/// the timestamp window sits behind a mutex, and [`acquire`](Self::acquire)
/// serializes the wait-then-record sequence so concurrent callers cannot
/// both claim the last slot.
///
/// # Example
///
/// ```rust,no_run
/// use syncro_rate_limit::{QuotaConfig, QuotaTracker};
///
/// # async fn run() {
/// let tracker = QuotaTracker::new(QuotaConfig::default());
///
/// tracker.acquire().await;
/// assert_eq!(tracker.remaining_requests(), 179);
/// # }
/// ```
#[derive(Debug)]
pub struct QuotaTracker {
    config: QuotaConfig,
    timestamps: Mutex<VecDeque<Instant>>,
    admission: tokio::sync::Mutex<()>,
}

impl QuotaTracker {
    /// Create a tracker with an empty window.
    pub fn new(config: QuotaConfig) -> Self {
        debug!(
            enabled = *config.enabled(),
            max_requests = *config.max_requests(),
            window_ms = *config.window_ms(),
            "Creating quota tracker"
        );
        Self {
            timestamps: Mutex::new(VecDeque::new()),
            admission: tokio::sync::Mutex::new(()),
            config,
        }
    }

    /// The configuration this tracker enforces.
    pub fn config(&self) -> &QuotaConfig {
        &self.config
    }

    /// Wait for a slot and record the request as one atomic admission.
    ///
    /// Call this exactly once per request actually sent, immediately before
    /// sending it.
    #[instrument(skip(self), level = "trace")]
    pub async fn acquire(&self) {
        if !self.config.enabled() {
            return;
        }
        let _admission = self.admission.lock().await;
        self.wait_for_slot().await;
        self.record_request();
    }

    /// Suspend until it is safe to send the next request.
    ///
    /// Returns immediately when enforcement is disabled.
    pub async fn wait_for_slot(&self) {
        if !self.config.enabled() {
            return;
        }

        let (count, oldest) = {
            let timestamps = self.window();
            (timestamps.len(), timestamps.front().copied())
        };

        let rate = self.rate_for(count);
        if let Some(delay) = backoff::throttle_delay(rate, *self.config.throttle_threshold()) {
            debug!(
                rate,
                delay_ms = delay.as_millis() as u64,
                "Approaching quota, throttling"
            );
            tokio::time::sleep(delay).await;
        }

        if count >= *self.config.max_requests() as usize {
            if let Some(oldest) = oldest {
                let ready_at = oldest + self.config.window();
                let now = Instant::now();
                if ready_at > now {
                    debug!(
                        wait_ms = (ready_at - now).as_millis() as u64,
                        "Quota window full, waiting for oldest request to expire"
                    );
                    tokio::time::sleep_until(ready_at).await;
                }
            }
        }
    }

    /// Record that a request is being sent now. No-op when disabled.
    pub fn record_request(&self) {
        if !self.config.enabled() {
            return;
        }
        let mut timestamps = self.lock();
        timestamps.push_back(Instant::now());
        trace!(in_window = timestamps.len(), "Recorded request");
    }

    /// Requests in the current window as a fraction of the quota.
    pub fn current_rate(&self) -> f64 {
        let count = self.window().len();
        self.rate_for(count)
    }

    /// Requests still available in the current window.
    pub fn remaining_requests(&self) -> u32 {
        let count = self.window().len();
        let max = *self.config.max_requests() as usize;
        max.saturating_sub(count) as u32
    }

    /// Whether a rate-limited request on `attempt` may be retried.
    pub fn should_retry(&self, attempt: u32) -> bool {
        backoff::should_retry(attempt, *self.config.max_retries())
    }

    /// Backoff before retrying a rate-limited request on `attempt`.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        backoff::retry_delay(*self.config.base_retry_delay_ms(), attempt)
    }

    fn rate_for(&self, count: usize) -> f64 {
        count as f64 / f64::from((*self.config.max_requests()).max(1))
    }

    /// Lock the window and drop every timestamp that has aged out.
    fn window(&self) -> MutexGuard<'_, VecDeque<Instant>> {
        let mut timestamps = self.lock();
        let now = Instant::now();
        let window = self.config.window();
        while let Some(front) = timestamps.front() {
            if now.duration_since(*front) >= window {
                timestamps.pop_front();
            } else {
                break;
            }
        }
        timestamps
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Instant>> {
        // Instants cannot be left half-written, so poisoning is ignored.
        self.timestamps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for QuotaTracker {
    fn default() -> Self {
        Self::new(QuotaConfig::default())
    }
}
