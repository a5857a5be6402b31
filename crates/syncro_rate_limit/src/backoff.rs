//! Delay policy for throttling and retries.
//!
//! Three delays exist:
//! - the throttle ramp applied by the quota tracker once utilization reaches
//!   the threshold,
//! - exponential backoff between retries of a rate-limited (429) request,
//! - a fixed pause before the single retry of a server error (5xx).

use std::time::Duration;

/// Upper bound for exponential backoff between 429 retries.
pub const MAX_RETRY_DELAY: Duration = Duration::from_millis(30_000);

/// Upper bound for the throttle ramp.
pub const MAX_THROTTLE_DELAY: Duration = Duration::from_millis(5_000);

/// Pause before the one retry granted to a 5xx response.
pub const SERVER_ERROR_RETRY_DELAY: Duration = Duration::from_millis(1_000);

/// Offset added to the excess utilization so that sitting exactly on the
/// threshold still produces a non-zero delay.
const THROTTLE_RAMP_OFFSET: f64 = 0.1;

/// Milliseconds of delay per unit of (offset) excess utilization.
const THROTTLE_RAMP_MS: f64 = 10_000.0;

/// Exponential backoff: `base * 2^attempt`, capped at [`MAX_RETRY_DELAY`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use syncro_rate_limit::backoff::retry_delay;
///
/// assert_eq!(retry_delay(5_000, 0), Duration::from_millis(5_000));
/// assert_eq!(retry_delay(5_000, 2), Duration::from_millis(20_000));
/// assert_eq!(retry_delay(5_000, 10), Duration::from_millis(30_000));
/// ```
pub fn retry_delay(base_ms: u64, attempt: u32) -> Duration {
    let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    let delay_ms = base_ms.saturating_mul(factor);
    Duration::from_millis(delay_ms).min(MAX_RETRY_DELAY)
}

/// Whether a rate-limited request on `attempt` may be retried.
pub fn should_retry(attempt: u32, max_retries: u32) -> bool {
    attempt < max_retries
}

/// Delay imposed when utilization `rate` has reached `threshold`.
///
/// The delay grows linearly with how far above the threshold the rate is:
/// `min(1000 * (rate - threshold + 0.1) * 10, 5000)` milliseconds. Returns
/// `None` below the threshold.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use syncro_rate_limit::backoff::throttle_delay;
///
/// assert_eq!(throttle_delay(0.5, 0.8), None);
/// assert_eq!(throttle_delay(0.8, 0.8), Some(Duration::from_millis(1_000)));
/// assert_eq!(throttle_delay(1.0, 0.8), Some(Duration::from_millis(3_000)));
/// assert_eq!(throttle_delay(2.0, 0.5), Some(Duration::from_millis(5_000)));
/// ```
pub fn throttle_delay(rate: f64, threshold: f64) -> Option<Duration> {
    if rate < threshold {
        return None;
    }
    let delay_ms = ((rate - threshold + THROTTLE_RAMP_OFFSET) * THROTTLE_RAMP_MS)
        .min(MAX_THROTTLE_DELAY.as_millis() as f64)
        .max(0.0);
    Some(Duration::from_millis(delay_ms.round() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_delay_doubles_until_cap() {
        let delays: Vec<u64> = (0..6)
            .map(|attempt| retry_delay(1_000, attempt).as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![1_000, 2_000, 4_000, 8_000, 16_000, 30_000]);
    }

    #[test]
    fn retry_delay_survives_huge_attempts() {
        assert_eq!(retry_delay(5_000, 64), MAX_RETRY_DELAY);
        assert_eq!(retry_delay(5_000, u32::MAX), MAX_RETRY_DELAY);
    }

    #[test]
    fn retry_delay_with_zero_base_is_zero() {
        assert_eq!(retry_delay(0, 5), Duration::ZERO);
    }

    #[test]
    fn should_retry_is_strictly_below_budget() {
        assert!(should_retry(0, 3));
        assert!(should_retry(2, 3));
        assert!(!should_retry(3, 3));
        assert!(!should_retry(0, 0));
    }

    #[test]
    fn throttle_delay_caps_at_ceiling() {
        assert_eq!(throttle_delay(1.0, 0.1), Some(MAX_THROTTLE_DELAY));
    }
}
