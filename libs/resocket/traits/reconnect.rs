use std::time::Duration;

/// Trait for defining reconnection policies
///
/// Implement this trait to control how the link should behave after an
/// abnormal disconnection. A normal server close never consults the policy.
pub trait ReconnectPolicy: Send + Sync {
    /// Get the delay before the next reconnection attempt
    ///
    /// # Arguments
    /// * `attempt` - The reconnection attempt number (0-indexed)
    ///
    /// # Returns
    /// * `Some(duration)` - Wait this long before reconnecting
    /// * `None` - Retry budget exhausted, stop reconnecting
    fn next_delay(&self, attempt: usize) -> Option<Duration>;

    /// Check if another attempt is allowed
    fn should_retry(&self, attempt: usize) -> bool;
}

/// Exponential backoff reconnection policy
///
/// Delays between attempts grow as `base * 2^attempt`, capped at `cap`.
/// Once `max_attempts` retries have been scheduled the policy reports
/// exhaustion and the link stays down until an external reconnect.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    base: Duration,
    cap: Duration,
    max_attempts: Option<usize>,
}

impl ExponentialBackoff {
    /// Create a new exponential backoff policy
    ///
    /// # Arguments
    /// * `base` - Delay before the first retry
    /// * `cap` - Upper bound on any single delay
    /// * `max_attempts` - Retry ceiling (None = unlimited)
    pub fn new(base: Duration, cap: Duration, max_attempts: Option<usize>) -> Self {
        Self {
            base,
            cap,
            max_attempts,
        }
    }
}

impl ReconnectPolicy for ExponentialBackoff {
    fn next_delay(&self, attempt: usize) -> Option<Duration> {
        if !self.should_retry(attempt) {
            return None;
        }

        // Saturate instead of overflowing for large attempt numbers; the cap
        // dominates long before the shift runs out of bits anyway.
        let factor = 1u64
            .checked_shl(attempt.min(u32::MAX as usize) as u32)
            .unwrap_or(u64::MAX);
        let millis = (self.base.as_millis() as u64)
            .saturating_mul(factor)
            .min(self.cap.as_millis() as u64);
        Some(Duration::from_millis(millis))
    }

    fn should_retry(&self, attempt: usize) -> bool {
        self.max_attempts.map_or(true, |max| attempt < max)
    }
}

/// Constant delay reconnection policy
///
/// Always waits the same amount of time between attempts.
#[derive(Debug, Clone)]
pub struct ConstantDelay {
    delay: Duration,
    max_attempts: Option<usize>,
}

impl ConstantDelay {
    /// Create a new constant delay policy
    pub fn new(delay: Duration, max_attempts: Option<usize>) -> Self {
        Self {
            delay,
            max_attempts,
        }
    }
}

impl ReconnectPolicy for ConstantDelay {
    fn next_delay(&self, attempt: usize) -> Option<Duration> {
        if !self.should_retry(attempt) {
            return None;
        }
        Some(self.delay)
    }

    fn should_retry(&self, attempt: usize) -> bool {
        self.max_attempts.map_or(true, |max| attempt < max)
    }
}

/// Never reconnect policy
///
/// The link will not attempt to reconnect after any disconnection.
#[derive(Debug, Clone)]
pub struct NeverReconnect;

impl ReconnectPolicy for NeverReconnect {
    fn next_delay(&self, _attempt: usize) -> Option<Duration> {
        None
    }

    fn should_retry(&self, _attempt: usize) -> bool {
        false
    }
}
