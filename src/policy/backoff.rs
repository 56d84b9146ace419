//! Delays between attempts.

use std::time::Duration;

use rand::Rng;

/// Base delay of the provided curves.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);

/// Produces the wait before the next attempt, given the 1-based attempt that
/// just failed.
///
/// Only called once a retry has been decided. Implementations should be pure.
pub trait BackoffPolicy: Send + Sync {
    fn next_delay(&self, attempt: u32) -> Duration;
}

impl<F> BackoffPolicy for F
where
    F: Fn(u32) -> Duration + Send + Sync,
{
    fn next_delay(&self, attempt: u32) -> Duration {
        self(attempt)
    }
}

/// `base * 2^attempt`, uncapped and without jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    pub base: Duration,
}

impl ExponentialBackoff {
    pub fn new(base: Duration) -> Self {
        Self { base }
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DELAY)
    }
}

impl BackoffPolicy for ExponentialBackoff {
    fn next_delay(&self, attempt: u32) -> Duration {
        match 1u32.checked_shl(attempt) {
            Some(factor) => self.base.saturating_mul(factor),
            None if self.base.is_zero() => Duration::ZERO,
            None => Duration::MAX,
        }
    }
}

/// `base * attempt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearBackoff {
    pub base: Duration,
}

impl LinearBackoff {
    pub fn new(base: Duration) -> Self {
        Self { base }
    }
}

impl Default for LinearBackoff {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DELAY)
    }
}

impl BackoffPolicy for LinearBackoff {
    fn next_delay(&self, attempt: u32) -> Duration {
        self.base.saturating_mul(attempt)
    }
}

/// Exponential backoff with a ceiling and up to 10% random jitter.
///
/// The first retry waits `base`, each later one doubles, never past `max`.
/// Unlike the other curves this one is not pure: the jitter spreads retries
/// of many clients hitting the same failing server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CappedJitterBackoff {
    pub base: Duration,
    pub max: Duration,
}

impl CappedJitterBackoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { base, max }
    }

    /// Delay before jitter is applied.
    pub fn ceiling(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor).min(self.max)
    }
}

impl BackoffPolicy for CappedJitterBackoff {
    fn next_delay(&self, attempt: u32) -> Duration {
        let capped = self.ceiling(attempt);

        // 0 to 10% of the delay
        let jitter_range = capped.as_millis() as u64 / 10;
        let jitter = if jitter_range > 0 {
            rand::thread_rng().gen_range(0..jitter_range)
        } else {
            0
        };

        capped + Duration::from_millis(jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_doubles_from_base() {
        let backoff = ExponentialBackoff::default();
        assert_eq!(backoff.next_delay(1), Duration::from_millis(200));
        assert_eq!(backoff.next_delay(2), Duration::from_millis(400));
        assert_eq!(backoff.next_delay(3), Duration::from_millis(800));
    }

    #[test]
    fn exponential_is_pure() {
        let backoff = ExponentialBackoff::new(Duration::from_millis(7));
        for attempt in 0..10 {
            assert_eq!(backoff.next_delay(attempt), backoff.next_delay(attempt));
            assert_eq!(
                backoff.next_delay(attempt),
                Duration::from_millis(7) * 2u32.pow(attempt)
            );
        }
    }

    #[test]
    fn exponential_saturates_instead_of_overflowing() {
        let backoff = ExponentialBackoff::new(Duration::from_secs(1));
        assert_eq!(backoff.next_delay(200), Duration::MAX);
    }

    #[test]
    fn linear_grows_by_base() {
        let backoff = LinearBackoff::default();
        assert_eq!(backoff.next_delay(1), Duration::from_millis(100));
        assert_eq!(backoff.next_delay(2), Duration::from_millis(200));
        assert_eq!(backoff.next_delay(5), Duration::from_millis(500));
    }

    #[test]
    fn capped_jitter_stays_within_ten_percent_of_ceiling() {
        let backoff =
            CappedJitterBackoff::new(Duration::from_millis(100), Duration::from_millis(1000));

        let first = backoff.next_delay(1);
        assert!(first >= Duration::from_millis(100) && first < Duration::from_millis(110));

        let second = backoff.next_delay(2);
        assert!(second >= Duration::from_millis(200) && second < Duration::from_millis(220));

        let capped = backoff.next_delay(10);
        assert!(capped >= Duration::from_millis(1000) && capped < Duration::from_millis(1100));
    }

    #[test]
    fn closures_are_backoff_policies() {
        let stepped = |attempt: u32| {
            if attempt < 3 {
                Duration::from_secs(1)
            } else {
                Duration::from_secs(2)
            }
        };
        assert_eq!(stepped.next_delay(1), Duration::from_secs(1));
        assert_eq!(stepped.next_delay(4), Duration::from_secs(2));
    }
}
