//! Transport configuration bundle.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http::request::Parts;

use crate::policy::{
    BackoffPolicy, DeadlinePolicy, DefaultDeadline, DefaultRetryPolicy, ExponentialBackoff,
    Outcome, RetryPolicy,
};

/// Connection establishment timeout used by default.
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Attempts per logical request used by default.
pub const DEFAULT_MAX_TRIES: u32 = 3;

/// Observer invoked before each retry with the request, the failed attempt's
/// outcome and the attempt number. Side effect only.
pub type OnRetry = dyn Fn(&Parts, Outcome<'_>, u32) + Send + Sync;

/// Policies and limits shared by every request on a transport.
///
/// Built once and never mutated afterwards; the transport holds it in an
/// `Arc`.
#[derive(Clone)]
pub struct TransportConfig {
    deadline: Arc<dyn DeadlinePolicy>,
    dial_timeout: Duration,
    max_tries: u32,
    should_retry: Arc<dyn RetryPolicy>,
    backoff: Option<Arc<dyn BackoffPolicy>>,
    on_retry: Option<Arc<OnRetry>>,
}

impl TransportConfig {
    /// A single-attempt configuration with no backoff and no observer.
    pub fn new() -> Self {
        Self {
            deadline: Arc::new(DefaultDeadline),
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            max_tries: 1,
            should_retry: Arc::new(DefaultRetryPolicy),
            backoff: None,
            on_retry: None,
        }
    }

    /// Hard ceiling on attempts. Values below 1 are raised to 1.
    pub fn with_max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = max_tries.max(1);
        self
    }

    pub fn with_dial_timeout(mut self, dial_timeout: Duration) -> Self {
        self.dial_timeout = dial_timeout;
        self
    }

    pub fn with_deadline(mut self, deadline: impl DeadlinePolicy + 'static) -> Self {
        self.deadline = Arc::new(deadline);
        self
    }

    pub fn with_retry_policy(mut self, policy: impl RetryPolicy + 'static) -> Self {
        self.should_retry = Arc::new(policy);
        self
    }

    /// Closure form of [`with_retry_policy`](Self::with_retry_policy).
    pub fn retry_when<F>(mut self, policy: F) -> Self
    where
        F: Fn(&Parts, Outcome<'_>) -> bool + Send + Sync + 'static,
    {
        self.should_retry = Arc::new(policy);
        self
    }

    pub fn with_backoff(mut self, backoff: impl BackoffPolicy + 'static) -> Self {
        self.backoff = Some(Arc::new(backoff));
        self
    }

    /// Retry immediately, without any delay between attempts.
    pub fn without_backoff(mut self) -> Self {
        self.backoff = None;
        self
    }

    pub fn on_retry<F>(mut self, observer: F) -> Self
    where
        F: Fn(&Parts, Outcome<'_>, u32) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(observer));
        self
    }

    pub fn max_tries(&self) -> u32 {
        self.max_tries
    }

    pub fn dial_timeout(&self) -> Duration {
        self.dial_timeout
    }

    /// Evaluate the deadline policy for a freshly established connection.
    pub fn deadline(&self) -> Instant {
        self.deadline.deadline()
    }

    pub(crate) fn deadline_policy(&self) -> Arc<dyn DeadlinePolicy> {
        Arc::clone(&self.deadline)
    }

    pub(crate) fn should_retry(&self, request: &Parts, outcome: Outcome<'_>) -> bool {
        self.should_retry.should_retry(request, outcome)
    }

    pub(crate) fn backoff(&self) -> Option<&dyn BackoffPolicy> {
        self.backoff.as_deref()
    }

    pub(crate) fn observer(&self) -> Option<&OnRetry> {
        self.on_retry.as_deref()
    }
}

impl Default for TransportConfig {
    /// Five second deadline, ten second dial timeout, three tries, default
    /// retry policy and exponential backoff from 100ms.
    fn default() -> Self {
        Self::new()
            .with_max_tries(DEFAULT_MAX_TRIES)
            .with_backoff(ExponentialBackoff::default())
    }
}

impl fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportConfig")
            .field("dial_timeout", &self.dial_timeout)
            .field("max_tries", &self.max_tries)
            .field("backoff", &self.backoff.is_some())
            .field("on_retry", &self.on_retry.is_some())
            .finish_non_exhaustive()
    }
}
