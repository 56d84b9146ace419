//! Metrics collection.
//!
//! # Responsibilities
//! - Define client metrics (attempts, retries, outcomes, latency)
//! - Record through the `metrics` facade so any recorder can collect them
//!
//! # Metrics
//! - `http_client_attempts_total` (counter): physical attempts
//! - `http_client_retries_total` (counter): retries by reason (status, error)
//! - `http_client_requests_total` (counter): logical requests by outcome
//! - `http_client_request_duration_seconds` (histogram): end-to-end latency
//! - `http_client_request_attempts` (histogram): attempts per logical request
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Recording is a no-op until the host installs a recorder
//! - Recording can be switched off process-wide from config

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use metrics::{counter, histogram};

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Turn metric recording on or off for the whole process.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Record one physical attempt.
pub fn record_attempt() {
    if !is_enabled() {
        return;
    }
    counter!("http_client_attempts_total").increment(1);
}

/// Record a retry decision. `reason` is `status` or `error`.
pub fn record_retry(reason: &'static str) {
    if !is_enabled() {
        return;
    }
    counter!("http_client_retries_total", "reason" => reason).increment(1);
}

/// Record the end of a logical request.
///
/// `outcome` is `response`, `error` or `cancelled`.
pub fn record_request(outcome: &'static str, attempts: u32, elapsed: Duration) {
    if !is_enabled() {
        return;
    }
    counter!("http_client_requests_total", "outcome" => outcome).increment(1);
    histogram!("http_client_request_duration_seconds", "outcome" => outcome)
        .record(elapsed.as_secs_f64());
    histogram!("http_client_request_attempts").record(f64::from(attempts));
}
