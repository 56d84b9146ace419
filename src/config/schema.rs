//! Configuration schema definitions.
//!
//! This module defines the file-backed configuration for the client.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::policy::{CappedJitterBackoff, ExponentialBackoff, IdleDeadline, LinearBackoff};
use crate::transport::TransportConfig;

/// Root configuration for the resilient client.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Retry limits and backoff.
    pub retries: RetryConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ClientConfig {
    /// Build the transport configuration described by this file.
    pub fn transport_config(&self) -> TransportConfig {
        let config = TransportConfig::new()
            .with_max_tries(self.retries.max_tries)
            .with_dial_timeout(self.timeouts.dial())
            .with_deadline(IdleDeadline(self.timeouts.deadline()));

        let base = Duration::from_millis(self.retries.base_delay_ms);
        match self.retries.backoff {
            BackoffKind::Exponential => config.with_backoff(ExponentialBackoff { base }),
            BackoffKind::Linear => config.with_backoff(LinearBackoff { base }),
            BackoffKind::CappedJitter => config.with_backoff(CappedJitterBackoff {
                base,
                max: Duration::from_millis(self.retries.max_delay_ms),
            }),
            BackoffKind::None => config.without_backoff(),
        }
    }
}

/// Delay strategy between attempts.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackoffKind {
    /// `base * 2^attempt`.
    #[default]
    Exponential,
    /// `base * attempt`.
    Linear,
    /// Exponential capped at `max_delay_ms` with up to 10% jitter.
    CappedJitter,
    /// Retry immediately.
    None,
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per logical request, including the first.
    pub max_tries: u32,

    /// Backoff strategy.
    pub backoff: BackoffKind,

    /// Base delay for backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for capped backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_tries: 3,
            backoff: BackoffKind::Exponential,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in milliseconds.
    pub dial_ms: u64,

    /// Lifetime of each connection, measured from establishment, in milliseconds.
    pub deadline_ms: u64,
}

impl TimeoutConfig {
    pub fn dial(&self) -> Duration {
        Duration::from_millis(self.dial_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            dial_ms: 10_000,
            deadline_ms: 5_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record request metrics through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}
