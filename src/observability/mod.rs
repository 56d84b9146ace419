//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Retry loop produces:
//!     → logging.rs (structured log events inside a per-request span)
//!     → metrics.rs (attempt, retry and request counters, latency histogram)
//!
//! Consumers:
//!     → Whatever subscriber / recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - Request ID (UUID v4) is attached to the span of every logical request
//! - Metrics go through the `metrics` facade; no exporter is installed here
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
