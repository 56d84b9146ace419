//! Retrying transport subsystem.
//!
//! # Data Flow
//! ```text
//! Request<B>
//!     → retrying.rs (buffer body once, drive attempts)
//!         → round_trip.rs (one physical attempt on the underlying transport)
//!         → policy::retry (retry?) → on-retry observer → policy::backoff (sleep)
//!     → Response<ResponseBody> or Error from the final attempt
//! ```
//!
//! # Design Decisions
//! - `TransportConfig` is immutable and shared via `Arc`; per-request state
//!   (attempt counter, buffered body) lives in the request's own future
//! - Attempts are strictly sequential; intermediate responses are dropped
//!   (closing their connection) before the backoff sleep
//! - The caller sees the final attempt's result verbatim, never an aggregate

pub mod config;
pub mod layer;
pub mod retrying;
pub mod round_trip;

pub use config::{OnRetry, TransportConfig};
pub use layer::RetryLayer;
pub use retrying::RetryingTransport;
pub use round_trip::{RoundTrip, ServiceTransport};
