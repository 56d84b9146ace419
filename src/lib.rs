//! Resilient HTTP client transport.
//!
//! Wraps a single-attempt HTTP transport with bounded retries, pluggable
//! backoff, body replay and an absolute deadline on every connection.

pub mod body;
pub mod client;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod policy;
pub mod transport;

pub use body::ResponseBody;
pub use client::{default_client, new_client, ResilientClient};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use lifecycle::{cancellation, CancelHandle, Cancellation};
pub use transport::{RetryLayer, RetryingTransport, TransportConfig};
