//! Outward-facing client subsystem.
//!
//! # Data Flow
//! ```text
//! ResilientClient::request()
//!     → RetryingTransport (buffer, attempts, policies)
//!         → HyperTransport (hyper-util client, keep-alive off)
//!             → HttpsConnector (TLS for https URIs)
//!                 → DeadlineConnector (dial timeout, per-connection deadline)
//! ```
//!
//! # Design Decisions
//! - Composition happens once in `new_client`; nothing is reconfigured later
//! - Each attempt dials a fresh connection so attempts never share state
//! - The process-wide default client is built lazily exactly once

pub mod factory;
pub mod hyper_transport;

pub use factory::{default_client, new_client, ResilientClient};
pub use hyper_transport::HyperTransport;
