//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Outgoing request
//!     → connector.rs (TCP dial bounded by the dial timeout)
//!     → connection.rs (deadline armed from the deadline policy)
//!     → Hand off to the HTTP client
//!
//! Connection States:
//!     Dialing → Active → Expired | Closed
//! ```
//!
//! # Design Decisions
//! - One connection per attempt; nothing is pooled
//! - The deadline is evaluated once per connection, not per read
//! - TLS is layered above the deadline stream by the client, never below it

pub mod connection;
pub mod connector;

pub use connection::{ConnectionId, DeadlineStream};
pub use connector::DeadlineConnector;
