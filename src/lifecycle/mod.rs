//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Cancellation (cancel.rs):
//!     CancelHandle::cancel() → every Cancellation token resolves
//!     → in-flight attempt or backoff sleep is abandoned
//!
//! Signals (signals.rs):
//!     SIGINT → CancelHandle::cancel()
//! ```
//!
//! # Design Decisions
//! - Cancellation is a watch channel: cheap to clone, observed by many
//! - A request without a token can never be cancelled

pub mod cancel;
pub mod signals;

pub use cancel::{cancellation, CancelHandle, Cancellation};
pub use signals::cancel_on_ctrl_c;
