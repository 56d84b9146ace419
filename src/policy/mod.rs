//! Pluggable policies consumed by the retrying transport.
//!
//! # Data Flow
//! ```text
//! connection established
//!     → deadline.rs (absolute read/write deadline for that connection)
//!
//! attempt finished
//!     → retry.rs (should another attempt be made?)
//!     → on-retry observer (side effect only)
//!     → backoff.rs (how long to wait before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Each policy is a small trait with a blanket impl for plain closures, so
//!   swapping one behavior means passing one function
//! - Policies are immutable and shared through `Arc` by every request

pub mod backoff;
pub mod deadline;
pub mod retry;

use http::Response;

use crate::body::ResponseBody;
use crate::error::Error;

pub use backoff::{BackoffPolicy, CappedJitterBackoff, ExponentialBackoff, LinearBackoff};
pub use deadline::{DeadlinePolicy, DefaultDeadline, IdleDeadline};
pub use retry::{DefaultRetryPolicy, RetryPolicy};

/// Result of one attempt as seen by policies and observers.
pub type Outcome<'a> = Result<&'a Response<ResponseBody>, &'a Error>;
