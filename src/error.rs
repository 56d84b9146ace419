//! Error types for the resilient transport.
//!
//! # Design Decisions
//! - The retry core never interprets errors; classification lives here so
//!   that retry policies can ask `is_temporary()` / `is_timeout()`.
//! - Classification walks the `source()` chain looking for an `io::Error`;
//!   hyper and hyper-util wrap the socket error several levels deep.
//! - Timeouts are temporary. A connection that hit its read/write deadline or
//!   failed to connect within the dial timeout is expected to succeed on a
//!   fresh connection.

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

/// Boxed error used at the boundaries where foreign error types meet ours.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Errors produced while executing a request.
#[derive(Debug, Error)]
pub enum Error {
    /// The request body could not be read into memory. No attempt was made.
    #[error("failed to buffer request body: {0}")]
    Body(#[source] BoxError),

    /// The request could not be constructed (bad method, URI or header).
    #[error("invalid request: {0}")]
    Request(#[from] http::Error),

    /// Socket-level failure.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Protocol failure while exchanging a request or reading a body.
    #[error("http error: {0}")]
    Hyper(#[from] hyper::Error),

    /// Failure reported by the underlying client (connect, send, receive).
    #[error("transport error: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    /// The caller abandoned the request.
    #[error("request cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },
}

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the failure is transient and expected to succeed on retry.
    pub fn is_temporary(&self) -> bool {
        match self {
            Error::Body(_) | Error::Request(_) | Error::Cancelled { .. } => false,
            _ => self.io_kind().is_some_and(is_temporary_kind),
        }
    }

    /// Whether the failure is a connect or read/write timeout.
    pub fn is_timeout(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::TimedOut)
    }

    /// Whether the failure happened while establishing the connection.
    pub fn is_connect(&self) -> bool {
        match self {
            Error::Transport(err) => err.is_connect(),
            _ => false,
        }
    }

    /// First specific `io::ErrorKind` found in the source chain, starting at
    /// `self`.
    ///
    /// An `ErrorKind::Other` wrapper is looked through: TLS connectors box
    /// the socket error that way, and `io::Error::source` skips the payload.
    fn io_kind(&self) -> Option<io::ErrorKind> {
        let mut generic = None;
        let mut current: Option<&(dyn StdError + 'static)> = Some(self);
        while let Some(err) = current {
            current = err.source();
            if let Some(io_err) = err.downcast_ref::<io::Error>() {
                if io_err.kind() != io::ErrorKind::Other {
                    return Some(io_err.kind());
                }
                generic.get_or_insert(io::ErrorKind::Other);
                if let Some(payload) = io_err.get_ref() {
                    let payload: &(dyn StdError + 'static) = payload;
                    current = Some(payload);
                }
            }
        }
        generic
    }
}

fn is_temporary_kind(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::TimedOut
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    )
}
