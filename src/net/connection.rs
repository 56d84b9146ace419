//! Established connections with an absolute read/write deadline.
//!
//! # Responsibilities
//! - Give every dialed connection a unique ID for tracing
//! - Fail reads and writes with `TimedOut` once the deadline has passed
//!
//! # Design Decisions
//! - The deadline is fixed at establishment; progress does not extend it
//! - The timer is registered on every poll, so a stalled read is woken and
//!   failed at the deadline instead of waiting for more bytes
//! - Shutdown is never blocked by the deadline

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::Instant;

use hyper::rt::{Read, ReadBufCursor, Write};
use hyper_util::client::legacy::connect::{Connected, Connection};
use tokio::time::Sleep;

/// Global atomic counter for connection IDs.
/// Using relaxed ordering is sufficient since we only need uniqueness, not synchronization.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Error returned by I/O on a connection past its deadline.
pub fn deadline_exceeded() -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, "connection deadline exceeded")
}

/// An I/O stream that stops working at an absolute instant.
#[derive(Debug)]
pub struct DeadlineStream<T> {
    inner: T,
    id: ConnectionId,
    deadline: Pin<Box<Sleep>>,
}

impl<T> DeadlineStream<T> {
    pub fn new(inner: T, deadline: Instant) -> Self {
        let id = ConnectionId::new();
        tracing::trace!(connection_id = %id, "Connection deadline armed");
        Self {
            inner,
            id,
            deadline: Box::pin(tokio::time::sleep_until(deadline.into())),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    fn poll_expired(&mut self, cx: &mut Context<'_>) -> bool {
        if self.deadline.as_mut().poll(cx).is_ready() {
            tracing::debug!(connection_id = %self.id, "Connection deadline exceeded");
            return true;
        }
        false
    }
}

impl<T: Read + Unpin> Read for DeadlineStream<T> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: ReadBufCursor<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if this.poll_expired(cx) {
            return Poll::Ready(Err(deadline_exceeded()));
        }
        Pin::new(&mut this.inner).poll_read(cx, buf)
    }
}

impl<T: Write + Unpin> Write for DeadlineStream<T> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if this.poll_expired(cx) {
            return Poll::Ready(Err(deadline_exceeded()));
        }
        Pin::new(&mut this.inner).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if this.poll_expired(cx) {
            return Poll::Ready(Err(deadline_exceeded()));
        }
        Pin::new(&mut this.inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

impl<T: Connection> Connection for DeadlineStream<T> {
    fn connected(&self) -> Connected {
        self.inner.connected()
    }
}
