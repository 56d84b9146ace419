//! Cancellation of in-flight logical requests.

use std::sync::Arc;

use tokio::sync::watch;

/// Create a linked handle/token pair.
pub fn cancellation() -> (CancelHandle, Cancellation) {
    let (tx, rx) = watch::channel(false);
    (
        CancelHandle { tx: Arc::new(tx) },
        Cancellation { rx: Some(rx) },
    )
}

/// Trigger side of a cancellation pair.
///
/// Cloning yields another trigger for the same tokens.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Cancel every request observing a linked [`Cancellation`].
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Get a new token linked to this handle.
    pub fn token(&self) -> Cancellation {
        Cancellation {
            rx: Some(self.tx.subscribe()),
        }
    }
}

/// Token observed by the retry loop.
///
/// Dropping every [`CancelHandle`] without cancelling leaves the token
/// pending forever.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    rx: Option<watch::Receiver<bool>>,
}

impl Cancellation {
    /// A token that never fires.
    pub fn never() -> Self {
        Self { rx: None }
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once cancellation has been requested.
    pub async fn cancelled(&self) {
        let Some(rx) = &self.rx else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
