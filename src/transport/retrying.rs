//! The retry loop.
//!
//! # Responsibilities
//! - Buffer the request body once and replay it on every attempt
//! - Consult the retry policy after each attempt, bounded by `max_tries`
//! - Notify the on-retry observer, release the failed response, back off
//! - Honour caller cancellation while an attempt or a backoff is pending

use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use futures_util::future::{BoxFuture, FutureExt};
use http::{request::Parts, Request, Response};
use http_body::Body;
use http_body_util::Full;
use tower::Service;
use tracing::Instrument;
use uuid::Uuid;

use crate::body::{self, ResponseBody};
use crate::error::{BoxError, Error};
use crate::lifecycle::Cancellation;
use crate::observability::metrics;
use crate::transport::config::TransportConfig;
use crate::transport::round_trip::RoundTrip;

/// Wraps an underlying [`RoundTrip`] with retry, backoff and replay.
///
/// Cheap to clone; clones share the same configuration and inner transport.
#[derive(Debug)]
pub struct RetryingTransport<T> {
    inner: T,
    config: Arc<TransportConfig>,
}

impl<T: Clone> Clone for RetryingTransport<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<T> RetryingTransport<T> {
    pub fn new(inner: T, config: TransportConfig) -> Self {
        Self::from_shared(inner, Arc::new(config))
    }

    pub fn from_shared(inner: T, config: Arc<TransportConfig>) -> Self {
        Self { inner, config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl<T: RoundTrip> RetryingTransport<T> {
    /// Execute a logical request as a bounded series of attempts.
    ///
    /// Returns the final attempt's response or error untouched. A body that
    /// cannot be buffered fails with [`Error::Body`] before any attempt;
    /// cancellation yields [`Error::Cancelled`].
    pub async fn execute<B>(
        &self,
        request: Request<B>,
        cancel: &Cancellation,
    ) -> Result<Response<ResponseBody>, Error>
    where
        B: Body + Send,
        B::Data: Send,
        B::Error: Into<BoxError>,
    {
        let span = tracing::debug_span!(
            "http_request",
            request_id = %Uuid::new_v4(),
            method = %request.method(),
            uri = %request.uri(),
        );
        let started = Instant::now();

        let result = self.run(request, cancel).instrument(span).await;

        let (outcome, attempts) = match &result {
            Ok((_, attempts)) => ("response", *attempts),
            Err((Error::Cancelled { .. }, attempts)) => ("cancelled", *attempts),
            Err((_, attempts)) => ("error", *attempts),
        };
        metrics::record_request(outcome, attempts, started.elapsed());
        result.map(|(response, _)| response).map_err(|(err, _)| err)
    }

    async fn run<B>(
        &self,
        request: Request<B>,
        cancel: &Cancellation,
    ) -> Result<(Response<ResponseBody>, u32), (Error, u32)>
    where
        B: Body + Send,
        B::Data: Send,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = request.into_parts();
        let payload = body::buffer(body).await.map_err(|err| (err, 0))?;

        let max_tries = self.config.max_tries();
        let mut attempt: u32 = 1;

        loop {
            if cancel.is_cancelled() {
                let started = attempt - 1;
                tracing::debug!(attempts = started, "Cancelled before attempt");
                return Err((Error::Cancelled { attempts: started }, started));
            }

            let request = attempt_request(&parts, &payload);
            metrics::record_attempt();
            tracing::debug!(attempt, max_tries, "Sending attempt");

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(attempt, "Cancelled while attempt in flight");
                    return Err((Error::Cancelled { attempts: attempt }, attempt));
                }
                outcome = self.inner.round_trip(request) => outcome,
            };

            if attempt >= max_tries || !self.config.should_retry(&parts, outcome.as_ref()) {
                match &outcome {
                    Ok(response) => {
                        tracing::debug!(attempt, status = %response.status(), "Request finished")
                    }
                    Err(err) => tracing::debug!(attempt, error = %err, "Request failed"),
                }
                return outcome.map(|res| (res, attempt)).map_err(|err| (err, attempt));
            }

            if let Some(observer) = self.config.observer() {
                observer(&parts, outcome.as_ref(), attempt);
            }

            let delay = self.config.backoff().map(|b| b.next_delay(attempt));
            match &outcome {
                Ok(response) => {
                    metrics::record_retry("status");
                    tracing::warn!(
                        attempt,
                        status = %response.status(),
                        delay = ?delay,
                        "Retrying request"
                    );
                }
                Err(err) => {
                    metrics::record_retry("error");
                    tracing::warn!(
                        attempt,
                        error = %err,
                        delay = ?delay,
                        "Retrying after transport error"
                    );
                }
            }

            // The response never reaches the caller; dropping it closes the
            // body and its connection before the next attempt starts.
            drop(outcome);

            if let Some(delay) = delay {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        tracing::debug!(attempt, "Cancelled during backoff");
                        return Err((Error::Cancelled { attempts: attempt }, attempt));
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            attempt += 1;
        }
    }
}

fn attempt_request(parts: &Parts, payload: &Bytes) -> Request<Full<Bytes>> {
    Request::from_parts(parts.clone(), Full::new(payload.clone()))
}

impl<T, B> Service<Request<B>> for RetryingTransport<T>
where
    T: RoundTrip + Clone + 'static,
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Response = Response<ResponseBody>;
    type Error = Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        let this = self.clone();
        async move { this.execute(request, &Cancellation::never()).await }.boxed()
    }
}
