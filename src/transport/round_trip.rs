//! The single-attempt capability consumed by the retry loop.

use futures_util::future::{BoxFuture, FutureExt};
use http::{Request, Response};
use tower::{Service, ServiceExt};

use crate::body::{AttemptBody, ResponseBody};
use crate::error::Error;

/// Executes exactly one attempt: no internal retries, body fully consumed.
pub trait RoundTrip: Send + Sync {
    fn round_trip(
        &self,
        request: Request<AttemptBody>,
    ) -> BoxFuture<'static, Result<Response<ResponseBody>, Error>>;
}

impl<T: RoundTrip + ?Sized> RoundTrip for std::sync::Arc<T> {
    fn round_trip(
        &self,
        request: Request<AttemptBody>,
    ) -> BoxFuture<'static, Result<Response<ResponseBody>, Error>> {
        (**self).round_trip(request)
    }
}

/// Adapts a cloneable `tower::Service` into a [`RoundTrip`].
///
/// Each attempt drives its own clone of the service through
/// `poll_ready` and `call`.
#[derive(Debug, Clone)]
pub struct ServiceTransport<S> {
    service: S,
}

impl<S> ServiceTransport<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

impl<S> RoundTrip for ServiceTransport<S>
where
    S: Service<Request<AttemptBody>, Response = Response<ResponseBody>>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Error: Into<Error>,
    S::Future: Send + 'static,
{
    fn round_trip(
        &self,
        request: Request<AttemptBody>,
    ) -> BoxFuture<'static, Result<Response<ResponseBody>, Error>> {
        self.service
            .clone()
            .oneshot(request)
            .map(|res| res.map_err(Into::into))
            .boxed()
    }
}
