//! Client construction and the process-wide default instance.

use std::sync::OnceLock;

use bytes::Bytes;
use http::{Method, Request, Response, Uri};
use http_body::Body;
use http_body_util::Full;

use crate::body::{AttemptBody, ResponseBody};
use crate::client::hyper_transport::HyperTransport;
use crate::error::{BoxError, Result};
use crate::lifecycle::Cancellation;
use crate::transport::{RetryingTransport, TransportConfig};

/// HTTP client that retries according to its [`TransportConfig`].
///
/// Cheap to clone; clones share the configuration and connector.
#[derive(Debug, Clone)]
pub struct ResilientClient {
    transport: RetryingTransport<HyperTransport>,
}

/// Compose the hyper transport, the deadline connector and the retry loop.
pub fn new_client(config: TransportConfig) -> ResilientClient {
    let inner = HyperTransport::new(&config);
    ResilientClient {
        transport: RetryingTransport::new(inner, config),
    }
}

/// Shared client built with `TransportConfig::default()` on first use.
pub fn default_client() -> &'static ResilientClient {
    static DEFAULT: OnceLock<ResilientClient> = OnceLock::new();
    DEFAULT.get_or_init(|| new_client(TransportConfig::default()))
}

impl ResilientClient {
    pub fn config(&self) -> &TransportConfig {
        self.transport.config()
    }

    /// The retrying transport, usable directly as a `tower::Service`.
    pub fn transport(&self) -> &RetryingTransport<HyperTransport> {
        &self.transport
    }

    pub async fn request<B>(&self, request: Request<B>) -> Result<Response<ResponseBody>>
    where
        B: Body + Send,
        B::Data: Send,
        B::Error: Into<BoxError>,
    {
        self.transport.execute(request, &Cancellation::never()).await
    }

    /// Like [`request`](Self::request), abandoning the request once `cancel`
    /// fires.
    pub async fn request_with_cancel<B>(
        &self,
        request: Request<B>,
        cancel: &Cancellation,
    ) -> Result<Response<ResponseBody>>
    where
        B: Body + Send,
        B::Data: Send,
        B::Error: Into<BoxError>,
    {
        self.transport.execute(request, cancel).await
    }

    pub async fn get<U>(&self, uri: U) -> Result<Response<ResponseBody>>
    where
        U: TryInto<Uri>,
        U::Error: Into<http::Error>,
    {
        self.send(Method::GET, uri, Bytes::new()).await
    }

    pub async fn head<U>(&self, uri: U) -> Result<Response<ResponseBody>>
    where
        U: TryInto<Uri>,
        U::Error: Into<http::Error>,
    {
        self.send(Method::HEAD, uri, Bytes::new()).await
    }

    pub async fn delete<U>(&self, uri: U) -> Result<Response<ResponseBody>>
    where
        U: TryInto<Uri>,
        U::Error: Into<http::Error>,
    {
        self.send(Method::DELETE, uri, Bytes::new()).await
    }

    pub async fn post<U>(&self, uri: U, body: impl Into<Bytes>) -> Result<Response<ResponseBody>>
    where
        U: TryInto<Uri>,
        U::Error: Into<http::Error>,
    {
        self.send(Method::POST, uri, body.into()).await
    }

    pub async fn put<U>(&self, uri: U, body: impl Into<Bytes>) -> Result<Response<ResponseBody>>
    where
        U: TryInto<Uri>,
        U::Error: Into<http::Error>,
    {
        self.send(Method::PUT, uri, body.into()).await
    }

    pub async fn patch<U>(&self, uri: U, body: impl Into<Bytes>) -> Result<Response<ResponseBody>>
    where
        U: TryInto<Uri>,
        U::Error: Into<http::Error>,
    {
        self.send(Method::PATCH, uri, body.into()).await
    }

    async fn send<U>(&self, method: Method, uri: U, body: Bytes) -> Result<Response<ResponseBody>>
    where
        U: TryInto<Uri>,
        U::Error: Into<http::Error>,
    {
        let request: Request<AttemptBody> = Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(body))?;
        self.request(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::time::Duration;

    #[test]
    fn default_client_is_a_singleton() {
        let a = default_client() as *const ResilientClient;
        let b = default_client() as *const ResilientClient;
        assert_eq!(a, b);
        assert_eq!(default_client().config().max_tries(), 3);
    }

    #[tokio::test]
    async fn invalid_uri_fails_before_any_attempt() {
        let client = new_client(TransportConfig::default());
        let err = client.get("not a uri").await.unwrap_err();
        assert!(matches!(err, Error::Request(_)));
        assert!(!err.is_temporary());
    }

    #[tokio::test]
    async fn config_is_kept() {
        let client = new_client(
            TransportConfig::new()
                .with_max_tries(5)
                .with_dial_timeout(Duration::from_millis(300)),
        );
        assert_eq!(client.config().max_tries(), 5);
        assert_eq!(client.config().dial_timeout(), Duration::from_millis(300));
    }
}
