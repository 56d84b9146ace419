//! Connection establishment with a dial timeout and a per-connection deadline.

use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::future::BoxFuture;
use http::Uri;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tower::Service;

use crate::error::BoxError;
use crate::net::connection::DeadlineStream;
use crate::policy::DeadlinePolicy;

/// Dials TCP connections and arms each one with a fresh deadline.
///
/// Accepts both `http` and `https` URIs; TLS is layered on top by the client.
#[derive(Clone)]
pub struct DeadlineConnector {
    http: HttpConnector,
    deadline: Arc<dyn DeadlinePolicy>,
}

impl DeadlineConnector {
    pub fn new(dial_timeout: Duration, deadline: Arc<dyn DeadlinePolicy>) -> Self {
        let mut http = HttpConnector::new();
        http.set_connect_timeout(Some(dial_timeout));
        http.set_nodelay(true);
        http.enforce_http(false);
        Self { http, deadline }
    }
}

impl fmt::Debug for DeadlineConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeadlineConnector")
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

impl Service<Uri> for DeadlineConnector {
    type Response = DeadlineStream<TokioIo<TcpStream>>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.http.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, dst: Uri) -> Self::Future {
        let connecting = self.http.call(dst.clone());
        let deadline = Arc::clone(&self.deadline);
        Box::pin(async move {
            let io = connecting.await.map_err(|err| {
                tracing::debug!(uri = %dst, error = %err, "Connect failed");
                BoxError::from(err)
            })?;
            let stream = DeadlineStream::new(io, deadline.deadline());
            tracing::debug!(uri = %dst, connection_id = %stream.id(), "Connection established");
            Ok(stream)
        })
    }
}
