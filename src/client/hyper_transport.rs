//! Single-attempt transport over the hyper-util client.
//!
//! TLS runs on top of the deadline-armed TCP stream, so the connection
//! deadline also bounds the handshake. Certificates are verified against the
//! bundled webpki roots.

use futures_util::future::{BoxFuture, FutureExt};
use http::header::{HeaderValue, CONNECTION};
use http::{Request, Response};
use http_body_util::BodyExt;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::body::{AttemptBody, ResponseBody};
use crate::error::Error;
use crate::net::DeadlineConnector;
use crate::transport::{RoundTrip, TransportConfig};

/// One physical attempt per call; never retries and never reuses a connection.
#[derive(Debug, Clone)]
pub struct HyperTransport {
    client: Client<HttpsConnector<DeadlineConnector>, AttemptBody>,
}

impl HyperTransport {
    pub fn new(config: &TransportConfig) -> Self {
        let connector = DeadlineConnector::new(config.dial_timeout(), config.deadline_policy());
        let https = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(connector);
        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .retry_canceled_requests(false)
            .build(https);
        Self { client }
    }
}

impl RoundTrip for HyperTransport {
    fn round_trip(
        &self,
        mut request: Request<AttemptBody>,
    ) -> BoxFuture<'static, Result<Response<ResponseBody>, Error>> {
        request
            .headers_mut()
            .entry(CONNECTION)
            .or_insert(HeaderValue::from_static("close"));

        let pending = self.client.request(request);
        async move {
            let response = pending.await?;
            Ok(response.map(|body| body.map_err(Error::from).boxed_unsync()))
        }
        .boxed()
    }
}
