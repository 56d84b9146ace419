//! `tower::Layer` wrapping a single-attempt service with retries.

use std::sync::Arc;

use tower::Layer;

use crate::transport::config::TransportConfig;
use crate::transport::retrying::RetryingTransport;
use crate::transport::round_trip::ServiceTransport;

/// Layer producing a [`RetryingTransport`] around any single-attempt service.
#[derive(Debug, Clone)]
pub struct RetryLayer {
    config: Arc<TransportConfig>,
}

impl RetryLayer {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl<S> Layer<S> for RetryLayer {
    type Service = RetryingTransport<ServiceTransport<S>>;

    fn layer(&self, inner: S) -> Self::Service {
        RetryingTransport::from_shared(ServiceTransport::new(inner), Arc::clone(&self.config))
    }
}
