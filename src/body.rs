//! Request and response body plumbing.
//!
//! Request bodies are buffered once into `Bytes` so every attempt can replay
//! them. Response bodies are boxed so fakes, hyper and middleware all return
//! the same `Response<ResponseBody>` shape.

use std::convert::Infallible;

use bytes::Bytes;
use http_body::Body;
use http_body_util::{combinators::UnsyncBoxBody, BodyExt, Empty, Full};

use crate::error::{BoxError, Error};

/// Body of every response returned by the transport.
pub type ResponseBody = UnsyncBoxBody<Bytes, Error>;

/// Body of every request handed to the underlying transport.
pub type AttemptBody = Full<Bytes>;

/// Response body over a fixed buffer.
pub fn full(bytes: impl Into<Bytes>) -> ResponseBody {
    Full::new(bytes.into())
        .map_err(|never: Infallible| match never {})
        .boxed_unsync()
}

/// Response body with no content.
pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never: Infallible| match never {})
        .boxed_unsync()
}

/// Read a response body to the end.
pub async fn to_bytes(body: ResponseBody) -> Result<Bytes, Error> {
    Ok(body.collect().await?.to_bytes())
}

/// Read a request body fully into memory.
///
/// Failures surface as [`Error::Body`].
pub(crate) async fn buffer<B>(body: B) -> Result<Bytes, Error>
where
    B: Body + Send,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    if body.is_end_stream() {
        return Ok(Bytes::new());
    }
    let collected = body
        .collect()
        .await
        .map_err(|err| Error::Body(err.into()))?;
    Ok(collected.to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body::Frame;
    use http_body_util::StreamBody;
    use std::io;

    #[tokio::test]
    async fn buffer_reads_whole_body() {
        let bytes = buffer(Full::new(Bytes::from_static(b"ping"))).await.unwrap();
        assert_eq!(bytes, Bytes::from_static(b"ping"));
    }

    #[tokio::test]
    async fn buffer_of_empty_body_is_empty() {
        let bytes = buffer(Empty::<Bytes>::new()).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn buffer_failure_is_body_error() {
        let frames: Vec<Result<Frame<Bytes>, io::Error>> = vec![
            Ok(Frame::data(Bytes::from_static(b"pi"))),
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "client went away")),
        ];
        let body = StreamBody::new(futures_util::stream::iter(frames));

        let err = buffer(body).await.unwrap_err();
        assert!(matches!(err, Error::Body(_)));
    }

    #[tokio::test]
    async fn full_round_trips_through_to_bytes() {
        let bytes = to_bytes(full("pong")).await.unwrap();
        assert_eq!(bytes, Bytes::from_static(b"pong"));
        assert!(to_bytes(empty()).await.unwrap().is_empty());
    }
}
