//! Replaceable response body stream and the chunk transform contract.
//!
//! A body is an ordered stream of byte chunks. Transforms see each chunk
//! exactly once, in order, and emit one chunk per input chunk.

use crate::base::neterror::NetError;
use bytes::Bytes;
use futures::stream::{self, Stream, TryStreamExt};
use http_body::Frame;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, StreamBody};
use std::pin::Pin;
use std::task::{Context, Poll};

/// A stateful per-body transform stage.
///
/// Instances are created per response and dropped with the stream, so
/// any state they hold never outlives one exchange.
pub trait ChunkTransform: Send {
    fn transform(&mut self, chunk: Bytes) -> Bytes;
}

/// Response body as a boxed stream of chunks.
pub struct BodyStream {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, NetError>> + Send>>,
}

impl BodyStream {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, NetError>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }

    pub fn empty() -> Self {
        Self::new(stream::empty())
    }

    /// Build a body from in-memory chunks.
    pub fn from_chunks<I, B>(chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        let chunks: Vec<Result<Bytes, NetError>> =
            chunks.into_iter().map(|c| Ok(c.into())).collect();
        Self::new(stream::iter(chunks))
    }

    /// Adapt an upstream `http_body::Body`. Trailers are dropped.
    pub fn from_body<B>(body: B) -> Self
    where
        B: http_body::Body<Data = Bytes> + Send + 'static,
        B::Error: std::fmt::Display,
    {
        Self::new(body.into_data_stream().map_err(NetError::body))
    }

    /// Chain a transform stage after this stream.
    pub fn pipe<T>(self, mut transform: T) -> Self
    where
        T: ChunkTransform + 'static,
    {
        Self::new(self.map_ok(move |chunk| transform.transform(chunk)))
    }

    /// Expose the stream as an `http_body::Body` for the transport.
    pub fn into_http_body(self) -> UnsyncBoxBody<Bytes, NetError> {
        StreamBody::new(self.map_ok(Frame::data)).boxed_unsync()
    }

    /// Read the remaining stream into one buffer.
    pub async fn collect_bytes(self) -> Result<Bytes, NetError> {
        let chunks: Vec<Bytes> = self.try_collect().await?;
        Ok(chunks.concat().into())
    }
}

impl Default for BodyStream {
    fn default() -> Self {
        Self::empty()
    }
}

impl Stream for BodyStream {
    type Item = Result<Bytes, NetError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyStream").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use http_body_util::Full;

    struct Upper;

    impl ChunkTransform for Upper {
        fn transform(&mut self, chunk: Bytes) -> Bytes {
            Bytes::from(chunk.to_ascii_uppercase())
        }
    }

    struct Counter(usize);

    impl ChunkTransform for Counter {
        fn transform(&mut self, chunk: Bytes) -> Bytes {
            self.0 += 1;
            Bytes::from(format!("{}:{}", self.0, String::from_utf8_lossy(&chunk)))
        }
    }

    #[tokio::test]
    async fn test_pipe_preserves_order() {
        let body = BodyStream::from_chunks(["a", "b", "c"]).pipe(Counter(0));
        let chunks: Vec<Bytes> = body.map(|c| c.unwrap()).collect().await;
        assert_eq!(chunks, vec!["1:a", "2:b", "3:c"]);
    }

    #[tokio::test]
    async fn test_pipe_chains() {
        let body = BodyStream::from_chunks(["x", "y"]).pipe(Upper).pipe(Counter(0));
        assert_eq!(body.collect_bytes().await.unwrap(), "1:X2:Y");
    }

    #[tokio::test]
    async fn test_error_passes_through() {
        let chunks = vec![Ok(Bytes::from("ok")), Err(NetError::body("reset"))];
        let mut body = BodyStream::new(stream::iter(chunks)).pipe(Upper);
        assert_eq!(body.next().await.unwrap().unwrap(), "OK");
        assert!(matches!(
            body.next().await.unwrap(),
            Err(NetError::HttpBodyError { .. })
        ));
    }

    #[tokio::test]
    async fn test_http_body_roundtrip() {
        let body = BodyStream::from_body(Full::new(Bytes::from("hello")));
        let http_body = body.pipe(Upper).into_http_body();
        let collected = http_body.collect().await.unwrap().to_bytes();
        assert_eq!(collected, "HELLO");
    }
}
