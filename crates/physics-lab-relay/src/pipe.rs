//! Byte-for-byte relay of an upstream stream into a response body.
//!
//! Chunks are handed to the response as soon as they are polled, in arrival order.
//! When the caller disconnects hyper drops the body, which drops the wrapped
//! upstream stream and with it the upstream connection.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::BoxError;
use bytes::Bytes;
use futures_util::Stream;

/// Stream adapter that counts what it forwards and logs how the relay ended.
pub struct RelayStream<S> {
    inner: S,
    bytes: u64,
    chunks: u64,
    finished: bool,
}

impl<S> RelayStream<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            bytes: 0,
            chunks: 0,
            finished: false,
        }
    }

    pub fn bytes_forwarded(&self) -> u64 {
        self.bytes
    }
}

impl<S, E> Stream for RelayStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: fmt::Display,
{
    type Item = Result<Bytes, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.bytes += chunk.len() as u64;
                this.chunks += 1;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.finished = true;
                tracing::warn!(
                    target: "physics_lab::pipe",
                    error = %e,
                    bytes = this.bytes,
                    "upstream stream failed mid-relay"
                );
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.finished = true;
                tracing::debug!(
                    target: "physics_lab::pipe",
                    bytes = this.bytes,
                    chunks = this.chunks,
                    "upstream stream complete"
                );
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<S> Drop for RelayStream<S> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::info!(
                target: "physics_lab::pipe",
                bytes = self.bytes,
                chunks = self.chunks,
                "caller closed the stream early; upstream dropped"
            );
        }
    }
}

/// Wraps an upstream byte stream as a response body without buffering it.
pub fn relay_body<S, E>(upstream: S) -> Body
where
    S: Stream<Item = Result<Bytes, E>> + Unpin + Send + 'static,
    E: Into<BoxError> + fmt::Display + 'static,
{
    Body::from_stream(RelayStream::new(upstream))
}
