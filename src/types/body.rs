//! Response bodies.
//!
//! Origin bodies arrive as single-consumption byte streams. A [`Body`] is
//! either such a stream or a fully buffered [`Bytes`] value; only the latter
//! can be handed out more than once, which is what [`Body::duplicate`] is for.

use std::fmt;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt, stream};

use crate::Result;

/// Boxed stream of body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// A response body.
pub enum Body {
    /// Fully buffered bytes. Cloning the inner `Bytes` is cheap and yields an
    /// independent handle.
    Full(Bytes),
    /// Single-consumption stream of chunks.
    Stream(ByteStream),
}

impl Body {
    /// An empty body.
    pub fn empty() -> Self {
        Body::Full(Bytes::new())
    }

    /// Wrap a chunk stream.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Body::Stream(Box::pin(stream))
    }

    /// Buffered bytes, if this body is not a stream.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Body::Full(bytes) => Some(bytes),
            Body::Stream(_) => None,
        }
    }

    /// Drain the body into a single contiguous buffer.
    pub async fn into_bytes(self) -> Result<Bytes> {
        match self {
            Body::Full(bytes) => Ok(bytes),
            Body::Stream(mut chunks) => {
                let mut buf = BytesMut::new();
                while let Some(chunk) = chunks.next().await {
                    buf.extend_from_slice(&chunk?);
                }
                Ok(buf.freeze())
            }
        }
    }

    /// Split the body into two independently consumable bodies.
    ///
    /// Streams cannot be cloned lazily, so a streaming body is buffered in
    /// full first. Reading either half never affects the other.
    pub async fn duplicate(self) -> Result<(Body, Body)> {
        let bytes = self.into_bytes().await?;
        Ok((Body::Full(bytes.clone()), Body::Full(bytes)))
    }

    /// Convert into a chunk stream, for handing to an HTTP server.
    pub fn into_stream(self) -> ByteStream {
        match self {
            Body::Full(bytes) if bytes.is_empty() => Box::pin(stream::empty()),
            Body::Full(bytes) => Box::pin(stream::once(async move { Ok(bytes) })),
            Body::Stream(chunks) => chunks,
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Full(bytes) => f.debug_tuple("Full").field(&bytes.len()).finish(),
            Body::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Full(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Full(Bytes::from(bytes))
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Full(Bytes::from(text))
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Body::Full(Bytes::from_static(text.as_bytes()))
    }
}
