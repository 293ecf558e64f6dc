//! `Provider` trait — abstraction over the service transport.
//!
//! A provider turns a [`Request`] into a stream of raw chunks. The client
//! layers typed helpers on top; everything about how bytes travel lives
//! behind this trait.

use async_trait::async_trait;
use chainfeed_core::{ClientError, Request};
use futures::Stream;
use std::pin::Pin;

use crate::config::ClientConfig;

/// A stream of typed items from a single request session.
pub type ResponseStream<T> = Pin<Box<dyn Stream<Item = Result<T, ClientError>> + Send>>;

/// A stream of raw response chunks.
pub type ChunkStream = ResponseStream<Vec<u8>>;

#[async_trait]
pub trait Provider: Send + Sync + Sized {
    /// Open the provider with the given settings.
    async fn connect(config: &ClientConfig) -> Result<Self, ClientError>;

    /// Issue one request and return its chunk stream.
    ///
    /// The stream is lazy and forward-only; to read the data again the
    /// request must be issued again.
    async fn request(&self, request: Request) -> Result<ChunkStream, ClientError>;

    /// Release whatever the provider holds open.
    async fn close(&self) -> Result<(), ClientError> {
        Ok(())
    }
}
