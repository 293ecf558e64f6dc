//! In-memory `Provider` implementation.
//!
//! Serves scripted chunks per operation and records every request it
//! receives. Suitable for tests and for driving the examples offline.

use async_trait::async_trait;
use chainfeed_core::{ClientError, Request, ResponseError};
use futures::{stream, StreamExt};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::debug;

use crate::{
    config::ClientConfig,
    provider::{ChunkStream, Provider},
};

#[derive(Debug, Clone)]
enum Scripted {
    Chunk(Vec<u8>),
    Error(ResponseError),
}

#[derive(Default)]
struct Inner {
    /// operation name → items replayed for every request of that operation
    scripts: HashMap<String, Vec<Scripted>>,
    requests: Vec<Request>,
    closed: bool,
}

/// Thread-safe scripted provider.
#[derive(Clone, Default)]
pub struct MemoryProvider {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a chunk to the script for `operation` (e.g. `"getStatus"`).
    pub fn push_chunk(&self, operation: &str, chunk: impl Into<Vec<u8>>) {
        self.lock()
            .scripts
            .entry(operation.to_string())
            .or_default()
            .push(Scripted::Chunk(chunk.into()));
    }

    /// Append an error response to the script for `operation`; it is
    /// yielded as [`ClientError::ErrorResponse`] in its place.
    pub fn push_error(&self, operation: &str, code: Option<u16>, message: impl Into<String>) {
        self.lock()
            .scripts
            .entry(operation.to_string())
            .or_default()
            .push(Scripted::Error(ResponseError {
                code,
                message: message.into(),
            }));
    }

    /// Builder-style variant of [`push_chunk`](Self::push_chunk).
    pub fn with_chunk(self, operation: &str, chunk: impl Into<Vec<u8>>) -> Self {
        self.push_chunk(operation, chunk);
        self
    }

    pub fn with_chunks<I, C>(self, operation: &str, chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        for chunk in chunks {
            self.push_chunk(operation, chunk);
        }
        self
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.lock().requests.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

#[async_trait]
impl Provider for MemoryProvider {
    async fn connect(_config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::new())
    }

    async fn request(&self, request: Request) -> Result<ChunkStream, ClientError> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(ClientError::BackendShutDown);
        }

        let operation = request.operation.name();
        let script = inner
            .scripts
            .get(operation)
            .cloned()
            .ok_or_else(|| ClientError::UnsupportedOperation {
                operation: operation.to_string(),
            })?;
        debug!(id = %request.id, operation, items = script.len(), "serving scripted response");
        inner.requests.push(request);

        let items = script.into_iter().map(|item| match item {
            Scripted::Chunk(data) => Ok(data),
            Scripted::Error(response) => Err(ClientError::ErrorResponse(response)),
        });
        Ok(stream::iter(items).boxed())
    }

    async fn close(&self) -> Result<(), ClientError> {
        self.lock().closed = true;
        Ok(())
    }
}
