//! `ReplayProvider` — serves recorded sessions from disk.
//!
//! Layout under the endpoint directory:
//! ```text
//! <endpoint>/
//!   getStatus/0001.jsonl
//!   getStatus/0002.jsonl
//!   getBlocks/0001.jsonl
//!   getBlocks/0001.arrow   (optional, served as-is for arrow requests)
//! ```
//! Each file is one chunk; files are served in name order. Request
//! parameters are logged but do not select data.
//!
//! Arrow requests against a JSON-lines recording are answered by encoding
//! each recorded chunk as an IPC stream. The schema is inferred once over
//! every record of the operation so that all chunks share one column set.

use arrow::{
    datatypes::Schema,
    error::ArrowError,
    json::{reader::infer_json_schema_from_iterator, ReaderBuilder},
    record_batch::RecordBatch,
};
use async_trait::async_trait;
use chainfeed_core::{records::parse_lines, ClientError, Format, Request};
use futures::{stream, StreamExt};
use std::{
    io::Cursor,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, info};

use crate::{
    config::ClientConfig,
    provider::{ChunkStream, Provider},
    table::encode_chunk,
};

/// File-backed provider rooted at a recording directory.
#[derive(Debug, Clone)]
pub struct ReplayProvider {
    root: PathBuf,
}

impl ReplayProvider {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ClientError::ConnectionFailed {
                endpoint: root.display().to_string(),
                reason: "recording directory does not exist".into(),
            });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Chunk files of one operation with the given extension, in name order.
    fn chunk_files(&self, operation: &str, extension: &str) -> Result<Vec<PathBuf>, ClientError> {
        let dir = self.root.join(operation);
        if !dir.is_dir() {
            return Err(ClientError::UnsupportedOperation {
                operation: operation.to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|e| e == extension) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn json_stream(files: Vec<PathBuf>) -> ChunkStream {
        stream::iter(files)
            .then(|path| async move {
                debug!(path = %path.display(), "replaying chunk");
                tokio::fs::read(&path).await.map_err(ClientError::from)
            })
            .boxed()
    }

    async fn arrow_chunks(files: Vec<PathBuf>) -> Result<Vec<Vec<u8>>, ClientError> {
        let mut raw = Vec::with_capacity(files.len());
        for path in &files {
            raw.push(tokio::fs::read(path).await?);
        }
        encode_recording(&raw)
    }
}

/// Convert JSON-lines chunks into Arrow IPC chunks sharing one schema.
fn encode_recording(raw: &[Vec<u8>]) -> Result<Vec<Vec<u8>>, ClientError> {
    let schema = Arc::new(inferred_schema(raw)?);

    raw.iter()
        .map(|chunk| {
            let batches = ReaderBuilder::new(schema.clone())
                .build(Cursor::new(chunk.as_slice()))
                .map_err(encode_err)?
                .collect::<Result<Vec<RecordBatch>, ArrowError>>()
                .map_err(encode_err)?;
            encode_chunk(&schema, &batches).map_err(encode_err)
        })
        .collect()
}

fn encode_err(e: ArrowError) -> ClientError {
    ClientError::Encode(e.to_string())
}

#[async_trait]
impl Provider for ReplayProvider {
    async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let provider = Self::open(&config.endpoint)?;
        info!(root = %provider.root.display(), "replaying recorded sessions");
        Ok(provider)
    }

    async fn request(&self, request: Request) -> Result<ChunkStream, ClientError> {
        let operation = request.operation.name();
        debug!(request = %serde_json::to_string(&request)?, "replay request");

        match request.format {
            Format::JsonStream => {
                let files = self.chunk_files(operation, Format::JsonStream.extension())?;
                Ok(Self::json_stream(files))
            }
            Format::Arrow => {
                let recorded = self.chunk_files(operation, Format::Arrow.extension())?;
                if !recorded.is_empty() {
                    return Ok(Self::json_stream(recorded));
                }
                let files = self.chunk_files(operation, Format::JsonStream.extension())?;
                let chunks = Self::arrow_chunks(files).await?;
                Ok(stream::iter(chunks.into_iter().map(Ok)).boxed())
            }
        }
    }
}

/// Schema the replay provider would infer for a set of JSON-lines chunks.
pub fn inferred_schema(raw: &[Vec<u8>]) -> Result<Schema, ClientError> {
    let mut records = Vec::new();
    for chunk in raw {
        records.extend(parse_lines(chunk)?);
    }
    infer_json_schema_from_iterator(records.iter().map(Ok::<_, ArrowError>)).map_err(encode_err)
}
