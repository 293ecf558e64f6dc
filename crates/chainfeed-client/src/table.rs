//! Arrow chunk decoding and table accumulation.
//!
//! Every `arrow` chunk is a self-contained Arrow IPC stream (schema message
//! followed by zero or more record batches). [`ArrowTable`] concatenates the
//! decoded batches in arrival order and refuses chunks whose column set
//! differs from the first chunk's.

use arrow::{
    compute::concat_batches,
    datatypes::{Schema, SchemaRef},
    error::ArrowError,
    ipc::{reader::StreamReader, writer::StreamWriter},
    record_batch::RecordBatch,
    util::pretty::pretty_format_batches,
};
use chainfeed_core::ClientError;
use futures::TryStreamExt;
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

use crate::provider::ChunkStream;

/// Errors from decoding or accumulating Arrow chunks.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Arrow decode error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("Schema mismatch in chunk {chunk}: expected [{expected}], got [{got}]")]
    SchemaMismatch {
        chunk: usize,
        expected: String,
        got: String,
    },

    #[error(transparent)]
    Stream(#[from] ClientError),
}

/// Decode one IPC stream chunk into its schema and record batches.
pub fn decode_chunk(chunk: &[u8]) -> Result<(SchemaRef, Vec<RecordBatch>), TableError> {
    let reader = StreamReader::try_new(Cursor::new(chunk), None)?;
    let schema = reader.schema();
    let batches = reader.collect::<Result<Vec<_>, ArrowError>>()?;
    Ok((schema, batches))
}

/// Encode record batches as one IPC stream chunk.
pub fn encode_chunk(schema: &Schema, batches: &[RecordBatch]) -> Result<Vec<u8>, ArrowError> {
    let mut buf = Vec::new();
    {
        let mut writer = StreamWriter::try_new(&mut buf, schema)?;
        for batch in batches {
            writer.write(batch)?;
        }
        writer.finish()?;
    }
    Ok(buf)
}

fn column_list(schema: &Schema) -> String {
    schema
        .fields()
        .iter()
        .map(|f| format!("{}: {}", f.name(), f.data_type()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A table grown chunk by chunk.
#[derive(Debug, Clone, Default)]
pub struct ArrowTable {
    schema: Option<SchemaRef>,
    batches: Vec<RecordBatch>,
    chunks: usize,
    rows: usize,
}

impl ArrowTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk and append its rows. Returns the number of rows added.
    pub fn extend_from_chunk(&mut self, chunk: &[u8]) -> Result<usize, TableError> {
        let (schema, batches) = decode_chunk(chunk)?;
        self.extend(schema, batches)
    }

    /// Append already-decoded batches that share `schema`.
    pub fn extend(
        &mut self,
        schema: SchemaRef,
        batches: Vec<RecordBatch>,
    ) -> Result<usize, TableError> {
        match &self.schema {
            Some(expected) if expected.fields() != schema.fields() => {
                return Err(TableError::SchemaMismatch {
                    chunk: self.chunks,
                    expected: column_list(expected),
                    got: column_list(&schema),
                });
            }
            Some(_) => {}
            None => self.schema = Some(schema),
        }

        let added: usize = batches.iter().map(RecordBatch::num_rows).sum();
        self.batches.extend(batches.into_iter().filter(|b| b.num_rows() > 0));
        self.chunks += 1;
        self.rows += added;
        debug!(chunk = self.chunks, added, total = self.rows, "chunk appended");
        Ok(added)
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Number of chunks consumed, including empty ones.
    pub fn num_chunks(&self) -> usize {
        self.chunks
    }

    pub fn num_columns(&self) -> usize {
        self.schema.as_ref().map_or(0, |s| s.fields().len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Schema of the first chunk, once one has been consumed.
    pub fn schema(&self) -> Option<&SchemaRef> {
        self.schema.as_ref()
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// The whole table as a single record batch.
    pub fn concat(&self) -> Result<Option<RecordBatch>, TableError> {
        match &self.schema {
            Some(schema) => Ok(Some(concat_batches(schema, &self.batches)?)),
            None => Ok(None),
        }
    }

    /// Render the table as an ASCII grid.
    pub fn pretty(&self) -> Result<String, TableError> {
        if self.batches.is_empty() {
            return Ok(match &self.schema {
                Some(schema) => format!("(0 rows) [{}]", column_list(schema)),
                None => "(empty table)".to_string(),
            });
        }
        Ok(pretty_format_batches(&self.batches)?.to_string())
    }
}

/// Drain an Arrow chunk stream into a single table, in arrival order.
pub async fn accumulate(mut chunks: ChunkStream) -> Result<ArrowTable, TableError> {
    let mut table = ArrowTable::new();
    while let Some(chunk) = chunks.try_next().await? {
        table.extend_from_chunk(&chunk)?;
    }
    Ok(table)
}
