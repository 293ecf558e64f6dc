//! # chainfeed-core
//!
//! Core types shared across all ChainFeed crates: chain identifiers, block
//! range bounds, output formats, request envelopes, the status record,
//! JSON-lines record parsing and the fixed record schemas that streamed
//! output is validated against.

pub mod bound;
pub mod chain;
pub mod error;
pub mod format;
pub mod records;
pub mod request;
pub mod schema;
pub mod status;

pub use bound::Bound;
pub use chain::ChainId;
pub use error::{ClientError, ResponseError, SchemaError};
pub use format::Format;
pub use records::{parse_each, parse_lines, parse_records};
pub use request::{GetBlocksRequest, GetLogsRequest, Operation, Request};
pub use schema::RecordSchema;
pub use status::Status;

/// Convenience alias used across the client crates.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;
