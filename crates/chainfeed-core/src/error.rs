//! Error types for the ChainFeed client pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Structured error body the service sends instead of a data chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    #[serde(default)]
    pub code: Option<u16>,
    pub message: String,
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Errors surfaced while opening a client or consuming a response stream.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Connection failed: {endpoint}: {reason}")]
    ConnectionFailed { endpoint: String, reason: String },

    #[error("Backend shut down")]
    BackendShutDown,

    #[error("Error response from service: {0}")]
    ErrorResponse(ResponseError),

    #[error("Unsupported operation '{operation}' for this provider")]
    UnsupportedOperation { operation: String },

    #[error("Unknown chain: {0}")]
    UnknownChain(String),

    #[error("Malformed record on line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Chunk is not valid UTF-8 text")]
    InvalidText(#[from] std::str::Utf8Error),

    #[error("Columnar encode error: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors from record schema compilation or validation.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Unknown schema '{name}'")]
    NotFound { name: String },

    #[error("Schema '{name}' failed to compile: {reason}")]
    Compile { name: String, reason: String },

    #[error("Record does not match schema '{schema}': {}", .errors.join("; "))]
    Violation { schema: String, errors: Vec<String> },

    #[error("Schema document is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_lists_every_error() {
        let err = SchemaError::Violation {
            schema: "jsonstream-status".into(),
            errors: vec!["a".into(), "b".into()],
        };
        assert_eq!(
            err.to_string(),
            "Record does not match schema 'jsonstream-status': a; b"
        );
    }

    #[test]
    fn response_error_display() {
        let err: ResponseError =
            serde_json::from_str(r#"{"code":401,"message":"unauthorized"}"#).unwrap();
        assert_eq!(ClientError::ErrorResponse(err).to_string(),
            "Error response from service: 401: unauthorized");
    }
}
