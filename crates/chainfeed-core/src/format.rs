//! Response encodings offered by the service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How response chunks are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Arrow IPC streaming format, one complete stream per chunk.
    Arrow,
    /// Newline-delimited JSON; each non-empty line is one record.
    #[default]
    JsonStream,
}

impl Format {
    /// File extension used for recorded chunks of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Arrow => "arrow",
            Format::JsonStream => "jsonl",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Arrow => f.write_str("arrow"),
            Format::JsonStream => f.write_str("json_stream"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_serde() {
        assert_eq!(serde_json::to_string(&Format::JsonStream).unwrap(), "\"json_stream\"");
        assert_eq!(serde_json::to_string(&Format::Arrow).unwrap(), "\"arrow\"");
        assert_eq!(Format::default(), Format::JsonStream);
    }
}
