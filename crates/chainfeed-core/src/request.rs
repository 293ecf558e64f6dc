//! Request parameters and the request envelope sent to a provider.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt::Display;
use uuid::Uuid;

use crate::{
    bound::Bound,
    chain::{default_chains, ChainId},
    format::Format,
};

/// Serialize a set as a single comma-separated string, sorted for stable output.
pub fn serialize_comma_separated<S, T>(set: &HashSet<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Display,
{
    let mut items: Vec<String> = set.iter().map(ToString::to_string).collect();
    items.sort();
    serializer.serialize_str(&items.join(","))
}

/// Block headers for a range of blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBlocksRequest {
    #[serde(default = "default_chains")]
    #[serde(
        serialize_with = "serialize_comma_separated",
        skip_serializing_if = "HashSet::is_empty"
    )]
    pub chains: HashSet<ChainId>,

    // Inclusive lower bound
    #[serde(default)]
    pub from_block: Bound,
    // Inclusive upper bound
    #[serde(default)]
    pub to_block: Bound,
}

impl Default for GetBlocksRequest {
    fn default() -> Self {
        Self {
            chains: default_chains(),
            from_block: Bound::default(),
            to_block: Bound::default(),
        }
    }
}

/// Event logs for a range of blocks, optionally filtered by emitter and topic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct GetLogsRequest {
    #[serde(default = "default_chains")]
    #[serde(
        serialize_with = "serialize_comma_separated",
        skip_serializing_if = "HashSet::is_empty"
    )]
    pub chains: HashSet<ChainId>,

    #[serde(default)]
    pub from_block: Bound,
    #[serde(default)]
    pub to_block: Bound,

    #[serde(default)]
    #[serde(
        serialize_with = "serialize_comma_separated",
        skip_serializing_if = "HashSet::is_empty"
    )]
    pub address__in: HashSet<String>,

    #[serde(default)]
    #[serde(
        serialize_with = "serialize_comma_separated",
        skip_serializing_if = "HashSet::is_empty"
    )]
    pub topic0__in: HashSet<String>,
}

impl Default for GetLogsRequest {
    fn default() -> Self {
        Self {
            chains: default_chains(),
            from_block: Bound::default(),
            to_block: Bound::default(),
            address__in: HashSet::new(),
            topic0__in: HashSet::new(),
        }
    }
}

/// The operation a request asks for, tagged by name with its params flattened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum Operation {
    GetStatus,
    GetBlocks {
        #[serde(flatten)]
        params: GetBlocksRequest,
    },
    GetLogs {
        #[serde(flatten)]
        params: GetLogsRequest,
    },
}

impl Operation {
    /// Wire name of the operation, also used as the recording directory name.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::GetStatus => "getStatus",
            Operation::GetBlocks { .. } => "getBlocks",
            Operation::GetLogs { .. } => "getLogs",
        }
    }
}

/// A single request session issued to a provider.
#[derive(Clone, Debug, Serialize)]
pub struct Request {
    pub id: Uuid,
    #[serde(flatten)]
    pub operation: Operation,
    pub format: Format,
    pub deltas: bool,
}

impl Request {
    pub fn new(operation: Operation, format: Format, deltas: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation,
            format,
            deltas,
        }
    }

    pub fn status(format: Format) -> Self {
        Self::new(Operation::GetStatus, format, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blocks_request_wire_shape() {
        let request = Request::new(
            Operation::GetBlocks {
                params: GetBlocksRequest {
                    chains: HashSet::from([ChainId::ETH, ChainId::ARB]),
                    from_block: Bound::FromLatest(10),
                    to_block: Bound::Latest,
                },
            },
            Format::Arrow,
            false,
        );

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["operation"], json!("getBlocks"));
        assert_eq!(value["chains"], json!("ARB,ETH"));
        assert_eq!(value["from_block"], json!(-10));
        assert_eq!(value["to_block"], json!("latest"));
        assert_eq!(value["format"], json!("arrow"));
        assert_eq!(value["deltas"], json!(false));
        assert!(value["id"].is_string());
    }

    #[test]
    fn empty_sets_are_omitted() {
        let value = serde_json::to_value(GetLogsRequest::default()).unwrap();
        assert!(value.get("chains").is_none());
        assert!(value.get("address__in").is_none());
        assert_eq!(value["from_block"], json!("latest"));
    }

    #[test]
    fn status_request_has_no_params() {
        let value = serde_json::to_value(Request::status(Format::JsonStream)).unwrap();
        assert_eq!(value["operation"], json!("getStatus"));
        assert_eq!(value["format"], json!("json_stream"));
    }

    #[test]
    fn request_reads_from_json() {
        let req: GetBlocksRequest =
            serde_json::from_value(json!({"chains": ["ETH"], "from_block": -10, "to_block": "latest"}))
                .unwrap();
        assert_eq!(req.chains, HashSet::from([ChainId::ETH]));
        assert_eq!(req.from_block, Bound::FromLatest(10));
    }
}
