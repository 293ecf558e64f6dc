//! The status record streamed by `getStatus`.

use serde::{Deserialize, Serialize};

use crate::chain::ChainId;

/// Health and progress of one indexing service for one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(rename = "type")]
    pub kind: String,
    /// Numeric chain id
    pub chain: u64,
    pub chain_code: String,
    pub chain_name: String,
    pub entity: String,
    pub latest_block_height: u64,
    pub service: String,
    pub status: String,
    /// Unix timestamp of the report
    pub timestamp: u64,
}

impl Status {
    /// The known chain this record refers to, if any.
    pub fn chain_id(&self) -> Option<ChainId> {
        ChainId::from_id(self.chain)
    }
}
