//! Chain identifiers understood by the streaming service.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// A chain served by the streaming service.
///
/// Serialized as its short code (`"ETH"`, `"ARB"`, ...). Status records carry
/// the numeric id in `chain` and the code in `chain_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChainId {
    ETH,
    SEPOLIA,
    ARB,
    BASE,
    POLYGON,
    OP,
    BSC,
    FUEL,
    FUELTESTNET,
}

impl ChainId {
    pub const ALL: [ChainId; 9] = [
        ChainId::ETH,
        ChainId::SEPOLIA,
        ChainId::ARB,
        ChainId::BASE,
        ChainId::POLYGON,
        ChainId::OP,
        ChainId::BSC,
        ChainId::FUEL,
        ChainId::FUELTESTNET,
    ];

    /// Numeric chain id as reported in the `chain` field of status records.
    pub fn id(&self) -> u64 {
        match self {
            ChainId::ETH => 1,
            ChainId::SEPOLIA => 11_155_111,
            ChainId::ARB => 42_161,
            ChainId::BASE => 8_453,
            ChainId::POLYGON => 137,
            ChainId::OP => 10,
            ChainId::BSC => 56,
            ChainId::FUEL => 9_889,
            ChainId::FUELTESTNET => 0,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ChainId::ETH => "ETH",
            ChainId::SEPOLIA => "SEPOLIA",
            ChainId::ARB => "ARB",
            ChainId::BASE => "BASE",
            ChainId::POLYGON => "POLYGON",
            ChainId::OP => "OP",
            ChainId::BSC => "BSC",
            ChainId::FUEL => "FUEL",
            ChainId::FUELTESTNET => "FUELTESTNET",
        }
    }

    /// Look up a chain by its numeric id.
    pub fn from_id(id: u64) -> Option<ChainId> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ChainId {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| ClientError::UnknownChain(s.to_string()))
    }
}

/// The chain set used when a request does not name any: let the service decide.
pub fn default_chains() -> HashSet<ChainId> {
    HashSet::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_and_id() {
        assert_eq!(ChainId::ETH.to_string(), "ETH");
        assert_eq!(ChainId::ETH.id(), 1);
        assert_eq!(ChainId::from_id(42_161), Some(ChainId::ARB));
        assert_eq!(ChainId::from_id(31_337), None);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("eth".parse::<ChainId>().unwrap(), ChainId::ETH);
        assert!(matches!(
            "DOGE".parse::<ChainId>(),
            Err(ClientError::UnknownChain(_))
        ));
    }

    #[test]
    fn serde_uses_code() {
        let json = serde_json::to_string(&ChainId::BASE).unwrap();
        assert_eq!(json, "\"BASE\"");
        let parsed: ChainId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ChainId::BASE);
    }
}
