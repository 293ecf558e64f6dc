//! Block range bounds.
//!
//! The service accepts three shapes for `from_block` / `to_block`:
//! a non-negative block number, a negative offset meaning "that many blocks
//! before the latest one", or a string sentinel (`"latest"`, `"none"`).

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One end of a block range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bound {
    /// An absolute block number.
    Exact(u64),
    /// `n` blocks before the latest block. Wire form: `-n`.
    FromLatest(u64),
    /// The latest block at the time the request is served.
    #[default]
    Latest,
    /// No upper end: keep streaming new blocks as they arrive.
    Subscribe,
}

const LATEST: &str = "latest";
const SUBSCRIBE: &str = "none";

impl Serialize for Bound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Bound::Exact(n) => serializer.serialize_u64(n),
            // -0 would read back as block 0
            Bound::FromLatest(0) | Bound::Latest => serializer.serialize_str(LATEST),
            Bound::FromLatest(n) => serializer.serialize_i64(-(n.min(i64::MAX as u64) as i64)),
            Bound::Subscribe => serializer.serialize_str(SUBSCRIBE),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBound {
    Int(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for Bound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawBound::deserialize(deserializer)? {
            RawBound::Int(n) => Ok(Bound::from_offset(n)),
            RawBound::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

impl Bound {
    /// Interpret a signed offset the way the service does.
    pub fn from_offset(n: i64) -> Self {
        if n < 0 {
            Bound::FromLatest(n.unsigned_abs())
        } else {
            Bound::Exact(n as u64)
        }
    }
}

impl std::str::FromStr for Bound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            LATEST => Ok(Bound::Latest),
            SUBSCRIBE | "subscribe" => Ok(Bound::Subscribe),
            other => other
                .parse::<i64>()
                .map(Bound::from_offset)
                .map_err(|_| format!("invalid block bound '{s}'")),
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Exact(n) => write!(f, "{n}"),
            Bound::FromLatest(0) | Bound::Latest => f.write_str(LATEST),
            Bound::FromLatest(n) => write!(f, "-{n}"),
            Bound::Subscribe => f.write_str(SUBSCRIBE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_forms() {
        assert_eq!(serde_json::to_value(Bound::Exact(17_000_000)).unwrap(), json!(17_000_000));
        assert_eq!(serde_json::to_value(Bound::FromLatest(10)).unwrap(), json!(-10));
        assert_eq!(serde_json::to_value(Bound::Latest).unwrap(), json!("latest"));
        assert_eq!(serde_json::to_value(Bound::Subscribe).unwrap(), json!("none"));
    }

    #[test]
    fn zero_offset_is_latest() {
        assert_eq!(serde_json::to_value(Bound::FromLatest(0)).unwrap(), json!("latest"));
    }

    #[test]
    fn reads_back() {
        let b: Bound = serde_json::from_value(json!(-100)).unwrap();
        assert_eq!(b, Bound::FromLatest(100));
        let b: Bound = serde_json::from_value(json!(5)).unwrap();
        assert_eq!(b, Bound::Exact(5));
        let b: Bound = serde_json::from_value(json!("LATEST")).unwrap();
        assert_eq!(b, Bound::Latest);
        let b: Bound = serde_json::from_value(json!("none")).unwrap();
        assert_eq!(b, Bound::Subscribe);
        assert!(serde_json::from_value::<Bound>(json!("soon")).is_err());
    }

    #[test]
    fn display_matches_wire() {
        assert_eq!(Bound::FromLatest(3).to_string(), "-3");
        assert_eq!("-3".parse::<Bound>().unwrap(), Bound::FromLatest(3));
    }
}
