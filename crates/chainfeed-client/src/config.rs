//! Client connection configuration.

use serde::{Deserialize, Serialize};
use std::env;

pub const ENV_URL: &str = "CHAINFEED_URL";
pub const ENV_USERNAME: &str = "CHAINFEED_USERNAME";
pub const ENV_PASSWORD: &str = "CHAINFEED_PASSWORD";
pub const ENV_SECURE: &str = "CHAINFEED_SECURE";

/// Connection settings handed to [`Provider::connect`](crate::Provider::connect).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service endpoint, e.g. "feed.example.org". File-backed providers
    /// interpret it as a directory.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Use TLS (`wss`/`https`) when true
    #[serde(default = "bool_true")]
    pub secure: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

fn default_endpoint() -> String {
    "localhost:8080".into()
}
fn bool_true() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            secure: true,
            username: None,
            password: None,
        }
    }
}

impl ClientConfig {
    /// Read settings from the process environment.
    ///
    /// Callers that keep credentials in a `.env` file should load it first
    /// (`dotenvy::dotenv_override()`); this function only looks at the
    /// environment. Unset or empty variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            endpoint: var(ENV_URL).unwrap_or(defaults.endpoint),
            secure: var(ENV_SECURE)
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(defaults.secure),
            username: var(ENV_USERNAME),
            password: var(ENV_PASSWORD),
        }
    }

    /// Both halves of a credential pair, when present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => Some((u.as_str(), p.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert!(config.credentials().is_none());
    }

    #[test]
    fn reads_every_variable() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_URL, "feed.internal:9000"),
            (ENV_SECURE, "false"),
            (ENV_USERNAME, "alice"),
            (ENV_PASSWORD, "hunter2"),
        ]));
        assert_eq!(config.endpoint, "feed.internal:9000");
        assert!(!config.secure);
        assert_eq!(config.credentials(), Some(("alice", "hunter2")));
    }

    #[test]
    fn empty_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_URL, "  "), (ENV_USERNAME, "")]));
        assert_eq!(config.endpoint, "localhost:8080");
        assert!(config.username.is_none());
    }

    #[test]
    fn password_is_never_serialized() {
        let config = ClientConfig {
            password: Some("hunter2".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
    }
}
