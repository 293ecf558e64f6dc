//! Tracing / logging initialisation helpers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

pub const ENV_LOG: &str = "CHAINFEED_LOG";
pub const ENV_LOG_JSON: &str = "CHAINFEED_LOG_JSON";

/// Log level per component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Global default level or full filter directives, e.g. "info" or
    /// "warn,chainfeed_client=debug"
    #[serde(default = "default_level")]
    pub level: String,
    /// Override per component: component_name → level
    #[serde(default)]
    pub components: BTreeMap<String, String>,
    /// Emit JSON structured logs (true) or human-readable text (false)
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            components: BTreeMap::new(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Read `CHAINFEED_LOG` and `CHAINFEED_LOG_JSON`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(level) = env::var(ENV_LOG) {
            if !level.trim().is_empty() {
                config.level = level;
            }
        }
        config.json = env::var(ENV_LOG_JSON)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        config
    }

    /// Filter directive string: "info,chainfeed_client=debug" etc.
    pub fn directives(&self) -> String {
        let mut directives = self.level.clone();
        for (component, level) in &self.components {
            directives.push_str(&format!(",{}={}", component.replace('-', "_"), level));
        }
        directives
    }
}

/// Initialise tracing with the given log config.
/// Should be called once at application startup; a second call fails.
pub fn init_tracing(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_new(config.directives()).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_include_components() {
        let mut config = LogConfig::default();
        config.components.insert("chainfeed-client".into(), "debug".into());
        config.components.insert("chainfeed-pack".into(), "trace".into());
        assert_eq!(
            config.directives(),
            "info,chainfeed_client=debug,chainfeed_pack=trace"
        );
    }

    #[test]
    fn config_from_json() {
        let config: LogConfig = serde_json::from_str(r#"{"json": true}"#).unwrap();
        assert_eq!(config.level, "info");
        assert!(config.json);
    }
}
