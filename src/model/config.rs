use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Which persistence backend mirrors the app state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Local,
    Remote,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Local => "local",
            Backend::Remote => "remote",
        }
    }

    pub fn parse(s: &str) -> Result<Backend, String> {
        match s {
            "local" => Ok(Backend::Local),
            "remote" => Ok(Backend::Remote),
            _ => Err(format!("unknown backend '{}' (expected: local, remote)", s)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: Backend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Default: see the config.toml template in cli/handlers/init.rs
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            base_url: default_base_url(),
        }
    }
}

/// Default: see the config.toml template in cli/handlers/init.rs
fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

/// Default: see the config.toml template in cli/handlers/init.rs
fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_gets_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.store.backend, Backend::Local);
        assert_eq!(config.remote.base_url, "http://localhost:5000");
        assert!(config.ui.show_key_hints);
    }

    #[test]
    fn backend_parses_from_lowercase() {
        let config: Config = toml::from_str("[store]\nbackend = \"remote\"\n").unwrap();
        assert_eq!(config.store.backend, Backend::Remote);
        assert!(Backend::parse("nope").is_err());
    }
}
