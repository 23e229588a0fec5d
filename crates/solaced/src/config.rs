//! Configuration for solaced.
//!
//! Loads settings from /etc/solace/config.toml, falling back to defaults
//! on any problem - a broken config file must never take the engine down.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/solace/config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolaceConfig {
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// When false the engine is rule-based only; equivalent to a backend
    /// that always fails.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Ollama-compatible chat endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Per-call timeout. Kept short to bias toward the deterministic
    /// fallback over a slow backend.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Most recent turns sent as context.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_model() -> String {
    "qwen2.5:3b-instruct".to_string()
}

fn default_timeout() -> u64 {
    8
}

fn default_history_limit() -> usize {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout(),
            history_limit: default_history_limit(),
        }
    }
}

impl SolaceConfig {
    /// Load from `path`, warning and defaulting on read or parse errors.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config at {} - using defaults", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SolaceConfig::default();
        assert!(config.backend.enabled);
        assert_eq!(config.backend.history_limit, 10);
        assert_eq!(config.backend.timeout_secs, 8);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SolaceConfig = toml::from_str(
            r#"
            [backend]
            model = "llama3.2:3b"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.model, "llama3.2:3b");
        assert_eq!(config.backend.endpoint, "http://127.0.0.1:11434");
        assert!(config.backend.enabled);
    }

    #[test]
    fn test_load_missing_file_defaults() {
        let config = SolaceConfig::load_or_default("/nonexistent/solace.toml");
        assert!(config.backend.enabled);
    }

    #[test]
    fn test_load_broken_file_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml {{").unwrap();
        let config = SolaceConfig::load_or_default(file.path());
        assert_eq!(config.backend.history_limit, 10);
    }

    #[test]
    fn test_disabled_backend_parses() {
        let config: SolaceConfig = toml::from_str(
            r#"
            [backend]
            enabled = false
            "#,
        )
        .unwrap();
        assert!(!config.backend.enabled);
    }
}
