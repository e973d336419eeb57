// Configuration for the chat client: which Ollama endpoint to call, which
// model to ask and whether requests should ever time out.
//
// Resolution order is defaults -> optional JSON file in the user's config
// directory -> environment variables. The resulting `ChatConfig` is handed
// to `ChatClient::new` explicitly; nothing here is process-wide state.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Local Ollama chat endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/chat";
/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "llama3";

pub const ENV_ENDPOINT: &str = "OLLAMA_URL";
pub const ENV_MODEL: &str = "OLLAMA_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "OLLAMA_TIMEOUT_SECS";

/// Settings for `ChatClient`. Missing fields in a config file fall back to
/// the defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ChatConfig {
    pub endpoint: String,
    pub model: String,
    /// `None` keeps the connection open for as long as the server takes.
    pub timeout_secs: Option<u64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: None,
        }
    }
}

impl ChatConfig {
    /// Load the configuration the CLI runs with: defaults, then the config
    /// file if there is one, then `OLLAMA_*` environment variables.
    pub fn load() -> Result<Self> {
        let config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Read a JSON config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ChatConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.model = model;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow!("{ENV_TIMEOUT_SECS} must be a number of seconds: {e}"))?;
            self.timeout_secs = Some(secs);
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("asistente-python").join("config.json"))
    }
}
