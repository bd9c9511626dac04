//! Engine configuration loaded from TOML.
//!
//! ```toml
//! rules_path = "policies/triage-rules.toml"
//!
//! [remote]
//! enabled = true
//! endpoint = "http://localhost:11434"
//! model = "medgemma"
//! timeout_secs = 8
//! ```
//!
//! Every field has a default, so an empty document is a valid configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use triage_contracts::error::{EngineResult, TriageError};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "medgemma";
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// Settings for the remote reasoning provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// When false, every request goes straight to the rule engine.
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    /// Hard budget for one remote call, enforced by the orchestrator.
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub remote: RemoteConfig,
    /// Optional override for the rule thresholds; the embedded defaults apply when absent.
    pub rules_path: Option<PathBuf>,
}

impl EngineConfig {
    /// Parse `s` as TOML and validate it.
    pub fn from_toml_str(s: &str) -> EngineResult<Self> {
        let config: EngineConfig = toml::from_str(s).map_err(|e| TriageError::Config {
            reason: format!("failed to parse engine TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse the file at `path`.
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| TriageError::Config {
            reason: format!("failed to read engine config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> EngineResult<()> {
        if self.remote.timeout_secs == 0 {
            return Err(TriageError::Config {
                reason: "remote.timeout_secs must be at least 1".to_string(),
            });
        }
        if self.remote.enabled && self.remote.endpoint.trim().is_empty() {
            return Err(TriageError::Config {
                reason: "remote.endpoint must be set when the remote provider is enabled"
                    .to_string(),
            });
        }
        Ok(())
    }
}
