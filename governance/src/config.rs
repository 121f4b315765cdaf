//! Engine configuration with TOML file support.

use agora_types::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for both governance engines.
///
/// Can be loaded from a TOML file via [`GovernanceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub hub: HubConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Deployer of the registry; holds the chairperson role initially.
    #[serde(default = "default_chairperson")]
    pub chairperson: Address,

    /// Proposal names created at construction time.
    #[serde(default)]
    pub proposals: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubConfig {
    /// Minimum for + against votes before a proposal may execute.
    #[serde(default = "default_quorum")]
    pub quorum: u64,

    #[serde(default = "default_execution_authority")]
    pub execution_authority: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub format: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_chairperson() -> Address {
    Address::repeat_byte(0x01)
}

fn default_quorum() -> u64 {
    3
}

fn default_execution_authority() -> Address {
    Address::repeat_byte(0x02)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GovernanceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject configurations the engines would refuse to construct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry.chairperson.is_zero() {
            return Err(ConfigError::Invalid("registry.chairperson is the zero address".into()));
        }
        if self.hub.execution_authority.is_zero() {
            return Err(ConfigError::Invalid(
                "hub.execution_authority is the zero address".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "human" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be \"human\" or \"json\", got {:?}",
                self.logging.format
            )));
        }
        Ok(())
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            hub: HubConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            chairperson: default_chairperson(),
            proposals: Vec::new(),
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            quorum: default_quorum(),
            execution_authority: default_execution_authority(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
