//! Configuration management
//!
//! A YAML file (optional) is loaded first, then `LLM_FANOUT_*` environment
//! variables override individual fields, then the result is validated.

pub mod credentials;

pub use credentials::{CredentialProvider, CredentialsConfig, EnvCredentials, StaticCredentials};

use crate::core::batch::FanOutConfig;
use crate::core::providers::openrouter::OpenRouterConfig;
use crate::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gateway endpoint and timeouts
    pub gateway: OpenRouterConfig,
    /// Failure policy and concurrency of both fan-out rounds
    pub dispatch: FanOutConfig,
    pub credentials: CredentialsConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Defaults overridden by environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides_with(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// File (when given) plus environment overrides
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path).await?,
            None => Self::default(),
        };
        config.apply_env_overrides_with(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides_with<L>(&mut self, lookup: L) -> Result<()>
    where
        L: Fn(&str) -> Option<String>,
    {
        self.gateway
            .apply_env_overrides_with(&lookup)
            .map_err(Error::Config)?;

        if let Some(policy) = lookup("LLM_FANOUT_FAILURE_POLICY") {
            self.dispatch.failure_policy = policy.parse()?;
        }
        if let Some(limit) = lookup("LLM_FANOUT_MAX_CONCURRENCY") {
            let limit: usize = limit
                .parse()
                .map_err(|e| Error::config(format!("Invalid max concurrency '{}': {}", limit, e)))?;
            self.dispatch.max_concurrency = Some(limit);
        }
        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.gateway
            .validate()
            .map_err(|e| Error::config(format!("Gateway config error: {}", e)))?;

        if self.dispatch.max_concurrency == Some(0) {
            return Err(Error::config("Dispatch config error: max_concurrency must be at least 1"));
        }

        self.credentials
            .validate()
            .map_err(|e| Error::config(format!("Credentials config error: {}", e)))?;

        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
