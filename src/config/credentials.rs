//! API key resolution
//!
//! Keys are looked up on every request so a rotated key takes effect
//! without restarting the process. The `.env` file is read, never loaded
//! into the process environment.

use crate::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Names of the environment variables holding the API key, highest
/// priority first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub env_vars: Vec<String>,
    /// Read the `.env` file before each lookup; its values win over the
    /// process environment
    pub load_dotenv: bool,
    pub dotenv_path: PathBuf,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            env_vars: vec![
                "OPENAI_API_KEY".to_string(),
                "OPENROUTER_API_KEY".to_string(),
            ],
            load_dotenv: true,
            dotenv_path: PathBuf::from(".env"),
        }
    }
}

impl CredentialsConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.env_vars.is_empty() {
            return Err("At least one credential environment variable is required".to_string());
        }
        if self.env_vars.iter().any(|name| name.trim().is_empty()) {
            return Err("Credential environment variable names must not be empty".to_string());
        }
        Ok(())
    }
}

/// Supplies a bearer token for one outbound request
pub trait CredentialProvider: Send + Sync + fmt::Debug {
    fn api_key(&self) -> Result<String>;
}

/// Reads the key from the first configured environment variable that is set
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    config: CredentialsConfig,
}

impl EnvCredentials {
    pub fn new(config: CredentialsConfig) -> Self {
        Self { config }
    }

    /// Resolve against an arbitrary variable lookup; blank values count as
    /// unset.
    pub fn resolve_with<L>(&self, lookup: L) -> Result<String>
    where
        L: Fn(&str) -> Option<String>,
    {
        self.config
            .env_vars
            .iter()
            .find_map(|name| {
                lookup(name)
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty())
            })
            .ok_or_else(|| {
                Error::CredentialMissing(format!(
                    "set one of {} (checked in that order)",
                    self.config.env_vars.join(", ")
                ))
            })
    }

    /// Configured variables found in the `.env` file. A missing file yields
    /// an empty map.
    fn dotenv_values(&self) -> Result<HashMap<String, String>> {
        let path = &self.config.dotenv_path;
        let entries = match dotenvy::from_path_iter(path) {
            Ok(entries) => entries,
            Err(e) if e.not_found() => return Ok(HashMap::new()),
            Err(e) => {
                return Err(Error::config(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let mut values = HashMap::new();
        for entry in entries {
            let (name, value) = entry.map_err(|e| {
                Error::config(format!("Failed to parse {}: {}", path.display(), e))
            })?;
            if self.config.env_vars.contains(&name) {
                values.insert(name, value);
            }
        }
        Ok(values)
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(CredentialsConfig::default())
    }
}

impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> Result<String> {
        let from_file = if self.config.load_dotenv {
            self.dotenv_values()?
        } else {
            HashMap::new()
        };
        self.resolve_with(|name| from_file.get(name).cloned().or_else(|| env::var(name).ok()))
    }
}

/// Fixed key, for embedding and tests
#[derive(Clone)]
pub struct StaticCredentials(String);

impl StaticCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self(api_key.into())
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticCredentials([REDACTED])")
    }
}

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
