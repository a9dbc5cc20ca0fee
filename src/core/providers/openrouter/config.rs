//! OpenRouter gateway configuration
//!
//! Endpoint, identification headers and per-call timeouts. The API key is
//! not part of it: credentials are resolved fresh on every request.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_REFERER: &str = "http://localhost:3000";

/// OpenRouter gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenRouterConfig {
    /// Base URL for OpenRouter API
    pub base_url: String,
    /// Sent as `HTTP-Referer` on completion calls
    pub referer: String,
    /// Sent as `X-Title` when set
    pub site_name: Option<String>,
    pub user_agent: String,
    /// Generation can be slow; this bounds a single completion call
    pub completion_timeout_secs: u64,
    pub stats_timeout_secs: u64,
    pub catalog_timeout_secs: u64,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            site_name: None,
            user_agent: format!("llm-fanout/{}", env!("CARGO_PKG_VERSION")),
            completion_timeout_secs: 120,
            stats_timeout_secs: 360,
            catalog_timeout_secs: 360,
        }
    }
}

impl OpenRouterConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("OpenRouter base URL is required".to_string());
        }

        if !self.base_url.starts_with("http") {
            return Err("OpenRouter base URL must start with http:// or https://".to_string());
        }

        if self.completion_timeout_secs == 0
            || self.stats_timeout_secs == 0
            || self.catalog_timeout_secs == 0
        {
            return Err("Timeouts must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Override fields from `LLM_FANOUT_*` variables
    pub fn apply_env_overrides_with<L>(&mut self, lookup: L) -> Result<(), String>
    where
        L: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("LLM_FANOUT_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(referer) = lookup("LLM_FANOUT_REFERER") {
            self.referer = referer;
        }
        if let Some(site_name) = lookup("LLM_FANOUT_SITE_NAME") {
            self.site_name = Some(site_name);
        }
        if let Some(timeout) = lookup("LLM_FANOUT_COMPLETION_TIMEOUT") {
            self.completion_timeout_secs = timeout
                .parse()
                .map_err(|e| format!("Invalid completion timeout '{}': {}", timeout, e))?;
        }
        if let Some(timeout) = lookup("LLM_FANOUT_STATS_TIMEOUT") {
            self.stats_timeout_secs = timeout
                .parse()
                .map_err(|e| format!("Invalid stats timeout '{}': {}", timeout, e))?;
        }
        Ok(())
    }

    /// Endpoint without a trailing slash duplication
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion_timeout_secs)
    }

    pub fn stats_timeout(&self) -> Duration {
        Duration::from_secs(self.stats_timeout_secs)
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }

    /// Set base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    /// Set site name for OpenRouter request headers
    pub fn with_site_name(mut self, site_name: impl Into<String>) -> Self {
        self.site_name = Some(site_name.into());
        self
    }

    pub fn with_completion_timeout(mut self, timeout_secs: u64) -> Self {
        self.completion_timeout_secs = timeout_secs;
        self
    }

    pub fn with_stats_timeout(mut self, timeout_secs: u64) -> Self {
        self.stats_timeout_secs = timeout_secs;
        self
    }

    /// Identification headers sent on completion calls, auth excluded
    pub fn get_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::with_capacity(2);

        headers.insert("HTTP-Referer".to_string(), self.referer.clone());

        if let Some(site_name) = &self.site_name {
            headers.insert("X-Title".to_string(), site_name.clone());
        }

        headers
    }
}
