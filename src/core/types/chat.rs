//! Completion parameters and the per-model completion record

use super::serde_helpers::duration_secs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Everything a completion call needs besides the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionParams {
    pub system_prompt: String,
    pub user_input: String,
    pub temperature: f64,
    /// Sent as `max_tokens` when set
    pub max_tokens: Option<u32>,
}

impl CompletionParams {
    pub fn new(system_prompt: impl Into<String>, user_input: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_input: user_input.into(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Answer of one model to one prompt.
///
/// `id` is assigned by the gateway and is the correlation key for the
/// later cost/stats lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: String,
    pub model: String,
    pub prompt: String,
    pub user_input: String,
    pub response: String,
    /// Body that was POSTed, kept for diagnostics
    pub raw_request: Value,
    /// Body the gateway returned, kept for diagnostics
    pub raw_response: Value,
    #[serde(rename = "elapsed_time", with = "duration_secs")]
    pub elapsed: Duration,
}
