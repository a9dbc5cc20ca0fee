//! Cost and token statistics for a completed request

use super::serde_helpers::duration_secs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Telemetry the gateway records for a finished generation.
///
/// The `gpt_*` counters use the gateway's normalized tokenizer, the
/// `native_*` counters the model's own tokenizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAndStats {
    /// Same as the originating `ChatResponse::id`
    pub id: String,
    pub gpt_tokens_prompt: u64,
    pub gpt_tokens_completion: u64,
    pub native_tokens_prompt: u64,
    pub native_tokens_completion: u64,
    /// USD
    pub cost: f64,
    pub raw_response: Value,
    #[serde(rename = "elapsed_time", with = "duration_secs")]
    pub elapsed: Duration,
}

impl CostAndStats {
    pub fn gpt_tokens_total(&self) -> u64 {
        self.gpt_tokens_prompt + self.gpt_tokens_completion
    }

    pub fn native_tokens_total(&self) -> u64 {
        self.native_tokens_prompt + self.native_tokens_completion
    }
}
