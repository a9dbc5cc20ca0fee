//! OpenRouter model directory schema
//!
//! Typed view of `GET /models`. Prices arrive as decimal strings
//! (`"0.000003"`); plain numbers are accepted as well.

use crate::core::types::Model;
use crate::utils::error::CallError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct OpenRouterModelsResponse {
    pub data: Vec<OpenRouterModel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenRouterModel {
    pub id: String,
    pub name: String,
    pub pricing: Pricing,
    pub context_length: u64,
    pub architecture: Architecture,
    pub top_provider: TopProvider,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pricing {
    #[serde(deserialize_with = "price")]
    pub prompt: f64,
    #[serde(deserialize_with = "price")]
    pub completion: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Architecture {
    pub tokenizer: String,
    /// `null` for models without a fixed instruction format
    #[serde(default)]
    pub instruct_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopProvider {
    /// `null` when the provider publishes no limit
    #[serde(default)]
    pub max_completion_tokens: Option<u64>,
}

impl From<OpenRouterModel> for Model {
    fn from(model: OpenRouterModel) -> Self {
        Model {
            id: model.id,
            name: model.name,
            pricing_prompt: model.pricing.prompt,
            pricing_completion: model.pricing.completion,
            context_length: model.context_length,
            max_completion_tokens: model.top_provider.max_completion_tokens,
            tokenizer: model.architecture.tokenizer,
            instruct_type: model.architecture.instruct_type,
        }
    }
}

/// Parse a directory payload, failing on the first malformed entry
pub fn parse_models(body: Value) -> Result<Vec<Model>, CallError> {
    let response: OpenRouterModelsResponse = serde_json::from_value(body)?;
    Ok(response.data.into_iter().map(Model::from).collect())
}

fn price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Text(String),
        Number(f64),
    }

    match Price::deserialize(deserializer)? {
        Price::Number(value) => Ok(value),
        Price::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid price '{}'", text))),
    }
}
