//! OpenRouter request/response transformer
//!
//! Builds the chat request body and maps the chat and generation payloads
//! into typed records. Missing fields are errors, so schema drift on the
//! gateway side shows up immediately.

use crate::core::types::CompletionParams;
use crate::utils::error::CallError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenRouterMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenRouterChatRequest {
    pub model: String,
    pub messages: Vec<OpenRouterMessage>,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionBody {
    id: String,
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Fields of a completion reply the client relies on
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCompletion {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerationBody {
    data: Value,
}

/// Token counts and cost of one generation (`GET /generation`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerationStats {
    pub tokens_prompt: u64,
    pub tokens_completion: u64,
    pub native_tokens_prompt: u64,
    pub native_tokens_completion: u64,
    /// Cost in USD
    pub usage: f64,
}

pub struct OpenRouterRequestTransformer;

impl OpenRouterRequestTransformer {
    pub fn transform_request(model_id: &str, params: &CompletionParams) -> OpenRouterChatRequest {
        OpenRouterChatRequest {
            model: model_id.to_string(),
            messages: vec![
                OpenRouterMessage {
                    role: "system",
                    content: params.system_prompt.clone(),
                },
                OpenRouterMessage {
                    role: "user",
                    content: params.user_input.clone(),
                },
            ],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        }
    }
}

pub struct OpenRouterResponseTransformer;

impl OpenRouterResponseTransformer {
    pub fn parse_completion(body: &Value) -> Result<ParsedCompletion, CallError> {
        let parsed = ChatCompletionBody::deserialize(body)?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CallError::Parsing("`choices` is empty, expected choices[0]".to_string()))?;

        Ok(ParsedCompletion {
            id: parsed.id,
            content: choice.message.content,
        })
    }

    /// Returns the stats and the `data` object they were read from
    pub fn parse_generation(body: Value) -> Result<(GenerationStats, Value), CallError> {
        let GenerationBody { data } = serde_json::from_value(body)?;
        let stats = GenerationStats::deserialize(&data)?;
        Ok((stats, data))
    }
}
