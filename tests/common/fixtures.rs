//! Test fixtures and data factories
//!
//! Payloads mirror what OpenRouter actually returns, extra fields included.

use llm_fanout::Model;
use serde_json::{Value, json};

/// Factory for catalog models
pub struct ModelFactory;

impl ModelFactory {
    /// Model with a readable name and typical pricing
    pub fn create(id: &str) -> Model {
        let mut model = Model::from_id(id);
        model.name = display_name(id);
        model.pricing_prompt = 0.000003;
        model.pricing_completion = 0.000015;
        model.context_length = 128_000;
        model.max_completion_tokens = Some(4096);
        model.tokenizer = "GPT".to_string();
        model
    }

    /// `count` distinct models, `vendor-0/model-0` onwards
    pub fn many(count: usize) -> Vec<Model> {
        (0..count)
            .map(|i| Self::create(&format!("vendor-{}/model-{}", i, i)))
            .collect()
    }
}

fn display_name(id: &str) -> String {
    let (vendor, model) = id.split_once('/').unwrap_or(("unknown", id));
    format!("{}: {}", vendor, model)
}

/// One `/models` entry for `model`
pub fn catalog_entry(model: &Model) -> Value {
    json!({
        "id": model.id,
        "name": model.name,
        "created": 1_718_000_000,
        "description": "fixture model",
        "pricing": {
            "prompt": model.pricing_prompt.to_string(),
            "completion": model.pricing_completion.to_string(),
            "image": "0",
            "request": "0"
        },
        "context_length": model.context_length,
        "architecture": {
            "modality": "text->text",
            "tokenizer": model.tokenizer,
            "instruct_type": model.instruct_type
        },
        "top_provider": {
            "context_length": model.context_length,
            "max_completion_tokens": model.max_completion_tokens,
            "is_moderated": false
        },
        "per_request_limits": null
    })
}

pub fn catalog_body(models: &[Model]) -> Value {
    json!({ "data": models.iter().map(catalog_entry).collect::<Vec<_>>() })
}

pub fn completion_body(request_id: &str, model_id: &str, content: &str) -> Value {
    json!({
        "id": request_id,
        "provider": "Fixture",
        "model": model_id,
        "object": "chat.completion",
        "created": 1_718_000_000,
        "choices": [{
            "index": 0,
            "logprobs": null,
            "finish_reason": "stop",
            "message": {"role": "assistant", "content": content, "refusal": null}
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 30, "total_tokens": 42}
    })
}

pub fn generation_body(request_id: &str, cost: f64) -> Value {
    json!({
        "data": {
            "id": request_id,
            "model": "fixture/model",
            "streamed": false,
            "generation_time": 640,
            "latency": 210,
            "tokens_prompt": 12,
            "tokens_completion": 30,
            "native_tokens_prompt": 14,
            "native_tokens_completion": 28,
            "usage": cost,
            "finish_reason": "stop"
        }
    })
}

/// Request id the fake gateway assigns to `model_id`
pub fn request_id_for(model_id: &str) -> String {
    format!("gen-{}", model_id.replace('/', "-"))
}
