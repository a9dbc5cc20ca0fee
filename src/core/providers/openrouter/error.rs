//! OpenRouter error mapping
//!
//! Turns a non-success status (or an in-band `error` object) into a
//! `CallError` that keeps the gateway's own message.

use crate::utils::error::CallError;
use serde_json::Value;

/// Longest raw body excerpt kept in an error message
const MAX_BODY_EXCERPT: usize = 512;

/// OpenRouter-specific error mapper
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenRouterErrorMapper;

impl OpenRouterErrorMapper {
    pub fn map_http_error(&self, status_code: u16, response_body: &str) -> CallError {
        let message = serde_json::from_str::<Value>(response_body)
            .ok()
            .and_then(|body| Self::error_message(&body))
            .unwrap_or_else(|| match status_code {
                401 => "Invalid API key".to_string(),
                402 => "Insufficient credits".to_string(),
                404 => "Not found".to_string(),
                429 => "Rate limit exceeded".to_string(),
                _ => excerpt(response_body),
            });

        CallError::Api {
            status_code,
            message,
        }
    }

    /// OpenRouter can answer 200 with an `error` object when the upstream
    /// provider fails mid-request.
    pub fn map_json_error(&self, body: &Value) -> Option<CallError> {
        let error = body.get("error")?;
        let status_code = error
            .get("code")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
            .unwrap_or(502);
        let message = Self::error_message(body).unwrap_or_else(|| error.to_string());

        Some(CallError::Api {
            status_code,
            message,
        })
    }

    fn error_message(body: &Value) -> Option<String> {
        let error = body.get("error")?;
        let message = error.get("message").and_then(Value::as_str)?;

        let provider = error
            .get("metadata")
            .and_then(|metadata| metadata.get("provider_name"))
            .and_then(Value::as_str);

        Some(match provider {
            Some(provider) => format!("{}: {}", provider, message),
            None => message.to_string(),
        })
    }
}

fn excerpt(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "Empty response body".to_string();
    }
    match body.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
