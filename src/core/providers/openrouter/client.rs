//! OpenRouter HTTP client
//!
//! Implements both the model directory and the single-request executor.
//! The API key is resolved on every call and only ever placed in the
//! `Authorization` header.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::{Config, CredentialProvider, EnvCredentials};
use crate::core::traits::{ChatBackend, ModelCatalog};
use crate::core::types::{ChatResponse, CompletionParams, CostAndStats, Model};
use crate::utils::error::{CallError, Error, Result};

use super::config::OpenRouterConfig;
use super::error::OpenRouterErrorMapper;
use super::models::parse_models;
use super::transformer::{OpenRouterRequestTransformer, OpenRouterResponseTransformer};

/// OpenRouter gateway client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: Client,
    config: Arc<OpenRouterConfig>,
    credentials: Arc<dyn CredentialProvider>,
    error_mapper: OpenRouterErrorMapper,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        config.validate().map_err(Error::Config)?;

        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config: Arc::new(config),
            credentials,
            error_mapper: OpenRouterErrorMapper,
        })
    }

    /// Client for a loaded configuration, reading the key from the
    /// environment.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.gateway.clone(),
            Arc::new(EnvCredentials::new(config.credentials.clone())),
        )
    }

    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    fn with_identification(&self, mut request: RequestBuilder) -> RequestBuilder {
        for (name, value) in self.config.get_headers() {
            request = request.header(name, value);
        }
        request
    }

    /// Send, check the status and decode the body as JSON
    async fn send(
        &self,
        request: RequestBuilder,
        timeout: Duration,
    ) -> std::result::Result<Value, CallError> {
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        if !status.is_success() {
            return Err(self.error_mapper.map_http_error(status.as_u16(), &body));
        }

        let value: Value = serde_json::from_str(&body)?;
        if let Some(error) = self.error_mapper.map_json_error(&value) {
            return Err(error);
        }
        Ok(value)
    }
}

fn transport_error(error: reqwest::Error, timeout: Duration) -> CallError {
    if error.is_timeout() {
        CallError::Timeout(timeout)
    } else {
        CallError::from(error)
    }
}

#[async_trait]
impl ModelCatalog for OpenRouterClient {
    async fn fetch_models(&self) -> Result<Vec<Model>> {
        let url = self.config.endpoint("models");
        debug!(url = %url, "Fetching model catalog");

        let started = Instant::now();
        let body = self
            .send(self.http.get(&url), self.config.catalog_timeout())
            .await
            .map_err(|cause| Error::CatalogUnavailable { cause })?;
        let models = parse_models(body).map_err(|cause| Error::CatalogUnavailable { cause })?;

        info!(
            models = models.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Model catalog fetched"
        );
        Ok(models)
    }
}

#[async_trait]
impl ChatBackend for OpenRouterClient {
    async fn complete(&self, model: &Model, params: &CompletionParams) -> Result<ChatResponse> {
        let api_key = self.credentials.api_key()?;

        let request = OpenRouterRequestTransformer::transform_request(&model.id, params);
        let raw_request =
            serde_json::to_value(&request).map_err(|e| Error::request_failed(&model.id, e.into()))?;

        debug!(model = %model.id, "Sending completion request");
        let started = Instant::now();

        let http_request = self
            .with_identification(self.http.post(self.config.endpoint("chat/completions")))
            .bearer_auth(api_key)
            .json(&raw_request);

        let raw_response = self
            .send(http_request, self.config.completion_timeout())
            .await
            .map_err(|cause| Error::request_failed(&model.id, cause))?;
        let parsed = OpenRouterResponseTransformer::parse_completion(&raw_response)
            .map_err(|cause| Error::request_failed(&model.id, cause))?;

        let elapsed = started.elapsed();
        info!(
            model = %model.id,
            request_id = %parsed.id,
            elapsed_ms = elapsed.as_millis() as u64,
            "Completion received"
        );

        Ok(ChatResponse {
            id: parsed.id,
            model: model.id.clone(),
            prompt: params.system_prompt.clone(),
            user_input: params.user_input.clone(),
            response: parsed.content,
            raw_request,
            raw_response,
            elapsed,
        })
    }

    async fn fetch_cost_and_stats(&self, request_id: &str) -> Result<CostAndStats> {
        let api_key = self.credentials.api_key()?;

        debug!(request_id = %request_id, "Fetching cost and stats");
        let started = Instant::now();

        let http_request = self
            .http
            .get(self.config.endpoint("generation"))
            .query(&[("id", request_id)])
            .bearer_auth(api_key);

        let body = self
            .send(http_request, self.config.stats_timeout())
            .await
            .map_err(|cause| Error::stats_unavailable(request_id, cause))?;
        let (stats, data) = OpenRouterResponseTransformer::parse_generation(body)
            .map_err(|cause| Error::stats_unavailable(request_id, cause))?;

        let elapsed = started.elapsed();
        info!(
            request_id = %request_id,
            cost = stats.usage,
            elapsed_ms = elapsed.as_millis() as u64,
            "Cost and stats received"
        );

        Ok(CostAndStats {
            id: request_id.to_string(),
            gpt_tokens_prompt: stats.tokens_prompt,
            gpt_tokens_completion: stats.tokens_completion,
            native_tokens_prompt: stats.native_tokens_prompt,
            native_tokens_completion: stats.native_tokens_completion,
            cost: stats.usage,
            raw_response: data,
            elapsed,
        })
    }
}
