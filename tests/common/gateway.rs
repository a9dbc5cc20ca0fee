//! Fake OpenRouter gateway
//!
//! Wraps a `wiremock::MockServer` and mounts the three endpoints the client
//! talks to. Each completion mock only matches its own model, so answers
//! can never be routed to the wrong caller.

use super::fixtures::{catalog_body, completion_body, generation_body, request_id_for};
use llm_fanout::{Model, OpenRouterClient, OpenRouterConfig, StaticCredentials};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "sk-or-test-key";

pub struct TestGateway {
    pub server: MockServer,
}

impl TestGateway {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn config(&self) -> OpenRouterConfig {
        OpenRouterConfig::new(self.server.uri())
    }

    pub fn client(&self) -> OpenRouterClient {
        self.client_with(self.config())
    }

    pub fn client_with(&self, config: OpenRouterConfig) -> OpenRouterClient {
        OpenRouterClient::new(config, Arc::new(StaticCredentials::new(TEST_API_KEY)))
            .expect("client for fake gateway")
    }

    pub async fn mount_catalog(&self, models: &[Model]) {
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body(models)))
            .mount(&self.server)
            .await;
    }

    /// Successful completion for `model_id`, answered after `delay`
    pub async fn mount_completion(&self, model_id: &str, delay: Duration) {
        let body = completion_body(
            &request_id_for(model_id),
            model_id,
            &format!("answer from {}", model_id),
        );
        self.mount_completion_response(
            model_id,
            ResponseTemplate::new(200).set_body_json(body).set_delay(delay),
        )
        .await;
    }

    /// Completion for `model_id` failing with `status`
    pub async fn mount_completion_error(&self, model_id: &str, status: u16, message: &str) {
        let body = json!({"error": {"code": status, "message": message}});
        self.mount_completion_response(model_id, ResponseTemplate::new(status).set_body_json(body))
            .await;
    }

    pub async fn mount_completion_response(&self, model_id: &str, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({"model": model_id})))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    pub async fn mount_generation(&self, request_id: &str, cost: f64) {
        self.mount_generation_response(
            request_id,
            ResponseTemplate::new(200).set_body_json(generation_body(request_id, cost)),
        )
        .await;
    }

    pub async fn mount_generation_response(&self, request_id: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/generation"))
            .and(query_param("id", request_id))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Completion plus generation for each model, all answering at once
    pub async fn mount_healthy(&self, models: &[Model], delay: Duration) {
        for model in models {
            self.mount_completion(&model.id, delay).await;
            self.mount_generation(&request_id_for(&model.id), 0.0005).await;
        }
    }

    /// Bodies of every request the gateway saw on `endpoint`
    pub async fn bodies(&self, endpoint: &str) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == endpoint)
            .filter_map(|request| request.body_json::<Value>().ok())
            .collect()
    }
}
