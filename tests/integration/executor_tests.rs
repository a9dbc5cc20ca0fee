//! Single-request executor tests: one completion, one stats lookup

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{completion_body, generation_body, request_id_for};
    use crate::common::gateway::TEST_API_KEY;
    use crate::common::{ModelFactory, TestGateway};
    use llm_fanout::{
        CallError, ChatBackend, CompletionParams, CredentialsConfig, EnvCredentials, Error,
        OpenRouterClient,
    };
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn params() -> CompletionParams {
        CompletionParams::new("Answer in one word.", "Capital of France?").with_temperature(0.2)
    }

    #[tokio::test]
    async fn test_complete_returns_full_record() {
        let gateway = TestGateway::start().await;
        let model = ModelFactory::create("openai/gpt-4o");
        gateway.mount_completion(&model.id, Duration::ZERO).await;

        let response = crate::assert_ok!(gateway.client().complete(&model, &params()).await);

        assert_eq!(response.id, request_id_for(&model.id));
        assert_eq!(response.model, "openai/gpt-4o");
        assert_eq!(response.prompt, "Answer in one word.");
        assert_eq!(response.user_input, "Capital of France?");
        assert_eq!(response.response, "answer from openai/gpt-4o");
        assert_eq!(response.raw_request["model"], "openai/gpt-4o");
        assert_eq!(response.raw_response["usage"]["total_tokens"], 42);
    }

    #[tokio::test]
    async fn test_complete_sends_expected_request() {
        let gateway = TestGateway::start().await;
        let model = ModelFactory::create("openai/gpt-4o");
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .and(header("http-referer", "http://localhost:3000"))
            .and(header("x-title", "fanout tests"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion_body("gen-1", &model.id, "Paris")),
            )
            .expect(1)
            .mount(&gateway.server)
            .await;

        let client = gateway.client_with(gateway.config().with_site_name("fanout tests"));
        let response = crate::assert_ok!(client.complete(&model, &params().with_max_tokens(64)).await);
        assert_eq!(response.response, "Paris");

        let bodies = gateway.bodies("/chat/completions").await;
        assert_eq!(
            bodies[0],
            json!({
                "model": "openai/gpt-4o",
                "messages": [
                    {"role": "system", "content": "Answer in one word."},
                    {"role": "user", "content": "Capital of France?"}
                ],
                "temperature": 0.2,
                "max_tokens": 64
            })
        );
    }

    #[tokio::test]
    async fn test_complete_error_names_model_and_status() {
        let gateway = TestGateway::start().await;
        let model = ModelFactory::create("mistralai/mistral-large");
        gateway
            .mount_completion_error(&model.id, 429, "Rate limit exceeded: free tier")
            .await;

        let error = crate::assert_err!(gateway.client().complete(&model, &params()).await);
        match error {
            Error::RequestFailed { model, cause } => {
                assert_eq!(model, "mistralai/mistral-large");
                assert_eq!(cause.status_code(), Some(429));
                assert!(cause.to_string().contains("free tier"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_in_band_error_with_success_status() {
        let gateway = TestGateway::start().await;
        let model = ModelFactory::create("anthropic/claude-3.5-sonnet");
        let body = json!({
            "error": {
                "code": 502,
                "message": "Upstream overloaded",
                "metadata": {"provider_name": "Anthropic"}
            }
        });
        gateway
            .mount_completion_response(&model.id, ResponseTemplate::new(200).set_body_json(body))
            .await;

        let error = crate::assert_err!(gateway.client().complete(&model, &params()).await);
        assert!(matches!(
            error,
            Error::RequestFailed {
                cause: CallError::Api { status_code: 502, ref message },
                ..
            } if message == "Anthropic: Upstream overloaded"
        ));
    }

    #[tokio::test]
    async fn test_missing_choices_names_the_field() {
        let gateway = TestGateway::start().await;
        let model = ModelFactory::create("openai/gpt-4o");
        gateway
            .mount_completion_response(
                &model.id,
                ResponseTemplate::new(200).set_body_json(json!({"id": "gen-1", "object": "chat.completion"})),
            )
            .await;

        let error = crate::assert_err!(gateway.client().complete(&model, &params()).await);
        match error {
            Error::RequestFailed {
                cause: CallError::Parsing(message),
                ..
            } => assert!(message.contains("choices"), "message: {}", message),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_parsing_error() {
        let gateway = TestGateway::start().await;
        let model = ModelFactory::create("openai/gpt-4o");
        gateway
            .mount_completion_response(
                &model.id,
                ResponseTemplate::new(200).set_body_string("<html>Bad Gateway</html>"),
            )
            .await;

        let error = crate::assert_err!(gateway.client().complete(&model, &params()).await);
        assert!(matches!(
            error,
            Error::RequestFailed {
                cause: CallError::Parsing(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_completion_timeout() {
        let gateway = TestGateway::start().await;
        let model = ModelFactory::create("openai/o1");
        gateway.mount_completion(&model.id, Duration::from_secs(3)).await;

        let client = gateway.client_with(gateway.config().with_completion_timeout(1));
        let error = crate::assert_err!(client.complete(&model, &params()).await);

        assert!(matches!(
            error,
            Error::RequestFailed {
                cause: CallError::Timeout(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_fetch_cost_and_stats_keeps_request_id() {
        let gateway = TestGateway::start().await;
        gateway.mount_generation("req-42", 0.000415).await;

        let stats = crate::assert_ok!(gateway.client().fetch_cost_and_stats("req-42").await);

        assert_eq!(stats.id, "req-42");
        assert_eq!(stats.gpt_tokens_prompt, 12);
        assert_eq!(stats.gpt_tokens_completion, 30);
        assert_eq!(stats.native_tokens_prompt, 14);
        assert_eq!(stats.native_tokens_completion, 28);
        crate::assert_approx_eq!(stats.cost, 0.000415);
        assert_eq!(stats.raw_response["generation_time"], 640);
    }

    #[tokio::test]
    async fn test_fetch_cost_and_stats_is_authenticated() {
        let gateway = TestGateway::start().await;
        Mock::given(method("GET"))
            .and(path("/generation"))
            .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(generation_body("gen-7", 0.01)))
            .expect(1)
            .mount(&gateway.server)
            .await;

        crate::assert_ok!(gateway.client().fetch_cost_and_stats("gen-7").await);
    }

    #[tokio::test]
    async fn test_unknown_generation_is_stats_unavailable() {
        let gateway = TestGateway::start().await;
        gateway
            .mount_generation_response(
                "gen-missing",
                ResponseTemplate::new(404)
                    .set_body_json(json!({"error": {"code": 404, "message": "Generation not found"}})),
            )
            .await;

        let error = crate::assert_err!(gateway.client().fetch_cost_and_stats("gen-missing").await);
        match error {
            Error::StatsUnavailable { request_id, cause } => {
                assert_eq!(request_id, "gen-missing");
                assert_eq!(
                    cause,
                    CallError::Api {
                        status_code: 404,
                        message: "Generation not found".to_string()
                    }
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_never_reach_the_gateway() {
        let gateway = TestGateway::start().await;
        let model = ModelFactory::create("openai/gpt-4o");
        gateway.mount_completion(&model.id, Duration::ZERO).await;

        let credentials = EnvCredentials::new(CredentialsConfig {
            env_vars: vec!["LLM_FANOUT_INTEGRATION_UNSET_KEY".to_string()],
            load_dotenv: false,
            ..CredentialsConfig::default()
        });
        let client = OpenRouterClient::new(gateway.config(), Arc::new(credentials)).unwrap();

        let error = crate::assert_err!(client.complete(&model, &params()).await);
        assert!(matches!(error, Error::CredentialMissing(ref message) if message.contains("LLM_FANOUT_INTEGRATION_UNSET_KEY")));
        assert!(gateway.bodies("/chat/completions").await.is_empty());
    }
}
