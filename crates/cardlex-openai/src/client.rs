// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat completions services.
//!
//! Provides [`OpenAiClient`] which handles request construction, bearer
//! authentication, and envelope extraction. Failures come back as
//! [`ProviderSendError`] material for the classifier; no retry happens
//! here, the caller surfaces a retryable hint instead.

use std::time::Duration;

use cardlex_config::model::OpenAiConfig;
use cardlex_core::{CardlexError, ProviderSendError, TransportError};
use serde_json::Value;
use tracing::debug;

use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ModelList};

/// HTTP client for an OpenAI-compatible service.
///
/// The API key is a per-call argument: the gateway resolves a different
/// credential per request (explicit, stored, or shared fallback).
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a new client against the configured base URL.
    pub fn new(config: &OpenAiConfig, timeout: Duration) -> Result<Self, CardlexError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CardlexError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sends a chat completions request and returns the reply text.
    ///
    /// The reply text is the first choice's content, still unparsed; the
    /// caller validates it against the output schema.
    pub async fn generate(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<String, ProviderSendError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        debug!(status = %status, model = %request.model, "chat completion response received");

        if !status.is_success() {
            return Err(http_failure(status, response).await);
        }

        let payload = read_json(response).await?;
        extract_reply_text(&payload)
    }

    /// Fetches the ids of the models this credential can use.
    ///
    /// An empty listing is a valid answer, not an error.
    pub async fn list_models(&self, api_key: &str) -> Result<Vec<String>, ProviderSendError> {
        let url = format!("{}/v1/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        debug!(status = %status, "model listing response received");

        if !status.is_success() {
            return Err(http_failure(status, response).await);
        }

        let payload = read_json(response).await?;
        let listing: ModelList =
            serde_json::from_value(payload.clone()).map_err(|e| ProviderSendError::Envelope {
                message: format!("malformed model listing: {e}"),
                payload: Some(payload),
            })?;
        Ok(listing.data.into_iter().map(|m| m.id).collect())
    }
}

fn transport_failure(e: reqwest::Error) -> ProviderSendError {
    ProviderSendError::Transport(TransportError::from_parts(
        e.is_timeout(),
        e.is_connect(),
        &e.to_string(),
    ))
}

async fn http_failure(status: reqwest::StatusCode, response: reqwest::Response) -> ProviderSendError {
    let body = response.text().await.unwrap_or_default();
    ProviderSendError::Http {
        status: status.as_u16(),
        payload: serde_json::from_str(&body).ok(),
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, ProviderSendError> {
    let body = response.text().await.map_err(transport_failure)?;
    serde_json::from_str(&body).map_err(|e| ProviderSendError::Envelope {
        message: format!("reply is not valid JSON: {e}"),
        payload: None,
    })
}

fn extract_reply_text(payload: &Value) -> Result<String, ProviderSendError> {
    let reply: ChatCompletionResponse =
        serde_json::from_value(payload.clone()).map_err(|e| ProviderSendError::Envelope {
            message: format!("malformed chat completion envelope: {e}"),
            payload: Some(payload.clone()),
        })?;

    let Some(choice) = reply.choices.into_iter().next() else {
        return Err(ProviderSendError::Envelope {
            message: "reply contained no choices".to_string(),
            payload: Some(payload.clone()),
        });
    };

    match choice.message.content {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ProviderSendError::Envelope {
            message: "reply choice carried no content".to_string(),
            payload: Some(payload.clone()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::build_request;
    use cardlex_core::{ChatMessage, OutputSchema, PurposeType};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OpenAiClient {
        let config = OpenAiConfig {
            base_url: base_url.to_string(),
            ..OpenAiConfig::default()
        };
        OpenAiClient::new(&config, Duration::from_secs(5)).unwrap()
    }

    fn test_request() -> ChatCompletionRequest {
        let messages = vec![
            ChatMessage::system("You translate words."),
            ChatMessage::user("translate 'bonjour' into English"),
        ];
        let schema = OutputSchema::for_purpose(PurposeType::Translation, false);
        build_request("gpt-4o-mini", &messages, &schema)
    }

    #[tokio::test]
    async fn generate_returns_first_choice_content() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [
                {"message": {"role": "assistant", "content": "{\"translation\": \"hello\"}"}}
            ]
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "response_format": {"type": "json_schema", "json_schema": {"strict": true}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let text = client.generate("test-key", &test_request()).await.unwrap();
        assert_eq!(text, "{\"translation\": \"hello\"}");
    }

    #[tokio::test]
    async fn generate_surfaces_http_status_and_payload() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(&error_body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .generate("bad-key", &test_request())
            .await
            .unwrap_err();

        match err {
            ProviderSendError::Http { status, payload } => {
                assert_eq!(status, 401);
                let payload = payload.expect("error body should be kept");
                assert_eq!(payload["error"]["type"], "invalid_request_error");
            }
            other => panic!("expected Http failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_rejects_empty_choices() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .generate("test-key", &test_request())
            .await
            .unwrap_err();

        match err {
            ProviderSendError::Envelope { message, .. } => {
                assert!(message.contains("no choices"), "got: {message}");
            }
            other => panic!("expected Envelope failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_rejects_null_content() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .generate("test-key", &test_request())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderSendError::Envelope { .. }));
    }

    #[tokio::test]
    async fn list_models_collects_ids() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "object": "list",
            "data": [{"id": "gpt-4o"}, {"id": "gpt-4o-mini"}]
        });

        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let models = client.list_models("test-key").await.unwrap();
        assert_eq!(models, vec!["gpt-4o", "gpt-4o-mini"]);
    }

    #[tokio::test]
    async fn list_models_accepts_an_empty_listing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let models = client.list_models("test-key").await.unwrap();
        assert!(models.is_empty());
    }

    #[tokio::test]
    async fn base_url_trailing_slash_is_tolerated() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})),
            )
            .mount(&server)
            .await;

        let client = test_client(&format!("{}/", server.uri()));
        assert!(client.list_models("k").await.is_ok());
    }
}
