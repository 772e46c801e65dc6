// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for Gemini-compatible generateContent services.
//!
//! Provides [`GeminiClient`]. Authentication rides as a `key` query
//! parameter, not a header. Failures come back as [`ProviderSendError`]
//! material for the classifier.

use std::time::Duration;

use cardlex_config::model::GeminiConfig;
use cardlex_core::{CardlexError, ProviderSendError, TransportError};
use serde_json::Value;
use tracing::debug;

use crate::types::{model_resource, GenerateContentRequest, GenerateContentResponse, ModelCatalog};

/// HTTP client for a Gemini-compatible service.
///
/// The API key is a per-call argument: the gateway resolves a different
/// credential per request (explicit, stored, or shared fallback).
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new client against the configured base URL.
    pub fn new(config: &GeminiConfig, timeout: Duration) -> Result<Self, CardlexError> {
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

    /// Sends a generateContent request and returns the reply text.
    ///
    /// The reply text is the first candidate's concatenated parts, still
    /// unparsed; the caller validates it against the output schema.
    pub async fn generate(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, ProviderSendError> {
        let url = format!("{}/{}:generateContent", self.base_url, model_resource(model));
        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        debug!(status = %status, model = %model, "generateContent response received");

        if !status.is_success() {
            return Err(http_failure(status, response).await);
        }

        let payload = read_json(response).await?;
        extract_reply_text(&payload)
    }

    /// Fetches the resource names of the models this credential can use.
    ///
    /// An empty catalog is a valid answer, not an error.
    pub async fn list_models(&self, api_key: &str) -> Result<Vec<String>, ProviderSendError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("key", api_key)])
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        debug!(status = %status, "model catalog response received");

        if !status.is_success() {
            return Err(http_failure(status, response).await);
        }

        let payload = read_json(response).await?;
        let catalog: ModelCatalog =
            serde_json::from_value(payload.clone()).map_err(|e| ProviderSendError::Envelope {
                message: format!("malformed model catalog: {e}"),
                payload: Some(payload),
            })?;
        Ok(catalog.models.into_iter().map(|m| m.name).collect())
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
    let reply: GenerateContentResponse =
        serde_json::from_value(payload.clone()).map_err(|e| ProviderSendError::Envelope {
            message: format!("malformed generateContent envelope: {e}"),
            payload: Some(payload.clone()),
        })?;

    let Some(candidate) = reply.candidates.into_iter().next() else {
        return Err(ProviderSendError::Envelope {
            message: "reply contained no candidates".to_string(),
            payload: Some(payload.clone()),
        });
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ProviderSendError::Envelope {
            message: "reply candidate carried no text".to_string(),
            payload: Some(payload.clone()),
        });
    }

    Ok(text)
}
