// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the shared-key quota service.
//!
//! Only consulted when a generation runs on the shared fallback key. The
//! pre-check fails closed: an answer that does not carry a verdict counts
//! as a refusal, while transport and HTTP failures surface to the caller
//! for classification.

use std::time::Duration;

use cardlex_config::model::QuotaConfig;
use cardlex_core::{CardlexError, ProviderSendError, TransportError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// HTTP client for the quota service endpoints.
pub struct QuotaClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CanGenerateRequest<'a> {
    user_id: &'a str,
    using_own_credential: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CanGenerateReply {
    #[serde(default)]
    can_generate: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IncrementRequest<'a> {
    user_id: &'a str,
}

/// Counters reported after an increment. Only ever logged.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncrementReply {
    #[serde(default)]
    pub new_count: Option<u64>,
    #[serde(default)]
    pub remaining_cards: Option<u64>,
}

impl QuotaClient {
    /// Build a client when quota enforcement is configured.
    ///
    /// `None` means quota is disabled and every check allows. An enabled
    /// section without a base URL is rejected by config validation; a
    /// missing URL here is treated as disabled.
    pub fn from_config(config: &QuotaConfig, timeout: Duration) -> Result<Option<Self>, CardlexError> {
        if !config.enabled {
            return Ok(None);
        }
        let Some(base_url) = config.base_url.as_deref().filter(|u| !u.trim().is_empty()) else {
            return Ok(None);
        };
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CardlexError::Provider {
                message: "failed to build quota HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Some(QuotaClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }))
    }

    /// Ask whether the user may run one more shared-key generation.
    ///
    /// A reply without a usable `canGenerate` field refuses the
    /// generation; the quota service stays authoritative even when it
    /// answers nonsense.
    pub async fn can_generate(
        &self,
        user_id: &str,
        using_own_credential: bool,
    ) -> Result<bool, ProviderSendError> {
        let url = format!("{}/api/generate-flashcard", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&CanGenerateRequest {
                user_id,
                using_own_credential,
            })
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        debug!(status = %status, "quota pre-check response received");

        if !status.is_success() {
            return Err(http_failure(status, response).await);
        }

        let body = response.text().await.map_err(transport_failure)?;
        match serde_json::from_str::<CanGenerateReply>(&body)
            .ok()
            .and_then(|r| r.can_generate)
        {
            Some(allowed) => Ok(allowed),
            None => {
                warn!("quota reply carried no verdict, refusing the generation");
                Ok(false)
            }
        }
    }

    /// Record one consumed shared-key generation.
    pub async fn increment_count(&self, user_id: &str) -> Result<IncrementReply, ProviderSendError> {
        let url = format!("{}/api/increment-flashcard-count", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&IncrementRequest { user_id })
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        debug!(status = %status, "count increment response received");

        if !status.is_success() {
            return Err(http_failure(status, response).await);
        }

        let body = response.text().await.map_err(transport_failure)?;
        serde_json::from_str(&body).map_err(|e| ProviderSendError::Envelope {
            message: format!("count reply is not valid JSON: {e}"),
            payload: None,
        })
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
