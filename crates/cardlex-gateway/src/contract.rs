// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response shapes crossing the gateway boundary.
//!
//! The response is a tagged value, never an exception: `success` is the
//! discriminant, optional failure keys are omitted when absent, and
//! `isUnsupportedModel` is present (and true) only when the failure is an
//! unsupported model, so a UI can branch on key presence alone.

use std::collections::BTreeMap;

use cardlex_core::{CanonicalResult, ClassifiedError, ErrorKind, ProviderKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One generation request as the host UI submits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Purpose tag, validated against the closed set at the gateway.
    pub purpose_type: String,
    pub user_id: String,
    /// The text the learner selected.
    pub text: String,
    /// Learning-language key, e.g. `fr`.
    pub language: String,
    /// API key supplied with this one request, bypassing the vault.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_credential: Option<String>,
}

/// Successful generation payload.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessBody {
    pub success: bool,
    pub data: BTreeMap<String, String>,
}

/// Failed generation payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureBody {
    pub success: bool,
    /// Failure taxonomy tag, e.g. `UNSUPPORTED_MODEL`.
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_provider_payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_unsupported_model: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderKind>,
}

/// What [`crate::Gateway::generate`] hands back.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GatewayResponse {
    Success(SuccessBody),
    Failure(FailureBody),
}

impl GatewayResponse {
    pub fn success(result: CanonicalResult) -> Self {
        GatewayResponse::Success(SuccessBody {
            success: true,
            data: result.fields,
        })
    }

    pub fn failure(error: ClassifiedError) -> Self {
        GatewayResponse::Failure(FailureBody {
            success: false,
            error: error.kind.to_string(),
            http_status: error.http_status,
            raw_provider_payload: error.raw_payload,
            is_unsupported_model: (error.kind == ErrorKind::UnsupportedModel).then_some(true),
            provider: error.provider,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GatewayResponse::Success(_))
    }

    /// The result fields of a success, if this is one.
    pub fn data(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            GatewayResponse::Success(body) => Some(&body.data),
            GatewayResponse::Failure(_) => None,
        }
    }
}
