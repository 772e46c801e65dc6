// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failure classification for provider and quota calls.
//!
//! Maps transport errors, HTTP statuses, and response payloads onto a
//! closed taxonomy. The priority order is fixed: transport failures beat
//! everything, then bare 5xx, then model-unavailability indicators, then
//! auth, then rate limits. Pure functions, no I/O.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;
use thiserror::Error;

use crate::types::ProviderKind;

/// Transport-level failure signatures, checked before any HTTP status or
/// payload is considered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    ConnectionRefused,
    NameResolution,
    TimedOut,
    Other(String),
}

impl TransportError {
    /// Build from the parts an HTTP client exposes about a failed request.
    pub fn from_parts(is_timeout: bool, is_connect: bool, message: &str) -> Self {
        let lower = message.to_lowercase();
        if is_timeout || lower.contains("timed out") || lower.contains("timeout") {
            TransportError::TimedOut
        } else if lower.contains("dns")
            || lower.contains("failed to lookup")
            || lower.contains("name or service not known")
            || lower.contains("name resolution")
        {
            TransportError::NameResolution
        } else if is_connect || lower.contains("connection refused") {
            TransportError::ConnectionRefused
        } else {
            TransportError::Other(message.to_string())
        }
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::ConnectionRefused => write!(f, "connection refused"),
            TransportError::NameResolution => write!(f, "name resolution failed"),
            TransportError::TimedOut => write!(f, "request timed out"),
            TransportError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

/// What a provider exchange reported back when it did not yield a reply.
///
/// Carries exactly the material [`classify`] needs. A non-success HTTP
/// status keeps its body as a raw JSON payload when one parsed.
#[derive(Debug, Clone)]
pub enum ProviderSendError {
    /// The request never completed at the transport layer.
    Transport(TransportError),
    /// The provider answered with a non-success status.
    Http {
        status: u16,
        payload: Option<Value>,
    },
    /// The provider answered 200 but the reply envelope was unusable
    /// (no choices/candidates, missing content, malformed JSON).
    Envelope {
        message: String,
        payload: Option<Value>,
    },
}

/// The closed failure taxonomy crossing the gateway boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed request: unknown purpose, empty text or user id.
    Validation,
    /// The stored credential pair could not be decrypted.
    Decryption,
    /// Transport failure or a bare provider-side 5xx.
    Network,
    /// The credential was rejected (401/403).
    Auth,
    /// The selected model does not exist, is unreachable, or rejects
    /// schema-constrained output.
    UnsupportedModel,
    /// Rate or quota limit, provider-side or local.
    RateLimit,
    /// The provider replied but the reply did not match the output schema.
    Parse,
    /// Anything the rules above did not claim. Raw payload attached.
    Unknown,
}

/// A classified failure: a tagged value, never an exception.
///
/// `retryable` reflects the kind. Network and rate-limit failures may
/// succeed on a later attempt; the rest will not until the user changes
/// something.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub message: String,
    pub provider: Option<ProviderKind>,
    pub http_status: Option<u16>,
    pub raw_payload: Option<Value>,
    pub retryable: bool,
}

impl ClassifiedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ClassifiedError {
            kind,
            message: message.into(),
            provider: None,
            http_status: None,
            raw_payload: None,
            retryable: matches!(kind, ErrorKind::Network | ErrorKind::RateLimit),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ClassifiedError::new(ErrorKind::Validation, message)
    }

    /// The single opaque decryption failure. The message never says why.
    pub fn decryption() -> Self {
        ClassifiedError::new(
            ErrorKind::Decryption,
            "stored credential could not be decrypted",
        )
    }

    pub fn parse(message: impl Into<String>, raw_payload: Option<Value>) -> Self {
        ClassifiedError::new(ErrorKind::Parse, message).with_payload(raw_payload)
    }

    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_status(mut self, status: Option<u16>) -> Self {
        self.http_status = status;
        self
    }

    pub fn with_payload(mut self, payload: Option<Value>) -> Self {
        self.raw_payload = payload;
        self
    }
}

/// Exact substrings (matched against the lowercased payload) that mark a
/// model-unavailability reply.
const MODEL_UNAVAILABLE_MARKERS: &[&str] = &[
    "model_not_found",
    "does not exist or you do not have access",
    "is not found for api version",
    "is not supported for generatecontent",
];

/// Variable-message forms of model unavailability.
static MODEL_UNAVAILABLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"model\s+'[^']+'\s+(?:was|is)\s+not\s+found").unwrap(),
        Regex::new(r"(?s)json_schema.*not supported with this model").unwrap(),
    ]
});

/// Quota and billing exhaustion markers (lowercased).
const QUOTA_MARKERS: &[&str] = &[
    "quota",
    "exceeded your current quota",
    "billing",
    "insufficient credits",
    "credit balance",
    "resource has been exhausted",
    "resource_exhausted",
];

fn payload_text(payload: Option<&Value>) -> String {
    payload.map(|v| v.to_string().to_lowercase()).unwrap_or_default()
}

fn mentions_model_unavailable(text: &str) -> bool {
    MODEL_UNAVAILABLE_MARKERS.iter().any(|m| text.contains(m))
        || MODEL_UNAVAILABLE_PATTERNS.iter().any(|p| p.is_match(text))
}

fn mentions_quota(text: &str) -> bool {
    QUOTA_MARKERS.iter().any(|m| text.contains(m))
}

/// Classify a failed provider or quota exchange.
///
/// Rules, first match wins:
/// 1. any transport failure -> [`ErrorKind::Network`], even when the
///    message text mentions a model
/// 2. HTTP 5xx without a quota or model indicator -> [`ErrorKind::Network`]
/// 3. model-unavailability indicator in the payload -> [`ErrorKind::UnsupportedModel`]
/// 4. HTTP 401 or 403 -> [`ErrorKind::Auth`]
/// 5. HTTP 429 or a quota/billing indicator -> [`ErrorKind::RateLimit`]
/// 6. everything else -> [`ErrorKind::Unknown`] with the raw payload attached
pub fn classify(
    provider: ProviderKind,
    transport: Option<&TransportError>,
    http_status: Option<u16>,
    payload: Option<&Value>,
) -> ClassifiedError {
    if let Some(t) = transport {
        return ClassifiedError::new(ErrorKind::Network, format!("network failure: {t}"))
            .with_provider(provider)
            .with_status(http_status);
    }

    let text = payload_text(payload);
    let unsupported = mentions_model_unavailable(&text);
    let quota = mentions_quota(&text);

    if let Some(status) = http_status
        && (500..=599).contains(&status)
        && !unsupported
        && !quota
    {
        return ClassifiedError::new(
            ErrorKind::Network,
            format!("provider returned HTTP {status}"),
        )
        .with_provider(provider)
        .with_status(http_status)
        .with_payload(payload.cloned());
    }

    if unsupported {
        return ClassifiedError::new(
            ErrorKind::UnsupportedModel,
            "the selected model is not available for this request",
        )
        .with_provider(provider)
        .with_status(http_status)
        .with_payload(payload.cloned());
    }

    if let Some(status @ (401 | 403)) = http_status {
        return ClassifiedError::new(
            ErrorKind::Auth,
            format!("credential rejected (HTTP {status})"),
        )
        .with_provider(provider)
        .with_status(http_status)
        .with_payload(payload.cloned());
    }

    if http_status == Some(429) || quota {
        return ClassifiedError::new(ErrorKind::RateLimit, "rate or quota limit reached")
            .with_provider(provider)
            .with_status(http_status)
            .with_payload(payload.cloned());
    }

    ClassifiedError::new(ErrorKind::Unknown, "unclassified provider failure")
        .with_provider(provider)
        .with_status(http_status)
        .with_payload(payload.cloned())
}

/// Classify a [`ProviderSendError`] as returned by a provider client.
///
/// Envelope failures are parse failures: the provider did answer, the
/// reply just could not be used.
pub fn classify_send_error(provider: ProviderKind, error: &ProviderSendError) -> ClassifiedError {
    match error {
        ProviderSendError::Transport(t) => classify(provider, Some(t), None, None),
        ProviderSendError::Http { status, payload } => {
            classify(provider, None, Some(*status), payload.as_ref())
        }
        ProviderSendError::Envelope { message, payload } => {
            ClassifiedError::parse(message.clone(), payload.clone()).with_provider(provider)
        }
    }
}
