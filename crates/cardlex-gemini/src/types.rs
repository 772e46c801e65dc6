// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! generateContent wire types for Gemini-compatible services.
//!
//! This wire format has no system role: the system instruction is folded
//! into the first user turn, and assistant turns carry the role "model".
//! Schema types are uppercase (`OBJECT`, `STRING`).

use cardlex_core::{ChatMessage, ChatRole, OutputSchema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// --- Request types ---

/// A request to `/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns, roles "user" and "model" only.
    pub contents: Vec<Content>,

    /// Structured-output constraint.
    pub generation_config: GenerationConfig,
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Role: "user" or "model".
    pub role: String,
    /// Text parts of the turn.
    pub parts: Vec<Part>,
}

/// A text part within a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Plain text.
    pub text: String,
}

/// Generation configuration constraining the reply shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// MIME type of the reply (always "application/json").
    pub response_mime_type: String,
    /// The schema the reply must satisfy, uppercase type names.
    pub response_schema: Value,
}

// --- Response types ---

/// A reply from `/{model}:generateContent`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    /// Generated candidates. The first one carries the reply.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generated candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    /// Candidate content. Absent when generation was blocked.
    pub content: Option<CandidateContent>,
}

/// Content of a candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    /// Text parts of the candidate.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A reply from `/models`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelCatalog {
    /// Available models.
    #[serde(default)]
    pub models: Vec<CatalogEntry>,
}

/// One entry in the model catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    /// Resource name, e.g. "models/gemini-2.0-flash".
    pub name: String,
}

// --- Builders ---

/// Normalize a model id to its resource path form.
///
/// Config and preference records may hold bare ids; the URL needs
/// `models/<id>`.
pub fn model_resource(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

/// Build a generateContent request from an outbound message list.
///
/// The system instruction is held back and prefixed onto the next user
/// turn, separated by a blank line. Assistant turns become role "model".
/// Outbound lists always end with a user turn, so a held-back instruction
/// cannot be dropped; if one ever dangles it is emitted as its own user
/// turn rather than lost.
pub fn build_request(messages: &[ChatMessage], schema: &OutputSchema) -> GenerateContentRequest {
    let mut pending_system: Option<&str> = None;
    let mut contents = Vec::new();

    for message in messages {
        match message.role {
            ChatRole::System => pending_system = Some(&message.content),
            ChatRole::User => {
                let text = match pending_system.take() {
                    Some(system) => format!("{system}\n\n{}", message.content),
                    None => message.content.clone(),
                };
                contents.push(Content {
                    role: "user".to_string(),
                    parts: vec![Part { text }],
                });
            }
            ChatRole::Assistant => contents.push(Content {
                role: "model".to_string(),
                parts: vec![Part {
                    text: message.content.clone(),
                }],
            }),
        }
    }

    if let Some(system) = pending_system {
        contents.push(Content {
            role: "user".to_string(),
            parts: vec![Part {
                text: system.to_string(),
            }],
        });
    }

    GenerateContentRequest {
        contents,
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: schema_value(schema),
        },
    }
}

/// Render an output schema in this wire format's uppercase style.
pub fn schema_value(schema: &OutputSchema) -> Value {
    let mut properties = serde_json::Map::new();
    for field in &schema.fields {
        properties.insert((*field).to_string(), json!({ "type": "STRING" }));
    }
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": schema.fields,
    })
}
