// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat completions wire types for OpenAI-compatible services.

use cardlex_core::{ChatMessage, OutputSchema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// --- Request types ---

/// A request to `/v1/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model identifier (e.g., "gpt-4o-mini").
    pub model: String,

    /// Conversation messages, system role included verbatim.
    pub messages: Vec<WireMessage>,

    /// Structured-output constraint. Always the json_schema strict mode.
    pub response_format: ResponseFormat,
}

/// A single message in the chat completions format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    /// Role: "system", "user" or "assistant".
    pub role: String,
    /// Plain text content.
    pub content: String,
}

/// The response_format object constraining the reply shape.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    /// Format type (always "json_schema").
    #[serde(rename = "type")]
    pub format_type: String,
    /// The named schema the reply must satisfy.
    pub json_schema: JsonSchemaSpec,
}

/// A named JSON schema in strict mode.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSchemaSpec {
    /// Schema name (e.g., "flashcard_response").
    pub name: String,
    /// Strict mode: the reply carries exactly the schema's fields.
    pub strict: bool,
    /// The JSON Schema object itself.
    pub schema: Value,
}

// --- Response types ---

/// A reply from `/v1/chat/completions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Generated choices. The first one carries the reply.
    pub choices: Vec<Choice>,
}

/// One generated choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// The assistant message for this choice.
    pub message: ChoiceMessage,
}

/// The message within a choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// Reply text. Null when the model refused to answer.
    pub content: Option<String>,
}

/// A reply from `/v1/models`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelList {
    /// Available models.
    pub data: Vec<ModelEntry>,
}

/// One entry in the model listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    /// Model identifier.
    pub id: String,
}

// --- Builders ---

/// Build a chat completions request from an outbound message list.
///
/// Roles pass through verbatim; this wire format accepts "system" directly.
pub fn build_request(
    model: &str,
    messages: &[ChatMessage],
    schema: &OutputSchema,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: messages
            .iter()
            .map(|m| WireMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect(),
        response_format: ResponseFormat {
            format_type: "json_schema".to_string(),
            json_schema: JsonSchemaSpec {
                name: schema.name.to_string(),
                strict: true,
                schema: schema_value(schema),
            },
        },
    }
}

/// Render an output schema as a JSON Schema object.
///
/// Every field is a required string and extra properties are forbidden,
/// matching strict mode's expectations.
pub fn schema_value(schema: &OutputSchema) -> Value {
    let mut properties = serde_json::Map::new();
    for field in &schema.fields {
        properties.insert((*field).to_string(), json!({ "type": "string" }));
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": schema.fields,
        "additionalProperties": false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardlex_core::PurposeType;

    fn flashcard_schema() -> OutputSchema {
        OutputSchema::for_purpose(PurposeType::Flashcard, false)
    }

    #[test]
    fn serialize_request_carries_strict_json_schema() {
        let messages = vec![
            ChatMessage::system("You write flashcards."),
            ChatMessage::user("bonjour"),
        ];
        let req = build_request("gpt-4o-mini", &messages, &flashcard_schema());
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "bonjour");
        assert_eq!(json["response_format"]["type"], "json_schema");
        assert_eq!(json["response_format"]["json_schema"]["name"], "flashcard_response");
        assert_eq!(json["response_format"]["json_schema"]["strict"], true);
    }

    #[test]
    fn schema_value_uses_lowercase_types_and_forbids_extras() {
        let value = schema_value(&flashcard_schema());
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["definition"]["type"], "string");
        assert_eq!(value["additionalProperties"], false);
        let required: Vec<&str> = value["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            required,
            vec!["definition", "translation", "example_1", "example_2", "example_3"]
        );
    }

    #[test]
    fn schema_value_includes_mnemonic_when_requested() {
        let schema = OutputSchema::for_purpose(PurposeType::Flashcard, true);
        let value = schema_value(&schema);
        assert_eq!(value["properties"]["mnemonic"]["type"], "string");
        assert!(value["required"]
            .as_array()
            .unwrap()
            .iter()
            .any(|v| v == "mnemonic"));
    }

    #[test]
    fn deserialize_response_with_content() {
        let json = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"translation\": \"hello\"}"}, "finish_reason": "stop"}]
        }"#;
        let reply: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(reply.choices.len(), 1);
        assert_eq!(
            reply.choices[0].message.content.as_deref(),
            Some("{\"translation\": \"hello\"}")
        );
    }

    #[test]
    fn deserialize_response_with_null_content() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let reply: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert!(reply.choices[0].message.content.is_none());
    }

    #[test]
    fn deserialize_model_list() {
        let json = r#"{"object": "list", "data": [{"id": "gpt-4o", "object": "model"}, {"id": "gpt-4o-mini", "object": "model"}]}"#;
        let list: ModelList = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = list.data.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["gpt-4o", "gpt-4o-mini"]);
    }
}
