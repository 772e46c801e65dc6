// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The closed set of generation purposes and their output schemas.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// What kind of study artifact a generation produces.
///
/// The set is closed. Unknown purpose strings are a validation error at the
/// gateway boundary, never a fall-through to some default.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PurposeType {
    /// Full flashcard: definition, translation, three examples, optional mnemonic.
    Flashcard,
    /// A single concise definition.
    Definition,
    /// A memory aid for the selected text.
    Mnemonic,
    /// A translation into the user's base language.
    Translation,
    /// Three example sentences.
    Examples,
    /// The lightweight hover-popup translation. Served from the result cache.
    TranslationPopup,
}

impl PurposeType {
    /// Whether results for this purpose go through the translation cache.
    pub fn cacheable(&self) -> bool {
        matches!(self, PurposeType::TranslationPopup)
    }
}

/// Field layout a provider reply must satisfy for a given purpose.
///
/// `name` labels the schema inside provider envelopes that carry one;
/// `fields` is the exact set of required string properties. Replies with
/// missing, extra, or non-string fields are parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    pub name: &'static str,
    pub fields: Vec<&'static str>,
}

impl OutputSchema {
    /// Schema for a purpose.
    ///
    /// `include_mnemonic` extends the flashcard layout when the outbound
    /// prompt asked for a mnemonic; it has no effect on other purposes.
    pub fn for_purpose(purpose: PurposeType, include_mnemonic: bool) -> Self {
        match purpose {
            PurposeType::Flashcard => {
                let mut fields = vec![
                    "definition",
                    "translation",
                    "example_1",
                    "example_2",
                    "example_3",
                ];
                if include_mnemonic {
                    fields.push("mnemonic");
                }
                OutputSchema {
                    name: "flashcard_response",
                    fields,
                }
            }
            PurposeType::Definition => OutputSchema {
                name: "definition_response",
                fields: vec!["definition"],
            },
            PurposeType::Mnemonic => OutputSchema {
                name: "mnemonic_response",
                fields: vec!["mnemonic"],
            },
            PurposeType::Translation => OutputSchema {
                name: "translation_response",
                fields: vec!["translation"],
            },
            PurposeType::Examples => OutputSchema {
                name: "examples_response",
                fields: vec!["example_1", "example_2", "example_3"],
            },
            PurposeType::TranslationPopup => OutputSchema {
                name: "translation_popup_response",
                fields: vec!["translation"],
            },
        }
    }

    /// Validate a provider's reply text against this schema.
    ///
    /// The reply must be a JSON object carrying exactly the schema's fields,
    /// every one a string. Anything else is a parse failure with a message
    /// naming the first violation.
    pub fn parse_reply(&self, reply_text: &str) -> Result<BTreeMap<String, String>, String> {
        let value: Value =
            serde_json::from_str(reply_text).map_err(|e| format!("reply is not valid JSON: {e}"))?;
        let Value::Object(object) = value else {
            return Err(format!("reply is not a JSON object: {}", json_type_name(&value)));
        };

        let mut fields = BTreeMap::new();
        for &field in &self.fields {
            match object.get(field) {
                Some(Value::String(text)) => {
                    fields.insert(field.to_string(), text.clone());
                }
                Some(other) => {
                    return Err(format!(
                        "field `{field}` is {}, expected string",
                        json_type_name(other)
                    ));
                }
                None => return Err(format!("missing required field `{field}`")),
            }
        }

        if let Some(extra) = object.keys().find(|k| !self.fields.contains(&k.as_str())) {
            return Err(format!("unexpected field `{extra}` in reply"));
        }

        Ok(fields)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Whether the outbound user text asks the model for a mnemonic.
///
/// The flashcard schema only carries a `mnemonic` field when the rendered
/// prompt mentions one, so replies never include fields the UI has no slot
/// for.
pub fn requests_mnemonic(user_text: &str) -> bool {
    user_text.to_lowercase().contains("mnemonic")
}
