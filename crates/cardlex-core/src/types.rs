// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat, conversation, and result types shared across the workspace.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::purpose::PurposeType;

/// Maximum number of messages retained per conversation: the system
/// instruction plus the most recent user/assistant exchange.
pub const CONVERSATION_WINDOW: usize = 3;

/// The two supported providers.
///
/// A closed tag. The request/response shape is selected by a single switch
/// at the gateway boundary; no other code branches on it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI-compatible chat-completions wire format.
    OpenAi,
    /// Google-compatible generateContent wire format.
    Gemini,
}

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    /// Wire string for providers that take roles verbatim.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A minimal per-(user, purpose) conversation.
///
/// Index 0 is always the system instruction. After an exchange is recorded
/// the history is truncated to [`CONVERSATION_WINDOW`], so a provider sees
/// at most the instruction plus the immediately preceding exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub user_id: String,
    pub purpose: PurposeType,
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Create a fresh conversation holding only the system instruction.
    pub fn new(
        user_id: impl Into<String>,
        purpose: PurposeType,
        system_instruction: impl Into<String>,
    ) -> Self {
        Conversation {
            user_id: user_id.into(),
            purpose,
            messages: vec![ChatMessage::system(system_instruction)],
        }
    }

    /// Replace the system instruction in place, preserving any history.
    ///
    /// Stored conversations can carry an instruction rendered from an older
    /// learning goal; every fetch rewrites index 0 with the latest one.
    pub fn rewrite_system(&mut self, system_instruction: impl Into<String>) {
        let msg = ChatMessage::system(system_instruction);
        match self.messages.first_mut() {
            Some(first) if first.role == ChatRole::System => *first = msg,
            _ => self.messages.insert(0, msg),
        }
    }

    /// Record one user/assistant exchange, then truncate to the window.
    pub fn append_exchange(
        &mut self,
        user_text: impl Into<String>,
        assistant_text: impl Into<String>,
    ) {
        self.messages.push(ChatMessage::user(user_text));
        self.messages.push(ChatMessage::assistant(assistant_text));
        if self.messages.len() > CONVERSATION_WINDOW {
            let tail = self.messages.split_off(self.messages.len() - 2);
            self.messages.truncate(1);
            self.messages.extend(tail);
        }
    }
}

/// The canonical outcome of a successful generation: exactly the fields of
/// the purpose's output schema, each a string produced by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalResult {
    pub purpose: PurposeType,
    pub fields: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn provider_kind_strings_round_trip() {
        for kind in [ProviderKind::OpenAi, ProviderKind::Gemini] {
            let parsed = ProviderKind::from_str(&kind.to_string()).expect("should parse back");
            assert_eq!(kind, parsed);
        }
        assert_eq!(ProviderKind::OpenAi.to_string(), "openai");
        assert_eq!(ProviderKind::Gemini.to_string(), "gemini");
    }

    #[test]
    fn chat_role_wire_strings() {
        assert_eq!(ChatRole::System.as_str(), "system");
        assert_eq!(ChatRole::User.as_str(), "user");
        assert_eq!(ChatRole::Assistant.as_str(), "assistant");
    }

    #[test]
    fn new_conversation_holds_only_the_system_instruction() {
        let conv = Conversation::new("u1", PurposeType::Flashcard, "You help with flashcards.");
        assert_eq!(conv.messages.len(), 1);
        assert_eq!(conv.messages[0].role, ChatRole::System);
        assert_eq!(conv.messages[0].content, "You help with flashcards.");
    }

    #[test]
    fn rewrite_system_replaces_index_zero_and_keeps_history() {
        let mut conv = Conversation::new("u1", PurposeType::Definition, "old instruction");
        conv.append_exchange("bonjour", "{\"definition\":\"hello\"}");
        conv.rewrite_system("new instruction");

        assert_eq!(conv.messages.len(), 3);
        assert_eq!(conv.messages[0].role, ChatRole::System);
        assert_eq!(conv.messages[0].content, "new instruction");
        assert_eq!(conv.messages[1].content, "bonjour");
    }

    #[test]
    fn rewrite_system_repairs_a_record_missing_its_instruction() {
        let mut conv = Conversation {
            user_id: "u1".into(),
            purpose: PurposeType::Translation,
            messages: vec![ChatMessage::user("stray")],
        };
        conv.rewrite_system("instruction");
        assert_eq!(conv.messages[0].role, ChatRole::System);
        assert_eq!(conv.messages[1].content, "stray");
    }

    #[test]
    fn window_never_exceeds_three_messages() {
        let mut conv = Conversation::new("u1", PurposeType::Flashcard, "sys");
        for i in 0..10 {
            conv.append_exchange(format!("word-{i}"), format!("card-{i}"));
            assert!(conv.messages.len() <= CONVERSATION_WINDOW);
            assert_eq!(conv.messages[0].role, ChatRole::System);
        }
        // The window keeps only the most recent exchange.
        assert_eq!(conv.messages[1].content, "word-9");
        assert_eq!(conv.messages[1].role, ChatRole::User);
        assert_eq!(conv.messages[2].content, "card-9");
        assert_eq!(conv.messages[2].role, ChatRole::Assistant);
    }

    #[test]
    fn first_exchange_fills_the_window_exactly() {
        let mut conv = Conversation::new("u1", PurposeType::Examples, "sys");
        conv.append_exchange("hola", "{\"example_1\":\"...\"}");
        assert_eq!(conv.messages.len(), 3);
    }

    #[test]
    fn conversation_survives_json_round_trip() {
        let mut conv = Conversation::new("u1", PurposeType::TranslationPopup, "sys");
        conv.append_exchange("gato", "{\"translation\":\"cat\"}");

        let json = serde_json::to_string(&conv).unwrap();
        let back: Conversation = serde_json::from_str(&json).unwrap();
        assert_eq!(conv, back);
    }
}
