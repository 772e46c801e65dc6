// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt templates for each generation purpose.
//!
//! Every purpose has its own system instruction and user-message template,
//! both parameterized by the learner's target language. The flashcard
//! templates never mention a mnemonic; the word only enters the rendered
//! prompt through the learner's selected text, which is what widens the
//! flashcard schema.

use cardlex_core::PurposeType;

/// Human-readable label for a language key, e.g. `fr` -> `French`.
///
/// Unknown keys pass through unchanged so prompts stay usable for
/// languages the table has not caught up with.
pub fn language_label(key: &str) -> &str {
    match key {
        "ar" => "Arabic",
        "de" => "German",
        "en" => "English",
        "es" => "Spanish",
        "fr" => "French",
        "hi" => "Hindi",
        "it" => "Italian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "nl" => "Dutch",
        "pl" => "Polish",
        "pt" => "Portuguese",
        "ru" => "Russian",
        "sv" => "Swedish",
        "tr" => "Turkish",
        "zh" => "Chinese",
        other => other,
    }
}

/// System instruction for a purpose, rendered for the learner's language.
///
/// Stored conversations have their instruction rewritten from this template
/// on every fetch, so a changed language takes effect immediately.
pub fn system_instruction(purpose: PurposeType, language: &str) -> String {
    let label = language_label(language);
    match purpose {
        PurposeType::Flashcard => format!(
            "You are a study assistant for a learner of {label}. You create \
             flashcard content for words and phrases the learner selects while \
             reading. Always answer with a single JSON object matching the \
             requested schema and nothing else."
        ),
        PurposeType::Definition => format!(
            "You are a study assistant for a learner of {label}. You explain \
             what a selected word or phrase means, in plain English a learner \
             can follow. Always answer with a single JSON object matching the \
             requested schema and nothing else."
        ),
        PurposeType::Mnemonic => format!(
            "You are a study assistant for a learner of {label}. You invent \
             short, vivid memory aids that tie a word's sound or spelling to \
             its meaning. Always answer with a single JSON object matching \
             the requested schema and nothing else."
        ),
        PurposeType::Translation => format!(
            "You are a study assistant for a learner of {label}. You translate \
             selected {label} text into natural English, keeping the register \
             of the original. Always answer with a single JSON object matching \
             the requested schema and nothing else."
        ),
        PurposeType::Examples => format!(
            "You are a study assistant for a learner of {label}. You write \
             short, natural {label} example sentences pitched at a learner. \
             Always answer with a single JSON object matching the requested \
             schema and nothing else."
        ),
        PurposeType::TranslationPopup => format!(
            "You are a study assistant for a learner of {label}. You give the \
             quickest useful English translation of selected {label} text. \
             Always answer with a single JSON object matching the requested \
             schema and nothing else."
        ),
    }
}

/// User message for a purpose, embedding the learner's selected text.
pub fn user_prompt(purpose: PurposeType, text: &str, language: &str) -> String {
    let label = language_label(language);
    match purpose {
        PurposeType::Flashcard => format!(
            "Create flashcard content for the {label} expression \"{text}\": \
             a concise English definition, an English translation, and three \
             {label} example sentences that use it."
        ),
        PurposeType::Definition => format!(
            "Explain the meaning of the {label} expression \"{text}\" in one \
             or two short English sentences."
        ),
        PurposeType::Mnemonic => format!(
            "Invent a mnemonic for the {label} expression \"{text}\" that \
             ties its sound or spelling to its meaning."
        ),
        PurposeType::Translation => format!(
            "Translate the {label} text \"{text}\" into English."
        ),
        PurposeType::Examples => format!(
            "Write three {label} example sentences using \"{text}\", ranging \
             from simple to intermediate."
        ),
        PurposeType::TranslationPopup => format!(
            "Give the most natural English translation of the {label} text \
             \"{text}\"."
        ),
    }
}
