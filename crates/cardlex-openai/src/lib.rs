// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible provider adapter for the Cardlex gateway.
//!
//! Speaks the `/v1/chat/completions` wire format with strict json_schema
//! structured output. System instructions ride as a first-class "system"
//! role; schema property types are lowercase JSON Schema.

pub mod client;
pub mod types;

pub use client::OpenAiClient;
pub use types::{build_request, schema_value, ChatCompletionRequest};
