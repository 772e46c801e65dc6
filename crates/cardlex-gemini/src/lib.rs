// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini-compatible provider adapter for the Cardlex gateway.
//!
//! Speaks the `/{model}:generateContent` wire format with JSON-mode
//! structured output. There is no system role: the system instruction is
//! folded into the first user turn, assistant turns become role "model",
//! and schema property types are uppercase.

pub mod client;
pub mod types;

pub use client::GeminiClient;
pub use types::{build_request, model_resource, schema_value, GenerateContentRequest};
