// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation gateway for the Cardlex provider gateway.
//!
//! Everything between the host UI and the LLM providers lives here: the
//! caller contract, per-purpose prompts, the conversation store with its
//! per-key locks, the popup translation cache, the quota client, and the
//! [`Gateway`] pipeline tying them together.

pub mod cache;
pub mod contract;
pub mod conversation;
pub mod gateway;
pub mod prefs;
pub mod prompts;
pub mod quota;

pub use cache::{rolling_hash, TranslationCache};
pub use contract::{FailureBody, GatewayResponse, GenerateRequest, SuccessBody};
pub use conversation::ConversationStore;
pub use gateway::Gateway;
pub use prefs::{PreferenceStore, ProviderPreference};
pub use quota::QuotaClient;
