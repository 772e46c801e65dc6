// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./cardlex.toml` > `~/.config/cardlex/cardlex.toml` > `/etc/cardlex/cardlex.toml`
//! with environment variable overrides via `CARDLEX_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::CardlexConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/cardlex/cardlex.toml` (system-wide)
/// 3. `~/.config/cardlex/cardlex.toml` (user XDG config)
/// 4. `./cardlex.toml` (local directory)
/// 5. `CARDLEX_*` environment variables
pub fn load_config() -> Result<CardlexConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CardlexConfig::default()))
        .merge(Toml::file("/etc/cardlex/cardlex.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("cardlex/cardlex.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("cardlex.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a specific TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<CardlexConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CardlexConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CardlexConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CardlexConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Config section prefixes recognized in environment variable names.
const ENV_SECTIONS: [&str; 7] = [
    "gateway_", "openai_", "gemini_", "storage_", "vault_", "cache_", "quota_",
];

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `CARDLEX_OPENAI_SHARED_API_KEY`
/// must map to `openai.shared_api_key`, not `openai.shared.api.key`.
///
/// Vars outside the known sections are not configuration and are skipped;
/// `CARDLEX_API_KEY` (read by `cardlex credential set`) must not trip the
/// `deny_unknown_fields` check.
fn env_provider() -> Env {
    Env::prefixed("CARDLEX_")
        .filter(|key| {
            // Keys arrive in the variable's original case; figment only
            // lowercases after filtering and mapping.
            let key_str = key.as_str().to_ascii_lowercase();
            ENV_SECTIONS.iter().any(|s| key_str.starts_with(s))
        })
        .map(|key| {
            // Example: CARDLEX_GATEWAY_LOG_LEVEL -> "gateway.log_level"
            let key_str = key.as_str().to_ascii_lowercase();
            let mapped = key_str
                .replacen("gateway_", "gateway.", 1)
                .replacen("openai_", "openai.", 1)
                .replacen("gemini_", "gemini.", 1)
                .replacen("storage_", "storage.", 1)
                .replacen("vault_", "vault.", 1)
                .replacen("cache_", "cache.", 1)
                .replacen("quota_", "quota.", 1);
            mapped.into()
        })
}
