// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Cardlex provider gateway.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use cardlex_core::ProviderKind;
use serde::{Deserialize, Serialize};

/// Top-level Cardlex configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CardlexConfig {
    /// Gateway behavior settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// OpenAI-compatible provider settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Gemini-compatible provider settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Credential vault settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Translation result cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Remote quota service settings.
    #[serde(default)]
    pub quota: QuotaConfig,
}

/// Gateway behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Timeout applied to every outbound HTTP request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Provider used when the user has not stored a preference.
    #[serde(default = "default_provider")]
    pub default_provider: ProviderKind,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout_secs(),
            default_provider: default_provider(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_provider() -> ProviderKind {
    ProviderKind::OpenAi
}

/// OpenAI-compatible provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// Base URL of the chat completions service.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model used when the user has not stored a preference.
    #[serde(default = "default_openai_model")]
    pub default_model: String,

    /// Shared fallback API key, used when no user credential is stored.
    /// `None` means users must store their own key. Generations on this
    /// key are subject to the quota service.
    #[serde(default)]
    pub shared_api_key: Option<String>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            default_model: default_openai_model(),
            shared_api_key: None,
        }
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Gemini-compatible provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Base URL of the generateContent service, including API version.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Model used when the user has not stored a preference.
    /// Accepts bare ids; the client normalizes to `models/<id>`.
    #[serde(default = "default_gemini_model")]
    pub default_model: String,

    /// Shared fallback API key, used when no user credential is stored.
    #[serde(default)]
    pub shared_api_key: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            default_model: default_gemini_model(),
            shared_api_key: None,
        }
    }
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("cardlex").join("cardlex.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("cardlex.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Credential vault configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iteration count for credential key derivation.
    /// Lowering this weakens stored credentials at rest.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
        }
    }
}

fn default_kdf_iterations() -> u32 {
    100_000
}

/// Translation result cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Hours a cached translation stays fresh. Entries older than this
    /// are ignored on read and overwritten on the next generation.
    #[serde(default = "default_cache_ttl_hours")]
    pub ttl_hours: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_cache_ttl_hours(),
        }
    }
}

fn default_cache_ttl_hours() -> u32 {
    24
}

/// Remote quota service configuration.
///
/// Consulted only for generations running on the shared fallback key.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuotaConfig {
    /// Whether to consult the quota service at all. When disabled,
    /// shared-key generations proceed unchecked.
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the quota service. Required when `enabled` is true.
    #[serde(default)]
    pub base_url: Option<String>,
}
