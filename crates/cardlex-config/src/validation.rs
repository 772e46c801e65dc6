// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL shape, iteration floors, and cross-field requirements.

use crate::diagnostic::ConfigError;
use crate::model::CardlexConfig;

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CardlexConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate log level is a recognized tracing level
    if !VALID_LOG_LEVELS.contains(&config.gateway.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "gateway.log_level `{}` is not one of: {}",
                config.gateway.log_level,
                VALID_LOG_LEVELS.join(", ")
            ),
        });
    }

    // Validate request timeout is non-zero
    if config.gateway.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.request_timeout_secs must be at least 1".to_string(),
        });
    }

    // Validate provider base URLs look like URLs
    for (key, url) in [
        ("openai.base_url", &config.openai.base_url),
        ("gemini.base_url", &config.gemini.base_url),
    ] {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        } else if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{trimmed}` must start with http:// or https://"),
            });
        }
    }

    // Validate default models are non-empty
    if config.openai.default_model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "openai.default_model must not be empty".to_string(),
        });
    }
    if config.gemini.default_model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gemini.default_model must not be empty".to_string(),
        });
    }

    // Validate database_path is not empty
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Validate vault KDF parameters
    if config.vault.kdf_iterations < 1000 {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at least 1000, got {}",
                config.vault.kdf_iterations
            ),
        });
    }

    // Validate cache TTL is non-zero
    if config.cache.ttl_hours == 0 {
        errors.push(ConfigError::Validation {
            message: "cache.ttl_hours must be at least 1".to_string(),
        });
    }

    // Validate the quota service has a URL when enabled
    if config.quota.enabled {
        let has_url = config
            .quota
            .base_url
            .as_deref()
            .is_some_and(|u| !u.trim().is_empty());
        if !has_url {
            errors.push(ConfigError::Validation {
                message: "quota.base_url is required when quota.enabled is true".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
