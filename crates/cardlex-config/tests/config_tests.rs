// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Cardlex configuration system.

use cardlex_config::diagnostic::{suggest_key, ConfigError};
use cardlex_config::model::CardlexConfig;
use cardlex_config::{load_and_validate_str, load_config, load_config_from_str};
use cardlex_core::ProviderKind;
use serial_test::serial;

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_cardlex_config() {
    let toml = r#"
[gateway]
log_level = "debug"
request_timeout_secs = 30
default_provider = "gemini"

[openai]
base_url = "http://127.0.0.1:8080"
default_model = "gpt-4o"
shared_api_key = "sk-shared"

[gemini]
base_url = "http://127.0.0.1:8081"
default_model = "gemini-1.5-pro"

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[vault]
kdf_iterations = 50000

[cache]
ttl_hours = 48

[quota]
enabled = true
base_url = "http://127.0.0.1:8082"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.gateway.log_level, "debug");
    assert_eq!(config.gateway.request_timeout_secs, 30);
    assert_eq!(config.gateway.default_provider, ProviderKind::Gemini);
    assert_eq!(config.openai.base_url, "http://127.0.0.1:8080");
    assert_eq!(config.openai.default_model, "gpt-4o");
    assert_eq!(config.openai.shared_api_key.as_deref(), Some("sk-shared"));
    assert_eq!(config.gemini.base_url, "http://127.0.0.1:8081");
    assert_eq!(config.gemini.default_model, "gemini-1.5-pro");
    assert!(config.gemini.shared_api_key.is_none());
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.vault.kdf_iterations, 50_000);
    assert_eq!(config.cache.ttl_hours, 48);
    assert!(config.quota.enabled);
    assert_eq!(config.quota.base_url.as_deref(), Some("http://127.0.0.1:8082"));
}

/// Unknown field in [gateway] section produces an UnknownField error.
#[test]
fn unknown_field_in_gateway_produces_error() {
    let toml = r#"
[gateway]
log_levle = "debug"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    // Figment wraps serde's deny_unknown_fields error
    assert!(
        err_str.contains("unknown field") || err_str.contains("log_levle"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown field in [cache] section produces an UnknownField error.
#[test]
fn unknown_field_in_cache_produces_error() {
    let toml = r#"
[cache]
ttl_huors = 12
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("ttl_huors"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let toml = "";
    let config = load_config_from_str(toml).expect("empty TOML should use defaults");

    assert_eq!(config.gateway.log_level, "info");
    assert_eq!(config.gateway.request_timeout_secs, 60);
    assert_eq!(config.gateway.default_provider, ProviderKind::OpenAi);
    assert_eq!(config.openai.base_url, "https://api.openai.com");
    assert_eq!(config.openai.default_model, "gpt-4o-mini");
    assert!(config.openai.shared_api_key.is_none());
    assert_eq!(
        config.gemini.base_url,
        "https://generativelanguage.googleapis.com/v1beta"
    );
    assert_eq!(config.gemini.default_model, "gemini-2.0-flash");
    assert!(config.storage.database_path.ends_with("cardlex.db"));
    assert!(config.storage.wal_mode);
    assert_eq!(config.vault.kdf_iterations, 100_000);
    assert_eq!(config.cache.ttl_hours, 24);
    assert!(!config.quota.enabled);
    assert!(config.quota.base_url.is_none());
}

/// An unrecognized provider tag is rejected at deserialization time.
#[test]
fn unknown_default_provider_is_rejected() {
    let toml = r#"
[gateway]
default_provider = "grok"
"#;

    let err = load_config_from_str(toml).expect_err("unknown provider should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("grok") || err_str.contains("variant"),
        "error should mention the bad provider tag, got: {err_str}"
    );
}

/// Environment variable CARDLEX_GATEWAY_LOG_LEVEL overrides gateway.log_level.
#[test]
#[serial]
fn env_var_overrides_log_level() {
    unsafe { std::env::set_var("CARDLEX_GATEWAY_LOG_LEVEL", "trace") };
    let result = load_config();
    unsafe { std::env::remove_var("CARDLEX_GATEWAY_LOG_LEVEL") };

    let config = result.expect("env override should merge");
    assert_eq!(config.gateway.log_level, "trace");
}

/// CARDLEX_OPENAI_SHARED_API_KEY maps to openai.shared_api_key
/// (NOT openai.shared.api.key -- the env mapper must use replacen, not split).
#[test]
#[serial]
fn env_var_maps_underscored_key_to_section_dot_key() {
    unsafe { std::env::set_var("CARDLEX_OPENAI_SHARED_API_KEY", "sk-from-env") };
    let result = load_config();
    unsafe { std::env::remove_var("CARDLEX_OPENAI_SHARED_API_KEY") };

    let config = result.expect("env override should merge");
    assert_eq!(config.openai.shared_api_key.as_deref(), Some("sk-from-env"));
}

/// CARDLEX_ vars outside the config sections are skipped by the loader.
/// `CARDLEX_API_KEY` belongs to `cardlex credential set`, not to the config.
#[test]
#[serial]
fn env_vars_outside_config_sections_are_ignored() {
    unsafe { std::env::set_var("CARDLEX_API_KEY", "sk-not-config") };
    let result = load_config();
    unsafe { std::env::remove_var("CARDLEX_API_KEY") };

    let config = result.expect("non-config env var must not break loading");
    assert_eq!(config.gateway.log_level, "info");
}

/// Serialized defaults provide sensible values for all required fields.
#[test]
fn serialized_defaults_are_sensible() {
    let config = CardlexConfig::default();

    assert_eq!(config.gateway.log_level, "info");
    assert_eq!(config.gateway.request_timeout_secs, 60);
    assert_eq!(config.openai.default_model, "gpt-4o-mini");
    assert_eq!(config.gemini.default_model, "gemini-2.0-flash");
    assert!(config.storage.wal_mode);
    assert_eq!(config.vault.kdf_iterations, 100_000);
    assert_eq!(config.cache.ttl_hours, 24);
    assert!(!config.quota.enabled);
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: CardlexConfig = Figment::new()
        .merge(Serialized::defaults(CardlexConfig::default()))
        .merge(Toml::file("/nonexistent/path/cardlex.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    // Should just get defaults
    assert_eq!(config.gateway.log_level, "info");
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[logging]
level = "debug"
"#;

    let err = load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("logging"),
        "error should mention unknown field, got: {err_str}"
    );
}

// ============================================================================
// Diagnostic tests
// ============================================================================

/// Unknown key "log_levle" in [gateway] produces suggestion "did you mean `log_level`?"
#[test]
fn diagnostic_log_levle_suggests_log_level() {
    let valid_keys = &["log_level", "request_timeout_secs", "default_provider"];
    let suggestion = suggest_key("log_levle", valid_keys);
    assert_eq!(suggestion, Some("log_level".to_string()));
}

/// Unknown key "zzzzzz" with no close match does NOT produce a suggestion.
#[test]
fn diagnostic_no_suggestion_for_distant_typo() {
    let valid_keys = &["base_url", "default_model", "shared_api_key"];
    let suggestion = suggest_key("zzzzzz", valid_keys);
    assert!(suggestion.is_none(), "should not suggest for distant typo");
}

/// Error output from load_and_validate_str includes the unknown key name.
#[test]
fn diagnostic_error_includes_unknown_key() {
    let toml = r#"
[gateway]
log_levle = "debug"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    assert!(!errors.is_empty(), "should have at least one error");

    let has_unknown_key = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "log_levle"
                && suggestion.as_deref() == Some("log_level")
                && valid_keys.contains("log_level")
        })
    });
    assert!(
        has_unknown_key,
        "should have UnknownKey error for 'log_levle' with suggestion 'log_level', got: {errors:?}"
    );
}

/// Error output includes the list of valid keys for the section.
#[test]
fn diagnostic_error_includes_valid_keys() {
    let toml = r#"
[vault]
kdf_iteratons = 100000
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let has_valid_keys = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { valid_keys, .. } if {
            valid_keys.contains("kdf_iterations")
        })
    });
    assert!(
        has_valid_keys,
        "error should list valid keys for [vault] section"
    );
}

/// Invalid type (string where number expected) produces clear message.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[gateway]
request_timeout_secs = "not_a_number"
"#;

    let err = load_config_from_str(toml).expect_err("should reject invalid type");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("invalid type") || err_str.contains("request_timeout_secs"),
        "error should mention type mismatch, got: {err_str}"
    );
}

/// ConfigError implements miette::Diagnostic (can be rendered).
#[test]
fn config_error_implements_diagnostic() {
    use miette::Diagnostic;

    let error = ConfigError::UnknownKey {
        key: "log_levle".to_string(),
        suggestion: Some("log_level".to_string()),
        valid_keys: "log_level, request_timeout_secs, default_provider".to_string(),
        span: None,
        src: None,
    };

    let code = error.code();
    assert!(code.is_some(), "should have diagnostic code");

    let help = error.help();
    assert!(help.is_some(), "should have help text");
    let help_str = help.unwrap().to_string();
    assert!(
        help_str.contains("did you mean `log_level`"),
        "help should contain suggestion, got: {help_str}"
    );
}

/// ConfigError can be rendered using miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::GraphicalReportHandler;

    let error = ConfigError::UnknownKey {
        key: "log_levle".to_string(),
        suggestion: Some("log_level".to_string()),
        valid_keys: "log_level, request_timeout_secs, default_provider".to_string(),
        span: None,
        src: None,
    };

    let handler = GraphicalReportHandler::new();
    let mut buf = String::new();
    handler
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(!buf.is_empty(), "rendered report should not be empty");
    assert!(
        buf.contains("log_levle"),
        "rendered report should mention the key"
    );
}

/// load_and_validate_str with valid TOML returns Ok config.
#[test]
fn load_and_validate_valid_toml() {
    let toml = r#"
[gateway]
log_level = "warn"
"#;

    let config = load_and_validate_str(toml).expect("valid TOML should validate");
    assert_eq!(config.gateway.log_level, "warn");
}

/// Validation catches a quota section enabled without a URL.
#[test]
fn validation_catches_quota_without_url() {
    let toml = r#"
[quota]
enabled = true
"#;

    let errors = load_and_validate_str(toml).expect_err("quota without URL should fail");
    let has_validation_error = errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("quota.base_url"))
    });
    assert!(
        has_validation_error,
        "should have validation error for quota without base_url"
    );
}
