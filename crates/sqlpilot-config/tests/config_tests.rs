// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the sqlpilot configuration system.

use figment::Figment;
use figment::providers::{Format, Serialized, Toml};
use sqlpilot_config::diagnostic::ConfigError;
use sqlpilot_config::model::{ConversationBackend, ProviderKind, SqlPilotConfig};
use sqlpilot_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[service]
name = "sql-desk"
log_level = "debug"

[server]
host = "0.0.0.0"
port = 9000
request_timeout_secs = 30

[provider]
kind = "openai"
api_key = "sk-test"
model = "gpt-4o-mini"
base_url = "http://localhost:11434/v1"
timeout_secs = 60
max_retries = 0

[pipeline]
history_window = 5
generate_max_tokens = 800
retry_max_tokens = 600
explain_max_tokens = 250
optimize_max_tokens = 150
concurrent_enrichment = true

[conversation]
backend = "sqlite"
max_messages = 40
database_path = "/tmp/sqlpilot-test.db"

[schema]
default_schema_file = "/srv/schema.sql"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "sql-desk");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.provider.kind, ProviderKind::Openai);
    assert_eq!(config.provider.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.provider.max_retries, 0);
    assert_eq!(config.pipeline.history_window, 5);
    assert!(config.pipeline.concurrent_enrichment);
    assert_eq!(config.conversation.backend, ConversationBackend::Sqlite);
    assert_eq!(config.conversation.max_messages, 40);
    assert_eq!(
        config.schema.default_schema_file.as_deref(),
        Some("/srv/schema.sql")
    );
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8787);
    assert_eq!(config.provider.kind, ProviderKind::Anthropic);
    assert_eq!(config.provider.api_version, "2023-06-01");
    assert_eq!(config.provider.timeout_secs, 300);
    assert_eq!(config.pipeline.explain_max_tokens, 300);
    assert_eq!(config.conversation.max_messages, 20);
    assert!(config.schema.default_schema_file.is_none());
}

#[test]
fn partial_section_keeps_other_defaults() {
    let config = load_config_from_str("[pipeline]\nhistory_window = 7\n").unwrap();
    assert_eq!(config.pipeline.history_window, 7);
    assert_eq!(config.pipeline.generate_max_tokens, 500);
    assert_eq!(config.pipeline.optimize_max_tokens, 200);
}

#[test]
fn unknown_key_gets_suggestion_and_span() {
    let toml = "[server]\nprot = 9000\n";
    let errors = load_and_validate_str(toml).expect_err("should reject unknown key");
    assert_eq!(errors.len(), 1);

    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            valid_keys,
            span,
            ..
        } => {
            assert_eq!(key, "prot");
            assert_eq!(suggestion.as_deref(), Some("port"));
            assert!(valid_keys.contains("request_timeout_secs"));
            let span = span.expect("inline source should yield a span");
            assert_eq!(&toml[span.offset()..span.offset() + span.len()], "prot");
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[telemetry]\nenabled = true\n").unwrap_err();
    assert!(matches!(&errors[0], ConfigError::UnknownKey { key, .. } if key == "telemetry"));
}

#[test]
fn wrong_type_is_reported_with_key_path() {
    let errors = load_and_validate_str("[server]\nport = \"eighty\"\n").unwrap_err();
    match &errors[0] {
        ConfigError::InvalidType { key, .. } => assert_eq!(key, "server.port"),
        other => panic!("expected InvalidType, got {other:?}"),
    }
}

#[test]
fn unknown_enum_variant_is_rejected() {
    let errors = load_and_validate_str("[conversation]\nbackend = \"redis\"\n").unwrap_err();
    assert!(!errors.is_empty());
}

#[test]
fn validation_errors_are_collected() {
    let toml = r#"
[server]
host = ""

[pipeline]
retry_max_tokens = 0
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

/// Dotted tuple merges stand in for `SQLPILOT_*` variables after key mapping.
#[test]
fn later_layer_overrides_file_values() {
    let config: SqlPilotConfig = Figment::new()
        .merge(Serialized::defaults(SqlPilotConfig::default()))
        .merge(Toml::string("[provider]\nmodel = \"from-file\"\n"))
        .merge(("provider.model", "from-env"))
        .merge(("conversation.max_messages", 5))
        .extract()
        .unwrap();
    assert_eq!(config.provider.model, "from-env");
    assert_eq!(config.conversation.max_messages, 5);
}

#[test]
fn file_errors_render_through_miette() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sqlpilot.toml");
    std::fs::write(&path, "[pipeline]\nhistroy_window = 2\n").unwrap();

    let errors = load_and_validate_path(&path).unwrap_err();
    let mut rendered = String::new();
    miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor())
        .render_report(&mut rendered, &errors[0])
        .unwrap();
    assert!(rendered.contains("sqlpilot::config::unknown_key"));
    assert!(rendered.contains("history_window"));
}

#[test]
fn valid_file_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sqlpilot.toml");
    std::fs::write(&path, "[server]\nport = 9191\n").unwrap();

    let config = load_and_validate_path(&path).unwrap();
    assert_eq!(config.server.port, 9191);
}
