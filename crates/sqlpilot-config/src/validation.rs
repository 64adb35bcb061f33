// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde cannot express. All problems are collected
//! before returning so one run reports everything.

use crate::diagnostic::ConfigError;
use crate::model::{ConversationBackend, SqlPilotConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &SqlPilotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.service.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "service.log_level `{}` is not one of {}",
            config.service.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    } else {
        let is_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_ip && !is_hostname {
            errors.push(ConfigError::validation(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            )));
        }
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "server.request_timeout_secs must be at least 1",
        ));
    }

    if config.provider.model.trim().is_empty() {
        errors.push(ConfigError::validation("provider.model must not be empty"));
    }

    if let Some(url) = &config.provider.base_url
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        errors.push(ConfigError::validation(format!(
            "provider.base_url `{url}` must start with http:// or https://"
        )));
    }

    if config.pipeline.history_window < 1 {
        errors.push(ConfigError::validation(
            "pipeline.history_window must be at least 1",
        ));
    }

    for (key, value) in [
        ("generate_max_tokens", config.pipeline.generate_max_tokens),
        ("retry_max_tokens", config.pipeline.retry_max_tokens),
        ("explain_max_tokens", config.pipeline.explain_max_tokens),
        ("optimize_max_tokens", config.pipeline.optimize_max_tokens),
    ] {
        if value == 0 {
            errors.push(ConfigError::validation(format!(
                "pipeline.{key} must be greater than 0"
            )));
        }
    }

    if config.conversation.max_messages < 1 {
        errors.push(ConfigError::validation(
            "conversation.max_messages must be at least 1",
        ));
    }

    if config.conversation.backend == ConversationBackend::Sqlite
        && config.conversation.database_path.trim().is_empty()
    {
        errors.push(ConfigError::validation(
            "conversation.database_path must not be empty when backend = \"sqlite\"",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
