// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for sqlpilot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level sqlpilot configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. Every section is optional and defaults sensibly.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SqlPilotConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Text-completion provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Generation pipeline tuning.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Conversation store settings.
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Schema cache settings.
    #[serde(default)]
    pub schema: SchemaConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name used in logs and the health endpoint.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "sqlpilot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on one `/api/query` round trip, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_request_timeout_secs() -> u64 {
    120
}

/// Which completion API the provider speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic Messages API.
    #[default]
    Anthropic,
    /// Any OpenAI-compatible `/chat/completions` endpoint.
    Openai,
}

/// Text-completion provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Provider API flavor.
    #[serde(default)]
    pub kind: ProviderKind,

    /// API key. `None` falls back to `ANTHROPIC_API_KEY` / `OPENAI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Endpoint override (self-hosted gateways, local servers).
    #[serde(default)]
    pub base_url: Option<String>,

    /// Anthropic API version header.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// HTTP timeout per completion call, in seconds.
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries on transient HTTP status codes (429, 500, 503, 529).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            api_key: None,
            model: default_model(),
            base_url: None,
            api_version: default_api_version(),
            timeout_secs: default_provider_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_provider_timeout_secs() -> u64 {
    300
}

fn default_max_retries() -> u32 {
    1
}

/// Generation pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Most recent history entries embedded in the generate prompt.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Output token cap for the first generation.
    #[serde(default = "default_generate_max_tokens")]
    pub generate_max_tokens: u32,

    /// Output token cap for the single retry.
    #[serde(default = "default_retry_max_tokens")]
    pub retry_max_tokens: u32,

    /// Output token cap for the explanation.
    #[serde(default = "default_explain_max_tokens")]
    pub explain_max_tokens: u32,

    /// Output token cap for the optimization suggestions.
    #[serde(default = "default_optimize_max_tokens")]
    pub optimize_max_tokens: u32,

    /// Request explanation and optimizations concurrently.
    #[serde(default)]
    pub concurrent_enrichment: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            generate_max_tokens: default_generate_max_tokens(),
            retry_max_tokens: default_retry_max_tokens(),
            explain_max_tokens: default_explain_max_tokens(),
            optimize_max_tokens: default_optimize_max_tokens(),
            concurrent_enrichment: false,
        }
    }
}

fn default_history_window() -> usize {
    3
}

fn default_generate_max_tokens() -> u32 {
    500
}

fn default_retry_max_tokens() -> u32 {
    500
}

fn default_explain_max_tokens() -> u32 {
    300
}

fn default_optimize_max_tokens() -> u32 {
    200
}

/// Where conversation windows live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationBackend {
    /// Process-local; lost on restart.
    #[default]
    Memory,
    /// SQLite file at `database_path`.
    Sqlite,
}

/// Conversation store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationConfig {
    /// Storage backend.
    #[serde(default)]
    pub backend: ConversationBackend,

    /// Sliding window capacity per session.
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,

    /// SQLite database path (used by the `sqlite` backend).
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            backend: ConversationBackend::default(),
            max_messages: default_max_messages(),
            database_path: default_database_path(),
        }
    }
}

fn default_max_messages() -> usize {
    20
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("sqlpilot").join("sqlpilot.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("sqlpilot.db"))
        .to_string_lossy()
        .into_owned()
}

/// Schema cache configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// File whose contents seed the `default` schema instead of the built-in one.
    #[serde(default)]
    pub default_schema_file: Option<String>,
}
