// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text-completion adapters for sqlpilot.
//!
//! Both adapters are non-streaming: the pipeline needs whole answers, and
//! each stage's output is small.

pub mod anthropic;
pub mod http;
pub mod openai;
pub mod types;

use std::sync::Arc;

use sqlpilot_config::{ProviderConfig, ProviderKind};
use sqlpilot_core::{CompletionAdapter, PluginAdapter, SqlPilotError};
use tracing::info;

pub use anthropic::AnthropicCompletion;
pub use openai::OpenAiCompletion;

/// Instantiate the adapter selected by `[provider] kind`.
pub fn build_completion(
    config: &ProviderConfig,
) -> Result<Arc<dyn CompletionAdapter>, SqlPilotError> {
    let adapter: Arc<dyn CompletionAdapter> = match config.kind {
        ProviderKind::Anthropic => Arc::new(AnthropicCompletion::from_config(config)?),
        ProviderKind::Openai => Arc::new(OpenAiCompletion::from_config(config)?),
    };
    info!(provider = adapter.name(), model = %config.model, "completion provider ready");
    Ok(adapter)
}

/// Explicit key if non-empty, else the environment variable `env_var`.
pub(crate) fn resolve_api_key(
    explicit: Option<&str>,
    env_var: &str,
) -> Result<String, SqlPilotError> {
    if let Some(key) = explicit.filter(|k| !k.trim().is_empty()) {
        return Ok(key.to_string());
    }
    std::env::var(env_var)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            SqlPilotError::Config(format!(
                "no API key configured: set provider.api_key, SQLPILOT_PROVIDER_API_KEY, or {env_var}"
            ))
        })
}
