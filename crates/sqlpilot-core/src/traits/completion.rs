// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text-completion capability consumed by the generation pipeline.

use async_trait::async_trait;

use crate::error::SqlPilotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::CompletionRequest;

/// Turns a role-tagged message list into a single completion string.
///
/// The pipeline treats implementations as a black box: model selection,
/// transport retries and rate limiting are the adapter's business.
#[async_trait]
pub trait CompletionAdapter: PluginAdapter {
    /// Sends the request and returns the raw completion text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, SqlPilotError>;
}
