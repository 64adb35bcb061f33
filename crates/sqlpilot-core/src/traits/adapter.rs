// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all pluggable collaborators implement.

use async_trait::async_trait;

use crate::error::SqlPilotError;
use crate::types::{AdapterType, HealthStatus};

/// Identity and health for every adapter (completion provider, store).
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the kind of adapter.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, SqlPilotError>;
}
