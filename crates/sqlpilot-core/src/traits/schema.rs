// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named schema cache.

use async_trait::async_trait;

use crate::error::SqlPilotError;
use crate::traits::adapter::PluginAdapter;

/// Key-value cache of schema text by name.
#[async_trait]
pub trait SchemaStore: PluginAdapter {
    /// Returns the schema stored under `name`, if any.
    async fn get_schema(&self, name: &str) -> Result<Option<String>, SqlPilotError>;

    /// Stores (or replaces) the schema under `name`.
    async fn put_schema(&self, name: &str, schema: &str) -> Result<(), SqlPilotError>;
}
