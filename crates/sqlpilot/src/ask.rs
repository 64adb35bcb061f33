// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot commands: `ask` runs a turn, `validate` checks SQL offline.

use sqlpilot_config::SqlPilotConfig;
use sqlpilot_core::{SqlPilotError, ValidationResult};
use sqlpilot_pipeline::validate_sql;

use crate::app::{build_service, read_schema_file};

const MASKED_SECRET: &str = "********";

/// Run one turn and print the result as pretty JSON on stdout.
///
/// The turn is recorded under `session` in the configured store, so with
/// the SQLite backend consecutive invocations share history.
pub async fn run_ask(
    config: &SqlPilotConfig,
    message: &str,
    session: &str,
    schema_file: Option<&str>,
) -> Result<(), SqlPilotError> {
    let schema = match schema_file {
        Some(path) => Some(read_schema_file(path).await?),
        None => None,
    };

    let service = build_service(config).await?;
    let result = service.query(session, message, schema.as_deref()).await;
    service.close().await?;
    let result = result?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Validate `sql`, print the verdict as JSON, and report whether it passed.
pub fn run_validate(sql: &str) -> Result<bool, SqlPilotError> {
    let result: ValidationResult = validate_sql(sql);
    println!("{}", serde_json::to_string(&result)?);
    Ok(result.valid)
}

/// Render the effective configuration as TOML, with the API key masked.
pub fn render_config(config: &SqlPilotConfig) -> Result<String, SqlPilotError> {
    let mut shown = config.clone();
    if shown.provider.api_key.is_some() {
        shown.provider.api_key = Some(MASKED_SECRET.to_string());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| SqlPilotError::Internal(format!("cannot render configuration: {e}")))
}
