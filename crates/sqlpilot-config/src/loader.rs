// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./sqlpilot.toml` > `~/.config/sqlpilot/sqlpilot.toml`
//! > `/etc/sqlpilot/sqlpilot.toml`, with environment variable overrides via the
//! `SQLPILOT_` prefix.

// figment::Error is external and cannot be boxed without a wrapper.
#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SqlPilotConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/sqlpilot/sqlpilot.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "sqlpilot.toml";

/// Top-level sections that `SQLPILOT_<SECTION>_<KEY>` variables map into.
const ENV_SECTIONS: &[&str] = &[
    "service",
    "server",
    "provider",
    "pipeline",
    "conversation",
    "schema",
];

/// Path of the per-user config file, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sqlpilot").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/sqlpilot/sqlpilot.toml`
/// 3. `~/.config/sqlpilot/sqlpilot.toml`
/// 4. `./sqlpilot.toml`
/// 5. `SQLPILOT_*` environment variables
pub fn load_config() -> Result<SqlPilotConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SqlPilotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SqlPilotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SqlPilotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SqlPilotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SqlPilotConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider with explicit section-to-dot mapping.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `SQLPILOT_PROVIDER_API_KEY` maps to `provider.api_key` rather than
/// `provider.api.key`.
fn env_provider() -> Env {
    Env::prefixed("SQLPILOT_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env var name to a dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
