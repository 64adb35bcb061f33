// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexical SQL safety gate and completion output cleanup.
//!
//! There is no SQL parser here. The checks are substring and regex tests,
//! so false positives and negatives are expected.

use std::sync::LazyLock;

use regex::Regex;
use sqlpilot_core::ValidationResult;

pub const DANGEROUS_SQL: &str = "Potentially dangerous SQL detected";
pub const NOT_SELECT: &str = "Query must be a SELECT statement";
pub const MISSING_FROM: &str = "Missing FROM clause";
pub const UNBALANCED_PARENS: &str = "Unbalanced parentheses";

/// Statement-chaining destructive patterns, matched against the raw text.
static DANGEROUS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i);\s*DROP").unwrap(),
        Regex::new(r"(?i);\s*DELETE").unwrap(),
        Regex::new(r"(?i);\s*TRUNCATE").unwrap(),
        // Only the comment's own line is scanned; `\r` and U+2028/U+2029
        // also end a line.
        Regex::new(r"(?i)--[^\r\n\x{2028}\x{2029}]*DROP").unwrap(),
    ]
});

static SQL_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)```sql\n?").unwrap());
static BARE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```\n?").unwrap());

/// Validate a candidate query. Checks run in order and stop at the first failure.
pub fn validate_sql(sql: &str) -> ValidationResult {
    if DANGEROUS_PATTERNS.iter().any(|p| p.is_match(sql)) {
        return ValidationResult::invalid(DANGEROUS_SQL);
    }

    let normalized = sql.trim().to_uppercase();

    if !normalized.starts_with("SELECT") {
        return ValidationResult::invalid(NOT_SELECT);
    }

    if !normalized.contains("FROM") {
        return ValidationResult::invalid(MISSING_FROM);
    }

    let open = sql.matches('(').count();
    let close = sql.matches(')').count();
    if open != close {
        return ValidationResult::invalid(UNBALANCED_PARENS);
    }

    ValidationResult::ok()
}

/// Remove Markdown code fences (tagged `sql` or untagged) and trim.
pub fn clean_sql_response(raw: &str) -> String {
    let without_tagged = SQL_FENCE.replace_all(raw, "");
    let without_fences = BARE_FENCE.replace_all(&without_tagged, "");
    without_fences.trim().to_string()
}
