// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for sqlpilot.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the workspace. Completion providers and
//! stores implement traits defined here; the pipeline consumes them.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SqlPilotError;
pub use types::{
    AdapterType, ChatMessage, CompletionRequest, GenerationRequest, HealthStatus, Message, Role,
    SqlResult, ValidationResult,
};

pub use traits::{
    CompletionAdapter, ConversationStore, NoopObserver, PipelineObserver, PluginAdapter,
    SchemaStore,
};
