// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! External collaborators (completion providers, stores) extend the
//! [`PluginAdapter`] base trait and use `#[async_trait]` for dynamic dispatch
//! compatibility. [`PipelineObserver`] is a synchronous sink.

pub mod adapter;
pub mod completion;
pub mod conversation;
pub mod observability;
pub mod schema;

pub use adapter::PluginAdapter;
pub use completion::CompletionAdapter;
pub use conversation::ConversationStore;
pub use observability::{NoopObserver, PipelineObserver};
pub use schema::SchemaStore;
