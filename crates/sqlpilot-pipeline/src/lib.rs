// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Natural-language to SQL generation for sqlpilot.
//!
//! The [`GenerationPipeline`] builds stage prompts ([`prompt`]), calls a
//! [`CompletionAdapter`](sqlpilot_core::CompletionAdapter), gates the
//! candidate through the lexical [`validator`], retries once on rejection,
//! and finally asks for an explanation and optimization hints.

pub mod machine;
pub mod observer;
pub mod pipeline;
pub mod prompt;
pub mod validator;

pub use machine::PipelineState;
pub use observer::TracingObserver;
pub use pipeline::{GenerationPipeline, PipelineSettings};
pub use prompt::{PromptBuilder, Stage};
pub use validator::{clean_sql_response, validate_sql};
