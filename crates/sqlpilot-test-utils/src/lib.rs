// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for sqlpilot integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic tests without a real completion provider.
//!
//! # Components
//!
//! - [`MockCompletion`] - Completion adapter with scripted replies
//! - [`RecordingObserver`] - Captures pipeline stage transitions
//! - [`TestHarness`] - Stores, pipeline, query service and router wired together

pub mod harness;
pub mod mock_completion;
pub mod recording_observer;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_completion::{DEFAULT_MOCK_RESPONSE, MockCompletion};
pub use recording_observer::{PipelineEvent, RecordingObserver};
