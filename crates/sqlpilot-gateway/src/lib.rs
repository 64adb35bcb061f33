// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP API for sqlpilot.
//!
//! Exposes the generation pipeline and conversation store over a small
//! JSON API (axum), with permissive CORS for browser front ends.

pub mod handlers;
pub mod server;
pub mod service;

pub use server::{AppState, ServerConfig, router, start_server};
pub use service::QueryService;
