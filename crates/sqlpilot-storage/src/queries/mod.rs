// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query functions over a [`Database`](crate::Database).

pub mod messages;
pub mod schemas;
