// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Questlog integration tests.
//!
//! [`TestHarness`] wires a temp SQLite database, the services, and the HTTP
//! router together so tests can drive real requests in-process.

pub mod harness;

pub use harness::{TestHarness, TestHarnessBuilder, TestResponse};
