// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface for the Questlog backend.
//!
//! Maps the profile and task routes onto [`questlog_service`], marshals JSON
//! bodies, and turns error kinds into status codes. Cross-origin requests
//! are permitted from any origin.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use server::{AppState, router, start_server};
