// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application services for the Questlog backend.
//!
//! [`ProfileService`] and [`TaskService`] each hold an injected storage handle.
//! Request bodies are turned into typed parameters by the [`requests`] module
//! before either service sees them.

pub mod profile;
pub mod requests;
pub mod tasks;

pub use profile::ProfileService;
pub use requests::{AvatarUpdate, NewProfile, NewTask};
pub use tasks::{MAX_TOGGLE_ATTEMPTS, TaskService};
