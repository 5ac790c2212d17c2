// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Questlog backend.

use thiserror::Error;

/// The primary error type used across services, storage, and the HTTP surface.
#[derive(Debug, Error)]
pub enum QuestlogError {
    /// Missing or mistyped input fields. The message is safe to show to clients.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A resource that was explicitly looked up does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, constraint violation).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Client-visible classification of a [`QuestlogError`].
///
/// Only `InvalidRequest` and `NotFound` are distinguished; everything else
/// is reported as a generic internal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    NotFound,
    Internal,
}

impl QuestlogError {
    /// Returns the client-visible classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Config(_) | Self::Storage { .. } | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Wraps any error source as a storage error.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(source),
        }
    }
}
