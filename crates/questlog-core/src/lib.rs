// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Questlog backend.
//!
//! Holds the domain records, the error taxonomy, the storage adapter trait,
//! and the task completion policy. Every other crate in the workspace builds
//! on these definitions.

pub mod completion;
pub mod error;
pub mod traits;
pub mod types;

pub use completion::{CompletionDecision, decide};
pub use error::{ErrorKind, QuestlogError};
pub use traits::{PluginAdapter, StorageAdapter};
pub use types::{CompletionUpdate, CompletionWrite, HealthStatus, Task, User, UserProfile};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_follow_taxonomy() {
        assert_eq!(
            QuestlogError::InvalidRequest("bad".into()).kind(),
            ErrorKind::InvalidRequest
        );
        assert_eq!(QuestlogError::NotFound("gone".into()).kind(), ErrorKind::NotFound);
        assert_eq!(QuestlogError::Config("cfg".into()).kind(), ErrorKind::Internal);
        assert_eq!(
            QuestlogError::storage(std::io::Error::other("disk")).kind(),
            ErrorKind::Internal
        );
        assert_eq!(QuestlogError::Internal("boom".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn storage_error_displays_source() {
        let err = QuestlogError::storage(std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "storage error: disk full");
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn storage_adapter_is_object_safe() {
        fn _assert_dyn(_: &dyn StorageAdapter) {}
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
    }
}
