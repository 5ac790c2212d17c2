// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the Data Store holding users and tasks.

use async_trait::async_trait;

use crate::error::QuestlogError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionUpdate, CompletionWrite, Task, User};

/// Adapter for the persistence backend.
///
/// Services receive a handle to this trait at construction time. Lookups
/// return `Ok(None)` for absent rows; it is up to the caller whether that
/// becomes a not-found error.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Opens the backend and applies pending migrations.
    async fn initialize(&self) -> Result<(), QuestlogError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), QuestlogError>;

    // --- Users ---

    /// Inserts a new user.
    async fn create_user(&self, user: &User) -> Result<(), QuestlogError>;

    /// Fetches a user by id.
    async fn get_user(&self, id: &str) -> Result<Option<User>, QuestlogError>;

    /// Sets a user's avatar and returns the updated row, or `None` if no row matched.
    async fn update_user_avatar(
        &self,
        id: &str,
        avatar_index: i64,
    ) -> Result<Option<User>, QuestlogError>;

    // --- Tasks ---

    /// Inserts a new task. Fails if the owning user does not exist.
    async fn create_task(&self, task: &Task) -> Result<(), QuestlogError>;

    /// Fetches a task by id.
    async fn get_task(&self, id: &str) -> Result<Option<Task>, QuestlogError>;

    /// Lists all tasks owned by a user, oldest first.
    async fn list_tasks_for_user(&self, user_id: &str) -> Result<Vec<Task>, QuestlogError>;

    /// Applies a conditional completion write and its XP award atomically.
    async fn apply_completion(
        &self,
        update: &CompletionUpdate,
    ) -> Result<CompletionWrite, QuestlogError>;

    /// Deletes a task. Returns `false` if no row matched.
    async fn delete_task(&self, id: &str) -> Result<bool, QuestlogError>;
}
