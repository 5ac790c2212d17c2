// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task service: create, list, delete, and the completion toggle.
//!
//! The toggle reads the task, evaluates the completion policy, then hands the
//! result to storage as a conditional write keyed on the `completedAt` value
//! it read. Storage applies the stamp and any XP award in one transaction. If
//! another toggle got there first the write is rejected as stale and the
//! service starts over from a fresh read.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use questlog_core::types::current_timestamp;
use questlog_core::{
    CompletionUpdate, CompletionWrite, QuestlogError, StorageAdapter, Task, decide,
};
use tracing::{debug, info};

use crate::requests::NewTask;

/// Upper bound on read/evaluate/write rounds for one toggle.
pub const MAX_TOGGLE_ATTEMPTS: usize = 3;

/// Operations over tasks.
#[derive(Clone)]
pub struct TaskService {
    storage: Arc<dyn StorageAdapter>,
    xp_per_completion: i64,
}

impl TaskService {
    pub fn new(storage: Arc<dyn StorageAdapter>, xp_per_completion: i64) -> Self {
        Self {
            storage,
            xp_per_completion,
        }
    }

    /// Creates a task. Fails at the storage layer if the owner does not exist.
    pub async fn create_task(&self, params: NewTask) -> Result<Task, QuestlogError> {
        let task = Task::new(
            params.title,
            params.user_id,
            params.due_time,
            params.repeat_days,
            current_timestamp(),
        );
        self.storage.create_task(&task).await?;
        info!(task_id = %task.id, user_id = %task.user_id, repeating = task.is_repeating(), "task created");
        Ok(task)
    }

    /// Toggles completion of a task as of the current instant.
    pub async fn toggle_complete(&self, id: &str) -> Result<Task, QuestlogError> {
        self.toggle_complete_at(id, current_timestamp()).await
    }

    /// Toggles completion of a task as of `now`.
    pub async fn toggle_complete_at(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Task, QuestlogError> {
        for attempt in 1..=MAX_TOGGLE_ATTEMPTS {
            let task = self
                .storage
                .get_task(id)
                .await?
                .ok_or_else(task_not_found)?;

            let decision = decide(task.completed_at, &task.repeat_days, now);
            let update = CompletionUpdate {
                task_id: task.id.clone(),
                expected_completed_at: task.completed_at,
                completed_at: decision.completed_at,
                xp_award: if decision.award_xp {
                    self.xp_per_completion
                } else {
                    0
                },
            };

            match self.storage.apply_completion(&update).await? {
                CompletionWrite::Applied(updated) => {
                    debug!(
                        task_id = %updated.id,
                        completed = updated.completed_at.is_some(),
                        xp_award = update.xp_award,
                        "task toggled"
                    );
                    return Ok(updated);
                }
                CompletionWrite::Missing => return Err(task_not_found()),
                CompletionWrite::Stale => {
                    debug!(task_id = %id, attempt, "task changed during toggle, retrying");
                }
            }
        }

        Err(QuestlogError::Internal(format!(
            "task {id} changed concurrently on {MAX_TOGGLE_ATTEMPTS} attempts"
        )))
    }

    /// Lists every task owned by `user_id`. An unknown user simply has none.
    pub async fn get_tasks(&self, user_id: &str) -> Result<Vec<Task>, QuestlogError> {
        self.storage.list_tasks_for_user(user_id).await
    }

    /// Deletes a task. A missing task is reported as an internal error.
    pub async fn delete_task(&self, id: &str) -> Result<(), QuestlogError> {
        if !self.storage.delete_task(id).await? {
            return Err(QuestlogError::Internal(format!(
                "delete matched no task: {id}"
            )));
        }
        info!(task_id = %id, "task deleted");
        Ok(())
    }
}

fn task_not_found() -> QuestlogError {
    QuestlogError::NotFound("Task not found".to_string())
}
