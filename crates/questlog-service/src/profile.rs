// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile service: fetch, create, and update user profiles.

use std::sync::Arc;

use questlog_core::types::current_timestamp;
use questlog_core::{QuestlogError, StorageAdapter, User, UserProfile};
use tracing::{debug, info};

use crate::requests::{AvatarUpdate, NewProfile};

/// Operations over user profiles.
#[derive(Clone)]
pub struct ProfileService {
    storage: Arc<dyn StorageAdapter>,
}

impl ProfileService {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    /// Fetches a user together with all tasks they own.
    pub async fn get_profile(&self, id: &str) -> Result<UserProfile, QuestlogError> {
        let user = self
            .storage
            .get_user(id)
            .await?
            .ok_or_else(|| QuestlogError::NotFound("User not found".to_string()))?;
        let tasks = self.storage.list_tasks_for_user(&user.id).await?;
        debug!(user_id = %user.id, tasks = tasks.len(), "profile loaded");
        Ok(UserProfile { user, tasks })
    }

    /// Sets the avatar of an existing user.
    ///
    /// A missing user is reported as an internal error, not as not-found.
    pub async fn update_avatar(&self, params: AvatarUpdate) -> Result<User, QuestlogError> {
        self.storage
            .update_user_avatar(&params.id, params.avatar_index)
            .await?
            .ok_or_else(|| {
                QuestlogError::Internal(format!("avatar update matched no user: {}", params.id))
            })
    }

    /// Creates a user with default progress fields.
    pub async fn create_profile(&self, params: NewProfile) -> Result<User, QuestlogError> {
        let user = User::new(params.name, params.avatar_index, current_timestamp());
        self.storage.create_user(&user).await?;
        info!(user_id = %user.id, "profile created");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questlog_config::model::StorageConfig;
    use questlog_storage::SqliteStorage;
    use tempfile::TempDir;

    async fn setup() -> (ProfileService, Arc<SqliteStorage>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(SqliteStorage::new(StorageConfig {
            database_path: dir.path().join("profile.db").to_string_lossy().into_owned(),
            wal_mode: true,
        }));
        storage.initialize().await.unwrap();
        (ProfileService::new(storage.clone()), storage, dir)
    }

    fn new_profile(name: &str, avatar_index: i64) -> NewProfile {
        NewProfile {
            name: name.to_string(),
            avatar_index,
        }
    }

    #[tokio::test]
    async fn create_profile_initializes_progress() {
        let (service, storage, _dir) = setup().await;

        let user = service.create_profile(new_profile("Ann", 2)).await.unwrap();
        assert_eq!(user.name, "Ann");
        assert_eq!(user.avatar_index, 2);
        assert_eq!(user.xp, 0);
        assert_eq!(user.level, 1);
        assert_eq!(user.hydration_progress, 0);
        assert_eq!(user.medication_progress, 0);

        let stored = storage.get_user(&user.id).await.unwrap().unwrap();
        assert_eq!(stored, user);
    }

    #[tokio::test]
    async fn get_profile_includes_tasks() {
        let (service, storage, _dir) = setup().await;
        let user = service.create_profile(new_profile("Ann", 2)).await.unwrap();
        let task = questlog_core::Task::new(
            "Stretch".to_string(),
            user.id.clone(),
            None,
            Vec::new(),
            current_timestamp(),
        );
        storage.create_task(&task).await.unwrap();

        let profile = service.get_profile(&user.id).await.unwrap();
        assert_eq!(profile.user.id, user.id);
        assert_eq!(profile.tasks, vec![task]);
    }

    #[tokio::test]
    async fn get_missing_profile_is_not_found() {
        let (service, _storage, _dir) = setup().await;
        let err = service.get_profile("nobody").await.unwrap_err();
        match err {
            QuestlogError::NotFound(msg) => assert_eq!(msg, "User not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_avatar_changes_only_the_avatar() {
        let (service, _storage, _dir) = setup().await;
        let user = service.create_profile(new_profile("Ann", 2)).await.unwrap();

        let updated = service
            .update_avatar(AvatarUpdate {
                id: user.id.clone(),
                avatar_index: 9,
            })
            .await
            .unwrap();
        assert_eq!(updated.avatar_index, 9);
        assert_eq!(updated.name, user.name);
        assert_eq!(updated.created_at, user.created_at);
    }

    #[tokio::test]
    async fn update_avatar_for_missing_user_is_internal() {
        let (service, _storage, _dir) = setup().await;
        let err = service
            .update_avatar(AvatarUpdate {
                id: "ghost".to_string(),
                avatar_index: 1,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), questlog_core::ErrorKind::Internal);
    }
}
