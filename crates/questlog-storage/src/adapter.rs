// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use questlog_config::model::StorageConfig;
use questlog_core::{HealthStatus, PluginAdapter, QuestlogError, StorageAdapter};

use crate::database::{Database, map_tr_err};
use crate::models::{CompletionUpdate, CompletionWrite, Task, User};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened on the first call to
/// [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`StorageAdapter::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, QuestlogError> {
        self.db.get().ok_or_else(|| QuestlogError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, QuestlogError> {
        let db = match self.db() {
            Ok(db) => db,
            Err(_) => return Ok(HealthStatus::Unhealthy("storage not initialized".into())),
        };
        let probe = db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await;
        match probe {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), QuestlogError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), QuestlogError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| QuestlogError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), QuestlogError> {
        let db = self.db()?;
        db.checkpoint().await?;
        db.connection()
            .clone()
            .close()
            .await
            .map_err(map_tr_err)?;
        debug!("SQLite storage closed");
        Ok(())
    }

    // --- Users ---

    async fn create_user(&self, user: &User) -> Result<(), QuestlogError> {
        queries::users::create_user(self.db()?, user).await
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, QuestlogError> {
        queries::users::get_user(self.db()?, id).await
    }

    async fn update_user_avatar(
        &self,
        id: &str,
        avatar_index: i64,
    ) -> Result<Option<User>, QuestlogError> {
        queries::users::update_avatar(self.db()?, id, avatar_index).await
    }

    // --- Tasks ---

    async fn create_task(&self, task: &Task) -> Result<(), QuestlogError> {
        queries::tasks::create_task(self.db()?, task).await
    }

    async fn get_task(&self, id: &str) -> Result<Option<Task>, QuestlogError> {
        queries::tasks::get_task(self.db()?, id).await
    }

    async fn list_tasks_for_user(&self, user_id: &str) -> Result<Vec<Task>, QuestlogError> {
        queries::tasks::list_tasks_for_user(self.db()?, user_id).await
    }

    async fn apply_completion(
        &self,
        update: &CompletionUpdate,
    ) -> Result<CompletionWrite, QuestlogError> {
        queries::tasks::apply_completion(self.db()?, update).await
    }

    async fn delete_task(&self, id: &str) -> Result<bool, QuestlogError> {
        queries::tasks::delete_task(self.db()?, id).await
    }
}
