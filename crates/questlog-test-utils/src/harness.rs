// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full HTTP stack over a temp SQLite database
//! and drives it in-process, without binding a socket.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use questlog_config::QuestlogConfig;
use questlog_config::model::StorageConfig;
use questlog_core::{QuestlogError, StorageAdapter};
use questlog_gateway::{AppState, router};
use questlog_storage::SqliteStorage;
use serde_json::Value;
use tower::ServiceExt;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    xp_per_completion: Option<i64>,
    wal_mode: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            xp_per_completion: None,
            wal_mode: true,
        }
    }

    /// Override the XP awarded per completion.
    pub fn with_xp_per_completion(mut self, xp: i64) -> Self {
        self.xp_per_completion = Some(xp);
        self
    }

    /// Use rollback-journal mode instead of WAL.
    pub fn without_wal(mut self) -> Self {
        self.wal_mode = false;
        self
    }

    /// Build the test harness, opening a fresh database.
    pub async fn build(self) -> Result<TestHarness, QuestlogError> {
        let temp_dir = tempfile::TempDir::new().map_err(QuestlogError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = QuestlogConfig {
            storage: StorageConfig {
                database_path: db_path.to_string_lossy().to_string(),
                wal_mode: self.wal_mode,
            },
            ..QuestlogConfig::default()
        };
        if let Some(xp) = self.xp_per_completion {
            config.progression.xp_per_completion = xp;
        }

        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

        let state = AppState::new(storage.clone(), config.progression.xp_per_completion);

        Ok(TestHarness {
            router: router(state.clone()),
            state,
            storage,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// Status and body of a response produced by the harness.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parses the body as JSON. Panics if it is not.
    pub fn json(&self) -> Value {
        match serde_json::from_slice(&self.body) {
            Ok(value) => value,
            Err(e) => panic!(
                "response body is not JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            ),
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A complete test environment: temp storage, services, and router.
pub struct TestHarness {
    /// The application router.
    pub router: Router,
    /// Services shared with the router.
    pub state: AppState,
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<dyn StorageAdapter>,
    /// Effective configuration.
    pub config: QuestlogConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Sends a request through the router and collects the response.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Result<TestResponse, QuestlogError> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .map_err(|e| QuestlogError::Internal(format!("invalid test request: {e}")))?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| QuestlogError::Internal(format!("router failed: {e}")))?;
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| QuestlogError::Internal(format!("failed to read body: {e}")))?;

        Ok(TestResponse {
            status,
            body: body.to_vec(),
        })
    }

    pub async fn get(&self, uri: &str) -> Result<TestResponse, QuestlogError> {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Result<TestResponse, QuestlogError> {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str) -> Result<TestResponse, QuestlogError> {
        self.request(Method::PATCH, uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> Result<TestResponse, QuestlogError> {
        self.request(Method::DELETE, uri, None).await
    }

    /// Creates a profile through the API and returns its JSON.
    pub async fn create_profile(&self, name: &str, avatar_index: i64) -> Result<Value, QuestlogError> {
        let response = self
            .post_json(
                "/api/profile/create",
                serde_json::json!({ "name": name, "avatarIndex": avatar_index }),
            )
            .await?;
        if response.status != StatusCode::CREATED {
            return Err(QuestlogError::Internal(format!(
                "profile creation returned {}: {}",
                response.status,
                response.text()
            )));
        }
        Ok(response.json())
    }
}
