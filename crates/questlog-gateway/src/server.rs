// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the API.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};
use questlog_config::model::ServerConfig;
use questlog_core::{QuestlogError, StorageAdapter};
use questlog_service::{ProfileService, TaskService};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub profiles: ProfileService,
    pub tasks: TaskService,
    /// Storage handle, used directly only by the health probe.
    pub storage: Arc<dyn StorageAdapter>,
}

impl AppState {
    /// Builds both services around one storage handle.
    pub fn new(storage: Arc<dyn StorageAdapter>, xp_per_completion: i64) -> Self {
        Self {
            profiles: ProfileService::new(storage.clone()),
            tasks: TaskService::new(storage.clone(), xp_per_completion),
            storage,
        }
    }
}

/// Builds the application router.
///
/// Task listing and deletion share the `/api/tasks/{id}` path; for `GET` the
/// segment is the owning user's id.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/profile/{id}", get(handlers::get_profile))
        .route("/profile/avatar", post(handlers::update_avatar))
        .route("/profile/create", post(handlers::create_profile))
        .route("/tasks", post(handlers::create_task))
        .route("/tasks/{id}/complete", patch(handlers::toggle_complete))
        .route(
            "/tasks/{id}",
            get(handlers::get_tasks).delete(handlers::delete_task),
        );

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `host:port` and serves the API until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), QuestlogError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| QuestlogError::Internal(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| QuestlogError::Internal(format!("server error: {e}")))?;

    tracing::info!("server stopped");
    Ok(())
}
