// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `questlog serve` and `questlog migrate` command implementations.
//!
//! `serve` opens SQLite storage, wires the profile and task services around
//! it, and runs the HTTP server until SIGINT/SIGTERM. Storage is closed
//! (WAL checkpoint) after the server drains.

use std::sync::Arc;

use questlog_config::QuestlogConfig;
use questlog_core::{QuestlogError, StorageAdapter};
use questlog_gateway::{AppState, start_server};
use questlog_storage::SqliteStorage;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::shutdown;

/// Runs the HTTP server until a shutdown signal arrives.
pub async fn run_serve(config: QuestlogConfig) -> Result<(), QuestlogError> {
    info!(
        host = %config.server.host,
        port = config.server.port,
        database = %config.storage.database_path,
        "starting questlog"
    );

    let storage = open_storage(&config).await?;
    let state = AppState::new(storage.clone(), config.progression.xp_per_completion);
    let cancel = shutdown::install_signal_handler();

    let served = start_server(&config.server, state, cancel).await;
    if let Err(e) = &served {
        error!(error = %e, "server exited with error");
    }

    storage.close().await?;
    info!("storage closed");
    served
}

/// Opens the database, applying pending migrations, then closes it again.
pub async fn run_migrate(config: QuestlogConfig) -> Result<(), QuestlogError> {
    let storage = open_storage(&config).await?;
    storage.close().await?;
    info!(database = %config.storage.database_path, "migrations up to date");
    Ok(())
}

async fn open_storage(config: &QuestlogConfig) -> Result<Arc<dyn StorageAdapter>, QuestlogError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    Ok(Arc::new(storage))
}

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

fn default_filter(log_level: &str) -> EnvFilter {
    EnvFilter::new(filter_directives(log_level))
}

fn filter_directives(log_level: &str) -> String {
    format!("questlog={log_level},tower_http={log_level},warn")
}
