// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the profile and task API.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use questlog_core::{HealthStatus, Task, User, UserProfile};
use questlog_service::{AvatarUpdate, NewProfile, NewTask};
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::server::AppState;

/// Body accepted by the JSON routes, before validation.
type JsonBody = Result<Json<Value>, JsonRejection>;

/// Response body for POST /api/profile/avatar.
#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    pub success: bool,
    pub user: User,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` or `unavailable`.
    pub status: String,
    /// Binary version.
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// GET /
pub async fn root() -> &'static str {
    "Hello World"
}

/// GET /health
///
/// Probes the storage backend. Unavailable storage yields 503.
pub async fn health(State(state): State<AppState>) -> Response {
    let (code, status, detail) = match state.storage.health_check().await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "ok", None),
        Ok(HealthStatus::Unhealthy(reason)) => {
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable", Some(reason))
        }
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable", Some(e.to_string())),
    };
    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            detail,
        }),
    )
        .into_response()
}

/// GET /api/profile/{id}
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(state.profiles.get_profile(&id).await?))
}

/// POST /api/profile/avatar
pub async fn update_avatar(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<AvatarResponse>, ApiError> {
    let Json(body) = body?;
    let params = AvatarUpdate::from_json(&body)?;
    let user = state.profiles.update_avatar(params).await?;
    Ok(Json(AvatarResponse {
        success: true,
        user,
    }))
}

/// POST /api/profile/create
pub async fn create_profile(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(body) = body?;
    let params = NewProfile::from_json(&body)?;
    let user = state.profiles.create_profile(params).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(body) = body?;
    let params = NewTask::from_json(&body)?;
    let task = state.tasks.create_task(params).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PATCH /api/tasks/{id}/complete
pub async fn toggle_complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.tasks.toggle_complete(&id).await?))
}

/// GET /api/tasks/{userId}
pub async fn get_tasks(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.tasks.get_tasks(&user_id).await?))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.tasks.delete_task(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn avatar_response_wraps_user() {
        let user = User::new(
            "Ann".to_string(),
            3,
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        );
        let json = serde_json::to_value(AvatarResponse {
            success: true,
            user,
        })
        .unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["user"]["avatarIndex"], 3);
    }

    #[test]
    fn health_response_omits_empty_detail() {
        let json = serde_json::to_string(&HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            detail: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"ok","version":"0.1.0"}"#);
    }
}
