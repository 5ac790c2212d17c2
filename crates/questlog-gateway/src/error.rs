// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of service errors onto HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use questlog_core::{ErrorKind, QuestlogError};
use serde::Serialize;
use tracing::{error, warn};

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
const INVALID_JSON_MESSAGE: &str = "Invalid JSON body";

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Error returned by every API handler.
#[derive(Debug)]
pub enum ApiError {
    /// A service or storage failure.
    Service(QuestlogError),
    /// The request body was not valid JSON.
    InvalidJson(JsonRejection),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Service(err) => match err.kind() {
                ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InvalidJson(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// The message shown to clients. Internal details never leave the server.
    pub fn client_message(&self) -> String {
        match self {
            Self::Service(QuestlogError::InvalidRequest(msg) | QuestlogError::NotFound(msg)) => {
                msg.clone()
            }
            Self::Service(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            Self::InvalidJson(_) => INVALID_JSON_MESSAGE.to_string(),
        }
    }
}

impl From<QuestlogError> for ApiError {
    fn from(err: QuestlogError) -> Self {
        Self::Service(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidJson(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Service(err) if status.is_server_error() => {
                error!(error = %err, "request failed");
            }
            Self::InvalidJson(rejection) => {
                warn!(reason = %rejection.body_text(), "rejected request body");
            }
            Self::Service(_) => {}
        }
        (
            status,
            Json(ErrorResponse {
                error: self.client_message(),
            }),
        )
            .into_response()
    }
}
