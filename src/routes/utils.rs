//! Shared response shapes for JSON handlers

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// The `{success, error}` envelope every JSON endpoint reports failures in.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            message: None,
        }
    }

    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            error: None,
            message: Some(message.into()),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            message: None,
        }
    }
}

pub fn json_error(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ApiResponse::failure(error))).into_response()
}

/// Logs the cause chain and hides it from the client.
pub fn internal_error(e: &anyhow::Error) -> Response {
    tracing::error!(error.cause_chain = ?e, "Unexpected error");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        super::constants::ERROR_SOMETHING_WENT_WRONG,
    )
}
