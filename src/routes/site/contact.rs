use crate::domain::{ContactRequest, validation_messages};
use crate::routes::constants::ERROR_RELAY_FAILED;
use crate::routes::utils::ApiResponse;
use crate::startup::AppState;
use crate::telemetry::error_chain_fmt;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub const CONTACT_SUCCESS_MESSAGE: &str =
    "Vielen Dank für Ihre Anfrage! Wir melden uns schnellstmöglich bei Ihnen.";

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContactValidationResponse {
    pub success: bool,
    pub error: String,
    pub errors: Vec<String>,
}

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("Bitte überprüfen Sie Ihre Eingaben.")]
    ValidationError(Vec<String>),
    #[error("{}", ERROR_RELAY_FAILED)]
    RelayError(#[source] reqwest::Error),
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        match self {
            ContactError::ValidationError(ref errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ContactValidationResponse {
                    success: false,
                    error: self.to_string(),
                    errors: errors.clone(),
                }),
            )
                .into_response(),
            ContactError::RelayError(_) => {
                tracing::error!(error.cause_chain = ?self, "Contact relay failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ApiResponse::failure(self.to_string())),
                )
                    .into_response()
            }
        }
    }
}

/// Submit a parts inquiry
///
/// Validates the request and forwards it once to the contact relay.
#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "site",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Request forwarded", body = ApiResponse),
        (status = 422, description = "Invalid input", body = ContactValidationResponse),
        (status = 502, description = "Relay unavailable", body = ApiResponse),
    )
)]
#[tracing::instrument(
    name = "Submitting contact request",
    skip(state, request),
    fields(email = %request.email)
)]
pub async fn submit_contact_request(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<ApiResponse>, ContactError> {
    let request = request
        .parse()
        .map_err(|e| ContactError::ValidationError(validation_messages(&e)))?;
    state
        .relay_client
        .send(&request)
        .await
        .map_err(ContactError::RelayError)?;
    Ok(Json(ApiResponse::ok_with_message(CONTACT_SUCCESS_MESSAGE)))
}
