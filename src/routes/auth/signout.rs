use crate::routes::constants::{ERROR_AUTHENTICATION_REQUIRED, ERROR_SOMETHING_WENT_WRONG};
use crate::routes::utils::json_error;
use crate::session_state::TypedSession;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct SignOutResponse {
    pub success: bool,
    pub redirect: String,
}

/// Sign out and clear the session
#[utoipa::path(
    post,
    path = "/api/auth/signout",
    tag = "auth",
    responses(
        (status = 200, description = "Signed out", body = SignOutResponse),
        (status = 401, description = "Not signed in"),
        (status = 500, description = "The session could not be ended"),
    )
)]
#[tracing::instrument(name = "Sign out", skip(session))]
pub async fn signout(session: TypedSession) -> Response {
    match session.get_user_id().await {
        Ok(Some(_)) => match session.log_out().await {
            Ok(()) => Json(SignOutResponse {
                success: true,
                redirect: "/".to_string(),
            })
            .into_response(),
            Err(e) => {
                tracing::error!(error.cause_chain = ?e, "Failed to end the session");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, ERROR_SOMETHING_WENT_WRONG)
            }
        },
        Ok(None) | Err(_) => json_error(StatusCode::UNAUTHORIZED, ERROR_AUTHENTICATION_REQUIRED),
    }
}
