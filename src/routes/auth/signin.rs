use super::sign_in;
use crate::authentication::{AuthError, Credentials};
use crate::routes::constants::{ERROR_AUTHENTICATION_FAILED, ERROR_SOMETHING_WENT_WRONG};
use crate::routes::utils::{ApiResponse, json_error};
use crate::session_state::TypedSession;
use crate::startup::AppState;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use secrecy::Secret;

#[derive(serde::Deserialize, utoipa::ToSchema)]
pub struct SignInData {
    email: String,
    #[schema(value_type = String)]
    password: Secret<String>,
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/signin",
    tag = "auth",
    request_body = SignInData,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse),
        (status = 401, description = "Invalid login credentials", body = ApiResponse),
    )
)]
#[tracing::instrument(
    skip(form, state, session),
    fields(email=tracing::field::Empty, user_id=tracing::field::Empty)
)]
pub async fn signin(
    session: TypedSession,
    State(state): State<AppState>,
    Json(form): Json<SignInData>,
) -> Response {
    tracing::Span::current().record("email", tracing::field::display(&form.email));
    let credentials = Credentials {
        email: form.email,
        password: form.password,
    };
    match sign_in(&session, &state.db, credentials).await {
        Ok(_) => (StatusCode::OK, Json(ApiResponse::ok())).into_response(),
        Err(AuthError::InvalidCredentials(_)) => {
            json_error(StatusCode::UNAUTHORIZED, ERROR_AUTHENTICATION_FAILED)
        }
        Err(AuthError::UnexpectedError(e)) => {
            tracing::error!(error.cause_chain = ?e, "Sign-in failed unexpectedly");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, ERROR_SOMETHING_WENT_WRONG)
        }
    }
}
