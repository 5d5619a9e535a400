use crate::authentication::{
    CreateUserError, NewAccount, PasswordValidationError, sign_up, validate_password_length,
};
use crate::routes::constants::ERROR_SOMETHING_WENT_WRONG;
use crate::routes::utils::{ApiResponse, json_error};
use crate::startup::AppState;
use crate::telemetry::error_chain_fmt;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use secrecy::Secret;
use validator::ValidateEmail;

pub const SIGNUP_SUCCESS_MESSAGE: &str = "Registrierung erfolgreich. Sie können sich jetzt anmelden.";

#[derive(serde::Deserialize, utoipa::ToSchema)]
pub struct SignUpData {
    email: String,
    #[schema(value_type = String)]
    password: Secret<String>,
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(thiserror::Error)]
pub enum SignUpError {
    #[error("Bitte geben Sie eine gültige E-Mail-Adresse an.")]
    InvalidEmail,
    #[error(transparent)]
    InvalidPassword(#[from] PasswordValidationError),
    #[error("Ein Konto mit dieser E-Mail-Adresse existiert bereits.")]
    EmailTaken,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SignUpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<CreateUserError> for SignUpError {
    fn from(e: CreateUserError) -> Self {
        match e {
            CreateUserError::EmailTaken => SignUpError::EmailTaken,
            CreateUserError::UnexpectedError(e) => SignUpError::UnexpectedError(e),
        }
    }
}

impl IntoResponse for SignUpError {
    fn into_response(self) -> Response {
        match self {
            SignUpError::InvalidEmail | SignUpError::InvalidPassword(_) => {
                json_error(StatusCode::BAD_REQUEST, self.to_string())
            }
            SignUpError::EmailTaken => json_error(StatusCode::CONFLICT, self.to_string()),
            SignUpError::UnexpectedError(ref e) => {
                tracing::error!(error.cause_chain = ?e, "Sign-up failed unexpectedly");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, ERROR_SOMETHING_WENT_WRONG)
            }
        }
    }
}

/// Create an account
///
/// New accounts carry no role; an admin grants access separately.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body = SignUpData,
    responses(
        (status = 201, description = "Account created", body = ApiResponse),
        (status = 400, description = "Invalid email or password", body = ApiResponse),
        (status = 409, description = "Email already registered", body = ApiResponse),
    )
)]
#[tracing::instrument(name = "Sign up", skip(form, state), fields(email = %form.email))]
pub async fn signup(
    State(state): State<AppState>,
    Json(form): Json<SignUpData>,
) -> Result<impl IntoResponse, SignUpError> {
    if !form.email.trim().validate_email() {
        return Err(SignUpError::InvalidEmail);
    }
    validate_password_length(&form.password)?;

    sign_up(
        NewAccount {
            email: form.email,
            password: form.password,
            full_name: form.full_name,
        },
        &state.db,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(SIGNUP_SUCCESS_MESSAGE)),
    ))
}
