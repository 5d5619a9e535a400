use crate::authentication::{
    CreateUserError, NewAccount, PasswordValidationError, create_initial_admin,
    validate_password_length,
};
use crate::routes::constants::ERROR_SOMETHING_WENT_WRONG;
use crate::routes::utils::{ApiResponse, json_error};
use crate::startup::AppState;
use crate::telemetry::error_chain_fmt;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use secrecy::{ExposeSecret, Secret};
use validator::ValidateEmail;

#[derive(serde::Deserialize, utoipa::ToSchema)]
pub struct InitialAdminData {
    email: String,
    #[schema(value_type = String)]
    password: Secret<String>,
    #[schema(value_type = String)]
    password_confirmation: Secret<String>,
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(thiserror::Error)]
pub enum InitialAdminError {
    #[error("Die beiden Passwörter stimmen nicht überein.")]
    PasswordMismatch,
    #[error(transparent)]
    InvalidPassword(#[from] PasswordValidationError),
    #[error("Bitte geben Sie eine gültige E-Mail-Adresse an.")]
    InvalidEmail,
    #[error("Es existieren bereits Benutzer. Die Ersteinrichtung ist nicht mehr verfügbar.")]
    UsersAlreadyExist,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for InitialAdminError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl IntoResponse for InitialAdminError {
    fn into_response(self) -> Response {
        match self {
            InitialAdminError::PasswordMismatch
            | InitialAdminError::InvalidPassword(_)
            | InitialAdminError::InvalidEmail => {
                json_error(StatusCode::BAD_REQUEST, self.to_string())
            }
            InitialAdminError::UsersAlreadyExist => {
                json_error(StatusCode::CONFLICT, self.to_string())
            }
            InitialAdminError::UnexpectedError(ref e) => {
                tracing::error!(error.cause_chain = ?e, "Initial admin setup failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, ERROR_SOMETHING_WENT_WRONG)
            }
        }
    }
}

/// Create the first administrator
///
/// Only available while no user exists.
#[utoipa::path(
    post,
    path = "/api/initial_admin",
    tag = "auth",
    request_body = InitialAdminData,
    responses(
        (status = 201, description = "Admin account created", body = ApiResponse),
        (status = 400, description = "Invalid input", body = ApiResponse),
        (status = 409, description = "Users already exist", body = ApiResponse),
    )
)]
#[tracing::instrument(name = "Create initial admin", skip(form, state), fields(email = %form.email))]
pub async fn initial_admin(
    State(state): State<AppState>,
    Json(form): Json<InitialAdminData>,
) -> Result<impl IntoResponse, InitialAdminError> {
    if !form.email.trim().validate_email() {
        return Err(InitialAdminError::InvalidEmail);
    }
    if form.password.expose_secret() != form.password_confirmation.expose_secret() {
        return Err(InitialAdminError::PasswordMismatch);
    }
    validate_password_length(&form.password)?;

    let created = create_initial_admin(
        NewAccount {
            email: form.email,
            password: form.password,
            full_name: form.full_name,
        },
        &state.db,
    )
    .await
    .map_err(|e| match e {
        CreateUserError::EmailTaken => InitialAdminError::UsersAlreadyExist,
        CreateUserError::UnexpectedError(e) => InitialAdminError::UnexpectedError(e),
    })?;
    if created.is_none() {
        return Err(InitialAdminError::UsersAlreadyExist);
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            "Admin-Konto erstellt. Bitte melden Sie sich an.",
        )),
    ))
}
