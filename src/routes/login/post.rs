use crate::authentication::{AuthError, Credentials};
use crate::flash_messages::FlashMessageSender;
use crate::routes::auth::sign_in;
use crate::routes::constants::{
    DASHBOARD_PATH, ERROR_AUTHENTICATION_FAILED, ERROR_SOMETHING_WENT_WRONG, LOGIN_PATH,
};
use crate::session_state::TypedSession;
use crate::startup::AppState;
use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use secrecy::Secret;

#[derive(serde::Deserialize)]
pub struct LoginFormData {
    email: String,
    password: Secret<String>,
}

#[tracing::instrument(
    skip(form, state, session),
    fields(email=tracing::field::Empty, user_id=tracing::field::Empty)
)]
pub async fn login(
    session: TypedSession,
    State(state): State<AppState>,
    Form(form): Form<LoginFormData>,
) -> Redirect {
    tracing::Span::current().record("email", tracing::field::display(&form.email));
    let credentials = Credentials {
        email: form.email,
        password: form.password,
    };
    let flash = FlashMessageSender::new(session.0.clone());
    let message = match sign_in(&session, &state.db, credentials).await {
        Ok(_) => return Redirect::to(DASHBOARD_PATH),
        Err(AuthError::InvalidCredentials(_)) => ERROR_AUTHENTICATION_FAILED,
        Err(AuthError::UnexpectedError(e)) => {
            tracing::error!(error.cause_chain = ?e, "Login failed unexpectedly");
            ERROR_SOMETHING_WENT_WRONG
        }
    };
    if let Err(e) = flash.error(message).await {
        tracing::error!("Failed to store flash message: {:?}", e);
    }
    Redirect::to(LOGIN_PATH)
}
