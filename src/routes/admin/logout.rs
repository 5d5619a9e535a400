use crate::flash_messages::FlashMessageSender;
use crate::routes::constants::{DASHBOARD_PATH, ERROR_SIGN_OUT_FAILED};
use crate::session_state::TypedSession;
use axum::response::Redirect;

/// On failure the user is still signed in, so they go back to the dashboard.
#[tracing::instrument(name = "Admin log out", skip(session))]
pub async fn log_out(session: TypedSession) -> Redirect {
    let outcome = session.log_out().await;
    match outcome {
        Ok(()) => Redirect::to("/"),
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "Failed to end the session");
            if let Err(e) = FlashMessageSender::new(session.0)
                .error(ERROR_SIGN_OUT_FAILED)
                .await
            {
                tracing::warn!(error.cause_chain = ?e, "Failed to store flash message");
            }
            Redirect::to(DASHBOARD_PATH)
        }
    }
}
