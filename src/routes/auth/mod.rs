mod session;
mod signin;
mod signout;
mod signup;

pub use session::*;
pub use signin::*;
pub use signout::*;
pub use signup::*;

use crate::authentication::{AuthError, Credentials, normalise_email, roles, validate_credentials};
use crate::domain::capabilities_for;
use crate::session_state::{SessionUser, TypedSession};
use anyhow::Context;
use sqlx::PgPool;

/// Verifies the credentials, resolves the roles once and starts the session.
/// Shared by the JSON API and the HTML login form.
pub async fn sign_in(
    session: &TypedSession,
    pool: &PgPool,
    credentials: Credentials,
) -> Result<SessionUser, AuthError> {
    let email = normalise_email(&credentials.email);
    let user_id = validate_credentials(credentials, pool).await?;
    tracing::Span::current().record("user_id", tracing::field::display(&user_id));

    let roles = roles::fetch_roles(pool, user_id)
        .await
        .context("Failed to fetch the user's roles.")?;
    let capabilities = capabilities_for(&roles);
    session
        .insert_user(user_id, email.clone(), capabilities.clone())
        .await
        .context("Failed to store the user in the session.")?;
    Ok(SessionUser {
        user_id,
        email,
        capabilities,
    })
}
