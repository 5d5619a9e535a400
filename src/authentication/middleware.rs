use crate::routes::constants::{
    ERROR_ADMIN_REQUIRED, ERROR_AUTHENTICATION_REQUIRED, LOGIN_PATH,
};
use crate::routes::utils::json_error;
use crate::session_state::{SessionUser, TypedSession};
use axum::extract::{OriginalUri, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Redirect, Response};
use std::ops::Deref;
use uuid::Uuid;

#[derive(Copy, Clone, Debug)]
pub struct UserId(Uuid);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Deref for UserId {
    type Target = Uuid;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn is_api_request(uri: &OriginalUri) -> bool {
    uri.path().starts_with("/api/")
}

/// Lets signed-in users through and exposes them as `UserId` and
/// `SessionUser` request extensions. API callers get a JSON 401, browsers
/// are sent to the login page.
pub async fn require_auth(
    session: TypedSession,
    uri: OriginalUri,
    mut request: Request,
    next: Next,
) -> Response {
    match session.get_user().await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(UserId(user.user_id));
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) | Err(_) if is_api_request(&uri) => {
            json_error(StatusCode::UNAUTHORIZED, ERROR_AUTHENTICATION_REQUIRED)
        }
        Ok(None) | Err(_) => Redirect::to(LOGIN_PATH).into_response(),
    }
}

/// Runs after `require_auth`. Uses the capabilities cached at sign-in.
pub async fn require_admin(uri: OriginalUri, request: Request, next: Next) -> Response {
    let is_admin = request
        .extensions()
        .get::<SessionUser>()
        .is_some_and(|user| user.capabilities.is_admin());
    if is_admin {
        return next.run(request).await;
    }
    tracing::warn!(path = %uri.path(), "Non-admin user refused");
    if is_api_request(&uri) {
        json_error(StatusCode::FORBIDDEN, ERROR_ADMIN_REQUIRED)
    } else {
        (
            StatusCode::FORBIDDEN,
            Html(crate::routes::site::render_forbidden()),
        )
            .into_response()
    }
}
