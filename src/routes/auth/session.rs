use crate::session_state::TypedSession;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

/// What the client needs to decide which UI to show. Roles are resolved
/// before this is sent, so `is_admin` is never pending.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AuthStateResponse {
    pub authenticated: bool,
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub is_admin: bool,
    pub loading: bool,
}

/// Current authentication state
#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "auth",
    responses(
        (status = 200, description = "Authentication state of the caller", body = AuthStateResponse),
    )
)]
#[tracing::instrument(name = "Get auth state", skip(session))]
pub async fn auth_state(session: TypedSession) -> Json<AuthStateResponse> {
    let user = session.get_user().await.ok().flatten();
    Json(match user {
        Some(user) => AuthStateResponse {
            authenticated: true,
            user_id: Some(user.user_id),
            email: Some(user.email),
            is_admin: user.capabilities.is_admin(),
            loading: false,
        },
        None => AuthStateResponse {
            authenticated: false,
            user_id: None,
            email: None,
            is_admin: false,
            loading: false,
        },
    })
}
