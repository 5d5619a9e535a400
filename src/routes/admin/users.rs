use crate::authentication::{UserId, roles};
use crate::domain::{SelfDemotionError, UserOverview, ensure_not_self_demotion};
use crate::routes::constants::ERROR_SOMETHING_WENT_WRONG;
use crate::routes::utils::{ApiResponse, json_error};
use crate::startup::AppState;
use crate::telemetry::error_chain_fmt;
use axum::Extension;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use uuid::Uuid;

#[derive(thiserror::Error)]
pub enum RoleError {
    #[error(transparent)]
    SelfDemotion(#[from] SelfDemotionError),
    #[error("Benutzer nicht gefunden.")]
    UserNotFound,
    #[error(transparent)]
    UnexpectedError(#[from] sqlx::Error),
}

impl std::fmt::Debug for RoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl IntoResponse for RoleError {
    fn into_response(self) -> Response {
        match self {
            RoleError::SelfDemotion(_) => json_error(StatusCode::BAD_REQUEST, self.to_string()),
            RoleError::UserNotFound => json_error(StatusCode::NOT_FOUND, self.to_string()),
            RoleError::UnexpectedError(ref e) => {
                tracing::error!(error.cause_chain = ?e, "Role management failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, ERROR_SOMETHING_WENT_WRONG)
            }
        }
    }
}

/// Admin: List users
///
/// All registered users with their profile name and admin flag, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "admin-users",
    responses(
        (status = 200, description = "Registered users", body = Vec<UserOverview>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an admin"),
    )
)]
#[tracing::instrument(name = "Admin: List users", skip(state))]
pub async fn admin_list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserOverview>>, RoleError> {
    Ok(Json(roles::list_users(&state.db).await?))
}

/// Admin: Grant the admin role
///
/// Granting to a user who already is an admin changes nothing.
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/admin",
    tag = "admin-users",
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Role granted", body = ApiResponse),
        (status = 404, description = "Unknown user", body = ApiResponse),
    )
)]
#[tracing::instrument(name = "Admin: Grant admin role", skip(state), fields(acting_user = %acting_user))]
pub async fn admin_grant_admin(
    State(state): State<AppState>,
    Extension(acting_user): Extension<UserId>,
    Path(target_user): Path<Uuid>,
) -> Result<Json<ApiResponse>, RoleError> {
    if !roles::grant_admin(&state.db, target_user).await? {
        return Err(RoleError::UserNotFound);
    }
    Ok(Json(ApiResponse::ok_with_message("Admin-Rechte vergeben.")))
}

/// Admin: Revoke the admin role
///
/// Admins cannot revoke their own role. The target's session keeps its
/// cached capabilities until it signs in again.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}/admin",
    tag = "admin-users",
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Role revoked", body = ApiResponse),
        (status = 400, description = "Attempted self-demotion", body = ApiResponse),
    )
)]
#[tracing::instrument(name = "Admin: Revoke admin role", skip(state), fields(acting_user = %acting_user))]
pub async fn admin_revoke_admin(
    State(state): State<AppState>,
    Extension(acting_user): Extension<UserId>,
    Path(target_user): Path<Uuid>,
) -> Result<Json<ApiResponse>, RoleError> {
    ensure_not_self_demotion(*acting_user, target_user)?;
    roles::revoke_admin(&state.db, target_user).await?;
    Ok(Json(ApiResponse::ok_with_message("Admin-Rechte entzogen.")))
}
