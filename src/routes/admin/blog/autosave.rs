use super::PostError;
use crate::domain::PostInput;
use crate::routes::blog::queries;
use crate::startup::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

/// Admin: Queue an auto-save
///
/// Accepts the current editor state and returns immediately. The draft is
/// written once the editor has been idle for the debounce interval.
/// Failures are never reported back.
#[utoipa::path(
    put,
    path = "/api/admin/blog/posts/{id}/autosave",
    tag = "admin-blog",
    params(
        ("id" = Uuid, Path, description = "Blog post unique identifier")
    ),
    request_body = PostInput,
    responses(
        (status = 202, description = "Draft queued"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Only existing posts auto-save"),
    )
)]
#[tracing::instrument(name = "Admin: Queue auto-save", skip(state, draft))]
pub async fn admin_autosave_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Json(draft): Json<PostInput>,
) -> Result<StatusCode, PostError> {
    if !queries::post_exists(&state.db, post_id).await? {
        return Err(PostError::NotFound);
    }
    state.autosave.submit(post_id, draft);
    Ok(StatusCode::ACCEPTED)
}
