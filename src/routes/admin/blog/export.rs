use crate::csv_export::{ERROR_NOTHING_TO_EXPORT, export_filename, posts_to_csv};
use crate::routes::blog::queries;
use crate::routes::utils::{internal_error, json_error};
use crate::startup::AppState;
use anyhow::Context;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Admin: Export all posts as CSV
///
/// Fully quoted CSV with a UTF-8 byte order mark.
#[utoipa::path(
    get,
    path = "/api/admin/blog/export.csv",
    tag = "admin-blog",
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv"),
        (status = 404, description = "No posts to export"),
    )
)]
#[tracing::instrument(name = "Admin: Export posts as CSV", skip(state))]
pub async fn admin_export_csv(State(state): State<AppState>) -> Response {
    let result = async {
        let posts = queries::get_all_posts(&state.db)
            .await
            .context("Failed to fetch posts for export.")?;
        if posts.is_empty() {
            return Ok(None);
        }
        let body = posts_to_csv(&posts).context("Failed to write the CSV export.")?;
        tracing::info!(rows = posts.len(), "Exported posts");
        Ok::<_, anyhow::Error>(Some(body))
    }
    .await;

    match result {
        Ok(Some(body)) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                export_filename(chrono::Utc::now().date_naive())
            );
            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response()
        }
        Ok(None) => json_error(StatusCode::NOT_FOUND, ERROR_NOTHING_TO_EXPORT),
        Err(e) => internal_error(&e),
    }
}
