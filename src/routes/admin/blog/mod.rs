mod autosave;
mod export;
mod images;

pub use autosave::*;
pub use export::*;
pub use images::*;

use crate::authentication::UserId;
use crate::domain::seo::{self, SeoInput, SeoReport};
use crate::domain::{
    BlogPost, BlogPostSummary, PostInput, PostValidationError, generate_slug,
};
use crate::rich_text::{read_time_minutes, sanitize_html};
use crate::routes::blog::queries;
use crate::routes::constants::{ERROR_POST_NOT_FOUND, ERROR_SOMETHING_WENT_WRONG};
use crate::routes::utils::json_error;
use crate::startup::AppState;
use crate::telemetry::error_chain_fmt;
use axum::Extension;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(thiserror::Error)]
pub enum PostError {
    #[error(transparent)]
    ValidationError(#[from] PostValidationError),
    #[error("{}", ERROR_POST_NOT_FOUND)]
    NotFound,
    /// Carries the database message verbatim.
    #[error("{0}")]
    SlugConflict(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for PostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<sqlx::Error> for PostError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                PostError::SlugConflict(db.message().to_string())
            }
            e => PostError::UnexpectedError(anyhow::Error::new(e)),
        }
    }
}

impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        match self {
            PostError::ValidationError(_) => json_error(StatusCode::BAD_REQUEST, self.to_string()),
            PostError::NotFound => json_error(StatusCode::NOT_FOUND, self.to_string()),
            PostError::SlugConflict(_) => json_error(StatusCode::CONFLICT, self.to_string()),
            PostError::UnexpectedError(ref e) => {
                tracing::error!(error.cause_chain = ?e, "Post operation failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, ERROR_SOMETHING_WENT_WRONG)
            }
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DeletePostResponse {
    /// Whether the post was deleted
    pub is_deleted: bool,
    /// Title of the deleted post
    pub title: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct SlugQuery {
    pub title: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SlugResponse {
    /// Empty when the title has no usable characters
    pub slug: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct PreviewRequest {
    pub content: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PreviewResponse {
    pub html: String,
    pub read_time_minutes_hint: i32,
}

/// Admin: Get all blog posts
///
/// Returns all blog posts regardless of status, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/blog/posts",
    tag = "admin-blog",
    responses(
        (status = 200, description = "List of all blog posts", body = Vec<BlogPostSummary>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an admin"),
    )
)]
#[tracing::instrument(name = "Admin: Get all blog posts", skip(state))]
pub async fn admin_get_all_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlogPostSummary>>, PostError> {
    Ok(Json(queries::get_all_posts(&state.db).await?))
}

/// Admin: Get single blog post by ID
///
/// Returns a specific blog post regardless of status, with raw content.
#[utoipa::path(
    get,
    path = "/api/admin/blog/posts/{id}",
    tag = "admin-blog",
    params(
        ("id" = Uuid, Path, description = "Blog post unique identifier")
    ),
    responses(
        (status = 200, description = "Blog post found", body = BlogPost),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Blog post not found"),
    )
)]
#[tracing::instrument(name = "Admin: Get blog post by id", skip(state))]
pub async fn admin_get_post_by_id(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<BlogPost>, PostError> {
    queries::get_post_by_id(&state.db, post_id)
        .await?
        .map(Json)
        .ok_or(PostError::NotFound)
}

/// Admin: Create new blog post
///
/// The slug is derived from the title when omitted. Publishing stamps
/// `published_at`.
#[utoipa::path(
    post,
    path = "/api/admin/blog/posts",
    tag = "admin-blog",
    request_body = PostInput,
    responses(
        (status = 201, description = "Blog post created", body = BlogPost),
        (status = 400, description = "Required fields missing"),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Slug already in use"),
    )
)]
#[tracing::instrument(
    name = "Admin: Create blog post",
    skip(state, input),
    fields(user_id = %user_id, post_id = tracing::field::Empty)
)]
pub async fn admin_create_post(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
    Json(input): Json<PostInput>,
) -> Result<impl IntoResponse, PostError> {
    let post = input.validate_new()?;
    let created = queries::insert_post(&state.db, &post, *user_id).await?;
    tracing::Span::current().record("post_id", tracing::field::display(&created.id));
    Ok((StatusCode::CREATED, Json(created)))
}

/// Admin: Update existing blog post
///
/// Manual save. The slug is never re-derived for an existing post.
#[utoipa::path(
    put,
    path = "/api/admin/blog/posts/{id}",
    tag = "admin-blog",
    params(
        ("id" = Uuid, Path, description = "Blog post unique identifier")
    ),
    request_body = PostInput,
    responses(
        (status = 200, description = "Blog post updated", body = BlogPost),
        (status = 400, description = "Required fields missing"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Blog post not found"),
        (status = 409, description = "Slug already in use"),
    )
)]
#[tracing::instrument(name = "Admin: Update blog post", skip(state, input))]
pub async fn admin_update_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Json(input): Json<PostInput>,
) -> Result<Json<BlogPost>, PostError> {
    let post = input.validate_existing()?;
    queries::update_post(&state.db, post_id, &post)
        .await?
        .map(Json)
        .ok_or(PostError::NotFound)
}

/// Admin: Delete blog post
///
/// Permanently deletes a blog post. Deleting a missing post is not an error.
#[utoipa::path(
    delete,
    path = "/api/admin/blog/posts/{id}",
    tag = "admin-blog",
    params(
        ("id" = Uuid, Path, description = "Blog post unique identifier")
    ),
    responses(
        (status = 200, description = "Deletion result", body = DeletePostResponse),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(name = "Admin: Delete blog post", skip(state))]
pub async fn admin_delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<DeletePostResponse>, PostError> {
    state.autosave.remove(post_id);
    let result = queries::delete_post(&state.db, post_id).await?;
    Ok(Json(DeletePostResponse {
        is_deleted: result.is_deleted,
        title: result.title,
    }))
}

/// Admin: Suggest a slug for a title
#[utoipa::path(
    get,
    path = "/api/admin/blog/slug",
    tag = "admin-blog",
    params(SlugQuery),
    responses(
        (status = 200, description = "Derived slug", body = SlugResponse),
    )
)]
pub async fn admin_suggest_slug(Query(query): Query<SlugQuery>) -> Json<SlugResponse> {
    Json(SlugResponse {
        slug: generate_slug(&query.title),
    })
}

/// Admin: Run the SEO checklist
///
/// Advisory only; saving is never blocked by the result.
#[utoipa::path(
    post,
    path = "/api/admin/blog/seo-check",
    tag = "admin-blog",
    request_body = SeoInput,
    responses(
        (status = 200, description = "Checklist result", body = SeoReport),
    )
)]
pub async fn admin_seo_check(Json(input): Json<SeoInput>) -> Json<SeoReport> {
    Json(seo::evaluate(&input))
}

/// Admin: Preview rendered content
///
/// Returns the content exactly as readers will see it.
#[utoipa::path(
    post,
    path = "/api/admin/blog/preview",
    tag = "admin-blog",
    request_body = PreviewRequest,
    responses(
        (status = 200, description = "Sanitized HTML", body = PreviewResponse),
    )
)]
pub async fn admin_preview(Json(request): Json<PreviewRequest>) -> Json<PreviewResponse> {
    Json(PreviewResponse {
        html: sanitize_html(&request.content),
        read_time_minutes_hint: read_time_minutes(&request.content),
    })
}
