mod pages;
pub mod queries;

pub use pages::*;

use crate::domain::{BlogPost, BlogPostSummary, PublicProfile};
use crate::rich_text::sanitize_html;
use crate::routes::constants::ERROR_POST_NOT_FOUND;
use crate::routes::utils::{internal_error, json_error};
use crate::startup::AppState;
use anyhow::Context;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use queries::{ALL_CATEGORIES, PostFilter};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct BlogListQuery {
    /// Case-insensitive search in title and excerpt
    pub q: Option<String>,
    /// Exact tag, `all` for no restriction
    pub tag: Option<String>,
}

impl From<BlogListQuery> for PostFilter {
    fn from(query: BlogListQuery) -> Self {
        let search = query
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        let tag = query
            .tag
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && t != ALL_CATEGORIES);
        PostFilter { search, tag }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BlogListResponse {
    pub posts: Vec<BlogPostSummary>,
    /// `all` followed by every tag in use
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ShareLinks {
    pub linkedin: String,
    pub twitter: String,
    /// The canonical post URL, for copying
    pub url: String,
}

impl ShareLinks {
    pub fn new(base_url: &str, slug: &str, title: &str) -> Self {
        let url = format!("{}/blog/{}", base_url.trim_end_matches('/'), slug);
        let linkedin = reqwest::Url::parse_with_params(
            "https://www.linkedin.com/sharing/share-offsite/",
            &[("url", url.as_str())],
        )
        .map(String::from)
        .unwrap_or_default();
        let twitter = reqwest::Url::parse_with_params(
            "https://twitter.com/intent/tweet",
            &[("url", url.as_str()), ("text", title)],
        )
        .map(String::from)
        .unwrap_or_default();
        Self {
            linkedin,
            twitter,
            url,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PostDetail {
    /// The post with sanitized content and the incremented view count
    pub post: BlogPost,
    pub author_profile: Option<PublicProfile>,
    pub related: Vec<BlogPostSummary>,
    pub share: ShareLinks,
}

pub struct BlogListing {
    pub posts: Vec<BlogPostSummary>,
    pub categories: Vec<String>,
}

pub async fn load_listing(pool: &PgPool, filter: &PostFilter) -> Result<BlogListing, anyhow::Error> {
    let posts = queries::get_published_posts(pool, filter)
        .await
        .context("Failed to fetch published posts.")?;
    let tags = queries::get_published_tags(pool)
        .await
        .context("Failed to fetch tags.")?;
    Ok(BlogListing {
        posts,
        categories: queries::categories(&tags),
    })
}

/// Loads a published post and counts the view. `None` for unknown slugs
/// and drafts.
#[tracing::instrument(name = "Load post detail", skip(state), fields(post_id = tracing::field::Empty))]
pub async fn load_post_detail(
    state: &AppState,
    slug: &str,
) -> Result<Option<PostDetail>, anyhow::Error> {
    let Some(mut post) = queries::get_published_post_by_slug(&state.db, slug)
        .await
        .context("Failed to fetch the post.")?
    else {
        return Ok(None);
    };
    tracing::Span::current().record("post_id", tracing::field::display(&post.id));

    match queries::increment_view_count(&state.db, post.id).await {
        Ok(view_count) => post.view_count = view_count,
        Err(e) => tracing::warn!(error.cause_chain = ?e, "Failed to count the view"),
    }

    let author_profile = match post.author_id {
        Some(author_id) => queries::get_public_profile(&state.db, author_id)
            .await
            .context("Failed to fetch the author profile.")?,
        None => None,
    };
    let related = queries::get_related_posts(&state.db, post.id, &post.tags)
        .await
        .context("Failed to fetch related posts.")?;
    let share = ShareLinks::new(&state.site.domain, &post.slug, &post.title);
    post.content = sanitize_html(&post.content);

    Ok(Some(PostDetail {
        post,
        author_profile,
        related,
        share,
    }))
}

/// List published blog posts
///
/// Newest first. Also returns the category list for the filter bar.
#[utoipa::path(
    get,
    path = "/api/blog/posts",
    tag = "blog",
    params(BlogListQuery),
    responses(
        (status = 200, description = "Published blog posts", body = BlogListResponse),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(name = "Get published blog posts", skip(state))]
pub async fn get_published_posts(
    State(state): State<AppState>,
    Query(query): Query<BlogListQuery>,
) -> Response {
    match load_listing(&state.db, &query.into()).await {
        Ok(listing) => Json(BlogListResponse {
            posts: listing.posts,
            categories: listing.categories,
        })
        .into_response(),
        Err(e) => internal_error(&e),
    }
}

/// Read a published blog post
///
/// Counts the view, and includes author, related posts and share links.
#[utoipa::path(
    get,
    path = "/api/blog/posts/{slug}",
    tag = "blog",
    params(
        ("slug" = String, Path, description = "URL slug of the post")
    ),
    responses(
        (status = 200, description = "Blog post found", body = PostDetail),
        (status = 404, description = "Blog post not found or not published"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(name = "Get blog post by slug", skip(state))]
pub async fn get_post_by_slug(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match load_post_detail(&state, &slug).await {
        Ok(Some(detail)) => Json(detail).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, ERROR_POST_NOT_FOUND),
        Err(e) => internal_error(&e),
    }
}
