use crate::domain::{BlogPost, BlogPostStatus, BlogPostSummary, PublicProfile, ValidPost};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const POST_COLUMNS: &str = r#"
    id, title, slug, content, excerpt, author, author_id, tags, status,
    seo_title, meta_description, seo_keywords, canonical_url,
    featured_image_url, featured_image_alt, seo_image_tag,
    view_count, read_time_minutes, created_at, updated_at, published_at
"#;

const SUMMARY_COLUMNS: &str = r#"
    id, title, slug, excerpt, tags, status, view_count, read_time_minutes,
    featured_image_url, featured_image_alt, meta_description,
    created_at, updated_at, published_at
"#;

pub const MAX_RELATED_POSTS: i64 = 3;

/// Listing filter for the public blog. `None` means "no restriction".
#[derive(Debug, Default, Clone)]
pub struct PostFilter {
    pub search: Option<String>,
    pub tag: Option<String>,
}

#[tracing::instrument(name = "Fetch published blog posts from database", skip(pool))]
pub async fn get_published_posts(
    pool: &PgPool,
    filter: &PostFilter,
) -> Result<Vec<BlogPostSummary>, sqlx::Error> {
    let pattern = filter
        .search
        .as_ref()
        .map(|q| format!("%{}%", escape_like(q)));
    sqlx::query_as::<_, BlogPostSummary>(&format!(
        r#"
        SELECT {SUMMARY_COLUMNS}
        FROM blog_posts
        WHERE status = 'published'
          AND ($1::text IS NULL OR title ILIKE $1 OR excerpt ILIKE $1)
          AND ($2::text IS NULL OR $2 = ANY(tags))
        ORDER BY published_at DESC NULLS LAST
        "#
    ))
    .bind(pattern)
    .bind(filter.tag.as_deref())
    .fetch_all(pool)
    .await
}

/// Tag lists of every published post, newest first.
#[tracing::instrument(name = "Fetch published tags from database", skip(pool))]
pub async fn get_published_tags(pool: &PgPool) -> Result<Vec<Vec<String>>, sqlx::Error> {
    let rows: Vec<(Vec<String>,)> = sqlx::query_as(
        r#"
        SELECT tags
        FROM blog_posts
        WHERE status = 'published'
        ORDER BY published_at DESC NULLS LAST
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(tags,)| tags).collect())
}

#[tracing::instrument(name = "Fetch published blog post by slug", skip(pool))]
pub async fn get_published_post_by_slug(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<BlogPost>, sqlx::Error> {
    sqlx::query_as::<_, BlogPost>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM blog_posts
        WHERE slug = $1 AND status = 'published'
        "#
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await
}

/// Single-statement increment; concurrent readers never lose an update.
#[tracing::instrument(name = "Increment view count", skip(pool))]
pub async fn increment_view_count(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
    let (view_count,): (i64,) = sqlx::query_as(
        r#"
        UPDATE blog_posts
        SET view_count = view_count + 1
        WHERE id = $1
        RETURNING view_count
        "#,
    )
    .bind(post_id)
    .fetch_one(pool)
    .await?;
    Ok(view_count)
}

#[tracing::instrument(name = "Fetch public author profile", skip(pool))]
pub async fn get_public_profile(
    pool: &PgPool,
    author_id: Uuid,
) -> Result<Option<PublicProfile>, sqlx::Error> {
    sqlx::query_as::<_, PublicProfile>(
        r#"
        SELECT id, full_name, avatar_url
        FROM public_profiles
        WHERE id = $1
        "#,
    )
    .bind(author_id)
    .fetch_optional(pool)
    .await
}

/// Published posts sharing at least one tag, best overlap first, then newest.
#[tracing::instrument(name = "Fetch related blog posts", skip(pool))]
pub async fn get_related_posts(
    pool: &PgPool,
    post_id: Uuid,
    tags: &[String],
) -> Result<Vec<BlogPostSummary>, sqlx::Error> {
    if tags.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, BlogPostSummary>(&format!(
        r#"
        SELECT {SUMMARY_COLUMNS}
        FROM blog_posts
        WHERE status = 'published'
          AND id <> $1
          AND tags && $2::text[]
        ORDER BY
          cardinality(ARRAY(SELECT unnest(tags) INTERSECT SELECT unnest($2::text[]))) DESC,
          published_at DESC NULLS LAST
        LIMIT $3
        "#
    ))
    .bind(post_id)
    .bind(tags)
    .bind(MAX_RELATED_POSTS)
    .fetch_all(pool)
    .await
}

#[tracing::instrument(name = "Fetch all blog posts from database", skip(pool))]
pub async fn get_all_posts(pool: &PgPool) -> Result<Vec<BlogPostSummary>, sqlx::Error> {
    sqlx::query_as::<_, BlogPostSummary>(&format!(
        r#"
        SELECT {SUMMARY_COLUMNS}
        FROM blog_posts
        ORDER BY created_at DESC
        "#
    ))
    .fetch_all(pool)
    .await
}

#[tracing::instrument(name = "Fetch blog post by id from database", skip(pool))]
pub async fn get_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<BlogPost>, sqlx::Error> {
    sqlx::query_as::<_, BlogPost>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM blog_posts
        WHERE id = $1
        "#
    ))
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

pub async fn post_exists(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM blog_posts WHERE id = $1)")
            .bind(post_id)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

#[tracing::instrument(name = "Insert blog post into database", skip(pool, post), fields(slug = %post.slug))]
pub async fn insert_post(
    pool: &PgPool,
    post: &ValidPost,
    author_id: Uuid,
) -> Result<BlogPost, sqlx::Error> {
    let stamp_published_at = BlogPostStatus::stamps_published_at(None, post.status);
    sqlx::query_as::<_, BlogPost>(&format!(
        r#"
        INSERT INTO blog_posts (
            id, title, slug, content, excerpt, author, author_id, tags, status,
            seo_title, meta_description, seo_keywords, canonical_url,
            featured_image_url, featured_image_alt, seo_image_tag,
            read_time_minutes, published_at
        )
        VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
            CASE WHEN $18 THEN NOW() ELSE NULL END
        )
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&post.title)
    .bind(&post.slug)
    .bind(&post.content)
    .bind(&post.excerpt)
    .bind(&post.author)
    .bind(author_id)
    .bind(&post.tags)
    .bind(post.status.as_str())
    .bind(&post.seo_title)
    .bind(&post.meta_description)
    .bind(&post.seo_keywords)
    .bind(&post.canonical_url)
    .bind(&post.featured_image_url)
    .bind(&post.featured_image_alt)
    .bind(&post.seo_image_tag)
    .bind(post.read_time_minutes)
    .bind(stamp_published_at)
    .fetch_one(pool)
    .await
}

/// Writes every editable field. `published_at` is stamped when the post
/// enters the published state and is left untouched otherwise.
/// Returns `None` when the post does not exist.
#[tracing::instrument(name = "Update blog post in database", skip(pool, post), fields(slug = %post.slug))]
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    post: &ValidPost,
) -> Result<Option<BlogPost>, sqlx::Error> {
    let mut transaction = pool.begin().await?;
    let Some(previous) = current_status(&mut transaction, post_id).await? else {
        return Ok(None);
    };
    let stamp_published_at = BlogPostStatus::stamps_published_at(Some(previous), post.status);

    let updated = sqlx::query_as::<_, BlogPost>(&format!(
        r#"
        UPDATE blog_posts
        SET title = $2, slug = $3, content = $4, excerpt = $5, author = $6,
            tags = $7, status = $8, seo_title = $9, meta_description = $10,
            seo_keywords = $11, canonical_url = $12, featured_image_url = $13,
            featured_image_alt = $14, seo_image_tag = $15, read_time_minutes = $16,
            published_at = CASE WHEN $17 THEN NOW() ELSE published_at END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(post_id)
    .bind(&post.title)
    .bind(&post.slug)
    .bind(&post.content)
    .bind(&post.excerpt)
    .bind(&post.author)
    .bind(&post.tags)
    .bind(post.status.as_str())
    .bind(&post.seo_title)
    .bind(&post.meta_description)
    .bind(&post.seo_keywords)
    .bind(&post.canonical_url)
    .bind(&post.featured_image_url)
    .bind(&post.featured_image_alt)
    .bind(&post.seo_image_tag)
    .bind(post.read_time_minutes)
    .bind(stamp_published_at)
    .fetch_one(&mut *transaction)
    .await?;

    transaction.commit().await?;
    Ok(Some(updated))
}

async fn current_status(
    transaction: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
) -> Result<Option<BlogPostStatus>, sqlx::Error> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT status FROM blog_posts WHERE id = $1 FOR UPDATE")
            .bind(post_id)
            .fetch_optional(&mut **transaction)
            .await?;
    row.map(|(status,)| {
        BlogPostStatus::try_from(status).map_err(|e| sqlx::Error::Decode(e.into()))
    })
    .transpose()
}

pub struct DeletePostResult {
    pub is_deleted: bool,
    pub title: String,
}

#[tracing::instrument(name = "Delete blog post from database", skip(pool))]
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<DeletePostResult, sqlx::Error> {
    let deleted: Option<(String,)> =
        sqlx::query_as("DELETE FROM blog_posts WHERE id = $1 RETURNING title")
            .bind(post_id)
            .fetch_optional(pool)
            .await?;

    Ok(match deleted {
        Some((title,)) => DeletePostResult {
            is_deleted: true,
            title,
        },
        None => DeletePostResult {
            is_deleted: false,
            title: String::new(),
        },
    })
}

/// `"all"` followed by every distinct tag in first-seen order.
pub fn categories(tag_lists: &[Vec<String>]) -> Vec<String> {
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for tag in tag_lists.iter().flatten() {
        if !categories.contains(tag) {
            categories.push(tag.clone());
        }
    }
    categories
}

pub const ALL_CATEGORIES: &str = "all";

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
