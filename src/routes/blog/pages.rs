use super::{BlogListQuery, PostDetail, load_listing, load_post_detail};
use crate::domain::BlogPostSummary;
use crate::routes::constants::BLOG_PATH;
use crate::routes::site::{HeadExtras, page};
use crate::startup::AppState;
use ammonia::clean_text;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use std::fmt::Write;

const BLOG_TITLE: &str = "KFZ-Blog & Ratgeber | KFZ-Teile Hennes Westermann";
const BLOG_DESCRIPTION: &str = "KFZ-Blog von Hennes Westermann: Ratgeber zu Ersatzteilen, \
    Autoteile-Tipps, Bremsenwechsel, Ölfilter und Autopflege.";

fn german_date(post: &BlogPostSummary) -> String {
    post.published_at
        .unwrap_or(post.created_at)
        .format("%d.%m.%Y")
        .to_string()
}

fn post_card(post: &BlogPostSummary) -> String {
    let mut card = String::from(r#"<article class="card">"#);
    let slug = clean_text(&post.slug);
    if let Some(image) = &post.featured_image_url {
        let alt = post.featured_image_alt.as_deref().unwrap_or(&post.title);
        let _ = write!(
            card,
            r#"<img src="{}" alt="{}" loading="lazy">"#,
            clean_text(image),
            clean_text(alt)
        );
    }
    let _ = write!(
        card,
        r#"<h2><a href="/blog/{slug}">{}</a></h2><p class="meta">{}"#,
        clean_text(&post.title),
        german_date(post),
    );
    if let Some(minutes) = post.read_time_minutes {
        let _ = write!(card, " · {} Min. Lesezeit", minutes);
    }
    card.push_str("</p>");
    if let Some(excerpt) = &post.excerpt {
        let _ = write!(card, "<p>{}</p>", clean_text(excerpt));
    }
    card.push_str("</article>");
    card
}

pub fn render_blog_index(
    posts: &[BlogPostSummary],
    categories: &[String],
    query: &BlogListQuery,
) -> String {
    let search = query.q.as_deref().unwrap_or_default();
    let selected = query.tag.as_deref().unwrap_or("all");
    let mut body = format!(
        r#"<section class="blog-index">
  <h1>KFZ-Blog &amp; Ratgeber</h1>
  <p>Fachwissen zu Ersatzteilen, Wartung und Reparaturen für Werkstätten und Privatkunden im Münsterland.</p>
  <form action="/blog" method="get" class="search">
    <input type="search" name="q" value="{}" placeholder="Artikel durchsuchen...">
    <input type="hidden" name="tag" value="{}">
    <button type="submit">Suchen</button>
  </form>
  <nav class="categories">"#,
        clean_text(search),
        clean_text(selected),
    );
    for category in categories {
        let label = if category == "all" {
            "Alle Kategorien"
        } else {
            category.as_str()
        };
        let class = if category == selected { " class=\"active\"" } else { "" };
        let href = reqwest::Url::parse_with_params(
            "http://localhost/blog",
            &[("q", search), ("tag", category.as_str())],
        )
        .map(|url| format!("/blog?{}", url.query().unwrap_or_default()))
        .unwrap_or_else(|_| BLOG_PATH.to_string());
        let _ = write!(
            body,
            r#"<a href="{}"{}>{}</a>"#,
            clean_text(&href),
            class,
            clean_text(label)
        );
    }
    body.push_str("</nav>\n<div class=\"cards\">");
    if posts.is_empty() {
        body.push_str("<p>Keine Artikel gefunden.</p>");
    }
    for post in posts {
        body.push_str(&post_card(post));
    }
    body.push_str("</div>\n</section>");

    page(
        BLOG_TITLE,
        BLOG_DESCRIPTION,
        &HeadExtras {
            keywords: vec![
                "KFZ Blog".into(),
                "Autoteile Ratgeber".into(),
                "Bremsbeläge wechseln".into(),
                "Ölfilter finden".into(),
            ],
            ..Default::default()
        },
        &body,
    )
}

pub fn render_blog_post(detail: &PostDetail) -> String {
    let post = &detail.post;
    let title = post.seo_title.as_deref().unwrap_or(&post.title);
    let description = post
        .meta_description
        .as_deref()
        .or(post.excerpt.as_deref())
        .unwrap_or(BLOG_DESCRIPTION);

    let mut body = String::from(r#"<article class="blog-post">"#);
    if let Some(image) = &post.featured_image_url {
        let alt = post.featured_image_alt.as_deref().unwrap_or(&post.title);
        let _ = write!(
            body,
            r#"<img class="featured" src="{}" alt="{}">"#,
            clean_text(image),
            clean_text(alt)
        );
    }
    let _ = write!(body, "<h1>{}</h1><p class=\"meta\">", clean_text(&post.title));
    if let Some(author) = detail
        .author_profile
        .as_ref()
        .and_then(|p| p.full_name.as_deref())
        .or(post.author.as_deref())
    {
        let _ = write!(body, "{} · ", clean_text(author));
    }
    if let Some(published_at) = post.published_at {
        let _ = write!(body, "{} · ", published_at.format("%d.%m.%Y"));
    }
    let _ = write!(body, "{} Aufrufe</p>", post.view_count);
    if !post.tags.is_empty() {
        body.push_str(r#"<ul class="tags">"#);
        for tag in &post.tags {
            let _ = write!(body, "<li>{}</li>", clean_text(tag));
        }
        body.push_str("</ul>");
    }
    // Content is sanitized by the loader.
    let _ = write!(body, r#"<div class="content">{}</div>"#, post.content);

    let _ = write!(
        body,
        r#"<aside class="share"><h2>Artikel teilen</h2>
  <a href="{}" target="_blank" rel="noopener noreferrer">LinkedIn</a>
  <a href="{}" target="_blank" rel="noopener noreferrer">X / Twitter</a>
  <input readonly value="{}" aria-label="Link kopieren">
</aside>"#,
        clean_text(&detail.share.linkedin),
        clean_text(&detail.share.twitter),
        clean_text(&detail.share.url),
    );

    if !detail.related.is_empty() {
        body.push_str(r#"<section class="related"><h2>Ähnliche Artikel</h2><div class="cards">"#);
        for related in &detail.related {
            body.push_str(&post_card(related));
        }
        body.push_str("</div></section>");
    }
    body.push_str(r#"<p><a href="/blog">Zurück zum Blog</a></p></article>"#);

    page(
        title,
        description,
        &HeadExtras {
            canonical_url: Some(
                post.canonical_url
                    .clone()
                    .unwrap_or_else(|| detail.share.url.clone()),
            ),
            og_image: post.featured_image_url.clone(),
            keywords: post.seo_keywords.clone(),
            noindex: false,
        },
        &body,
    )
}

#[tracing::instrument(name = "Render blog index", skip(state))]
pub async fn blog_index(
    State(state): State<AppState>,
    Query(query): Query<BlogListQuery>,
) -> Response {
    let filter = BlogListQuery {
        q: query.q.clone(),
        tag: query.tag.clone(),
    }
    .into();
    match load_listing(&state.db, &filter).await {
        Ok(listing) => {
            Html(render_blog_index(&listing.posts, &listing.categories, &query)).into_response()
        }
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "Failed to load the blog index");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(page(
                    BLOG_TITLE,
                    BLOG_DESCRIPTION,
                    &HeadExtras::default(),
                    "<p>Fehler beim Laden der Blogbeiträge.</p>",
                )),
            )
                .into_response()
        }
    }
}

/// Unknown slugs and load failures send the reader back to the index.
#[tracing::instrument(name = "Render blog post", skip(state))]
pub async fn blog_post_page(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match load_post_detail(&state, &slug).await {
        Ok(Some(detail)) => Html(render_blog_post(&detail)).into_response(),
        Ok(None) => Redirect::to(BLOG_PATH).into_response(),
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "Failed to load blog post");
            Redirect::to(BLOG_PATH).into_response()
        }
    }
}
