//! XML sitemap for search engines, generated at build time.

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use std::fmt::Write;
use xml::escape::escape_str_pcdata;

#[derive(Debug, Clone, Copy)]
pub struct StaticPage {
    pub path: &'static str,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

pub const STATIC_PAGES: [StaticPage; 4] = [
    StaticPage {
        path: "/",
        changefreq: "weekly",
        priority: "1.0",
    },
    StaticPage {
        path: "/blog",
        changefreq: "daily",
        priority: "0.9",
    },
    StaticPage {
        path: "/datenschutz",
        changefreq: "monthly",
        priority: "0.3",
    },
    StaticPage {
        path: "/impressum",
        changefreq: "monthly",
        priority: "0.3",
    },
];

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SitemapPost {
    pub slug: String,
    pub updated_at: DateTime<Utc>,
}

#[tracing::instrument(name = "Fetch published posts for sitemap", skip(pool))]
pub async fn fetch_published_posts(pool: &PgPool) -> Result<Vec<SitemapPost>, anyhow::Error> {
    sqlx::query_as::<_, SitemapPost>(
        r#"
        SELECT slug, updated_at
        FROM blog_posts
        WHERE status = 'published'
        ORDER BY updated_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to fetch published blog posts for the sitemap.")
}

fn push_url(xml: &mut String, loc: &str, lastmod: NaiveDate, changefreq: &str, priority: &str) {
    // Writing into a String cannot fail.
    let _ = write!(
        xml,
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>\n",
        escape_str_pcdata(loc),
        lastmod.format("%Y-%m-%d"),
        changefreq,
        priority
    );
}

pub fn render(
    domain: &str,
    static_pages: &[StaticPage],
    posts: &[SitemapPost],
    today: NaiveDate,
) -> String {
    let domain = domain.trim_end_matches('/');
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for page in static_pages {
        push_url(
            &mut xml,
            &format!("{}{}", domain, page.path),
            today,
            page.changefreq,
            page.priority,
        );
    }
    for post in posts {
        push_url(
            &mut xml,
            &format!("{}/blog/{}", domain, post.slug),
            post.updated_at.date_naive(),
            "weekly",
            "0.8",
        );
    }
    xml.push_str("</urlset>");
    xml
}
